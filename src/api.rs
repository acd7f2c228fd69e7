use crate::config::AppConfig;
use crate::error::ApiError;
use reqwest::Client;
use serde_json::Value;

/// Thin client over the upstream insights API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(client, &config.api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfiguration(
                "API base URL must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches a relative endpoint (path plus query string) as raw JSON.
    pub async fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        tracing::debug!(%url, "Fetching upstream endpoint");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::ApiResponse {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

pub fn user_endpoint(login: &str) -> String {
    let login: String = url::form_urlencoded::byte_serialize(login.as_bytes()).collect();
    format!("users/{login}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let client = ApiClient::with_base_url("http://localhost:8080/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let err = ApiClient::with_base_url("  ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_user_endpoint_escapes_login() {
        assert_eq!(user_endpoint("octocat"), "users/octocat");
        assert_eq!(user_endpoint("a/b"), "users/a%2Fb");
    }
}
