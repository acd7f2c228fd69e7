pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod metrics;
pub mod pager;
pub mod query;
pub mod relative_time;
pub mod row;
pub mod types;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use cache::ResponseCache;
use config::AppConfig;
use metrics::MAX_RANGE_DAYS;
use pager::{PullRequestPager, PullRequestsView};
use query::RouteState;
use row::{ContributorRow, Layout, RenderedRow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use types::Contributor;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Shared application state accessible to all request handlers.
pub struct AppState {
    /// Read-through cache in front of the upstream API.
    pub cache: ResponseCache,
    /// Application configuration loaded from environment variables.
    pub config: AppConfig,
}

impl AppState {
    /// Initializes the application state, including the upstream client and cache.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = api::ApiClient::new(&config)?;
        let cache = ResponseCache::new(&config, client);
        Ok(Self { cache, config })
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/prs", get(get_pull_requests))
        .route("/api/contributors/{login}/row", get(get_contributor_row))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "contributor-insights",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestParams {
    pub filter_name: Option<String>,
    pub selected_filter: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Comma-separated repository ids.
    pub repo_ids: Option<String>,
}

fn parse_repo_ids(raw: Option<&str>) -> Result<Vec<u64>, String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .map_err(|_| format!("Invalid repository id '{id}'"))
        })
        .collect()
}

pub async fn get_pull_requests(
    Query(params): Query<PullRequestParams>,
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<PullRequestsView>), (StatusCode, String)> {
    let repo_ids = parse_repo_ids(params.repo_ids.as_deref())
        .map_err(|message| (StatusCode::BAD_REQUEST, message))?;

    let route = RouteState {
        filter_name: params.filter_name,
        selected_filter: params.selected_filter,
    };
    let limit = params.limit.unwrap_or(state.config.default_limit);

    let mut pager = PullRequestPager::new(state.cache.clone(), route, limit, repo_ids);
    pager.set_page(params.page.unwrap_or(1));

    let view = pager.refresh().await;
    if view.is_error {
        tracing::error!(endpoint = %pager.endpoint(), "Upstream pull request search failed");
        return Ok((StatusCode::BAD_GATEWAY, Json(view)));
    }

    tracing::debug!(page = view.page, records = view.data.len(), "Returning pull requests");
    Ok((StatusCode::OK, Json(view)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowParams {
    /// The contributor's linked login; rows without one show placeholders.
    pub author_login: Option<String>,
    pub topic: Option<String>,
    pub range: Option<u32>,
    /// Present when the list supports selection; the initial checkbox state.
    pub selected: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub row: ContributorRow,
    pub mobile: RenderedRow,
    pub desktop: RenderedRow,
}

pub async fn get_contributor_row(
    Path(login): Path<String>,
    Query(params): Query<RowParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RowResponse>, (StatusCode, String)> {
    let login = login.trim().to_string();
    if login.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Login must not be empty".to_string()));
    }

    let range = match params.range.filter(|range| *range > 0) {
        Some(range) if range > MAX_RANGE_DAYS => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Range must be at most {MAX_RANGE_DAYS} days"),
            ));
        }
        Some(range) => range,
        None => state.config.contribution_range_days.min(MAX_RANGE_DAYS),
    };

    let contributor = Contributor {
        author_login: params
            .author_login
            .map(|author_login| author_login.trim().to_string())
            .filter(|author_login| !author_login.is_empty()),
        username: login,
    };

    let mut row = fetcher::fetch_contributor_row(
        &state.cache,
        contributor,
        params.topic.as_deref(),
        range,
        chrono::Utc::now(),
    )
    .await;
    if let Some(selected) = params.selected {
        row = row.with_selection(selected);
    }

    Ok(Json(RowResponse {
        mobile: row.render(Layout::Mobile),
        desktop: row.render(Layout::Desktop),
        row,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_ids() {
        assert_eq!(parse_repo_ids(None), Ok(vec![]));
        assert_eq!(parse_repo_ids(Some("1, 2,3,")), Ok(vec![1, 2, 3]));
        assert!(parse_repo_ids(Some("1,abc")).is_err());
    }
}
