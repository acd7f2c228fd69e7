//! Records exchanged with the upstream insights API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A pull request as returned by the `prs/search` endpoint.
///
/// Every field tolerates `null` so one incomplete record cannot fail a whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default)]
    pub repo_id: Option<u64>,
    /// Repository in "owner/name" form; empty when the backend omits it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub author_login: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub merged: bool,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_at: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pagination metadata attached to every paged response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub item_count: u64,
    pub limit: u32,
    pub page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub page_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse {
    pub data: Vec<PullRequestRecord>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// An entry of the contributor list the row is rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default)]
    pub author_login: Option<String>,
    #[serde(default)]
    pub username: String,
}

impl Contributor {
    /// The login used for lookups: `author_login` when set, otherwise `username`.
    pub fn login(&self) -> &str {
        match self.author_login.as_deref() {
            Some(login) if !login.is_empty() => login,
            _ => &self.username,
        }
    }

    pub fn has_author_login(&self) -> bool {
        self.author_login.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// Public profile of a contributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub company: Option<String>,
    /// Language name to usage, in the order the API reports them.
    #[serde(default)]
    pub languages: Option<Map<String, Value>>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl UserProfile {
    pub fn language_names(&self) -> Vec<&str> {
        self.languages
            .as_ref()
            .map(|languages| languages.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// A repository resolved from its "owner/name" full name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    pub repo_owner: String,
    pub repo_name: String,
    pub repo_icon: String,
}

impl fmt::Display for RepoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Resolves a comma-separated list of "owner/name" pairs into repository summaries.
///
/// Entries that are not exactly `owner/name` are skipped.
pub fn repo_list(names: &str) -> Vec<RepoSummary> {
    names
        .split(',')
        .filter_map(|part| {
            let parts: Vec<&str> = part.trim().split('/').collect();
            match parts.as_slice() {
                [owner, name] if !owner.trim().is_empty() && !name.trim().is_empty() => {
                    let owner = owner.trim();
                    Some(RepoSummary {
                        repo_owner: owner.to_string(),
                        repo_name: name.trim().to_string(),
                        repo_icon: format!("https://www.github.com/{owner}.png?size=460"),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_list_parses_pairs() {
        let repos = repo_list("open-sauced/app, rust-lang/rust");

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].repo_owner, "open-sauced");
        assert_eq!(repos[0].repo_name, "app");
        assert_eq!(
            repos[0].repo_icon,
            "https://www.github.com/open-sauced.png?size=460"
        );
        assert_eq!(repos[1].to_string(), "rust-lang/rust");
    }

    #[test]
    fn test_repo_list_skips_malformed_entries() {
        assert!(repo_list("").is_empty());
        assert_eq!(repo_list("a/b,,nope,a/b/c,/x").len(), 1);
    }

    #[test]
    fn test_contributor_login_falls_back_to_username() {
        let with_login = Contributor {
            author_login: Some("octocat".into()),
            username: "ignored".into(),
        };
        let empty_login = Contributor {
            author_login: Some(String::new()),
            username: "hubot".into(),
        };

        assert_eq!(with_login.login(), "octocat");
        assert!(with_login.has_author_login());
        assert_eq!(empty_login.login(), "hubot");
        assert!(!empty_login.has_author_login());
    }

    #[test]
    fn test_paginated_response_contract() {
        let json = serde_json::json!({
            "data": [{
                "full_name": "open-sauced/app",
                "author_login": "octocat",
                "merged": true,
                "merged_at": "2024-01-02T10:00:00.000Z",
                "last_updated_at": "2024-01-03T10:00:00.000Z"
            }],
            "meta": {
                "itemCount": 1,
                "limit": 10,
                "page": 1,
                "hasNextPage": false,
                "hasPreviousPage": false,
                "pageCount": 1
            }
        });

        let response: PaginatedResponse = serde_json::from_value(json).unwrap();

        assert_eq!(response.data.len(), 1);
        assert!(response.data[0].merged);
        assert!(response.data[0].merged_at.is_some());
        assert_eq!(response.meta.item_count, 1);
        assert_eq!(response.meta.page_count, 1);
    }

    #[test]
    fn test_record_with_null_fields_still_decodes() {
        let json = serde_json::json!({
            "data": [
                {
                    "full_name": "a/b",
                    "author_login": null,
                    "merged": null,
                    "title": null,
                    "last_updated_at": null
                },
                { "full_name": null, "last_updated_at": "2024-01-03T10:00:00Z" },
                {}
            ]
        });

        let response: PaginatedResponse = serde_json::from_value(json).unwrap();

        assert_eq!(response.data.len(), 3);
        assert_eq!(response.data[0].full_name, "a/b");
        assert_eq!(response.data[0].author_login, None);
        assert!(!response.data[0].merged);
        assert_eq!(response.data[0].last_updated_at, None);
        assert_eq!(response.data[1].full_name, "");
        assert!(response.data[1].last_updated_at.is_some());
        assert_eq!(response.meta, PageMeta::default());
    }

    #[test]
    fn test_user_profile_keeps_language_order() {
        let json = r#"{"company":null,"languages":{"TypeScript":10,"Rust":5,"Go":1},"timezone":"UTC"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.language_names(), vec!["TypeScript", "Rust", "Go"]);
        assert_eq!(profile.timezone.as_deref(), Some("UTC"));
    }
}
