//! Query-string construction for the `prs/search` endpoint.
//!
//! Keys are only emitted when their value is present; an absent filter never
//! shows up as an empty parameter.

use crate::filter::filter_query;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const SEARCH_ENDPOINT: &str = "prs/search";
pub const DEFAULT_LIMIT: u32 = 1000;
pub const CONTRIBUTOR_PR_LIMIT: u32 = 100;

/// Filter state selected in the dashboard, passed explicitly to the query builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteState {
    /// Topic name, or a numeric list id which is not sent as a topic.
    #[serde(default)]
    pub filter_name: Option<String>,
    #[serde(default)]
    pub selected_filter: Option<String>,
}

impl RouteState {
    pub fn new(filter_name: Option<&str>, selected_filter: Option<&str>) -> Self {
        Self {
            filter_name: filter_name.map(str::to_string),
            selected_filter: selected_filter.map(str::to_string),
        }
    }

    /// The topic to filter by, if the filter name is not a number.
    pub fn topic(&self) -> Option<&str> {
        self.filter_name.as_deref().filter(|name| !is_numeric(name))
    }
}

/// Whether `value` reads as a number the way a JavaScript `Number(value)` call
/// would: blank is zero, `Infinity` is signed, and unsigned `0x`/`0o`/`0b`
/// literals are accepted.
fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    let radix = match value.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &value[2..];
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    if unsigned == "Infinity" {
        return true;
    }

    // Rust also reads "inf" and "nan"; only the exponent marker is a valid letter.
    !unsigned
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        && unsigned.parse::<f64>().is_ok()
}

/// Ordered query parameters with replace-on-set semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Sets `key` to `value`, replacing the first existing entry and dropping duplicates.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k == key {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn search_endpoint(params: &QueryParams) -> String {
    format!("{SEARCH_ENDPOINT}?{}", params.encode())
}

/// A page of the pull request search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub route: RouteState,
    pub page: u32,
    pub limit: u32,
    pub repo_ids: Vec<u64>,
}

impl PageQuery {
    pub fn new(route: RouteState, page: u32, limit: u32, repo_ids: Vec<u64>) -> Self {
        Self {
            route,
            page,
            limit,
            repo_ids,
        }
    }

    pub fn params(&self) -> QueryParams {
        let mut params =
            QueryParams::from_pairs(filter_query(self.route.selected_filter.as_deref()));

        if let Some(topic) = self.route.topic() {
            params.set("topic", topic);
        }
        if self.page > 0 {
            params.set("page", self.page.to_string());
        }
        if self.limit > 0 {
            params.set("limit", self.limit.to_string());
        }
        if !self.repo_ids.is_empty() {
            params.set("repoIds", join_ids(&self.repo_ids));
        }

        params
    }

    pub fn to_query_string(&self) -> String {
        self.params().encode()
    }

    /// Relative endpoint, e.g. `prs/search?topic=rust&page=1&limit=1000`.
    pub fn endpoint(&self) -> String {
        search_endpoint(&self.params())
    }
}

/// The pull requests of a single contributor over a trailing range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorQuery {
    pub login: String,
    pub topic: Option<String>,
    pub repo_ids: Vec<u64>,
    pub range_days: u32,
    pub limit: u32,
}

impl ContributorQuery {
    pub fn new(login: &str, topic: Option<&str>, range_days: u32) -> Self {
        Self {
            login: login.to_string(),
            topic: topic.map(str::to_string),
            repo_ids: Vec::new(),
            range_days,
            limit: CONTRIBUTOR_PR_LIMIT,
        }
    }

    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::default();

        if let Some(topic) = self.topic.as_deref().filter(|t| !is_numeric(t)) {
            params.set("topic", topic);
        }
        if !self.login.is_empty() {
            params.set("contributor", self.login.as_str());
        }
        if self.range_days > 0 {
            params.set("range", self.range_days.to_string());
        }
        if self.limit > 0 {
            params.set("limit", self.limit.to_string());
        }
        if !self.repo_ids.is_empty() {
            params.set("repoIds", join_ids(&self.repo_ids));
        }

        params
    }

    pub fn endpoint(&self) -> String {
        search_endpoint(&self.params())
    }
}
