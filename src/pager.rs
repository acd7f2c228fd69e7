//! Paged retrieval of pull request records.
//!
//! `PullRequestPager` owns the current page number and rebuilds the
//! `prs/search` endpoint whenever the page, the route state, the limit or the
//! repository filter changes. A changed endpoint drops the previous result, so
//! the view reports loading until the next `refresh` resolves.

use crate::cache::ResponseCache;
use crate::query::{PageQuery, RouteState};
use crate::types::{PageMeta, PaginatedResponse, PullRequestRecord};
use serde::Serialize;

/// Snapshot of the pager handed to callers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsView {
    pub data: Vec<PullRequestRecord>,
    pub meta: PageMeta,
    pub is_loading: bool,
    pub is_error: bool,
    pub page: u32,
}

#[derive(Debug, Clone)]
enum FetchState {
    Pending,
    Loaded(PaginatedResponse),
    Failed,
}

pub struct PullRequestPager {
    cache: ResponseCache,
    route: RouteState,
    limit: u32,
    repo_ids: Vec<u64>,
    page: u32,
    fetched_endpoint: Option<String>,
    state: FetchState,
}

impl PullRequestPager {
    pub fn new(cache: ResponseCache, route: RouteState, limit: u32, repo_ids: Vec<u64>) -> Self {
        Self {
            cache,
            route,
            limit,
            repo_ids,
            page: 1,
            fetched_endpoint: None,
            state: FetchState::Pending,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::new(
            self.route.clone(),
            self.page,
            self.limit,
            self.repo_ids.clone(),
        )
    }

    pub fn endpoint(&self) -> String {
        self.query().endpoint()
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
        self.mark_stale_if_changed();
    }

    pub fn set_route(&mut self, route: RouteState) {
        self.route = route;
        self.mark_stale_if_changed();
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.mark_stale_if_changed();
    }

    pub fn set_repo_ids(&mut self, repo_ids: Vec<u64>) {
        self.repo_ids = repo_ids;
        self.mark_stale_if_changed();
    }

    fn mark_stale_if_changed(&mut self) {
        if self.fetched_endpoint.as_deref() != Some(self.endpoint().as_str()) {
            self.state = FetchState::Pending;
        }
    }

    /// Fetches the current endpoint unless its result is already held.
    pub async fn refresh(&mut self) -> PullRequestsView {
        let endpoint = self.endpoint();
        if self.fetched_endpoint.as_deref() == Some(endpoint.as_str())
            && !matches!(self.state, FetchState::Pending)
        {
            return self.view();
        }

        self.state = match self.cache.search_pull_requests(&endpoint).await {
            Ok(response) => {
                tracing::debug!(
                    %endpoint,
                    records = response.data.len(),
                    page = response.meta.page,
                    "Loaded pull request page"
                );
                FetchState::Loaded(response)
            }
            Err(e) => {
                tracing::error!(%endpoint, "Failed to load pull requests: {}", e);
                FetchState::Failed
            }
        };
        self.fetched_endpoint = Some(endpoint);

        self.view()
    }

    /// Discards the cached response for the current endpoint and fetches it again.
    pub async fn mutate(&mut self) -> PullRequestsView {
        self.cache.invalidate(&self.endpoint()).await;
        self.state = FetchState::Pending;
        self.refresh().await
    }

    /// Moves to the next page when the last response reported one.
    ///
    /// Stays put at `u32::MAX` whatever the upstream meta claims.
    pub fn next_page(&mut self) -> bool {
        match self.page.checked_add(1) {
            Some(next) if self.meta().has_next_page => {
                self.set_page(next);
                true
            }
            _ => false,
        }
    }

    /// Moves to the previous page when the last response reported one.
    pub fn previous_page(&mut self) -> bool {
        if self.meta().has_previous_page && self.page > 1 {
            self.set_page(self.page - 1);
            true
        } else {
            false
        }
    }

    fn meta(&self) -> PageMeta {
        match &self.state {
            FetchState::Loaded(response) => response.meta.clone(),
            _ => PageMeta::default(),
        }
    }

    pub fn view(&self) -> PullRequestsView {
        let (data, meta) = match &self.state {
            FetchState::Loaded(response) => (response.data.clone(), response.meta.clone()),
            _ => (Vec::new(), PageMeta::default()),
        };

        PullRequestsView {
            data,
            meta,
            is_loading: matches!(self.state, FetchState::Pending),
            is_error: matches!(self.state, FetchState::Failed),
            page: self.page,
        }
    }
}
