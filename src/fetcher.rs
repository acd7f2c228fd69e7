use crate::cache::ResponseCache;
use crate::query::ContributorQuery;
use crate::row::ContributorRow;
use crate::types::Contributor;
use chrono::{DateTime, Utc};

/// Fetches a contributor's pull requests and profile, then builds their table row.
///
/// The two lookups run concurrently. Either failing degrades the row to
/// placeholders instead of failing the whole request.
pub async fn fetch_contributor_row(
    cache: &ResponseCache,
    contributor: Contributor,
    topic: Option<&str>,
    range_days: u32,
    now: DateTime<Utc>,
) -> ContributorRow {
    let login = contributor.login().to_string();
    let endpoint = ContributorQuery::new(&login, topic, range_days).endpoint();

    let profile_lookup = async {
        match contributor.author_login.as_deref() {
            Some(author) if !author.is_empty() => cache.fetch_user(author).await,
            _ => Ok(None),
        }
    };

    let (prs, user) = futures::join!(cache.search_pull_requests(&endpoint), profile_lookup);

    let records = match prs {
        Ok(response) => response.data,
        Err(e) => {
            tracing::warn!(login = %login, "Failed to fetch contributor pull requests: {}", e);
            Vec::new()
        }
    };

    let user = user.unwrap_or_else(|e| {
        tracing::warn!(login = %login, "Failed to fetch user profile: {}", e);
        None
    });

    tracing::debug!(login = %login, records = records.len(), "Building contributor row");

    ContributorRow::build(contributor, user, &records, range_days, now)
}
