//! Translation of the dashboard's selected filter into query parameters.

/// Filter slugs the search endpoint understands as a `filter` value.
pub const KNOWN_FILTERS: &[&str] = &[
    "top-1k-repos",
    "minimum-5-contributors",
    "1-month-activity",
    "most-active",
    "most-spammed",
];

/// Returns the query pairs for a selected filter.
///
/// A `key:value` slug becomes `key=value`; any other non-empty slug is sent as
/// `filter=<slug>`. Unknown plain slugs are passed through so the backend can
/// reject them.
pub fn filter_query(selected: Option<&str>) -> Vec<(String, String)> {
    let Some(selected) = selected.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    if let Some((key, value)) = selected.split_once(':') {
        let (key, value) = (key.trim(), value.trim());
        if !key.is_empty() && !value.is_empty() {
            return vec![(key.to_string(), value.to_string())];
        }
        return Vec::new();
    }

    if !KNOWN_FILTERS.contains(&selected) {
        tracing::debug!(filter = selected, "Passing through unrecognised filter");
    }

    vec![("filter".to_string(), selected.to_string())]
}
