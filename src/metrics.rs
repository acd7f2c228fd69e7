use crate::relative_time::format_distance_strict;
use crate::types::PullRequestRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Placeholder shown when a value cannot be derived.
pub const PLACEHOLDER: &str = "-";

/// Longest trailing window, in days, a sparkline may cover.
pub const MAX_RANGE_DAYS: u32 = 365;

const HIGH_ACTIVITY_THRESHOLD: usize = 80;
const MEDIUM_ACTIVITY_THRESHOLD: usize = 5;

/// Number of pull requests touched on a given day offset.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DayCount {
    /// Whole days before the reference time (0 is today).
    pub x: u32,
    /// Pull requests last updated on that day.
    pub y: usize,
}

/// Coarse activity rating derived from the number of pull requests.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
}

impl ActivityLevel {
    pub fn from_total(total_prs: usize) -> Self {
        if total_prs > HIGH_ACTIVITY_THRESHOLD {
            ActivityLevel::High
        } else if total_prs >= MEDIUM_ACTIVITY_THRESHOLD {
            ActivityLevel::Medium
        } else {
            ActivityLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::High => "High",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::Low => "Low",
        }
    }
}

/// Display metrics for one contributor, recomputed from the fetched records.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ContributorSummary {
    pub last_contribution: String,
    pub last_repository: String,
    pub repository_count: usize,
    pub merged_count: usize,
    pub total_prs: usize,
    pub activity: ActivityLevel,
    pub days: Vec<DayCount>,
}

impl ContributorSummary {
    /// Derives the summary for `records` over a trailing window of `range_days`.
    ///
    /// The last contribution is taken from merged pull requests only.
    pub fn derive(records: &[PullRequestRecord], range_days: u32, now: DateTime<Utc>) -> Self {
        let mut merged = merged_pull_requests(records);
        let mut by_update = records.to_vec();

        Self {
            last_contribution: last_contribution_date(&mut merged, now),
            last_repository: last_contributed_repository(&mut by_update),
            repository_count: distinct_repositories(records).len(),
            merged_count: merged.len(),
            total_prs: records.len(),
            activity: ActivityLevel::from_total(records.len()),
            days: activity_buckets(records, range_days, now),
        }
    }
}

/// Returns how long ago the most recent merge happened.
///
/// Sorts `records` in place, newest merge first. Records without a merge
/// timestamp sort last.
pub fn last_contribution_date(records: &mut [PullRequestRecord], now: DateTime<Utc>) -> String {
    records.sort_by(|a, b| b.merged_at.cmp(&a.merged_at));

    match records.first().and_then(|pr| pr.merged_at) {
        Some(merged_at) => format_distance_strict(merged_at, now),
        None => PLACEHOLDER.to_string(),
    }
}

/// Returns the repository of the most recently updated pull request.
///
/// Sorts `records` in place, newest update first. Records without an update
/// timestamp sort last; a missing repository name yields the placeholder.
pub fn last_contributed_repository(records: &mut [PullRequestRecord]) -> String {
    records.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));

    records
        .first()
        .map(|pr| pr.full_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Unique, non-empty repository full names, in first-seen order.
pub fn distinct_repositories(records: &[PullRequestRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|pr| !pr.full_name.is_empty() && seen.insert(pr.full_name.as_str()))
        .map(|pr| pr.full_name.clone())
        .collect()
}

pub fn merged_pull_requests(records: &[PullRequestRecord]) -> Vec<PullRequestRecord> {
    records.iter().filter(|pr| pr.merged).cloned().collect()
}

/// Counts pull requests per day over the trailing `range_days`, oldest day first.
///
/// `range_days` is clamped to [`MAX_RANGE_DAYS`]. Records without an update
/// timestamp, updated in the future, or before the window are ignored.
pub fn activity_buckets(
    records: &[PullRequestRecord],
    range_days: u32,
    now: DateTime<Utc>,
) -> Vec<DayCount> {
    let range_days = range_days.min(MAX_RANGE_DAYS);
    let mut counts = vec![0usize; range_days as usize];

    for updated in records.iter().filter_map(|pr| pr.last_updated_at) {
        let offset = (now - updated).num_days();
        if (0..i64::from(range_days)).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    (0..range_days)
        .rev()
        .map(|day| DayCount {
            x: day,
            y: counts[day as usize],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn pr(full_name: &str, merged_at: Option<DateTime<Utc>>, updated: DateTime<Utc>) -> PullRequestRecord {
        PullRequestRecord {
            full_name: full_name.to_string(),
            author_login: Some("octocat".to_string()),
            merged: merged_at.is_some(),
            merged_at,
            last_updated_at: Some(updated),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_records_use_placeholder() {
        assert_eq!(last_contribution_date(&mut [], now()), "-");
        assert_eq!(last_contributed_repository(&mut []), "-");
    }

    #[test]
    fn test_last_contribution_reflects_latest_merge() {
        let now = now();
        let t1 = now - Duration::days(5);
        let t2 = now - Duration::days(3);
        let mut records = vec![pr("a/one", Some(t1), t1), pr("a/two", Some(t2), t2)];

        assert_eq!(last_contribution_date(&mut records, now), "3 days ago");
        assert_eq!(records[0].merged_at, Some(t2));
    }

    #[test]
    fn test_unmerged_records_sort_last() {
        let now = now();
        let merged = now - Duration::hours(2);
        let mut records = vec![pr("a/open", None, now), pr("a/merged", Some(merged), merged)];

        assert_eq!(last_contribution_date(&mut records, now), "2 hours ago");

        let mut only_open = vec![pr("a/open", None, now)];
        assert_eq!(last_contribution_date(&mut only_open, now), "-");
    }

    #[test]
    fn test_last_contributed_repository_uses_update_time() {
        let now = now();
        let mut records = vec![
            pr("a/old", None, now - Duration::days(9)),
            pr("a/new", None, now - Duration::days(1)),
            pr("a/mid", None, now - Duration::days(4)),
        ];

        assert_eq!(last_contributed_repository(&mut records), "a/new");
    }

    #[test]
    fn test_distinct_repositories() {
        let now = now();
        let records = vec![
            pr("a/one", None, now),
            pr("a/two", None, now),
            pr("a/one", None, now),
        ];

        assert_eq!(distinct_repositories(&records), vec!["a/one", "a/two"]);
    }

    #[test]
    fn test_activity_buckets() {
        let now = now();
        let records = vec![
            pr("a/one", None, now - Duration::hours(1)),
            pr("a/one", None, now - Duration::hours(3)),
            pr("a/two", None, now - Duration::days(2)),
            pr("a/two", None, now - Duration::days(45)),
            pr("a/two", None, now + Duration::days(1)),
        ];

        let days = activity_buckets(&records, 30, now);

        assert_eq!(days.len(), 30);
        assert_eq!(days.first(), Some(&DayCount { x: 29, y: 0 }));
        assert_eq!(days[29], DayCount { x: 0, y: 2 });
        assert_eq!(days[27], DayCount { x: 2, y: 1 });
        assert_eq!(days.iter().map(|d| d.y).sum::<usize>(), 3);
    }

    #[test]
    fn test_activity_buckets_clamp_oversized_range() {
        let now = now();
        let records = vec![pr("a/one", None, now - Duration::days(400))];

        let days = activity_buckets(&records, u32::MAX, now);

        assert_eq!(days.len(), MAX_RANGE_DAYS as usize);
        assert_eq!(days[0].x, MAX_RANGE_DAYS - 1);
        assert_eq!(days.iter().map(|d| d.y).sum::<usize>(), 0);
    }

    #[test]
    fn test_records_missing_fields_degrade() {
        let now = now();
        let mut records = vec![
            PullRequestRecord {
                full_name: "a/undated".into(),
                ..Default::default()
            },
            PullRequestRecord {
                last_updated_at: Some(now - Duration::days(1)),
                ..Default::default()
            },
            pr("a/dated", None, now - Duration::days(3)),
        ];

        assert_eq!(distinct_repositories(&records), vec!["a/undated", "a/dated"]);
        assert_eq!(activity_buckets(&records, 7, now).iter().map(|d| d.y).sum::<usize>(), 2);
        assert_eq!(last_contributed_repository(&mut records), "-");
        assert_eq!(records[2].full_name, "a/undated");

        let mut only_undated = vec![PullRequestRecord {
            full_name: "a/undated".into(),
            ..Default::default()
        }];
        assert_eq!(last_contributed_repository(&mut only_undated), "a/undated");
    }

    #[test]
    fn test_activity_level_thresholds() {
        assert_eq!(ActivityLevel::from_total(0), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_total(4), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_total(5), ActivityLevel::Medium);
        assert_eq!(ActivityLevel::from_total(80), ActivityLevel::Medium);
        assert_eq!(ActivityLevel::from_total(81), ActivityLevel::High);
    }

    #[test]
    fn test_summary_derive() {
        let now = now();
        let merged_at = now - Duration::days(2);
        let records = vec![
            pr("a/one", Some(merged_at), merged_at),
            pr("a/two", None, now - Duration::hours(5)),
            pr("a/one", None, now - Duration::days(6)),
        ];

        let summary = ContributorSummary::derive(&records, 7, now);

        assert_eq!(summary.last_contribution, "2 days ago");
        assert_eq!(summary.last_repository, "a/two");
        assert_eq!(summary.repository_count, 2);
        assert_eq!(summary.merged_count, 1);
        assert_eq!(summary.total_prs, 3);
        assert_eq!(summary.activity, ActivityLevel::Low);
        assert_eq!(summary.days.len(), 7);
    }
}
