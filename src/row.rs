//! The contributor list table row.
//!
//! A row is derived once from the contributor, their profile and their pull
//! requests, then rendered into either layout. Both layouts show the same
//! derived values; they only differ in which cells are present.

use crate::metrics::{distinct_repositories, ContributorSummary, DayCount, PLACEHOLDER};
use crate::types::{repo_list, Contributor, PullRequestRecord, RepoSummary, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SPARKLINE_COLOR: &str = "hsl(63, 70%, 50%)";
pub const CONNECT_TITLE: &str = "Connect to GitHub";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Mobile,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sparkline {
    pub id: String,
    pub color: &'static str,
    pub data: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkbox {
    pub checked: bool,
    pub disabled: bool,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub label: &'static str,
    pub value: String,
}

/// A row laid out for one screen size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub layout: Layout,
    pub checkbox: Option<Checkbox>,
    pub cells: Vec<Cell>,
    pub sparkline: Option<Sparkline>,
    /// Mobile rows collapse their detail cells; desktop rows have no toggle.
    pub expanded: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorRow {
    pub contributor: Contributor,
    pub login: String,
    pub company: String,
    pub has_border: bool,
    pub has_profile: bool,
    pub summary: ContributorSummary,
    pub repositories: Vec<RepoSummary>,
    pub languages: String,
    pub timezone: String,
    pub sparkline: Sparkline,
    /// `Some` when the parent list supports selection.
    pub selected: Option<bool>,
    pub expanded: bool,
}

impl ContributorRow {
    pub fn build(
        contributor: Contributor,
        user: Option<UserProfile>,
        records: &[PullRequestRecord],
        range_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let login = contributor.login().to_string();
        let summary = ContributorSummary::derive(records, range_days, now);

        let repositories = repo_list(&distinct_repositories(records).join(","));

        let company = user
            .as_ref()
            .and_then(|u| u.company.clone())
            .filter(|company| !company.is_empty())
            .unwrap_or_else(|| summary.last_repository.clone());

        let languages = user
            .as_ref()
            .map(|u| format_languages(&u.language_names()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let timezone = user
            .as_ref()
            .and_then(|u| u.timezone.clone())
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let sparkline = Sparkline {
            id: format!("last30-{login}"),
            color: SPARKLINE_COLOR,
            data: summary.days.clone(),
        };

        Self {
            has_border: !contributor.has_author_login(),
            has_profile: user.is_some(),
            contributor,
            login,
            company,
            summary,
            repositories,
            languages,
            timezone,
            sparkline,
            selected: None,
            expanded: false,
        }
    }

    /// Enables the selection checkbox with an initial state.
    pub fn with_selection(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Applies a checkbox change and reports it to the parent.
    ///
    /// Ignored when selection is disabled or the contributor has no profile.
    pub fn select<F>(&mut self, selected: bool, mut on_select: F) -> bool
    where
        F: FnMut(bool, &Contributor),
    {
        if self.selected.is_none() || !self.has_profile {
            return false;
        }
        self.selected = Some(selected);
        on_select(selected, &self.contributor);
        true
    }

    fn checkbox(&self) -> Option<Checkbox> {
        self.selected.map(|checked| Checkbox {
            checked,
            disabled: !self.has_profile,
            title: if self.has_profile { "" } else { CONNECT_TITLE },
        })
    }

    pub fn render(&self, layout: Layout) -> RenderedRow {
        match layout {
            Layout::Mobile => self.render_mobile(),
            Layout::Desktop => self.render_desktop(),
        }
    }

    fn render_mobile(&self) -> RenderedRow {
        let summary = &self.summary;
        let cells = vec![
            cell("Contributor", self.login.clone()),
            cell("Company", self.company.clone()),
            cell("Last Contribution", summary.last_contribution.clone()),
            cell("Activity", summary.activity.label().to_string()),
            cell("Contributions", summary.merged_count.to_string()),
            cell("Repositories", self.repositories.len().to_string()),
            cell("Languages", self.languages.clone()),
            cell("Time Zone", self.timezone.clone()),
        ];

        RenderedRow {
            layout: Layout::Mobile,
            checkbox: self.checkbox(),
            cells,
            sparkline: Some(self.sparkline.clone()),
            expanded: Some(self.expanded),
        }
    }

    fn render_desktop(&self) -> RenderedRow {
        let summary = &self.summary;
        let known = self.contributor.has_author_login();
        let gated = |value: String| if known { value } else { PLACEHOLDER.to_string() };

        let cells = vec![
            cell("Contributor", self.contributor.username.clone()),
            cell("Activity", gated(summary.activity.label().to_string())),
            cell("Repositories", gated(self.repositories.len().to_string())),
            cell("Last Contribution", gated(summary.last_contribution.clone())),
            cell("Language", self.languages.clone()),
            cell("Time Zone", gated(self.timezone.clone())),
            cell("Contributions", gated(summary.merged_count.to_string())),
        ];

        RenderedRow {
            layout: Layout::Desktop,
            checkbox: self.checkbox(),
            cells,
            sparkline: known.then(|| self.sparkline.clone()),
            expanded: None,
        }
    }
}

fn cell(label: &'static str, value: String) -> Cell {
    Cell { label, value }
}

/// "Rust", "Rust,+2", or the placeholder when there are none.
pub fn format_languages(languages: &[&str]) -> String {
    match languages {
        [] => PLACEHOLDER.to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first},+{}", rest.len()),
    }
}
