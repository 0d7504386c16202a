use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One CSV row exactly as it appears on disk. Every column is optional text;
/// the loader turns it into a typed [`SiteRecord`].
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Agency")]
    pub agency: Option<String>,
    #[serde(rename = "Cluster")]
    pub cluster: Option<String>,
    #[serde(rename = "Site")]
    pub site: Option<String>,
    #[serde(rename = "Machine")]
    pub machine: Option<String>,
    #[serde(rename = "Active")]
    pub active: Option<String>,
    #[serde(rename = "QuantityPlanned")]
    pub quantity_planned: Option<String>,
    #[serde(rename = "QuantityDone")]
    pub quantity_done: Option<String>,
    #[serde(rename = "DaysRequired")]
    pub days_required: Option<String>,
    #[serde(rename = "ExpectedEndDate")]
    pub expected_end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveFlag {
    Yes,
    No,
    /// Anything other than yes/no. Counted as neither active nor inactive.
    #[default]
    Unknown,
}

impl ActiveFlag {
    pub fn is_active(self) -> bool {
        self == ActiveFlag::Yes
    }
}

/// One (agency, cluster, site) association from the input table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub agency: String,
    pub cluster: String,
    pub site: String,
    pub machine: Option<String>,
    pub active: ActiveFlag,
    pub quantity_planned: f64,
    pub quantity_done: f64,
    /// Remaining work-days. `None` when blank or not a number.
    pub days_required: Option<f64>,
    pub expected_end_date: Option<NaiveDate>,
}

impl SiteRecord {
    /// `days_required` when it is a usable positive estimate.
    pub fn valid_days_required(&self) -> Option<f64> {
        self.days_required.filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Caller-facing name for an agency identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AgencyLabel {
    Mapped(String),
    /// No lookup entry; carries the raw identifier.
    Unmapped(String),
}

impl AgencyLabel {
    pub fn is_mapped(&self) -> bool {
        matches!(self, AgencyLabel::Mapped(_))
    }
}

impl fmt::Display for AgencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgencyLabel::Mapped(name) => write!(f, "{}", name),
            AgencyLabel::Unmapped(id) => write!(f, "{} (unmapped)", id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub cluster_count: usize,
    pub site_count: usize,
    pub active_sites: usize,
    pub inactive_sites: usize,
    pub planned_machines: usize,
    pub deployed_machines: usize,
    pub off_track_sites: usize,
    pub critically_lagging_sites: usize,
    pub quantity_planned: f64,
    pub quantity_done: f64,
    pub completion_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCompletion {
    pub group_key: String,
    pub completion_pct: f64,
    pub planned_total: f64,
    pub done_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Moderate,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaggingSite {
    pub site: String,
    pub cluster: String,
    pub days_required: f64,
    pub days_available: i64,
    pub days_overdue: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitePerformance {
    pub site: String,
    pub cluster: String,
    pub completion_pct: f64,
    /// `None` when the site has no usable duration estimate.
    pub days_ahead_or_behind: Option<f64>,
    pub timeline_score: f64,
    pub composite_score: f64,
}

/// Everything the presentation layer needs for one rotation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub tick: u64,
    pub reference_date: NaiveDate,
    pub target_date: NaiveDate,
    pub current_agency_id: Option<String>,
    pub current_agency_display: Option<AgencyLabel>,
    pub metrics_summary: MetricsSummary,
    pub cluster_ranking: Vec<GroupCompletion>,
    pub site_ranking: Vec<GroupCompletion>,
    pub lagging_sites: Vec<LaggingSite>,
    pub performance_ranking: Vec<SitePerformance>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CompletionRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "CompletionPct")]
    #[tabled(rename = "CompletionPct")]
    pub completion_pct: String,
    #[serde(rename = "Planned")]
    #[tabled(rename = "Planned")]
    pub planned: String,
    #[serde(rename = "Done")]
    #[tabled(rename = "Done")]
    pub done: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LaggingRow {
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "Cluster")]
    #[tabled(rename = "Cluster")]
    pub cluster: String,
    #[serde(rename = "DaysRequired")]
    #[tabled(rename = "DaysRequired")]
    pub days_required: String,
    #[serde(rename = "DaysAvailable")]
    #[tabled(rename = "DaysAvailable")]
    pub days_available: i64,
    #[serde(rename = "DaysOverdue")]
    #[tabled(rename = "DaysOverdue")]
    pub days_overdue: String,
    #[serde(rename = "Severity")]
    #[tabled(rename = "Severity")]
    pub severity: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PerformanceRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "Cluster")]
    #[tabled(rename = "Cluster")]
    pub cluster: String,
    #[serde(rename = "CompletionPct")]
    #[tabled(rename = "CompletionPct")]
    pub completion_pct: String,
    #[serde(rename = "DaysAheadOrBehind")]
    #[tabled(rename = "DaysAheadOrBehind")]
    pub days_ahead_or_behind: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub composite_score: String,
}
