//! Agency rotation and site-performance metrics for a waste-remediation
//! dashboard.
//!
//! The engine is a set of pure functions over a slice of [`SiteRecord`]s:
//!
//! - [`select_agency`] picks the agency for a rotation tick,
//! - [`aggregate`] computes its headline numbers,
//! - [`rank_completion`] ranks clusters or sites by completion,
//! - [`detect_lagging`] lists sites that cannot finish before the target date,
//! - [`rank_performance`] builds the composite-score leaderboard.
//!
//! [`compute_dashboard`] runs all five for one tick. Loading, configuration
//! and rendering live in [`loader`], [`config`] and [`output`].

pub mod agency;
pub mod config;
pub mod dashboard;
pub mod deadline;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod ranking;
pub mod reports;
pub mod types;
pub mod util;

pub use agency::{select_agency, AgencyDirectory, AgencySelection, CurrentAgency};
pub use config::DashboardConfig;
pub use dashboard::compute_dashboard;
pub use deadline::{detect_lagging, Schedule};
pub use error::{DashboardError, Result};
pub use metrics::aggregate;
pub use ranking::{dedupe_by_site, rank_completion, rank_performance, GroupBy};
pub use types::{
    ActiveFlag, AgencyLabel, DashboardSnapshot, GroupCompletion, LaggingSite, MetricsSummary,
    Severity, SitePerformance, SiteRecord,
};
