use crate::agency::{select_agency, AgencySelection};
use crate::config::DashboardConfig;
use crate::deadline::{detect_lagging, Schedule};
use crate::metrics::aggregate;
use crate::ranking::{rank_completion, rank_performance, GroupBy};
use crate::types::{DashboardSnapshot, SiteRecord};
use chrono::NaiveDate;
use tracing::debug;

/// Run the whole engine for one rotation step.
///
/// Pure function of its arguments: the same table, tick, config and
/// reference date always produce the same snapshot.
pub fn compute_dashboard(
    table: &[SiteRecord],
    tick: u64,
    config: &DashboardConfig,
    reference_date: NaiveDate,
) -> DashboardSnapshot {
    let schedule = Schedule::new(config.target_date, reference_date);
    let selection = select_agency(table, tick, &config.agencies);
    let rows = selection.rows();

    let snapshot = DashboardSnapshot {
        tick,
        reference_date,
        target_date: config.target_date,
        current_agency_id: selection.current().map(|c| c.id.clone()),
        current_agency_display: selection.current().map(|c| c.label.clone()),
        metrics_summary: aggregate(rows, &schedule),
        cluster_ranking: rank_completion(rows, GroupBy::Cluster),
        site_ranking: rank_completion(rows, GroupBy::Site),
        lagging_sites: detect_lagging(rows, &schedule),
        performance_ranking: rank_performance(rows, &schedule, config.timeline_span_days),
    };

    match &selection {
        AgencySelection::NoData => debug!(tick, "dashboard computed over empty table"),
        AgencySelection::Current(c) => debug!(
            tick,
            agency = %c.id,
            position = c.position,
            of = c.agency_count,
            rows = rows.len(),
            lagging = snapshot.lagging_sites.len(),
            "dashboard computed"
        ),
    }
    snapshot
}
