use crate::deadline::Schedule;
use crate::ranking::dedupe_by_site;
use crate::types::{ActiveFlag, MetricsSummary, SiteRecord};
use crate::util::{clamp_quantity, completion_pct, round1};
use std::collections::HashSet;

/// Headline numbers for one agency's rows.
///
/// Cluster and machine counts look at every row. Site-level figures (activity,
/// schedule, tonnage) use the first row per site so repeated rows are not
/// counted twice. An empty slice gives an all-zero summary.
pub fn aggregate(rows: &[SiteRecord], schedule: &Schedule) -> MetricsSummary {
    if rows.is_empty() {
        return MetricsSummary::default();
    }

    let clusters: HashSet<&str> = rows.iter().map(|r| r.cluster.as_str()).collect();
    let planned_machines: HashSet<&str> = rows.iter().filter_map(|r| r.machine.as_deref()).collect();
    let deployed_machines: HashSet<&str> = rows
        .iter()
        .filter(|r| r.active.is_active())
        .filter_map(|r| r.machine.as_deref())
        .collect();

    let sites = dedupe_by_site(rows);
    let available = schedule.days_available() as f64;

    let mut summary = MetricsSummary {
        cluster_count: clusters.len(),
        site_count: sites.len(),
        planned_machines: planned_machines.len(),
        deployed_machines: deployed_machines.len(),
        ..MetricsSummary::default()
    };

    for r in &sites {
        summary.quantity_planned += clamp_quantity(r.quantity_planned);
        summary.quantity_done += clamp_quantity(r.quantity_done);
        match r.active {
            ActiveFlag::Yes => summary.active_sites += 1,
            ActiveFlag::No => summary.inactive_sites += 1,
            ActiveFlag::Unknown => continue,
        }
        if !r.active.is_active() {
            continue;
        }
        if r.expected_end_date.is_some_and(|d| d > schedule.target_date) {
            summary.off_track_sites += 1;
        }
        if r.valid_days_required().is_some_and(|d| d > available) {
            summary.critically_lagging_sites += 1;
        }
    }

    // Rate from the exact sums; only the displayed totals are rounded.
    summary.completion_pct = completion_pct(summary.quantity_done, summary.quantity_planned);
    summary.quantity_planned = round1(summary.quantity_planned);
    summary.quantity_done = round1(summary.quantity_done);
    summary
}
