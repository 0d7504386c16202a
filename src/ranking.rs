//! Completion and performance leaderboards.
//!
//! Quantities are stored per row, and a site may repeat (one row per machine
//! assignment, for instance). Every ranking therefore runs over
//! [`dedupe_by_site`] first so a site's tonnage is counted once.

use crate::deadline::Schedule;
use crate::types::{GroupCompletion, SitePerformance, SiteRecord};
use crate::util::{clamp_quantity, completion_pct};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const COMPLETION_WEIGHT: f64 = 0.6;
pub const TIMELINE_WEIGHT: f64 = 0.4;
pub const DEFAULT_TIMELINE_SPAN_DAYS: f64 = 100.0;
/// Inactive sites need more than this completion to enter the leaderboard.
pub const MIN_ELIGIBLE_COMPLETION: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Cluster,
    Site,
}

/// First row per `(agency, site)` in input order. Later rows for the same
/// site are dropped, not merged, and that includes their cluster value.
pub fn dedupe_by_site(rows: &[SiteRecord]) -> Vec<&SiteRecord> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    rows.iter()
        .filter(|r| seen.insert((r.agency.as_str(), r.site.as_str())))
        .collect()
}

fn sort_desc_by<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    // `sort_by` is stable, so ties keep encounter order.
    items.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

/// Completion per cluster or per site, highest first.
///
/// Groups are keyed by agency as well as name, so same-named sites or
/// clusters from different agencies stay separate when a multi-agency table
/// is passed in.
pub fn rank_completion(rows: &[SiteRecord], group_by: GroupBy) -> Vec<GroupCompletion> {
    let mut order: Vec<GroupCompletion> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for r in dedupe_by_site(rows) {
        let key = match group_by {
            GroupBy::Cluster => r.cluster.as_str(),
            GroupBy::Site => r.site.as_str(),
        };
        let slot = *index.entry((r.agency.as_str(), key)).or_insert_with(|| {
            order.push(GroupCompletion {
                group_key: key.to_string(),
                completion_pct: 0.0,
                planned_total: 0.0,
                done_total: 0.0,
            });
            order.len() - 1
        });
        let g = &mut order[slot];
        g.planned_total += clamp_quantity(r.quantity_planned);
        g.done_total += clamp_quantity(r.quantity_done);
    }

    for g in &mut order {
        g.completion_pct = completion_pct(g.done_total, g.planned_total);
    }
    sort_desc_by(&mut order, |g| g.completion_pct);
    order
}

/// Map days ahead (positive) or behind (negative) onto 0..=100, centered
/// at 50. `span_days` ahead saturates at 100 and `span_days` behind at 0.
pub fn timeline_score(days_ahead_or_behind: Option<f64>, span_days: f64) -> f64 {
    let Some(delta) = days_ahead_or_behind else {
        return 50.0;
    };
    let span = if span_days.is_finite() && span_days > 0.0 {
        span_days
    } else {
        DEFAULT_TIMELINE_SPAN_DAYS
    };
    (50.0 + 50.0 * delta / span).clamp(0.0, 100.0)
}

pub fn composite_score(completion_pct: f64, timeline_score: f64) -> f64 {
    (COMPLETION_WEIGHT * completion_pct + TIMELINE_WEIGHT * timeline_score).clamp(0.0, 100.0)
}

/// Leaderboard of sites by a blend of completion and schedule position.
///
/// Sites without a duration estimate keep a neutral timeline score instead of
/// being dropped. Untouched inactive sites (completion at most 5% and not
/// flagged active) are left out.
pub fn rank_performance(
    rows: &[SiteRecord],
    schedule: &Schedule,
    span_days: f64,
) -> Vec<SitePerformance> {
    let available = schedule.days_available() as f64;

    let mut ranked: Vec<SitePerformance> = dedupe_by_site(rows)
        .into_iter()
        .filter_map(|r| {
            let pct = completion_pct(r.quantity_done, r.quantity_planned);
            if !(pct > MIN_ELIGIBLE_COMPLETION || r.active.is_active()) {
                return None;
            }
            let delta = r.valid_days_required().map(|req| available - req);
            let timeline = timeline_score(delta, span_days);
            Some(SitePerformance {
                site: r.site.clone(),
                cluster: r.cluster.clone(),
                completion_pct: pct,
                days_ahead_or_behind: delta,
                timeline_score: timeline,
                composite_score: composite_score(pct, timeline),
            })
        })
        .collect();

    sort_desc_by(&mut ranked, |p| p.composite_score);
    ranked
}
