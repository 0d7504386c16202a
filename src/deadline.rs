use crate::ranking::dedupe_by_site;
use crate::types::{LaggingSite, Severity, SiteRecord};
use crate::util::days_between;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Deadline and "today" for one computation. The reference date is passed
/// in rather than read from the clock so results are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub target_date: NaiveDate,
    pub reference_date: NaiveDate,
}

impl Schedule {
    pub fn new(target_date: NaiveDate, reference_date: NaiveDate) -> Self {
        Self {
            target_date,
            reference_date,
        }
    }

    /// Whole days from the reference date to the target. Negative once the
    /// target has passed.
    pub fn days_available(&self) -> i64 {
        days_between(self.reference_date, self.target_date)
    }
}

impl Severity {
    pub fn from_overdue(days_overdue: f64) -> Self {
        if days_overdue > 60.0 {
            Severity::Critical
        } else if days_overdue > 30.0 {
            Severity::High
        } else {
            Severity::Moderate
        }
    }
}

/// Sites that need more work-days than remain before the target date, most
/// overdue first. An empty list means every estimated site fits.
pub fn detect_lagging(rows: &[SiteRecord], schedule: &Schedule) -> Vec<LaggingSite> {
    let days_available = schedule.days_available();
    let available = days_available as f64;

    let mut lagging: Vec<LaggingSite> = dedupe_by_site(rows)
        .into_iter()
        .filter_map(|r| {
            let required = r.valid_days_required()?;
            if required <= available {
                return None;
            }
            let days_overdue = required - available;
            Some(LaggingSite {
                site: r.site.clone(),
                cluster: r.cluster.clone(),
                days_required: required,
                days_available,
                days_overdue,
                severity: Severity::from_overdue(days_overdue),
            })
        })
        .collect();

    lagging.sort_by(|a, b| {
        b.days_overdue
            .partial_cmp(&a.days_overdue)
            .unwrap_or(Ordering::Equal)
    });
    lagging
}
