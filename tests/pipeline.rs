use chrono::{Duration, NaiveDate};
use site_dashboard::agency::distinct_agencies;
use site_dashboard::ranking::DEFAULT_TIMELINE_SPAN_DAYS;
use site_dashboard::{
    aggregate, compute_dashboard, detect_lagging, rank_completion, rank_performance,
    select_agency, ActiveFlag, AgencyDirectory, AgencyLabel, AgencySelection, DashboardConfig,
    GroupBy, MetricsSummary, Schedule, SiteRecord,
};
use std::collections::HashSet;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn thirty_days() -> Schedule {
    Schedule::new(today() + Duration::days(30), today())
}

fn rec(
    agency: &str,
    cluster: &str,
    site: &str,
    planned: f64,
    done: f64,
    days_required: Option<f64>,
) -> SiteRecord {
    SiteRecord {
        agency: agency.into(),
        cluster: cluster.into(),
        site: site.into(),
        machine: Some("Excavator".into()),
        active: ActiveFlag::Yes,
        quantity_planned: planned,
        quantity_done: done,
        days_required,
        expected_end_date: None,
    }
}

// A messy table: repeated sites, zero plans, over-delivery, blank estimates,
// three agencies interleaved.
fn messy_table() -> Vec<SiteRecord> {
    let mut rows = Vec::new();
    for i in 0..30u32 {
        let agency = ["AG-N", "AG-S", "AG-E"][(i % 3) as usize];
        let cluster = format!("C{}", i % 4);
        let site = format!("S{}", i % 11);
        let planned = [0.0, 120.0, 80.5, 300.0, -10.0][(i % 5) as usize];
        let done = [0.0, 60.0, 200.0, 299.0, 15.0, 80.5, -3.0][(i % 7) as usize];
        let days = [None, Some(5.0), Some(45.0), Some(0.0), Some(31.0), Some(29.0)][(i % 6) as usize];
        let mut r = rec(agency, &cluster, &site, planned, done, days);
        r.active = [ActiveFlag::Yes, ActiveFlag::No, ActiveFlag::Unknown][(i / 2 % 3) as usize];
        rows.push(r);
    }
    rows
}

#[test]
fn rotation_is_periodic() {
    let table = messy_table();
    let dir = AgencyDirectory::new();
    let n = distinct_agencies(&table).len() as u64;
    for k in 0..20u64 {
        let a = select_agency(&table, k, &dir);
        let b = select_agency(&table, k + n, &dir);
        assert_eq!(a.current().unwrap().id, b.current().unwrap().id);
    }
}

#[test]
fn one_full_rotation_visits_every_agency_once() {
    let table = messy_table();
    let dir = AgencyDirectory::new();
    let agencies = distinct_agencies(&table);
    let visited: Vec<String> = (0..agencies.len() as u64)
        .map(|t| select_agency(&table, t, &dir).current().unwrap().id.clone())
        .collect();
    let unique: HashSet<&String> = visited.iter().collect();
    assert_eq!(unique.len(), agencies.len());
    assert_eq!(visited, vec!["AG-N", "AG-S", "AG-E"]);
}

#[test]
fn huge_tick_still_selects() {
    let table = messy_table();
    let sel = select_agency(&table, u64::MAX, &AgencyDirectory::new());
    assert!(sel.current().is_some());
}

#[test]
fn completion_rates_are_bounded() {
    let table = messy_table();
    for group_by in [GroupBy::Cluster, GroupBy::Site] {
        for g in rank_completion(&table, group_by) {
            assert!((0.0..=100.0).contains(&g.completion_pct), "{:?}", g);
            if g.planned_total <= 0.0 {
                assert_eq!(g.completion_pct, 0.0);
            }
        }
    }
}

#[test]
fn cluster_ranking_is_non_increasing() {
    let table = messy_table();
    for agency in ["AG-N", "AG-S", "AG-E"] {
        let rows: Vec<SiteRecord> = table.iter().filter(|r| r.agency == agency).cloned().collect();
        let ranked = rank_completion(&rows, GroupBy::Cluster);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].completion_pct >= w[1].completion_pct));
    }
}

#[test]
fn lagging_list_matches_window_exactly() {
    let table = messy_table();
    let schedule = thirty_days();
    let available = schedule.days_available() as f64;
    for agency in ["AG-N", "AG-S", "AG-E"] {
        let rows: Vec<SiteRecord> = table.iter().filter(|r| r.agency == agency).cloned().collect();
        let lagging = detect_lagging(&rows, &schedule);
        let flagged: HashSet<&str> = lagging.iter().map(|l| l.site.as_str()).collect();

        for l in &lagging {
            assert!(l.days_overdue > 0.0);
            assert_eq!(l.days_overdue, l.days_required - available);
        }
        assert!(lagging.windows(2).all(|w| w[0].days_overdue >= w[1].days_overdue));

        for r in site_dashboard::dedupe_by_site(&rows) {
            match r.days_required {
                Some(d) if d > available => assert!(flagged.contains(r.site.as_str())),
                _ => assert!(!flagged.contains(r.site.as_str())),
            }
        }
    }
}

#[test]
fn composite_score_is_bounded() {
    let table = messy_table();
    for span in [1.0, 10.0, DEFAULT_TIMELINE_SPAN_DAYS] {
        for p in rank_performance(&table, &thirty_days(), span) {
            assert!((0.0..=100.0).contains(&p.composite_score), "{:?}", p);
            assert!((0.0..=100.0).contains(&p.timeline_score), "{:?}", p);
        }
    }
}

#[test]
fn two_site_scenario() {
    let table = vec![
        rec("A", "North", "Site1", 100.0, 50.0, Some(10.0)),
        rec("A", "North", "Site2", 200.0, 200.0, None),
    ];
    let schedule = thirty_days();

    let sites = rank_completion(&table, GroupBy::Site);
    assert_eq!(sites[0].group_key, "Site2");
    assert_eq!(sites[0].completion_pct, 100.0);
    assert_eq!(sites[1].group_key, "Site1");
    assert_eq!(sites[1].completion_pct, 50.0);

    assert!(detect_lagging(&table, &schedule).is_empty());

    let perf = rank_performance(&table, &schedule, DEFAULT_TIMELINE_SPAN_DAYS);
    assert_eq!(perf.len(), 2);
    // Site1: 20 days ahead -> timeline 60, composite 0.6*50 + 0.4*60 = 54
    // Site2: no estimate -> timeline 50, composite 0.6*100 + 0.4*50 = 80
    assert_eq!(perf[0].site, "Site2");
    assert!((perf[0].composite_score - 80.0).abs() < 1e-9);
    assert_eq!(perf[1].site, "Site1");
    assert_eq!(perf[1].days_ahead_or_behind, Some(20.0));
    assert!((perf[1].timeline_score - 60.0).abs() < 1e-9);
    assert!((perf[1].composite_score - 54.0).abs() < 1e-9);
}

#[test]
fn empty_table_degrades_to_empty_results() {
    let schedule = thirty_days();
    assert_eq!(
        select_agency(&[], 0, &AgencyDirectory::new()),
        AgencySelection::NoData
    );
    assert_eq!(aggregate(&[], &schedule), MetricsSummary::default());
    assert!(rank_completion(&[], GroupBy::Cluster).is_empty());
    assert!(rank_completion(&[], GroupBy::Site).is_empty());
    assert!(detect_lagging(&[], &schedule).is_empty());
    assert!(rank_performance(&[], &schedule, DEFAULT_TIMELINE_SPAN_DAYS).is_empty());
}

#[test]
fn zero_plan_with_progress_is_zero_percent() {
    let table = vec![rec("A", "C", "S", 0.0, 50.0, None)];
    assert_eq!(rank_completion(&table, GroupBy::Site)[0].completion_pct, 0.0);
    assert_eq!(aggregate(&table, &thirty_days()).completion_pct, 0.0);
}

#[test]
fn unmapped_agency_passes_through() {
    let table = vec![rec("AG-X", "C", "S", 1.0, 1.0, None)];
    let mut config = DashboardConfig::default();
    config.agencies.insert("AG-Y", "Agency Y");
    let snap = compute_dashboard(&table, 0, &config, today());
    assert_eq!(snap.current_agency_id.as_deref(), Some("AG-X"));
    assert_eq!(
        snap.current_agency_display,
        Some(AgencyLabel::Unmapped("AG-X".to_string()))
    );
    assert_eq!(snap.site_ranking.len(), 1);
}

#[test]
fn pipeline_is_deterministic() {
    let table = messy_table();
    let config = DashboardConfig::default();
    for tick in 0..6 {
        let a = serde_json::to_string(&compute_dashboard(&table, tick, &config, today())).unwrap();
        let b = serde_json::to_string(&compute_dashboard(&table, tick, &config, today())).unwrap();
        assert_eq!(a, b);
    }
}
