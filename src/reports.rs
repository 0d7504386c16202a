// Table rows for the console preview and CSV export. Ranking order comes
// from the engine; these functions only truncate and format.
use crate::types::{
    CompletionRow, GroupCompletion, LaggingRow, LaggingSite, PerformanceRow, SitePerformance,
};
use crate::util::format_number;

pub fn completion_rows(ranking: &[GroupCompletion], top: usize) -> Vec<CompletionRow> {
    ranking
        .iter()
        .take(top)
        .enumerate()
        .map(|(idx, g)| CompletionRow {
            rank: idx + 1,
            group: g.group_key.clone(),
            completion_pct: format_number(g.completion_pct, 1),
            planned: format_number(g.planned_total, 2),
            done: format_number(g.done_total, 2),
        })
        .collect()
}

pub fn lagging_rows(lagging: &[LaggingSite], top: usize) -> Vec<LaggingRow> {
    lagging
        .iter()
        .take(top)
        .map(|l| LaggingRow {
            site: l.site.clone(),
            cluster: l.cluster.clone(),
            days_required: format_number(l.days_required, 0),
            days_available: l.days_available,
            days_overdue: format_number(l.days_overdue, 0),
            severity: l.severity.as_str().to_string(),
        })
        .collect()
}

pub fn performance_rows(ranking: &[SitePerformance], top: usize) -> Vec<PerformanceRow> {
    ranking
        .iter()
        .take(top)
        .enumerate()
        .map(|(idx, p)| PerformanceRow {
            rank: idx + 1,
            site: p.site.clone(),
            cluster: p.cluster.clone(),
            completion_pct: format_number(p.completion_pct, 1),
            days_ahead_or_behind: match p.days_ahead_or_behind {
                Some(d) if d >= 0.0 => format!("+{}", format_number(d, 0)),
                Some(d) => format_number(d, 0),
                None => "n/a".to_string(),
            },
            composite_score: format_number(p.composite_score, 1),
        })
        .collect()
}
