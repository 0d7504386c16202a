use crate::error::Result;
use crate::reports::{completion_rows, lagging_rows, performance_rows};
use crate::types::DashboardSnapshot;
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T])
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn print_snapshot(snap: &DashboardSnapshot, top: usize) {
    let Some(agency) = &snap.current_agency_display else {
        println!("No data: the site table is empty.\n");
        return;
    };
    let m = &snap.metrics_summary;

    println!("Agency: {}  (tick {})", agency, snap.tick);
    println!(
        "Target date {} | {} days available from {}\n",
        snap.target_date,
        (snap.target_date - snap.reference_date).num_days(),
        snap.reference_date
    );
    println!(
        "Clusters: {}   Sites: {} ({} active, {} inactive)",
        format_int(m.cluster_count),
        format_int(m.site_count),
        format_int(m.active_sites),
        format_int(m.inactive_sites)
    );
    println!(
        "Machines: {} planned, {} deployed",
        format_int(m.planned_machines),
        format_int(m.deployed_machines)
    );
    println!(
        "Off-track sites: {}   Critically lagging: {}",
        format_int(m.off_track_sites),
        format_int(m.critically_lagging_sites)
    );
    println!(
        "Remediated {} of {} ({}%)\n",
        format_number(m.quantity_done, 1),
        format_number(m.quantity_planned, 1),
        format_number(m.completion_pct, 1)
    );

    println!("Cluster Completion (top {})\n", top);
    preview_table_rows(&completion_rows(&snap.cluster_ranking, top));
    println!("Site Completion (top {})\n", top);
    preview_table_rows(&completion_rows(&snap.site_ranking, top));
    println!("Lagging Sites\n");
    if snap.lagging_sites.is_empty() {
        println!("All sites can finish before the target date.\n");
    } else {
        preview_table_rows(&lagging_rows(&snap.lagging_sites, top));
    }
    println!("Top Performers\n");
    preview_table_rows(&performance_rows(&snap.performance_ranking, top));
}

/// Write the full (untruncated) ranked lists as CSV files into `dir`.
/// Returns the paths written.
pub fn export_snapshot(dir: &Path, snap: &DashboardSnapshot) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let all = usize::MAX;

    let clusters = dir.join("cluster_ranking.csv");
    write_csv(&clusters, &completion_rows(&snap.cluster_ranking, all))?;
    let sites = dir.join("site_ranking.csv");
    write_csv(&sites, &completion_rows(&snap.site_ranking, all))?;
    let lagging = dir.join("lagging_sites.csv");
    write_csv(&lagging, &lagging_rows(&snap.lagging_sites, all))?;
    let performance = dir.join("performance_ranking.csv");
    write_csv(&performance, &performance_rows(&snap.performance_ranking, all))?;

    Ok(vec![clusters, sites, lagging, performance])
}
