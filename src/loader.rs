use crate::error::Result;
use crate::types::{RawRow, SiteRecord};
use crate::util::{non_blank, parse_active, parse_date_safe, parse_f64_safe};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub missing_days_required: usize,
}

pub fn load_path(path: impl AsRef<Path>) -> Result<(Vec<SiteRecord>, LoadReport)> {
    let file = std::fs::File::open(path.as_ref())?;
    load_reader(file)
}

/// Read and clean a site table. Rows without an agency or site, and rows
/// the CSV layer cannot decode, are skipped and counted; every other defect
/// is normalized (blank numbers become 0 or `None`).
pub fn load_reader<R: Read>(reader: R) -> Result<(Vec<SiteRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_reader(reader);
    let mut report = LoadReport::default();
    let mut records: Vec<SiteRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "skipping undecodable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let (Some(agency), Some(site)) = (non_blank(row.agency), non_blank(row.site)) else {
            warn!(row = idx + 1, "skipping row without agency or site");
            report.parse_errors += 1;
            continue;
        };

        let days_required = parse_f64_safe(row.days_required.as_deref());
        if days_required.is_none() {
            report.missing_days_required += 1;
        }

        records.push(SiteRecord {
            agency,
            cluster: non_blank(row.cluster).unwrap_or_else(|| "Unassigned".to_string()),
            site,
            machine: non_blank(row.machine),
            active: parse_active(row.active.as_deref()),
            quantity_planned: parse_f64_safe(row.quantity_planned.as_deref()).unwrap_or(0.0),
            quantity_done: parse_f64_safe(row.quantity_done.as_deref()).unwrap_or(0.0),
            days_required,
            expected_end_date: parse_date_safe(row.expected_end_date.as_deref()),
        });
    }

    report.loaded_rows = records.len();
    info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.parse_errors,
        "site table loaded"
    );
    Ok((records, report))
}
