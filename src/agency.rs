//! Agency rotation.
//!
//! The host owns a monotonically increasing tick; `agencies[tick % n]` is the
//! agency on screen. Nothing here keeps state between calls.

use crate::types::{AgencyLabel, SiteRecord};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Static lookup from agency identifier to display name.
///
/// Keys are folded (trimmed, inner whitespace collapsed, lowercased) on both
/// insert and lookup, and only exact folded matches count. There is no
/// substring fallback, so `"Dakar"` never resolves to the entry for
/// `"Dakar Plateau"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencyDirectory {
    names: BTreeMap<String, String>,
}

fn fold_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl AgencyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, display: impl Into<String>) {
        self.names.insert(fold_key(id), display.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve an identifier. Unknown identifiers pass through as
    /// [`AgencyLabel::Unmapped`] carrying the raw id.
    pub fn label_for(&self, id: &str) -> AgencyLabel {
        match self.names.get(&fold_key(id)) {
            Some(display) => AgencyLabel::Mapped(display.clone()),
            None => AgencyLabel::Unmapped(id.to_string()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AgencyDirectory
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dir = AgencyDirectory::new();
        for (k, v) in iter {
            dir.insert(k.as_ref(), v);
        }
        dir
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAgency {
    pub id: String,
    pub label: AgencyLabel,
    /// Index into the first-appearance agency list.
    pub position: usize,
    pub agency_count: usize,
    pub rows: Vec<SiteRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgencySelection {
    /// The table had no rows.
    NoData,
    Current(CurrentAgency),
}

impl AgencySelection {
    pub fn current(&self) -> Option<&CurrentAgency> {
        match self {
            AgencySelection::NoData => None,
            AgencySelection::Current(c) => Some(c),
        }
    }

    /// Rows of the selected agency; empty for `NoData`.
    pub fn rows(&self) -> &[SiteRecord] {
        self.current().map(|c| c.rows.as_slice()).unwrap_or(&[])
    }
}

/// Distinct agency identifiers in order of first appearance.
pub fn distinct_agencies(table: &[SiteRecord]) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for r in table {
        if seen.insert(r.agency.as_str()) {
            out.push(r.agency.as_str());
        }
    }
    out
}

pub fn select_agency(
    table: &[SiteRecord],
    tick: u64,
    directory: &AgencyDirectory,
) -> AgencySelection {
    let agencies = distinct_agencies(table);
    if agencies.is_empty() {
        debug!(tick, "no agencies in table");
        return AgencySelection::NoData;
    }

    let position = (tick % agencies.len() as u64) as usize;
    let id = agencies[position];
    let label = directory.label_for(id);
    if label.is_mapped() {
        debug!(tick, agency = id, display = %label, "agency selected");
    } else {
        warn!(tick, agency = id, "agency has no display name");
    }

    let rows = table.iter().filter(|r| r.agency == id).cloned().collect();
    AgencySelection::Current(CurrentAgency {
        id: id.to_string(),
        label,
        position,
        agency_count: agencies.len(),
        rows,
    })
}
