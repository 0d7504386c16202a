//! Dashboard configuration file.
//!
//! Search order:
//! 1. Explicit path (`--config`)
//! 2. `dashboard.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over file values.

use crate::agency::AgencyDirectory;
use crate::error::{DashboardError, Result};
use crate::ranking::DEFAULT_TIMELINE_SPAN_DAYS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "dashboard.config.json";
pub const DEFAULT_TOP: usize = 8;

pub fn default_target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default()
}

/// Configuration as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Deadline for all sites, `YYYY-MM-DD` (default: 2026-12-31)
    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    /// Days ahead/behind that saturate the timeline score (default: 100)
    #[serde(default)]
    pub timeline_span_days: Option<f64>,

    /// Agency identifier -> display name
    #[serde(default)]
    pub agencies: BTreeMap<String, String>,

    /// Rows shown per ranked table (default: 8)
    #[serde(default)]
    pub top: Option<usize>,
}

impl ConfigFile {
    pub fn validate(&self) -> Result<()> {
        if let Some(span) = self.timeline_span_days {
            if !span.is_finite() || span <= 0.0 {
                return Err(DashboardError::InvalidConfig(format!(
                    "timeline_span_days must be positive (got {})",
                    span
                )));
            }
        }
        if self.top == Some(0) {
            return Err(DashboardError::InvalidConfig(
                "top must be at least 1".to_string(),
            ));
        }
        if let Some(key) = self.agencies.keys().find(|k| k.trim().is_empty()) {
            return Err(DashboardError::InvalidConfig(format!(
                "agency key must not be blank (got {:?})",
                key
            )));
        }
        Ok(())
    }

    pub fn resolve(&self) -> Result<DashboardConfig> {
        self.validate()?;
        Ok(DashboardConfig {
            target_date: self.target_date.unwrap_or_else(default_target_date),
            timeline_span_days: self.timeline_span_days.unwrap_or(DEFAULT_TIMELINE_SPAN_DAYS),
            agencies: self.agencies.iter().collect(),
            top: self.top.unwrap_or(DEFAULT_TOP),
            config_path: None,
        })
    }
}

/// Validated settings ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub target_date: NaiveDate,
    pub timeline_span_days: f64,
    pub agencies: AgencyDirectory,
    pub top: usize,
    /// Where the config came from (`None` for defaults)
    pub config_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            target_date: default_target_date(),
            timeline_span_days: DEFAULT_TIMELINE_SPAN_DAYS,
            agencies: AgencyDirectory::new(),
            top: DEFAULT_TOP,
            config_path: None,
        }
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config: ConfigFile = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load from `config_path` if given, else look for [`CONFIG_FILE_NAME`] in
/// `dir`, else fall back to defaults.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<DashboardConfig> {
    let source = match config_path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(dir.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
    };
    let Some(path) = source else {
        debug!("no config file found, using defaults");
        return Ok(DashboardConfig::default());
    };

    let mut resolved = load_config_file(&path)?.resolve()?;
    debug!(path = %path.display(), agencies = resolved.agencies.len(), "config loaded");
    resolved.config_path = Some(path);
    Ok(resolved)
}
