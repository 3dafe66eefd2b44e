//! Declarative run configuration (JSON).
//!
//! ```json
//! {
//!   "repositories": [
//!     {"name": "api", "url": "https://github.com/org/api.git", "project": "Platform"},
//!     {"name": "tools", "url": "/home/dev/tools", "project": "Internal"}
//!   ],
//!   "default_filters": {"since": "2024-01-01", "branch": "main"},
//!   "selected_authors": ["Alice Example"],
//!   "parallel_workers": 4
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use logbook_core::{FilterCriteria, RepositorySpec};
use serde::Deserialize;

/// Default filter values applied when the command line does not override
/// them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterDefaults {
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
    pub branch: Option<String>,
}

/// Parsed configuration file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub repositories: Vec<RepositorySpec>,
    #[serde(default)]
    pub default_filters: FilterDefaults,
    #[serde(default)]
    pub selected_authors: Vec<String>,
    #[serde(default)]
    pub parallel_workers: Option<usize>,
}

impl FileConfig {
    /// Build the run's base criteria from the configured defaults and
    /// author allow-list.
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let criteria = FilterCriteria {
            since: self
                .default_filters
                .since
                .as_deref()
                .map(parse_date)
                .transpose()?,
            until: self
                .default_filters
                .until
                .as_deref()
                .map(parse_date)
                .transpose()?,
            author: self.default_filters.author.clone(),
            branch: self.default_filters.branch.clone(),
            ..Default::default()
        };
        Ok(criteria.with_selected_authors(self.selected_authors.clone()))
    }
}

/// Load and parse a JSON configuration file.
pub fn load(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
}

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}': expected YYYY-MM-DD or RFC 3339"))?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}
