//! Run filter criteria: date bounds, author selection, branch.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable filter set for one run.
///
/// Constructed once by merging configuration defaults with per-run
/// overrides, then shared read-only across all workers. Date bounds are
/// inclusive on both ends. An empty `selected_authors` set imposes no
/// author restriction beyond the single `author` filter (which is forwarded
/// to the delegated log capability); when both are set the effective filter
/// is their intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub branch: Option<String>,
    #[serde(default)]
    pub selected_authors: BTreeSet<String>,
}

/// Per-run overrides applied on top of configured defaults.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub branch: Option<String>,
}

impl FilterCriteria {
    /// Merge `overrides` over these defaults; an override field set to
    /// `Some` wins, `None` keeps the default.
    pub fn with_overrides(&self, overrides: FilterOverrides) -> Self {
        Self {
            since: overrides.since.or(self.since),
            until: overrides.until.or(self.until),
            author: overrides.author.or_else(|| self.author.clone()),
            branch: overrides.branch.or_else(|| self.branch.clone()),
            selected_authors: self.selected_authors.clone(),
        }
    }

    pub fn with_selected_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_authors = authors.into_iter().map(Into::into).collect();
        self
    }
}
