//! Commit records, per-repository results, and the aggregated timeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::LogbookError;
use crate::domain::repo::RepositorySpec;

/// One normalized commit.
///
/// The `timestamp` is always present: log entries whose timestamp cannot be
/// parsed are dropped at extraction time with a diagnostic counter, never
/// carried forward as partially-formed records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub short_hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Author timestamp normalized to UTC.
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub body: String,
    /// Name of the repository the commit was read from.
    pub repository: String,
    /// Logical project the repository belongs to.
    pub project: String,
}

/// Classification of a per-repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Reference was neither a valid URL shape nor an existing path.
    InvalidReference,
    /// Clone failed: network, authentication, or nonexistent remote.
    AcquisitionFailed,
    /// The delegated log capability reported a hard error.
    ExtractionFailed,
    /// The repository's pipeline task panicked.
    WorkerPanicked,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidReference => "invalid_reference",
            Self::AcquisitionFailed => "acquisition_failed",
            Self::ExtractionFailed => "extraction_failed",
            Self::WorkerPanicked => "worker_panicked",
        }
    }
}

/// Serializable failure descriptor attached to a repository's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFailure {
    pub repository: String,
    pub kind: FailureKind,
    pub detail: String,
}

impl RepositoryFailure {
    pub fn from_error(repository: &str, err: &LogbookError) -> Self {
        let kind = match err {
            LogbookError::InvalidReference { .. } => FailureKind::InvalidReference,
            LogbookError::AcquisitionFailed { .. } => FailureKind::AcquisitionFailed,
            LogbookError::ExtractionFailed { .. } => FailureKind::ExtractionFailed,
            LogbookError::Config(_) | LogbookError::Io(_) => FailureKind::AcquisitionFailed,
        };
        Self {
            repository: repository.to_string(),
            kind,
            detail: err.to_string(),
        }
    }

    pub fn panicked(repository: &str, detail: impl Into<String>) -> Self {
        Self {
            repository: repository.to_string(),
            kind: FailureKind::WorkerPanicked,
            detail: detail.into(),
        }
    }
}

/// Outcome of one repository's pipeline: exactly one per requested spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryResult {
    pub spec: RepositorySpec,
    /// Filtered records in extraction order; empty when `error` is set.
    pub records: Vec<CommitRecord>,
    /// Malformed log entries dropped during extraction.
    pub skipped_records: usize,
    pub error: Option<RepositoryFailure>,
}

impl RepositoryResult {
    pub fn success(spec: RepositorySpec, records: Vec<CommitRecord>, skipped_records: usize) -> Self {
        Self {
            spec,
            records,
            skipped_records,
            error: None,
        }
    }

    pub fn failed(spec: RepositorySpec, err: &LogbookError) -> Self {
        let failure = RepositoryFailure::from_error(&spec.name, err);
        Self {
            spec,
            records: Vec::new(),
            skipped_records: 0,
            error: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts and failure list for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_commits: usize,
    pub commits_per_project: BTreeMap<String, usize>,
    pub commits_per_repository: BTreeMap<String, usize>,
    pub commits_per_author: BTreeMap<String, usize>,
    /// Malformed log entries dropped across all repositories.
    pub skipped_records: usize,
    /// One entry per failed repository.
    pub failures: Vec<RepositoryFailure>,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn build(records: &[CommitRecord], skipped_records: usize, failures: Vec<RepositoryFailure>) -> Self {
        let mut commits_per_project = BTreeMap::new();
        let mut commits_per_repository = BTreeMap::new();
        let mut commits_per_author = BTreeMap::new();
        for record in records {
            *commits_per_project.entry(record.project.clone()).or_insert(0) += 1;
            *commits_per_repository.entry(record.repository.clone()).or_insert(0) += 1;
            *commits_per_author.entry(record.author_name.clone()).or_insert(0) += 1;
        }
        Self {
            total_commits: records.len(),
            commits_per_project,
            commits_per_repository,
            commits_per_author,
            skipped_records,
            failures,
            generated_at: Utc::now(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Terminal artifact of the core: the globally time-ordered record set plus
/// its summary. Handed to report consumers as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedTimeline {
    pub records: Vec<CommitRecord>,
    pub summary: RunSummary,
}

impl AggregatedTimeline {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
