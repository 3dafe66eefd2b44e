//! Core multi-repository commit aggregation pipeline.
//!
//! Repositories (local paths and remote URLs) are acquired concurrently,
//! their commit history extracted through a delegated git capability,
//! filtered, and merged into one globally time-ordered
//! [`AggregatedTimeline`]. A single unreachable repository never aborts the
//! run: per-repository failures become data in the run summary.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logbook_core::{run_pipeline, FilterCriteria, GitCli, PoolOptions, RepositorySpec};
//!
//! let specs = vec![RepositorySpec::from_reference("https://github.com/org/api.git")];
//! let timeline = run_pipeline(
//!     specs,
//!     FilterCriteria::default(),
//!     Arc::new(GitCli::default()),
//!     PoolOptions::default(),
//! )
//! .await?;
//! ```

pub mod acquire;
pub mod aggregate;
pub mod domain;
pub mod extract;
pub mod filter;
pub mod git;
pub mod locate;
pub mod pool;
pub mod telemetry;

pub use acquire::{acquire, AcquisitionHandle};
pub use aggregate::merge;
pub use domain::{
    AggregatedTimeline, CommitRecord, FailureKind, FilterCriteria, FilterOverrides, LogbookError,
    RepositoryFailure, RepositoryResult, RepositorySpec, Result, RunSummary,
};
pub use extract::{extract, Extraction};
pub use filter::apply_filters;
pub use git::{CapabilityError, GitCli, LogQuery, VcsCapability, FIELD_SEP, RECORD_SEP};
pub use locate::{locate, AcquisitionMode};
pub use pool::{run_pipeline, PoolOptions};
pub use telemetry::init_tracing;
