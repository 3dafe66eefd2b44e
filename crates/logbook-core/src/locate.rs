//! Repository reference classification.

use std::path::{Path, PathBuf};

use crate::domain::{LogbookError, RepositorySpec, Result};

/// How a repository's working copy will be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Existing directory on the local filesystem, used in place and
    /// treated as read-only.
    Local(PathBuf),
    /// Remote repository cloned into a run-scoped temporary directory.
    RemoteClone { url: String },
}

const REMOTE_PREFIXES: [&str; 3] = ["https://", "git@", "ssh://"];

/// Classify a repository reference by structural pattern match: known
/// remote scheme prefixes clone, anything else must be an existing local
/// directory. Failure is per-repository, never fatal to the run.
pub fn locate(spec: &RepositorySpec) -> Result<AcquisitionMode> {
    let reference = spec.location.as_str();
    if REMOTE_PREFIXES.iter().any(|p| reference.starts_with(p)) {
        return Ok(AcquisitionMode::RemoteClone {
            url: reference.to_string(),
        });
    }
    let path = Path::new(reference);
    if path.is_dir() {
        return Ok(AcquisitionMode::Local(path.to_path_buf()));
    }
    Err(LogbookError::InvalidReference {
        reference: reference.to_string(),
    })
}
