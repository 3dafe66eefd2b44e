//! Working-copy acquisition with scoped temporary-directory cleanup.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::domain::{LogbookError, RepositorySpec, Result};
use crate::git::VcsCapability;
use crate::locate::AcquisitionMode;

/// A resolved, usable working copy of a repository.
///
/// For remote clones the handle owns the backing temporary directory;
/// dropping the handle removes it recursively. The guarantee holds on every
/// exit path: normal completion, extraction failure, and cancellation
/// (dropping the pipeline future drops in-flight handles). Removal failure
/// is logged and never escalated.
#[derive(Debug)]
pub struct AcquisitionHandle {
    spec: RepositorySpec,
    working_path: PathBuf,
    temp: Option<TempDir>,
}

impl AcquisitionHandle {
    pub fn spec(&self) -> &RepositorySpec {
        &self.spec
    }

    pub fn path(&self) -> &Path {
        &self.working_path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

impl Drop for AcquisitionHandle {
    fn drop(&mut self) {
        if let Some(temp) = self.temp.take() {
            let path = temp.path().to_path_buf();
            match temp.close() {
                Ok(()) => debug!(
                    repository = %self.spec.name,
                    path = %path.display(),
                    "removed temporary clone directory"
                ),
                Err(e) => warn!(
                    repository = %self.spec.name,
                    path = %path.display(),
                    error = %e,
                    "failed to remove temporary clone directory"
                ),
            }
        }
    }
}

/// Directory-name-safe form of a repository name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Materialize a working copy for `spec` according to `mode`.
///
/// Local paths are referenced in place. Remote clones go into a uniquely
/// named temporary directory derived from the repository name and the
/// per-run token, so concurrent workers never collide without locking. A
/// failed clone still leaves nothing behind: the directory is created
/// before the clone and removed when the temp guard drops on the error
/// path.
pub async fn acquire(
    spec: &RepositorySpec,
    mode: AcquisitionMode,
    vcs: &dyn VcsCapability,
    run_token: &str,
) -> Result<AcquisitionHandle> {
    match mode {
        AcquisitionMode::Local(path) => Ok(AcquisitionHandle {
            spec: spec.clone(),
            working_path: path,
            temp: None,
        }),
        AcquisitionMode::RemoteClone { url } => {
            let prefix = format!("logbook-{}-{}-", sanitize(&spec.name), run_token);
            let temp = tempfile::Builder::new().prefix(&prefix).tempdir().map_err(|e| {
                LogbookError::AcquisitionFailed {
                    repository: spec.name.clone(),
                    detail: format!("could not create temporary directory: {e}"),
                }
            })?;
            let dest = temp.path().join(sanitize(&spec.name));
            info!(
                repository = %spec.name,
                url = %url,
                dest = %dest.display(),
                "cloning remote repository"
            );
            vcs.clone_repo(&url, &dest)
                .await
                .map_err(|e| LogbookError::AcquisitionFailed {
                    repository: spec.name.clone(),
                    detail: e.to_string(),
                })?;
            Ok(AcquisitionHandle {
                spec: spec.clone(),
                working_path: dest,
                temp: Some(temp),
            })
        }
    }
}
