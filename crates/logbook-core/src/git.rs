//! Delegated version-control capabilities.
//!
//! The pipeline never speaks the git protocol itself: cloning and log
//! extraction are delegated to an external executable behind
//! [`VcsCapability`]. Implement the trait to plug in a native library or a
//! test stub without touching the pipeline.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use tokio::process::Command;
use tracing::debug;

use crate::domain::FilterCriteria;

/// Field separator in the machine-parseable log format (ASCII unit
/// separator, which cannot appear in commit metadata).
pub const FIELD_SEP: char = '\u{1f}';

/// Record separator between commit entries (ASCII record separator), so
/// multi-line bodies survive delimiting.
pub const RECORD_SEP: char = '\u{1e}';

/// `git log --pretty` format producing one `\u{1e}`-terminated record per
/// commit: hash, short hash, author name, author email, strict ISO-8601
/// author date, subject, body.
const LOG_FORMAT: &str = "%H%x1f%h%x1f%an%x1f%ae%x1f%aI%x1f%s%x1f%b%x1e";

/// Failure reported by a delegated capability invocation.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("{command} timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },
}

/// Normalized parameter set for one delegated log invocation.
///
/// Dates are canonicalized to RFC 3339 before reaching the executable. The
/// author allow-list is deliberately absent: it is applied after extraction
/// so matching rules stay in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
    pub branch: Option<String>,
}

impl LogQuery {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            since: criteria
                .since
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            until: criteria
                .until
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            author: criteria.author.clone(),
            branch: criteria.branch.clone(),
        }
    }
}

/// Black-box clone and log capabilities.
#[async_trait]
pub trait VcsCapability: Send + Sync {
    /// Clone `url` into `dest`. `dest` does not exist yet; the
    /// implementation creates it.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CapabilityError>;

    /// Run the log query against the repository at `repo` and return the
    /// raw field-delimited output stream.
    async fn log(&self, repo: &Path, query: &LogQuery) -> Result<String, CapabilityError>;
}

/// Production capability backed by the `git` executable.
///
/// Inherits whatever credential and transport configuration the ambient git
/// installation already has; no authentication of its own.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Wall-clock budget for one clone.
    pub clone_timeout: Duration,
    /// Wall-clock budget for one log invocation.
    pub log_timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            clone_timeout: Duration::from_secs(300),
            log_timeout: Duration::from_secs(60),
        }
    }
}

impl GitCli {
    async fn run(
        &self,
        args: Vec<String>,
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<String, CapabilityError> {
        let command_label = format!("git {}", args.first().map(String::as_str).unwrap_or(""));
        debug!(command = %command_label, "invoking delegated git capability");

        let mut command = Command::new("git");
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|e| CapabilityError::Spawn {
            command: command_label.clone(),
            source: e,
        })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| CapabilityError::Timeout {
                command: command_label.clone(),
                seconds: timeout.as_secs(),
            })?
            .map_err(|e| CapabilityError::Spawn {
                command: command_label.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(CapabilityError::NonZeroExit {
                command: command_label,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VcsCapability for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CapabilityError> {
        let args = vec![
            "clone".to_string(),
            url.to_string(),
            dest.display().to_string(),
        ];
        self.run(args, None, self.clone_timeout).await.map(|_| ())
    }

    async fn log(&self, repo: &Path, query: &LogQuery) -> Result<String, CapabilityError> {
        let mut args = vec!["log".to_string(), format!("--pretty=format:{LOG_FORMAT}")];
        if let Some(since) = &query.since {
            args.push(format!("--since={since}"));
        }
        if let Some(until) = &query.until {
            args.push(format!("--until={until}"));
        }
        if let Some(author) = &query.author {
            args.push(format!("--author={author}"));
        }
        match &query.branch {
            Some(branch) => args.push(branch.clone()),
            None => args.push("--all".to_string()),
        }
        self.run(args, Some(repo), self.log_timeout).await
    }
}
