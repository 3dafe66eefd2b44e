//! Repository identity and declaration.

use serde::{Deserialize, Serialize};

fn default_project() -> String {
    "Unknown".to_string()
}

/// Declarative description of one repository to process.
///
/// Identity is the `name`; two specs with the same name refer to the same
/// logical repository. The `location` is either a filesystem path or a
/// remote URL and is classified by [`locate`](crate::locate::locate).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RepositorySpec {
    /// Short identifier used in reports and temp-directory names.
    pub name: String,
    /// Filesystem path or remote URL (`https://`, `git@`, `ssh://`).
    #[serde(alias = "url")]
    pub location: String,
    /// Logical project the repository belongs to.
    #[serde(default = "default_project")]
    pub project: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl RepositorySpec {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            project: default_project(),
            description: None,
        }
    }

    /// Build a spec from a bare reference, deriving the name from the last
    /// path segment with any `.git` suffix stripped.
    pub fn from_reference(reference: &str) -> Self {
        let trimmed = reference.trim_end_matches('/');
        let last = trimmed
            .rsplit(['/', ':'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(trimmed);
        let name = last.strip_suffix(".git").unwrap_or(last);
        Self::new(name, reference)
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }
}
