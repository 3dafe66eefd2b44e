//! Commit extraction: delegated log invocation and tolerant record parsing.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::acquire::AcquisitionHandle;
use crate::domain::{CommitRecord, FilterCriteria, LogbookError, RepositorySpec, Result};
use crate::git::{LogQuery, VcsCapability, FIELD_SEP, RECORD_SEP};

/// Parsed records plus the count of malformed entries that were dropped.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<CommitRecord>,
    pub skipped: usize,
}

/// Extract commit records from a materialized repository.
///
/// Builds the normalized query from `criteria` (date bounds, author,
/// branch; the allow-list stays out, see
/// [`apply_filters`](crate::filter::apply_filters)), invokes the delegated
/// log capability, and parses its output. A hard capability failure maps to
/// [`LogbookError::ExtractionFailed`]; malformed individual entries are
/// skipped and counted, never fatal.
pub async fn extract(
    handle: &AcquisitionHandle,
    criteria: &FilterCriteria,
    vcs: &dyn VcsCapability,
) -> Result<Extraction> {
    let query = LogQuery::from_criteria(criteria);
    let raw = vcs
        .log(handle.path(), &query)
        .await
        .map_err(|e| LogbookError::ExtractionFailed {
            repository: handle.spec().name.clone(),
            detail: e.to_string(),
        })?;
    let extraction = parse_log_output(&raw, handle.spec());
    info!(
        repository = %handle.spec().name,
        records = extraction.records.len(),
        skipped = extraction.skipped,
        "extracted commit history"
    );
    Ok(extraction)
}

/// Parse the raw field-delimited log stream into commit records.
///
/// Records are `\u{1e}`-separated, fields `\u{1f}`-separated. A record
/// missing required fields, or whose timestamp does not parse as strict
/// ISO-8601, is dropped with a diagnostic.
pub(crate) fn parse_log_output(raw: &str, spec: &RepositorySpec) -> Extraction {
    let mut records = Vec::new();
    let mut skipped = 0;

    for entry in raw.split(RECORD_SEP) {
        let entry = entry.trim_start_matches(['\n', '\r']);
        if entry.trim().is_empty() {
            continue;
        }
        match parse_entry(entry, spec) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                debug!(repository = %spec.name, "dropping malformed log entry");
            }
        }
    }

    Extraction { records, skipped }
}

fn parse_entry(entry: &str, spec: &RepositorySpec) -> Option<CommitRecord> {
    let fields: Vec<&str> = entry.splitn(7, FIELD_SEP).collect();
    if fields.len() < 6 {
        return None;
    }

    let hash = fields[0].trim();
    let short_hash = fields[1].trim();
    let author_name = fields[2].trim();
    let author_email = fields[3].trim();
    let raw_timestamp = fields[4].trim();
    let subject = fields[5].trim_end_matches(['\n', '\r']);
    let body = fields.get(6).map(|b| b.trim()).unwrap_or("");

    if hash.is_empty() || author_name.is_empty() {
        return None;
    }

    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(raw_timestamp)
        .ok()?
        .with_timezone(&Utc);

    Some(CommitRecord {
        hash: hash.to_string(),
        short_hash: short_hash.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        timestamp,
        subject: subject.to_string(),
        body: body.to_string(),
        repository: spec.name.clone(),
        project: spec.project.clone(),
    })
}
