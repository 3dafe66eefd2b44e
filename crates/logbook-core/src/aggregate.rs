//! Merge per-repository results into one ordered timeline.

use tracing::info;

use crate::domain::{AggregatedTimeline, RepositoryResult, RunSummary};

/// Merge repository results into the final [`AggregatedTimeline`].
///
/// Successful records are concatenated and stable-sorted ascending by
/// timestamp, ties broken by repository name then hash, so output is
/// deterministic across runs with identical input. Failed repositories
/// contribute zero records and appear exactly once in the summary's failure
/// list. An all-failed run yields an empty but well-formed timeline.
pub fn merge(results: Vec<RepositoryResult>) -> AggregatedTimeline {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    let mut skipped_records = 0;

    for result in results {
        skipped_records += result.skipped_records;
        match result.error {
            Some(failure) => failures.push(failure),
            None => records.extend(result.records),
        }
    }

    records.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.repository.cmp(&b.repository))
            .then_with(|| a.hash.cmp(&b.hash))
    });

    let summary = RunSummary::build(&records, skipped_records, failures);
    info!(
        total = summary.total_commits,
        failed_repositories = summary.failure_count(),
        skipped = summary.skipped_records,
        "merged repository results"
    );

    AggregatedTimeline { records, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitRecord, LogbookError, RepositorySpec};
    use chrono::{DateTime, TimeZone, Utc};

    fn record(repository: &str, hash: &str, timestamp: DateTime<Utc>) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            short_hash: hash.chars().take(8).collect(),
            author_name: "alice".to_string(),
            author_email: "alice@example.com".to_string(),
            timestamp,
            subject: format!("commit {hash}"),
            body: String::new(),
            repository: repository.to_string(),
            project: "Platform".to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_merge_orders_by_timestamp_ascending() {
        let a = RepositoryResult::success(
            RepositorySpec::new("a", "/repos/a"),
            vec![
                record("a", "h1", at(2024, 1, 1, 0)),
                record("a", "h2", at(2024, 1, 3, 0)),
                record("a", "h3", at(2024, 1, 2, 0)),
            ],
            0,
        );
        let b = RepositoryResult::success(
            RepositorySpec::new("b", "/repos/b"),
            vec![
                record("b", "h4", at(2024, 1, 2, 1)),
                record("b", "h5", at(2024, 1, 4, 0)),
            ],
            0,
        );
        let timeline = merge(vec![a, b]);
        assert_eq!(timeline.records.len(), 5);
        let order: Vec<(&str, &str)> = timeline
            .records
            .iter()
            .map(|r| (r.repository.as_str(), r.hash.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("a", "h1"), ("a", "h3"), ("b", "h4"), ("a", "h2"), ("b", "h5")]
        );
        assert!(timeline.summary.failures.is_empty());
    }

    #[test]
    fn test_ties_break_by_repository_then_hash() {
        let ts = at(2024, 1, 1, 12);
        let a = RepositoryResult::success(
            RepositorySpec::new("zeta", "/repos/zeta"),
            vec![record("zeta", "aaa", ts)],
            0,
        );
        let b = RepositoryResult::success(
            RepositorySpec::new("alpha", "/repos/alpha"),
            vec![record("alpha", "zzz", ts), record("alpha", "aaa", ts)],
            0,
        );
        let timeline = merge(vec![a, b]);
        let order: Vec<(&str, &str)> = timeline
            .records
            .iter()
            .map(|r| (r.repository.as_str(), r.hash.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("alpha", "aaa"), ("alpha", "zzz"), ("zeta", "aaa")]
        );
    }

    #[test]
    fn test_failed_repository_listed_once_without_records() {
        let ok = RepositoryResult::success(
            RepositorySpec::new("good", "/repos/good"),
            vec![record("good", "h1", at(2024, 1, 1, 0))],
            0,
        );
        let bad = RepositoryResult::failed(
            RepositorySpec::new("bad", "notaurl"),
            &LogbookError::InvalidReference {
                reference: "notaurl".to_string(),
            },
        );
        let timeline = merge(vec![ok, bad]);
        assert_eq!(timeline.records.len(), 1);
        assert_eq!(timeline.summary.failure_count(), 1);
        assert_eq!(timeline.summary.failures[0].repository, "bad");
    }

    #[test]
    fn test_all_failed_yields_empty_well_formed_timeline() {
        let results = vec![
            RepositoryResult::failed(
                RepositorySpec::new("x", "notaurl"),
                &LogbookError::InvalidReference {
                    reference: "notaurl".to_string(),
                },
            ),
            RepositoryResult::failed(
                RepositorySpec::new("y", "https://example.com/y.git"),
                &LogbookError::AcquisitionFailed {
                    repository: "y".to_string(),
                    detail: "timeout".to_string(),
                },
            ),
        ];
        let timeline = merge(results);
        assert!(timeline.is_empty());
        assert_eq!(timeline.summary.total_commits, 0);
        assert_eq!(timeline.summary.failure_count(), 2);
    }

    #[test]
    fn test_skipped_records_are_summed() {
        let a = RepositoryResult::success(RepositorySpec::new("a", "/a"), Vec::new(), 2);
        let b = RepositoryResult::success(RepositorySpec::new("b", "/b"), Vec::new(), 3);
        let timeline = merge(vec![a, b]);
        assert_eq!(timeline.summary.skipped_records, 5);
    }
}
