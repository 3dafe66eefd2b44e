//! End-to-end pipeline tests against real git repositories.
//!
//! Covered behavior:
//! - merged output is globally ordered by timestamp with deterministic ties
//! - date bounds are inclusive and author selection is exact
//! - an invalid reference fails that repository only, listed exactly once

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use logbook_core::{
    run_pipeline, FailureKind, FilterCriteria, GitCli, PoolOptions, RepositorySpec,
};

fn run_git(repo_dir: &Path, args: &[&str], envs: &[(&str, &str)]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .envs(envs.iter().copied())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn make_git_repo(dir: &Path) {
    run_git(dir, &["init"], &[]);
    run_git(dir, &["config", "user.name", "test-user"], &[]);
    run_git(dir, &["config", "user.email", "test@example.com"], &[]);
}

fn commit_at(dir: &Path, subject: &str, author: &str, date: &str) {
    run_git(
        dir,
        &[
            "-c",
            &format!("user.name={author}"),
            "-c",
            &format!("user.email={author}@example.com"),
            "commit",
            "--allow-empty",
            "-m",
            subject,
        ],
        &[("GIT_AUTHOR_DATE", date), ("GIT_COMMITTER_DATE", date)],
    );
}

fn spec(name: &str, dir: &Path) -> RepositorySpec {
    RepositorySpec::new(name, dir.to_str().unwrap())
}

#[tokio::test]
async fn two_repositories_merge_into_one_ordered_timeline() {
    let root = tempfile::tempdir().unwrap();
    let repo_a = root.path().join("a");
    let repo_b = root.path().join("b");
    std::fs::create_dir_all(&repo_a).unwrap();
    std::fs::create_dir_all(&repo_b).unwrap();

    make_git_repo(&repo_a);
    commit_at(&repo_a, "a-first", "alice", "2024-01-01T00:00:00+00:00");
    commit_at(&repo_a, "a-third", "alice", "2024-01-03T00:00:00+00:00");
    commit_at(&repo_a, "a-second", "alice", "2024-01-02T00:00:00+00:00");

    make_git_repo(&repo_b);
    commit_at(&repo_b, "b-first", "bob", "2024-01-02T01:00:00+00:00");
    commit_at(&repo_b, "b-second", "bob", "2024-01-04T00:00:00+00:00");

    let criteria = FilterCriteria {
        since: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        until: Some(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()),
        ..Default::default()
    };

    let timeline = run_pipeline(
        vec![spec("a", &repo_a), spec("b", &repo_b)],
        criteria,
        Arc::new(GitCli::default()),
        PoolOptions::default(),
    )
    .await
    .unwrap();

    assert!(timeline.summary.failures.is_empty());
    assert_eq!(timeline.records.len(), 5);

    let order: Vec<(&str, &str)> = timeline
        .records
        .iter()
        .map(|r| (r.repository.as_str(), r.subject.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a", "a-first"),
            ("a", "a-second"),
            ("b", "b-first"),
            ("a", "a-third"),
            ("b", "b-second"),
        ]
    );

    // boundary-inclusive: commits exactly at since/until are retained
    assert_eq!(timeline.records[0].subject, "a-first");
    assert_eq!(timeline.records[4].subject, "b-second");
    assert_eq!(timeline.summary.commits_per_repository["a"], 3);
    assert_eq!(timeline.summary.commits_per_repository["b"], 2);
}

#[tokio::test]
async fn invalid_reference_fails_only_that_repository() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("good");
    std::fs::create_dir_all(&repo).unwrap();
    make_git_repo(&repo);
    commit_at(&repo, "only", "alice", "2024-05-01T12:00:00+00:00");

    let timeline = run_pipeline(
        vec![spec("good", &repo), RepositorySpec::new("c", "notaurl")],
        FilterCriteria::default(),
        Arc::new(GitCli::default()),
        PoolOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(timeline.records.len(), 1);
    assert_eq!(timeline.records[0].repository, "good");
    assert_eq!(timeline.summary.failure_count(), 1);
    let failure = &timeline.summary.failures[0];
    assert_eq!(failure.repository, "c");
    assert_eq!(failure.kind, FailureKind::InvalidReference);
    assert!(failure.detail.contains("notaurl"));
}

#[tokio::test]
async fn author_allow_list_restricts_output() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("mixed");
    std::fs::create_dir_all(&repo).unwrap();
    make_git_repo(&repo);
    commit_at(&repo, "by-alice", "alice", "2024-06-01T00:00:00+00:00");
    commit_at(&repo, "by-bob", "bob", "2024-06-02T00:00:00+00:00");
    commit_at(&repo, "by-alice-again", "alice", "2024-06-03T00:00:00+00:00");

    let criteria = FilterCriteria {
        selected_authors: BTreeSet::from(["alice".to_string()]),
        ..Default::default()
    };

    let timeline = run_pipeline(
        vec![spec("mixed", &repo)],
        criteria,
        Arc::new(GitCli::default()),
        PoolOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(timeline.records.len(), 2);
    assert!(timeline.records.iter().all(|r| r.author_name == "alice"));
    assert_eq!(timeline.summary.commits_per_author["alice"], 2);
}

#[tokio::test]
async fn single_author_filter_reaches_the_log_capability() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("solo");
    std::fs::create_dir_all(&repo).unwrap();
    make_git_repo(&repo);
    commit_at(&repo, "wanted", "carol", "2024-07-01T00:00:00+00:00");
    commit_at(&repo, "unwanted", "dave", "2024-07-02T00:00:00+00:00");

    let criteria = FilterCriteria {
        author: Some("carol".to_string()),
        ..Default::default()
    };

    let timeline = run_pipeline(
        vec![spec("solo", &repo)],
        criteria,
        Arc::new(GitCli::default()),
        PoolOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(timeline.records.len(), 1);
    assert_eq!(timeline.records[0].subject, "wanted");
}

#[tokio::test]
async fn commit_bodies_survive_extraction() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("bodies");
    std::fs::create_dir_all(&repo).unwrap();
    make_git_repo(&repo);
    run_git(
        &repo,
        &[
            "commit",
            "--allow-empty",
            "-m",
            "subject line",
            "-m",
            "body first line\nbody second line",
        ],
        &[
            ("GIT_AUTHOR_DATE", "2024-08-01T00:00:00+00:00"),
            ("GIT_COMMITTER_DATE", "2024-08-01T00:00:00+00:00"),
        ],
    );

    let timeline = run_pipeline(
        vec![spec("bodies", &repo)],
        FilterCriteria::default(),
        Arc::new(GitCli::default()),
        PoolOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(timeline.records.len(), 1);
    let record = &timeline.records[0];
    assert_eq!(record.subject, "subject line");
    assert!(record.body.contains("body first line"));
    assert!(record.body.contains("body second line"));
    assert_eq!(record.hash.len(), 40);
    assert!(record.hash.starts_with(&record.short_hash));
}
