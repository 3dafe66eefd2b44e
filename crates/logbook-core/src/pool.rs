//! Bounded-concurrency execution of per-repository pipelines.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::acquire::acquire;
use crate::aggregate;
use crate::domain::{
    AggregatedTimeline, CommitRecord, FilterCriteria, LogbookError, RepositoryFailure,
    RepositoryResult, RepositorySpec, Result,
};
use crate::extract::extract;
use crate::filter::apply_filters;
use crate::git::VcsCapability;
use crate::locate::locate;

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum repositories processed concurrently; minimum 1.
    pub parallel_workers: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self { parallel_workers: 4 }
    }
}

/// Run the locate → acquire → extract → filter pipeline for every spec and
/// merge the results into one [`AggregatedTimeline`].
///
/// Concurrency is bounded by a semaphore; each repository's pipeline runs
/// to completion independently. Failures, including a panic in one
/// repository's task, are converted into that repository's
/// [`RepositoryResult`] and never affect siblings: the run always completes
/// with a timeline plus a complete failure summary. The only fatal errors
/// are configuration-level and are rejected before any worker starts.
pub async fn run_pipeline(
    specs: Vec<RepositorySpec>,
    criteria: FilterCriteria,
    vcs: Arc<dyn VcsCapability>,
    options: PoolOptions,
) -> Result<AggregatedTimeline> {
    if specs.is_empty() {
        return Err(LogbookError::Config("no repositories specified".to_string()));
    }
    if options.parallel_workers == 0 {
        return Err(LogbookError::Config(
            "parallel_workers must be at least 1".to_string(),
        ));
    }

    // Run-scoped token keeps temp-directory names collision-free across
    // workers without locking.
    let run_token = Uuid::new_v4().simple().to_string()[..8].to_string();
    info!(
        repositories = specs.len(),
        workers = options.parallel_workers,
        run_token = %run_token,
        "starting repository pipelines"
    );

    let criteria = Arc::new(criteria);
    let sem = Arc::new(Semaphore::new(options.parallel_workers));
    let mut tasks = Vec::with_capacity(specs.len());

    for spec in specs.iter().cloned() {
        let criteria = Arc::clone(&criteria);
        let vcs = Arc::clone(&vcs);
        let sem = Arc::clone(&sem);
        let run_token = run_token.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            process_repository(spec, &criteria, vcs.as_ref(), &run_token).await
        }));
    }

    // Keyed by name to catch accidental duplicate processing; spawn order
    // matches declaration order, so zipping recovers the spec for a task
    // that panicked.
    let mut by_name: HashMap<String, RepositoryResult> = HashMap::new();
    let mut names_in_order = Vec::with_capacity(specs.len());

    for (task, spec) in tasks.into_iter().zip(specs) {
        let result = match task.await {
            Ok(result) => result,
            Err(join_err) => {
                warn!(repository = %spec.name, error = %join_err, "repository worker panicked");
                RepositoryResult {
                    spec: spec.clone(),
                    records: Vec::new(),
                    skipped_records: 0,
                    error: Some(RepositoryFailure::panicked(&spec.name, join_err.to_string())),
                }
            }
        };
        let name = result.spec.name.clone();
        if by_name.contains_key(&name) {
            warn!(repository = %name, "duplicate repository name; keeping first result");
            continue;
        }
        names_in_order.push(name.clone());
        by_name.insert(name, result);
    }

    let ordered: Vec<RepositoryResult> = names_in_order
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect();

    Ok(aggregate::merge(ordered))
}

async fn process_repository(
    spec: RepositorySpec,
    criteria: &FilterCriteria,
    vcs: &dyn VcsCapability,
    run_token: &str,
) -> RepositoryResult {
    info!(repository = %spec.name, location = %spec.location, "processing repository");
    match repository_pipeline(&spec, criteria, vcs, run_token).await {
        Ok((records, skipped)) => RepositoryResult::success(spec, records, skipped),
        Err(err) => {
            warn!(repository = %spec.name, error = %err, "repository pipeline failed");
            RepositoryResult::failed(spec, &err)
        }
    }
}

async fn repository_pipeline(
    spec: &RepositorySpec,
    criteria: &FilterCriteria,
    vcs: &dyn VcsCapability,
    run_token: &str,
) -> Result<(Vec<CommitRecord>, usize)> {
    let mode = locate(spec)?;
    let handle = acquire(spec, mode, vcs, run_token).await?;
    let extraction = extract(&handle, criteria, vcs).await?;
    let records = apply_filters(extraction.records, criteria);
    Ok((records, extraction.skipped))
    // handle drops here: temporary clones are removed on success and on
    // every error path above via `?`
}
