//! Pure record filtering against run criteria.

use crate::domain::{CommitRecord, FilterCriteria};

/// Apply the author allow-list and inclusive date bounds.
///
/// Order-preserving, deterministic, and side-effect-free: this runs once per
/// repository, potentially concurrently, and shares nothing mutable. The
/// single `author` filter is not re-checked here: it was already forwarded
/// to the delegated log capability, so a record that also fails the
/// allow-list is removed regardless (intersection semantics).
pub fn apply_filters(records: Vec<CommitRecord>, criteria: &FilterCriteria) -> Vec<CommitRecord> {
    records
        .into_iter()
        .filter(|record| retained(record, criteria))
        .collect()
}

fn retained(record: &CommitRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.selected_authors.is_empty()
        && !criteria.selected_authors.contains(&record.author_name)
    {
        return false;
    }
    if let Some(since) = criteria.since {
        if record.timestamp < since {
            return false;
        }
    }
    if let Some(until) = criteria.until {
        if record.timestamp > until {
            return false;
        }
    }
    true
}
