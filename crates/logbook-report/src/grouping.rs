//! Month/day grouping shared by the logbook renderers.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use logbook_core::CommitRecord;

/// One calendar day's commits, in timeline (ascending) order.
pub(crate) struct DayGroup<'a> {
    pub date: NaiveDate,
    pub records: Vec<&'a CommitRecord>,
}

/// One calendar month's commits grouped by day, newest day first.
pub(crate) struct MonthGroup<'a> {
    /// Representative date inside the month, for label formatting.
    pub sample_date: NaiveDate,
    pub total: usize,
    pub days: Vec<DayGroup<'a>>,
}

/// Group records by month then day, both newest first. Input order inside a
/// day is preserved (the timeline is ascending; renderers reverse it for
/// newest-first presentation).
pub(crate) fn by_month(records: &[CommitRecord]) -> Vec<MonthGroup<'_>> {
    let mut months: BTreeMap<(i32, u32), BTreeMap<NaiveDate, Vec<&CommitRecord>>> = BTreeMap::new();
    for record in records {
        let date = record.timestamp.date_naive();
        months
            .entry((date.year(), date.month()))
            .or_default()
            .entry(date)
            .or_default()
            .push(record);
    }

    months
        .into_iter()
        .rev()
        .map(|(_, days)| {
            let day_groups: Vec<DayGroup<'_>> = days
                .into_iter()
                .rev()
                .map(|(date, records)| DayGroup { date, records })
                .collect();
            let total = day_groups.iter().map(|d| d.records.len()).sum();
            let sample_date = day_groups[0].date;
            MonthGroup {
                sample_date,
                total,
                days: day_groups,
            }
        })
        .collect()
}

/// First body line when it exists and differs from the subject.
pub(crate) fn body_highlight(record: &CommitRecord) -> Option<&str> {
    let first_line = record.body.lines().next()?.trim();
    if first_line.is_empty() || first_line == record.subject {
        return None;
    }
    Some(first_line)
}
