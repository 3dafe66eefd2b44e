//! Markdown logbook rendering.

use logbook_core::AggregatedTimeline;

use crate::grouping::{body_highlight, by_month};

/// Render the timeline as a markdown logbook: commits grouped by month and
/// day, newest first, with a failure section when the run had errors.
pub fn render(timeline: &AggregatedTimeline) -> String {
    let summary = &timeline.summary;
    let mut out = String::new();

    out.push_str("# Commit History Log\n\n");
    out.push_str(&format!(
        "*Generated on {}*\n\n",
        summary.generated_at.format("%B %d, %Y at %H:%M UTC")
    ));
    out.push_str(&format!("Total commits: {}\n\n", summary.total_commits));
    out.push_str("---\n\n");

    for month in by_month(&timeline.records) {
        out.push_str(&format!(
            "## {} ({} commits)\n\n",
            month.sample_date.format("%B %Y"),
            month.total
        ));
        for day in &month.days {
            out.push_str(&format!(
                "### {} ({} commits)\n\n",
                day.date.format("%A, %B %d"),
                day.records.len()
            ));
            for record in day.records.iter().rev() {
                out.push_str(&format!(
                    "**{}** | `{}` | `{}` | *{}*\n",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.project,
                    record.repository,
                    record.author_name
                ));
                out.push_str(&format!("{}\n", record.subject));
                if let Some(highlight) = body_highlight(record) {
                    out.push_str(&format!("> {highlight}\n"));
                }
                out.push_str(&format!("`{}`\n\n", record.short_hash));
            }
        }
    }

    if !summary.failures.is_empty() {
        out.push_str("## Failed repositories\n\n");
        for failure in &summary.failures {
            out.push_str(&format!(
                "- `{}`: {} ({})\n",
                failure.repository,
                failure.kind.as_str(),
                failure.detail
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out.push_str(&format!(
        "*Report generated: {}*\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out
}
