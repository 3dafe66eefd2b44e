//! Self-contained HTML logbook rendering.

use logbook_core::{AggregatedTimeline, CommitRecord};

use crate::grouping::{body_highlight, by_month};

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       line-height: 1.6; max-width: 1000px; margin: 0 auto; padding: 20px; color: #2c3e50; }
h1 { border-bottom: 2px solid #3498db; padding-bottom: 8px; }
h2 { border-left: 4px solid #3498db; padding-left: 10px; }
.commit-entry { border: 1px solid #e1e8ed; border-radius: 6px; padding: 10px; margin: 8px 0; }
.commit-header { display: flex; flex-wrap: wrap; gap: 12px; font-size: 0.9em; color: #555; }
.hash { font-family: monospace; background: #f4f4f4; border-radius: 3px; padding: 0 4px; }
.commit-subject { margin-top: 4px; font-weight: 600; }
.commit-body { margin-top: 2px; color: #666; font-style: italic; }
.failures { border: 1px solid #e0b4b4; background: #fff6f6; border-radius: 6px; padding: 10px; }
.footer { border-top: 1px solid #ddd; margin-top: 24px; padding-top: 8px;
          text-align: center; color: #888; font-size: 0.85em; }
"#;

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_entry(out: &mut String, record: &CommitRecord) {
    out.push_str("<div class=\"commit-entry\">\n");
    out.push_str(&format!(
        "<div class=\"commit-header\"><span class=\"date\">{}</span><span class=\"project\">{}</span><span class=\"repo\">{}</span><span class=\"author\">{}</span><span class=\"hash\">{}</span></div>\n",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        escape(&record.project),
        escape(&record.repository),
        escape(&record.author_name),
        escape(&record.short_hash)
    ));
    out.push_str(&format!(
        "<div class=\"commit-subject\">{}</div>\n",
        escape(&record.subject)
    ));
    if let Some(highlight) = body_highlight(record) {
        out.push_str(&format!(
            "<div class=\"commit-body\">{}</div>\n",
            escape(highlight)
        ));
    }
    out.push_str("</div>\n");
}

/// Render the timeline as a self-contained HTML document with the same
/// month/day grouping as the markdown logbook. All commit-controlled fields
/// are escaped.
pub fn render(timeline: &AggregatedTimeline) -> String {
    let summary = &timeline.summary;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("<title>Commit History Log</title>\n");
    out.push_str(&format!("<style>{STYLE}</style>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str("<h1>Commit History Log</h1>\n");
    out.push_str(&format!(
        "<p class=\"stats\">Total commits: {} &middot; generated {}</p>\n",
        summary.total_commits,
        summary.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    for month in by_month(&timeline.records) {
        out.push_str(&format!(
            "<h2>{} ({} commits)</h2>\n",
            month.sample_date.format("%B %Y"),
            month.total
        ));
        for day in &month.days {
            out.push_str(&format!(
                "<h3>{} ({} commits)</h3>\n",
                day.date.format("%A, %B %d"),
                day.records.len()
            ));
            for record in day.records.iter().rev() {
                push_entry(&mut out, record);
            }
        }
    }

    if !summary.failures.is_empty() {
        out.push_str("<div class=\"failures\">\n<h2>Failed repositories</h2>\n<ul>\n");
        for failure in &summary.failures {
            out.push_str(&format!(
                "<li><strong>{}</strong>: {} ({})</li>\n",
                escape(&failure.repository),
                failure.kind.as_str(),
                escape(&failure.detail)
            ));
        }
        out.push_str("</ul>\n</div>\n");
    }

    out.push_str(&format!(
        "<div class=\"footer\">Report generated: {}</div>\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str("</body>\n</html>\n");

    out
}
