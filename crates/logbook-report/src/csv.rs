//! CSV export of the aggregated timeline.

use logbook_core::AggregatedTimeline;

const HEADER: &str = "repository,project,hash,author_name,author_email,date,subject,body";

/// RFC 4180 quoting: fields containing a comma, quote, or line break are
/// wrapped in quotes with embedded quotes doubled.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the timeline as CSV, one row per commit in timeline order.
pub fn render(timeline: &AggregatedTimeline) -> String {
    let mut out = String::with_capacity(timeline.records.len() * 128);
    out.push_str(HEADER);
    out.push('\n');
    for record in &timeline.records {
        let row = [
            escape(&record.repository),
            escape(&record.project),
            escape(&record.hash),
            escape(&record.author_name),
            escape(&record.author_email),
            record.timestamp.to_rfc3339(),
            escape(&record.subject),
            escape(&record.body),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
