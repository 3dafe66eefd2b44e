//! Report renderers for aggregated commit timelines.
//!
//! Consumes the [`AggregatedTimeline`](logbook_core::AggregatedTimeline)
//! produced by `logbook-core` and renders it as a markdown or HTML logbook
//! or a CSV export. Rendering is presentation only: ordering, filtering,
//! and summary counts are fixed upstream.

pub mod csv;
mod grouping;
pub mod html;
pub mod markdown;
