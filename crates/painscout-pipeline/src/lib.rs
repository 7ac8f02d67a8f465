//! Batch orchestration: scrape, analyze, compose, prepare outreach, report.
//!
//! [`Orchestrator::run`] never fails. Per-organization problems are recorded
//! as [`UnitError`]s in the run stats and the batch carries on.

pub mod mode;
pub mod orchestrator;
pub mod report;
pub mod sink;
pub mod stats;

pub use mode::{Phase, RunMode};
pub use orchestrator::{Orchestrator, PipelineSettings, RunBatch, RunOutcome, RunState};
pub use report::{load_reports, render_summary, write_reports, OrganizationReport, ReportError};
pub use sink::{DryRunSink, JsonlOutreachSink, OutreachSink, SinkError};
pub use stats::{PipelineRunStats, UnitError};
