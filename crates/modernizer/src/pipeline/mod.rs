//! The per-file modernization state machine.
//!
//! Audit, Transform, Validate and Repair run in that order, with Validate and
//! Repair looping until the candidate is accepted or the retry budget is spent.

pub mod config;
pub mod error;
pub mod progress;
pub mod report;
pub mod runner;
pub mod stage;
pub mod state;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use progress::{BroadcastProgress, CollectingProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use report::RunReport;
pub use runner::{next_after_validation, Pipeline};
pub use stage::{RunStatus, Stage};
pub use state::PipelineState;
