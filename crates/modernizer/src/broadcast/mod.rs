//! Broadcasting of per-stage run progress for live observers.

pub mod stage_progress;

pub use stage_progress::{
    ProgressStatus, StageProgressBroadcaster, StageProgressEvent, StageProgressTracker,
};
