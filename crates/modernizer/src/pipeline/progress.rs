use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::broadcast::stage_progress::{StageProgressEvent, StageProgressTracker};

use super::stage::Stage;
use super::state::PipelineState;

/// Snapshot of a run taken right after a stage finished.
///
/// `original_code` is only carried by the audit event; later events would
/// repeat it for nothing.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub current_code: Option<String>,
    pub error_log: Option<String>,
    pub target_language: String,
    pub target_language_version: Option<String>,
    pub target_framework: Option<String>,
    pub target_framework_version: Option<String>,
    pub retry_count: u32,
    pub original_code: Option<String>,
}

impl ProgressEvent {
    pub fn snapshot(stage: Stage, state: &PipelineState) -> Self {
        Self {
            stage,
            current_code: state.current_code.clone(),
            error_log: state.error_log.clone(),
            target_language: state.target_language.clone(),
            target_language_version: state.target_language_version.clone(),
            target_framework: state.target_framework.clone(),
            target_framework_version: state.target_framework_version.clone(),
            retry_count: state.retry_count(),
            original_code: (stage == Stage::Audit).then(|| state.original_code().to_string()),
        }
    }
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for callers that don't observe progress.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Default)]
pub struct CollectingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.events().iter().map(|e| e.stage).collect()
    }
}

impl ProgressReporter for CollectingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

/// Bridges pipeline events to the stage progress broadcast channel.
pub struct BroadcastProgress {
    tracker: StageProgressTracker,
}

impl BroadcastProgress {
    pub fn new(
        run_id: &str,
        file_path: &str,
        sender: Arc<broadcast::Sender<StageProgressEvent>>,
    ) -> Self {
        Self {
            tracker: StageProgressTracker::new(run_id, file_path, sender),
        }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        self.tracker.report(&event);
    }
}
