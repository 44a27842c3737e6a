//! Stage progress broadcaster for real-time run status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::pipeline::{ProgressEvent, Stage};

/// Overall status of a run at the time of an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Running,
    Succeeded,
    Failed,
}

impl From<Stage> for ProgressStatus {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Succeeded => ProgressStatus::Succeeded,
            Stage::Failed => ProgressStatus::Failed,
            _ => ProgressStatus::Running,
        }
    }
}

/// Progress event for one stage of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgressEvent {
    /// Unique run identifier.
    pub run_id: String,
    /// Relative path of the file being modernized.
    pub file_path: String,
    /// Stage that just finished.
    pub stage: Stage,
    pub status: ProgressStatus,
    pub timestamp: DateTime<Utc>,
    pub target_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_framework_version: Option<String>,
    pub retry_count: u32,
    /// Latest candidate code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_code: Option<String>,
    /// Diagnostic from the latest validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<String>,
    /// Untouched input, audit events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_code: Option<String>,
}

impl StageProgressEvent {
    pub fn new(run_id: &str, file_path: &str, event: &ProgressEvent) -> Self {
        Self {
            run_id: run_id.to_string(),
            file_path: file_path.to_string(),
            stage: event.stage,
            status: ProgressStatus::from(event.stage),
            timestamp: Utc::now(),
            target_language: event.target_language.clone(),
            target_language_version: event.target_language_version.clone(),
            target_framework: event.target_framework.clone(),
            target_framework_version: event.target_framework_version.clone(),
            retry_count: event.retry_count,
            current_code: event.current_code.clone(),
            error_log: event.error_log.clone(),
            original_code: event.original_code.clone(),
        }
    }
}

/// Broadcasts stage progress events for streaming.
#[derive(Clone)]
pub struct StageProgressBroadcaster {
    sender: Arc<broadcast::Sender<StageProgressEvent>>,
}

impl StageProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: StageProgressEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StageProgressEvent> {
        self.sender.subscribe()
    }

    pub fn start_run(&self, run_id: &str, file_path: &str) -> StageProgressTracker {
        StageProgressTracker::new(run_id, file_path, Arc::clone(&self.sender))
    }

    pub fn sender(&self) -> Arc<broadcast::Sender<StageProgressEvent>> {
        Arc::clone(&self.sender)
    }
}

impl Default for StageProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Tracks progress for a single run.
pub struct StageProgressTracker {
    run_id: String,
    file_path: String,
    sender: Arc<broadcast::Sender<StageProgressEvent>>,
}

impl StageProgressTracker {
    pub fn new(
        run_id: &str,
        file_path: &str,
        sender: Arc<broadcast::Sender<StageProgressEvent>>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            file_path: file_path.to_string(),
            sender,
        }
    }

    pub fn report(&self, event: &ProgressEvent) {
        let event = StageProgressEvent::new(&self.run_id, &self.file_path, event);
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineState;

    fn audit_event() -> ProgressEvent {
        let state = PipelineState::new("legacy/app.py", "print 'hi'", "python", Some("flask"));
        ProgressEvent::snapshot(Stage::Audit, &state)
    }

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = StageProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(StageProgressEvent::new("run-1", "legacy/app.py", &audit_event()));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.run_id, "run-1");
        assert_eq!(received.file_path, "legacy/app.py");
        assert_eq!(received.stage, Stage::Audit);
        assert_eq!(received.status, ProgressStatus::Running);
        assert_eq!(received.original_code.as_deref(), Some("print 'hi'"));
        assert_eq!(received.target_framework.as_deref(), Some("flask"));
    }

    #[test]
    fn test_tracker_terminal_status() {
        let broadcaster = StageProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let tracker = broadcaster.start_run("run-2", "a.c");

        let mut state = PipelineState::new("a.c", "int main(){}", "c", None);
        state.error_log = Some("segfault".to_string());
        tracker.report(&ProgressEvent::snapshot(Stage::Failed, &state));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.status, ProgressStatus::Failed);
        assert_eq!(received.error_log.as_deref(), Some("segfault"));
        assert!(received.original_code.is_none());
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = StageProgressEvent::new("run-3", "legacy/app.py", &audit_event());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["runId"], "run-3");
        assert_eq!(json["stage"], "audit");
        assert_eq!(json["targetLanguage"], "python");
        assert_eq!(json["originalCode"], "print 'hi'");
        assert!(json.get("currentCode").is_none());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_send_without_receivers_is_ignored() {
        let broadcaster = StageProgressBroadcaster::default();
        broadcaster.send(StageProgressEvent::new("run-4", "x.py", &audit_event()));
    }
}
