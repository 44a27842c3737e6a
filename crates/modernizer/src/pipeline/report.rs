use serde::Serialize;

use super::stage::{RunStatus, Stage};

/// Outcome of one pipeline run over one file.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub file_identity: String,
    pub status: RunStatus,
    /// Last candidate code. Only trustworthy when `status` is `Succeeded`.
    pub final_code: Option<String>,
    /// Diagnostic of the last validation, or the error that aborted the run.
    /// A succeeded run may still carry the timeout sentinel here.
    pub error_log: Option<String>,
    pub retry_count: u32,
    /// Number of times the Validate stage ran.
    pub validations: u32,
    /// Every stage entered, in order, ending with the terminal one.
    pub stages: Vec<Stage>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }
}
