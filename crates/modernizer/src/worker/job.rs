use std::path::PathBuf;

use crate::pipeline::{PipelineState, RunReport, RunStatus};

/// One file queued for modernization.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    /// Path relative to the scanned root; also the path under the output root.
    pub relative_path: String,
    pub original_code: String,
    pub language: String,
    pub framework: Option<String>,
}

impl Job {
    pub fn new(
        relative_path: impl Into<String>,
        original_code: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            relative_path: relative_path.into(),
            original_code: original_code.into(),
            language: language.into(),
            framework: None,
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn into_state(self) -> PipelineState {
        PipelineState::new(
            self.relative_path,
            self.original_code,
            self.language,
            self.framework.as_deref(),
        )
    }
}

#[derive(Debug)]
pub struct JobResult {
    pub job_id: String,
    pub relative_path: String,
    pub success: bool,
    pub status: RunStatus,
    /// Where the modernized code was written, on success.
    pub output_path: Option<PathBuf>,
    pub retry_count: u32,
    pub error: Option<String>,
}

impl JobResult {
    pub fn success(report: &RunReport, output_path: PathBuf) -> Self {
        Self {
            job_id: report.run_id.clone(),
            relative_path: report.file_identity.clone(),
            success: true,
            status: RunStatus::Succeeded,
            output_path: Some(output_path),
            retry_count: report.retry_count,
            error: None,
        }
    }

    pub fn failure(report: &RunReport, error: String) -> Self {
        Self {
            job_id: report.run_id.clone(),
            relative_path: report.file_identity.clone(),
            success: false,
            status: RunStatus::Failed,
            output_path: None,
            retry_count: report.retry_count,
            error: Some(error),
        }
    }
}
