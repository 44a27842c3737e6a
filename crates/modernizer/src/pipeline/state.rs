use crate::oracle::target_description;
use crate::plan::{normalize_framework, TransformationPlan};

/// Per-file record threaded through every stage of one run.
///
/// `file_identity` and `original_code` are fixed at creation. `retry_count`
/// only moves forward, one step per repair.
#[derive(Debug, Clone)]
pub struct PipelineState {
    file_identity: String,
    original_code: String,

    // Refined by audit, authoritative afterwards
    pub target_language: String,
    pub target_language_version: Option<String>,
    pub target_framework: Option<String>,
    pub target_framework_version: Option<String>,

    // Audit result; replaced, never edited
    pub transformation_plan: Option<TransformationPlan>,

    // Latest candidate from transform or repair
    pub current_code: Option<String>,

    // None = last validation passed or is pending
    pub error_log: Option<String>,

    retry_count: u32,
}

impl PipelineState {
    pub fn new(
        file_identity: impl Into<String>,
        original_code: impl Into<String>,
        language: impl Into<String>,
        framework: Option<&str>,
    ) -> Self {
        Self {
            file_identity: file_identity.into(),
            original_code: original_code.into(),
            target_language: language.into(),
            target_language_version: None,
            target_framework: normalize_framework(framework).map(str::to_string),
            target_framework_version: None,
            transformation_plan: None,
            current_code: None,
            error_log: None,
            retry_count: 0,
        }
    }

    pub fn file_identity(&self) -> &str {
        &self.file_identity
    }

    pub fn original_code(&self) -> &str {
        &self.original_code
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub(crate) fn increment_retry(&mut self) {
        self.retry_count += 1;
    }

    /// Attaches `plan` and refreshes the target fields from it. Values present
    /// in the plan win; absent ones keep what the state already had.
    pub fn apply_plan(&mut self, plan: TransformationPlan) {
        if !plan.language.trim().is_empty() {
            self.target_language = plan.language.clone();
        }
        if plan.language_version.is_some() {
            self.target_language_version = plan.language_version.clone();
        }
        if let Some(framework) = normalize_framework(plan.framework.as_deref()) {
            self.target_framework = Some(framework.to_string());
        }
        if plan.framework_version.is_some() {
            self.target_framework_version = plan.framework_version.clone();
        }
        self.transformation_plan = Some(plan);
    }

    pub fn target_description(&self) -> String {
        target_description(
            &self.target_language,
            self.target_language_version.as_deref(),
            self.target_framework.as_deref(),
            self.target_framework_version.as_deref(),
        )
    }
}
