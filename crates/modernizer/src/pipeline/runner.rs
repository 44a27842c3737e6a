use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::code::extract_code;
use crate::config::Config;
use crate::oracle::{audit_prompt, repair_prompt, transform_prompt, TransformationOracle};
use crate::plan::{extract_plan, normalize_framework, TransformationPlan};
use crate::sandbox::{CodeValidator, ExecutionHarness, ExecutionOutcome, SandboxConfig};
use crate::sanitize;

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter};
use super::report::RunReport;
use super::stage::{RunStatus, Stage};
use super::state::PipelineState;

/// Routing rule applied after every validation.
///
/// Accepted outcomes (including a timeout) finish the run. Otherwise the run
/// is repaired while budget remains and fails once it is spent.
pub fn next_after_validation(outcome: &ExecutionOutcome, retry_count: u32, max_retries: u32) -> Stage {
    if outcome.is_accepted() {
        Stage::Succeeded
    } else if retry_count < max_retries {
        Stage::Repair
    } else {
        Stage::Failed
    }
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    oracle: Arc<dyn TransformationOracle>,
    validator: Arc<dyn CodeValidator>,
}

impl Pipeline {
    /// Production constructor, validating through the execution harness.
    pub fn from_config(config: &Config, oracle: Arc<dyn TransformationOracle>) -> Self {
        let harness = ExecutionHarness::new(SandboxConfig::from_settings(&config.sandbox));
        Self::new(PipelineConfig::from_config(config), oracle, Arc::new(harness))
    }

    pub fn new(
        config: PipelineConfig,
        oracle: Arc<dyn TransformationOracle>,
        validator: Arc<dyn CodeValidator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            oracle,
            validator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Drive one file from Audit to a terminal stage.
    /// Returns a (RunReport, PipelineState) pair.
    pub fn run(
        &self,
        state: PipelineState,
        progress: &dyn ProgressReporter,
    ) -> (RunReport, PipelineState) {
        self.run_with_id(Uuid::new_v4().to_string(), state, progress)
    }

    /// Same as [`Pipeline::run`] under a caller-chosen run id.
    pub fn run_with_id(
        &self,
        run_id: String,
        mut state: PipelineState,
        progress: &dyn ProgressReporter,
    ) -> (RunReport, PipelineState) {
        let file_path = Path::new(state.file_identity());
        let filename = sanitize::redact_path(file_path);
        let _pipeline_span = info_span!("pipeline",
            run_id = %run_id,
            filename = %filename,
            path_hash = %sanitize::hash_path(file_path),
            language = %state.target_language,
        )
        .entered();

        let mut stage = Stage::Audit;
        let mut stages = Vec::new();
        let mut validations = 0u32;

        while !stage.is_terminal() {
            stages.push(stage);
            if stage == Stage::Validate {
                validations += 1;
            }

            stage = match self.advance(stage, &mut state) {
                Ok(next) => {
                    progress.report(ProgressEvent::snapshot(stage, &state));
                    next
                }
                Err(e) => {
                    warn!("Run aborted during {} stage: {}", stage.name(), e);
                    state.error_log = Some(e.to_string());
                    Stage::Failed
                }
            };
        }

        stages.push(stage);
        progress.report(ProgressEvent::snapshot(stage, &state));

        let status = if stage == Stage::Succeeded {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        };
        info!(
            "Run finished: {} ({:?}, {} retries, {} validations)",
            filename,
            status,
            state.retry_count(),
            validations
        );

        let report = RunReport {
            run_id,
            file_identity: state.file_identity().to_string(),
            status,
            final_code: state.current_code.clone(),
            error_log: state.error_log.clone(),
            retry_count: state.retry_count(),
            validations,
            stages,
        };
        (report, state)
    }

    fn advance(&self, stage: Stage, state: &mut PipelineState) -> Result<Stage, PipelineError> {
        match stage {
            Stage::Audit => {
                let _step = info_span!("audit").entered();
                self.step_audit(state)?;
                Ok(Stage::Transform)
            }
            Stage::Transform => {
                let _step = info_span!("transform").entered();
                self.step_transform(state)?;
                Ok(Stage::Validate)
            }
            Stage::Validate => {
                let _step = info_span!("validate", retry_count = state.retry_count()).entered();
                let outcome = self.step_validate(state);
                Ok(next_after_validation(
                    &outcome,
                    state.retry_count(),
                    self.config.max_retries,
                ))
            }
            Stage::Repair => {
                let _step = info_span!("repair", attempt = state.retry_count() + 1).entered();
                self.step_repair(state)?;
                Ok(Stage::Validate)
            }
            Stage::Succeeded | Stage::Failed => Ok(stage),
        }
    }

    /// Asks the oracle for a plan and refreshes the target from it. A
    /// malformed reply degrades to the fallback plan, never to an error.
    pub fn step_audit(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let language = if state.target_language.trim().is_empty() {
            self.config.default_language.clone()
        } else {
            state.target_language.clone()
        };
        let framework = normalize_framework(state.target_framework.as_deref())
            .or_else(|| normalize_framework(self.config.default_framework.as_deref()))
            .map(str::to_string);

        let raw = self
            .oracle
            .invoke(&audit_prompt(
                state.original_code(),
                &language,
                framework.as_deref(),
            ))
            .map_err(|e| PipelineError::oracle(Stage::Audit, e))?;

        let plan = extract_plan(&raw, &language, framework.as_deref());
        if plan.is_fallback() {
            warn!("Audit reply was not a usable plan, falling back to manual review");
        }
        debug!(
            "Plan for {}: {} legacy patterns, {} steps",
            plan.language,
            plan.legacy_patterns.len(),
            plan.modernization_steps.len()
        );

        state.target_language = language;
        state.target_framework = framework;
        state.apply_plan(plan);
        Ok(())
    }

    /// Rewrites the original code following the plan.
    pub fn step_transform(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let plan = match state.transformation_plan.take() {
            Some(plan) => plan,
            None => TransformationPlan::fallback(
                &state.target_language,
                state.target_framework.as_deref(),
            ),
        };
        let prompt = transform_prompt(&plan, &state.target_description(), state.original_code());
        state.transformation_plan = Some(plan);

        let raw = self
            .oracle
            .invoke(&prompt)
            .map_err(|e| PipelineError::oracle(Stage::Transform, e))?;

        state.current_code = Some(extract_code(&raw));
        Ok(())
    }

    /// Executes the current candidate. Empty code is rejected without
    /// reaching the validator.
    pub fn step_validate(&self, state: &mut PipelineState) -> ExecutionOutcome {
        let code = extract_code(state.current_code.as_deref().unwrap_or_default());
        let outcome = if code.is_empty() {
            ExecutionOutcome::no_code()
        } else {
            self.validator.validate(
                &code,
                &state.target_language,
                state.target_framework.as_deref(),
            )
        };

        debug!(
            "Validation outcome: {:?} {}",
            outcome.kind(),
            outcome
                .error_text()
                .map(|e| sanitize::preview(e, 120))
                .unwrap_or_default()
        );
        state.error_log = outcome.error_text().map(str::to_string);
        outcome
    }

    /// Feeds the failure back to the oracle. Passes through untouched when
    /// there is no error to repair.
    pub fn step_repair(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let Some(error_log) = state.error_log.clone() else {
            debug!("Nothing to repair");
            return Ok(());
        };

        state.increment_retry();
        let prompt = repair_prompt(
            &state.target_description(),
            &error_log,
            state.current_code.as_deref().unwrap_or_default(),
        );
        let raw = self
            .oracle
            .invoke(&prompt)
            .map_err(|e| PipelineError::oracle(Stage::Repair, e))?;

        state.current_code = Some(extract_code(&raw));
        Ok(())
    }
}
