//! The transformation oracle seam.
//!
//! An oracle turns a prompt into free-form text. Its output is untrusted and
//! only ever reaches the pipeline through the plan and code extractors.

pub mod prompts;

pub use crate::error::OracleError;
pub use prompts::{audit_prompt, repair_prompt, target_description, transform_prompt};

/// Text generator used for auditing, rewriting and repairing code.
pub trait TransformationOracle: Send + Sync {
    fn invoke(&self, prompt: &str) -> Result<String, OracleError>;
}

impl<T: TransformationOracle + ?Sized> TransformationOracle for std::sync::Arc<T> {
    fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        (**self).invoke(prompt)
    }
}
