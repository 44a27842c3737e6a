//! Isolated, time-bounded execution of candidate code.
//!
//! Each call materializes the code into its own uniquely named temp
//! directory, runs the language's recipe stage by stage with each stage in a
//! fresh process group, and removes the directory with every artifact in it
//! on every exit path.

pub mod error;
pub mod harness;
pub mod outcome;
pub mod recipe;

pub use error::SandboxError;
pub use harness::{CodeValidator, ExecutionHarness, SandboxConfig};
pub use outcome::{ExecutionOutcome, OutcomeKind, NO_CODE_MESSAGE, TIMEOUT_SENTINEL};
pub use recipe::{
    canonical_language, file_extension, recipe_for, source_file_name, Program, StageSpec,
};
