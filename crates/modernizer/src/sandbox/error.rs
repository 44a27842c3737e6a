use std::path::PathBuf;

use thiserror::Error;

/// Internal harness failures. Folded into an `ExecutionOutcome` before they
/// reach a caller.
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("failed to create run directory: {0}")]
    CreateWorkDir(#[source] std::io::Error),

    #[error("failed to write temporary source file: {0}")]
    WriteSource(#[source] std::io::Error),

    #[error("no executable found among {candidates:?}")]
    ToolchainMissing { candidates: Vec<String> },

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
