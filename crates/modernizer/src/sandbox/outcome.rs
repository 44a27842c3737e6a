use serde::{Deserialize, Serialize};

/// Diagnostic reported when a stage exceeds the wall-clock bound.
pub const TIMEOUT_SENTINEL: &str = "Execution timed out (possible infinite loop).";

/// Diagnostic reported when there is nothing to execute.
pub const NO_CODE_MESSAGE: &str = "No code to test.";

/// Classification of an execution attempt, kept alongside the diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The final stage exited with status 0.
    Passed,
    /// No recipe exists for the language; accepted without running.
    Unverified,
    TimedOut,
    RuntimeFailure,
    ToolchainMissing,
    SandboxError,
    NoCode,
}

/// Result of one sandboxed run. `succeeded` implies no error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    succeeded: bool,
    error_text: Option<String>,
    kind: OutcomeKind,
}

impl ExecutionOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            error_text: None,
            kind: OutcomeKind::Passed,
        }
    }

    pub fn unverified() -> Self {
        Self {
            succeeded: true,
            error_text: None,
            kind: OutcomeKind::Unverified,
        }
    }

    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self::failed(OutcomeKind::RuntimeFailure, diagnostic.into())
    }

    pub fn timed_out() -> Self {
        Self::failed(OutcomeKind::TimedOut, TIMEOUT_SENTINEL.to_string())
    }

    pub fn toolchain_missing(language: &str) -> Self {
        Self::failed(
            OutcomeKind::ToolchainMissing,
            format!(
                "Runtime environment for {} not found. Please ensure the necessary interpreter/compiler is installed.",
                language
            ),
        )
    }

    pub fn sandbox_error(message: impl std::fmt::Display) -> Self {
        Self::failed(OutcomeKind::SandboxError, format!("Sandbox error: {}", message))
    }

    pub fn no_code() -> Self {
        Self::failed(OutcomeKind::NoCode, NO_CODE_MESSAGE.to_string())
    }

    fn failed(kind: OutcomeKind, error_text: String) -> Self {
        Self {
            succeeded: false,
            error_text: Some(error_text),
            kind,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn is_timeout(&self) -> bool {
        self.error_text.as_deref() == Some(TIMEOUT_SENTINEL)
    }

    /// Whether the pipeline treats this outcome as terminal success.
    pub fn is_accepted(&self) -> bool {
        self.succeeded || self.is_timeout()
    }

    pub fn into_error_text(self) -> Option<String> {
        self.error_text
    }
}
