use serde::{Deserialize, Serialize};

/// States of the per-file modernization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Audit,
    Transform,
    Validate,
    Repair,
    Succeeded,
    Failed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Audit => "audit",
            Stage::Transform => "transform",
            Stage::Validate => "validate",
            Stage::Repair => "repair",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Audit => write!(f, "Auditing"),
            Stage::Transform => write!(f, "Transforming"),
            Stage::Validate => write!(f, "Validating"),
            Stage::Repair => write!(f, "Repairing"),
            Stage::Succeeded => write!(f, "Succeeded"),
            Stage::Failed => write!(f, "Failed"),
        }
    }
}

/// Terminal result of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}
