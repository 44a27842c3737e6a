use thiserror::Error;

use super::stage::Stage;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Oracle failed during {stage} stage: {source}")]
    Oracle {
        stage: &'static str,
        #[source]
        source: crate::error::OracleError,
    },

    #[error("Failed to persist modernized code: {0}")]
    Storage(#[from] crate::error::StorageError),
}

impl PipelineError {
    pub(crate) fn oracle(stage: Stage, source: crate::error::OracleError) -> Self {
        PipelineError::Oracle {
            stage: stage.name(),
            source,
        }
    }
}
