pub mod broadcast;
pub mod code;
pub mod config;
pub mod error;
pub mod oracle;
pub mod pipeline;
pub mod plan;
pub mod sandbox;
pub mod sanitize;
pub mod storage;
pub mod telemetry;
pub mod worker;

pub use broadcast::{StageProgressBroadcaster, StageProgressEvent};
pub use code::extract_code;
pub use config::{load_config, Config};
pub use error::{ConfigError, ModernizerError, OracleError, Result, StorageError, WorkerError};
pub use oracle::TransformationOracle;
pub use pipeline::{Pipeline, PipelineConfig, PipelineState, RunReport, RunStatus, Stage};
pub use plan::{extract_plan, TransformationPlan};
pub use sandbox::{CodeValidator, ExecutionHarness, ExecutionOutcome, SandboxConfig};
pub use storage::OutputStore;
pub use telemetry::{init_tracing, LogFormat};
pub use worker::{Job, JobResult, WorkerPool};
