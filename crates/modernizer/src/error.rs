use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModernizerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failures reported by a [`crate::oracle::TransformationOracle`] implementation.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    Request(String),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Oracle is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, ModernizerError>;
