//! Test harness for isolated test execution.
//!
//! The `TestHarness` owns a temp directory with `input/`, `output/`,
//! `config/` and `sandbox/` subdirectories and wires up pipelines, stores and
//! pools against them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use modernizer::config::Config;
use modernizer::pipeline::{NoopProgress, Pipeline, PipelineConfig, PipelineState, RunReport};
use modernizer::sandbox::{CodeValidator, ExecutionHarness, SandboxConfig};
use modernizer::storage::OutputStore;
use modernizer::worker::WorkerPool;
use modernizer::TransformationOracle;

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_dir: PathBuf,
    pub sandbox_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let input_dir = base.join("input");
        let output_dir = base.join("output");
        let config_dir = base.join("config");
        let sandbox_dir = base.join("sandbox");

        for dir in [&input_dir, &output_dir, &config_dir, &sandbox_dir] {
            std::fs::create_dir_all(dir).expect("Failed to create harness dir");
        }

        Self {
            temp_dir,
            input_dir,
            output_dir,
            config_dir,
            sandbox_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let path = self.config_dir.join(filename);
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    pub fn write_raw_config(&self, filename: &str, json: &str) -> PathBuf {
        let path = self.config_dir.join(filename);
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    /// Real execution harness confined to this harness's sandbox dir.
    pub fn execution_harness(&self, timeout_secs: u64) -> ExecutionHarness {
        ExecutionHarness::new(SandboxConfig {
            timeout: std::time::Duration::from_secs(timeout_secs),
            temp_directory: Some(self.sandbox_dir.clone()),
        })
    }

    pub fn pipeline(
        &self,
        max_retries: u32,
        oracle: Arc<dyn TransformationOracle>,
        validator: Arc<dyn CodeValidator>,
    ) -> Pipeline {
        let config = PipelineConfig {
            max_retries,
            ..PipelineConfig::default()
        };
        Pipeline::new(config, oracle, validator)
    }

    pub fn store(&self) -> OutputStore {
        OutputStore::new(&self.output_dir)
    }

    pub fn pool(&self, pipeline: Pipeline, workers: usize) -> WorkerPool {
        WorkerPool::new(Arc::new(pipeline), self.store(), workers)
    }

    /// Runs `code` through `pipeline` as a python file named `name`.
    pub fn run(&self, pipeline: &Pipeline, name: &str, code: &str) -> (RunReport, PipelineState) {
        pipeline.run(PipelineState::new(name, code, "python", None), &NoopProgress)
    }

    pub fn read_output(&self, relative_path: &str) -> Option<String> {
        std::fs::read_to_string(self.output_dir.join(relative_path)).ok()
    }

    /// Files left in the sandbox dir; should be zero after every execution.
    pub fn sandbox_leftovers(&self) -> usize {
        std::fs::read_dir(&self.sandbox_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
