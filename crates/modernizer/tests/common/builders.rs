//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use modernizer::config::{Config, SandboxSettings, TargetDefaults};

/// A well-formed audit reply for `language`.
pub fn plan_json(language: &str) -> String {
    serde_json::json!({
        "language": language,
        "language_version": "latest",
        "legacy_patterns": [
            {"pattern": "legacy construct", "recommended_fix": "modern construct"}
        ],
        "modernization_steps": ["Replace legacy constructs"]
    })
    .to_string()
}

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    version: String,
    output_directory: String,
    worker_count: usize,
    max_retries: u32,
    sandbox: SandboxSettings,
    defaults: TargetDefaults,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            output_directory: "/tmp/output".to_string(),
            worker_count: 1,
            max_retries: 3,
            sandbox: SandboxSettings::default(),
            defaults: TargetDefaults::default(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn output_directory(mut self, path: &str) -> Self {
        self.output_directory = path.to_string();
        self
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.sandbox.timeout_secs = secs;
        self
    }

    pub fn temp_directory(mut self, path: &str) -> Self {
        self.sandbox.temp_directory = Some(path.to_string());
        self
    }

    pub fn default_language(mut self, language: &str) -> Self {
        self.defaults.language = language.to_string();
        self
    }

    pub fn default_framework(mut self, framework: &str) -> Self {
        self.defaults.framework = Some(framework.to_string());
        self
    }

    pub fn build(self) -> Config {
        Config {
            version: self.version,
            output_directory: self.output_directory,
            worker_count: self.worker_count,
            max_retries: self.max_retries,
            sandbox: self.sandbox,
            defaults: self.defaults,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
