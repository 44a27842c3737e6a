use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    pub output_directory: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub sandbox: SandboxSettings,
    #[serde(default)]
    pub defaults: TargetDefaults,
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxSettings {
    /// Wall-clock bound applied to every execution stage.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory for temporary source files. System temp dir when unset.
    #[serde(default)]
    pub temp_directory: Option<String>,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            temp_directory: None,
        }
    }
}

/// Target used when a job does not name one explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefaults {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub framework: Option<String>,
}

fn default_language() -> String {
    "python".to_string()
}

impl Default for TargetDefaults {
    fn default() -> Self {
        Self {
            language: default_language(),
            framework: None,
        }
    }
}
