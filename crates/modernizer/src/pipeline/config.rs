use crate::config::Config;

pub struct PipelineConfig {
    /// Repair attempts allowed before a run is declared failed.
    pub max_retries: u32,
    pub default_language: String,
    pub default_framework: Option<String>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            default_language: config.defaults.language.clone(),
            default_framework: config.defaults.framework.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_language: "python".to_string(),
            default_framework: None,
        }
    }
}
