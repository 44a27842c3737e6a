use serde::{Deserialize, Serialize};

/// Step recorded on a plan substituted for unusable oracle output.
pub const MANUAL_REVIEW_STEP: &str = "Manual review required (validation failed).";

/// A deprecated construct found in the legacy code together with its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPattern {
    pub pattern: String,
    pub recommended_fix: String,
}

/// Structured description of the target platform and the rewrite steps.
///
/// Produced by the audit stage and consumed read-only by transform and repair.
/// `language` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationPlan {
    pub language: String,
    #[serde(default)]
    pub language_version: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub framework_version: Option<String>,
    pub legacy_patterns: Vec<LegacyPattern>,
    pub modernization_steps: Vec<String>,
}

impl TransformationPlan {
    /// Plan used when the oracle output cannot be trusted.
    pub fn fallback(language: &str, framework: Option<&str>) -> Self {
        Self {
            language: language.to_string(),
            language_version: None,
            framework: normalize_framework(framework).map(str::to_string),
            framework_version: None,
            legacy_patterns: Vec::new(),
            modernization_steps: vec![MANUAL_REVIEW_STEP.to_string()],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.legacy_patterns.is_empty()
            && self.modernization_steps.len() == 1
            && self.modernization_steps[0] == MANUAL_REVIEW_STEP
    }
}

/// Treats empty strings and the literal `none` (any case) as "no framework".
pub fn normalize_framework(framework: Option<&str>) -> Option<&str> {
    framework
        .map(str::trim)
        .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("none"))
}
