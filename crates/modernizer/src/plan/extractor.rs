//! Turns free-form oracle output into a [`TransformationPlan`].
//!
//! The oracle is asked for bare JSON but routinely wraps it in prose or
//! markdown, truncates it, or ignores the requested shape. Every failure mode
//! collapses into the deterministic fallback plan.

use std::sync::LazyLock;

use tracing::{debug, warn};

use super::types::TransformationPlan;

const PLAN_SCHEMA_JSON: &str = include_str!("../../../../schema/transformation-plan-v1.json");

static PLAN_VALIDATOR: LazyLock<Option<jsonschema::Validator>> = LazyLock::new(|| {
    let schema: serde_json::Value = match serde_json::from_str(PLAN_SCHEMA_JSON) {
        Ok(schema) => schema,
        Err(e) => {
            warn!("Embedded plan schema is not valid JSON: {}", e);
            return None;
        }
    };
    match jsonschema::validator_for(&schema) {
        Ok(validator) => Some(validator),
        Err(e) => {
            warn!("Failed to compile plan schema: {}", e);
            None
        }
    }
});

/// Extracts a plan from `raw_text`, substituting the fallback plan built from
/// `fallback_language`/`fallback_framework` when nothing usable is found.
pub fn extract_plan(
    raw_text: &str,
    fallback_language: &str,
    fallback_framework: Option<&str>,
) -> TransformationPlan {
    match parse_plan(raw_text) {
        Ok(plan) => plan,
        Err(reason) => {
            debug!("Using fallback plan: {}", reason);
            TransformationPlan::fallback(fallback_language, fallback_framework)
        }
    }
}

fn parse_plan(raw_text: &str) -> Result<TransformationPlan, String> {
    let json_str = extract_json_object(raw_text).ok_or("no JSON object in oracle output")?;

    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("invalid JSON: {}", e))?;

    if let Some(validator) = PLAN_VALIDATOR.as_ref() {
        let errors: Vec<String> = validator.iter_errors(&value).map(|e| e.to_string()).collect();
        if !errors.is_empty() {
            return Err(format!("schema validation failed: {}", errors.join("; ")));
        }
    }

    let plan: TransformationPlan =
        serde_json::from_value(value).map_err(|e| format!("unexpected plan shape: {}", e))?;

    if plan.language.trim().is_empty() {
        return Err("plan language is empty".to_string());
    }

    Ok(plan)
}

/// Returns the first top-level `{ ... }` span of `text`.
///
/// The scan tracks string literals and escapes so braces inside strings do not
/// affect nesting. When the object is never closed, the span runs to the last
/// `}` in the text, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
