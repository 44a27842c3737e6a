//! Prompt construction for the audit, transform and repair stages.

use crate::plan::{normalize_framework, TransformationPlan};

/// Neutralizes chat-template control tokens in text embedded into a prompt.
///
/// Only complete ChatML markers are rewritten so ordinary source code (which
/// may legitimately contain `<|` or `|>`) passes through unchanged.
fn sanitize_for_prompt(text: &str) -> String {
    text.replace("<|im_start|>", "< |im_start| >")
        .replace("<|im_end|>", "< |im_end| >")
        .replace("<|endoftext|>", "< |endoftext| >")
}

/// Human-readable target, e.g. `Target: python 3.12 with django 5.0`.
pub fn target_description(
    language: &str,
    language_version: Option<&str>,
    framework: Option<&str>,
    framework_version: Option<&str>,
) -> String {
    let mut description = format!(
        "Target: {} {}",
        language,
        language_version.unwrap_or("latest")
    );
    if let Some(framework) = normalize_framework(framework) {
        description.push_str(" with ");
        description.push_str(framework);
        if let Some(version) = framework_version {
            description.push(' ');
            description.push_str(version);
        }
    }
    description
}

pub fn audit_prompt(original_code: &str, language: &str, framework: Option<&str>) -> String {
    let framework = normalize_framework(framework);

    let framework_fields = match framework {
        Some(fw) => format!(
            "  \"framework\": \"{}\",\n  \"framework_version\": \"latest-stable-framework-version\",\n",
            fw
        ),
        None => String::new(),
    };
    let framework_clause = if framework.is_some() {
        " and framework"
    } else {
        ""
    };

    format!(
        r#"
Return ONLY valid JSON with this structure:
{{
  "language": "{language}",
  "language_version": "latest-stable-language-version",
{framework_fields}  "legacy_patterns": [
    {{"pattern": "...", "recommended_fix": "..."}}
  ],
  "modernization_steps": [
    "..."
  ]
}}

You are a code modernization expert.
- Use the latest stable version of the specified language{framework_clause}.
- Focus on modernising the syntax and replacing deprecated APIs with their modern equivalents.
- Do not change or optimize the logic and behaviour.
- Do NOT add explanation text.
- Do NOT wrap in markdown.

Code:
{code}
"#,
        language = language,
        framework_fields = framework_fields,
        framework_clause = framework_clause,
        code = sanitize_for_prompt(original_code),
    )
}

pub fn transform_prompt(plan: &TransformationPlan, target: &str, original_code: &str) -> String {
    let plan_json =
        serde_json::to_string_pretty(plan).unwrap_or_else(|_| format!("{:?}", plan));

    format!(
        r#"
You are a senior software engineer modernizing legacy code.

Target Language and Framework: {target}

Follow this transformation plan strictly:

{plan_json}

Rules:
- Preserve original logic and functionality of the complete code.
- Fix legacy syntax and replace deprecated APIs with their modern equivalents for {target}.
- Output ONLY valid executable code for {target}.
- Do NOT add explanations.
- Do NOT wrap in markdown.
- Do not provide language labels.

Original Code:
{code}
"#,
        target = target,
        plan_json = sanitize_for_prompt(&plan_json),
        code = sanitize_for_prompt(original_code),
    )
}

pub fn repair_prompt(target: &str, error_log: &str, failing_code: &str) -> String {
    format!(
        r#"
You are a debugging expert.

Target Language and Framework: {target}

The following code failed with this error:

ERROR:
{error}

- Fix the issue causing the error.
- Preserve original logic and functionality.
- Output ONLY valid executable code for {target}.
- Do NOT add explanations.
- Do NOT wrap in markdown.
- Do not provide language labels.

Failing Code:
{code}
"#,
        target = target,
        error = sanitize_for_prompt(error_log),
        code = sanitize_for_prompt(failing_code),
    )
}
