//! Extraction of bare source code from oracle output.
//!
//! The oracle is told not to use markdown or language labels, and often does
//! anyway. `extract_code` is total and idempotent: running it over its own
//! output is a no-op.

use std::sync::LazyLock;

use regex::Regex;

static RE_FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[ \t]*([^\r\n`]*)\r?\n([\s\S]*?)\r?\n?```").unwrap()
});
static RE_LANGUAGE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(language|lang)\s*:\s*([a-z0-9#+.-]+)\s*$").unwrap());

const FENCE: &str = "```";

/// Lowercase language labels that are dropped when they appear alone on the
/// first line.
const KNOWN_LANGUAGE_LABELS: &[&str] = &[
    "python", "py",
    "javascript", "js", "node", "nodejs", "typescript", "ts",
    "java", "kotlin", "scala",
    "c", "c++", "cpp", "cplusplus", "cc", "cxx", "h", "hpp",
    "rust", "rs",
    "go", "golang",
    "c#", "csharp", "dotnet",
    "php", "ruby", "rb", "perl", "pl", "r",
    "bash", "sh", "shell",
    "powershell", "ps", "ps1",
    "swift",
];

/// Returns the source code contained in `raw_text`.
///
/// Prefers the body of the first fenced block; otherwise strips stray leading
/// or trailing fences. Leading language-label lines are removed in both cases.
pub fn extract_code(raw_text: &str) -> String {
    let text = raw_text.trim();
    if text.is_empty() {
        return String::new();
    }

    let mut current = match RE_FENCED_BLOCK.captures(text) {
        Some(caps) => caps.get(2).map_or("", |m| m.as_str()).trim(),
        None => text,
    };

    loop {
        let next = strip_once(current);
        if next == current {
            break;
        }
        current = next;
    }

    current.to_string()
}

/// One round of partial-fence and label stripping. Always returns a trimmed
/// substring of `text`.
fn strip_once(text: &str) -> &str {
    let mut s = text.trim();

    if s.starts_with(FENCE) {
        s = match s.find('\n') {
            Some(newline) => s[newline + 1..].trim(),
            None => "",
        };
    }

    if let Some(stripped) = s.strip_suffix(FENCE) {
        s = stripped.trim();
    }

    if let Some((first_line, rest)) = s.split_once('\n') {
        if is_language_label(first_line) {
            s = rest.trim();
        }
    }

    s
}

fn is_language_label(line: &str) -> bool {
    let label = line.trim().to_lowercase();
    if KNOWN_LANGUAGE_LABELS.contains(&label.as_str()) {
        return true;
    }

    RE_LANGUAGE_PREFIX
        .captures(&label)
        .and_then(|caps| caps.get(2))
        .is_some_and(|name| KNOWN_LANGUAGE_LABELS.contains(&name.as_str()))
}
