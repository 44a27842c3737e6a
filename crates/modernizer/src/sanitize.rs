//! Helpers for keeping file paths and untrusted code out of log output.
//!
//! Source under modernization may be proprietary, so spans and log lines
//! carry file names and short previews rather than full paths and bodies.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

const PREVIEW_ELLIPSIS: &str = "...";

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Short deterministic hash of a path, for correlating log lines without
/// printing the path.
pub fn hash_path(path: &Path) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// First line of `text`, cut to at most `max_chars` characters.
pub fn preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let truncated = first_line.chars().count() > max_chars || text.lines().nth(1).is_some();

    let mut out: String = first_line.chars().take(max_chars).collect();
    if truncated {
        out.push_str(PREVIEW_ELLIPSIS);
    }
    out
}
