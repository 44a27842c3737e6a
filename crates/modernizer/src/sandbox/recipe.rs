//! Fixed per-language tables: source extension and execution recipe.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Extension used when a language has no entry in the table.
pub const FALLBACK_EXTENSION: &str = ".txt";

/// Extension of binaries produced by compile stages.
const BINARY_EXTENSION: &str = "exe";

/// Base name of the source file inside a run's private directory.
const SOURCE_STEM: &str = "candidate";

/// Class name used when a Java source declares no recognizable type.
const DEFAULT_JAVA_CLASS: &str = "Main";

static JAVA_PUBLIC_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bpublic\s+(?:(?:final|abstract|static|sealed)\s+)*(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
    )
    .unwrap()
});

static JAVA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap()
});

static JAVA_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstatic\s+void\s+main\s*\(").unwrap());

/// Maps common aliases onto the canonical table keys.
pub fn canonical_language(language: &str) -> String {
    let lower = language.trim().to_lowercase();
    let canonical = match lower.as_str() {
        "py" | "python3" => "python",
        "js" | "node" | "nodejs" => "javascript",
        "ts" => "typescript",
        "golang" => "go",
        "rs" => "rust",
        "c++" | "cplusplus" | "cxx" | "cc" => "cpp",
        "c#" | "cs" => "csharp",
        "rb" => "ruby",
        "pl" => "perl",
        "sh" | "shell" => "bash",
        "ps1" | "pwsh" => "powershell",
        other => other,
    };
    canonical.to_string()
}

/// Source file extension (with leading dot) for a canonical language name.
pub fn file_extension(language: &str) -> &'static str {
    match language {
        "python" => ".py",
        "javascript" => ".js",
        "typescript" => ".ts",
        "java" => ".java",
        "go" => ".go",
        "rust" => ".rs",
        "cpp" => ".cpp",
        "c" => ".c",
        "csharp" => ".cs",
        "php" => ".php",
        "ruby" => ".rb",
        "swift" => ".swift",
        "kotlin" => ".kt",
        "scala" => ".scala",
        "r" => ".r",
        "perl" => ".pl",
        "bash" => ".sh",
        "powershell" => ".ps1",
        _ => FALLBACK_EXTENSION,
    }
}

/// File name for `code` inside a run's private directory.
///
/// Java sources are named after their entry class, since `javac` rejects a
/// public class in a file of another name and `java` loads classes by name.
pub fn source_file_name(language: &str, code: &str) -> String {
    match language {
        "java" => format!("{}.java", java_main_class(code)),
        _ => format!("{}{}", SOURCE_STEM, file_extension(language)),
    }
}

/// The public top-level type if there is one, else the type declaring
/// `main`, else the first declared type.
fn java_main_class(code: &str) -> &str {
    if let Some(caps) = JAVA_PUBLIC_TYPE.captures(code) {
        return caps.get(1).map_or(DEFAULT_JAVA_CLASS, |m| m.as_str());
    }

    let declared_before = |end: usize| {
        JAVA_TYPE
            .captures_iter(&code[..end])
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    };

    JAVA_MAIN
        .find(code)
        .and_then(|main| declared_before(main.start()))
        .or_else(|| declared_before(code.len()))
        .unwrap_or(DEFAULT_JAVA_CLASS)
}

/// What a stage runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Host toolchain binary; the first candidate found on `PATH` is used.
    Toolchain(&'static [&'static str]),
    /// A binary produced by an earlier stage.
    Artifact(PathBuf),
}

/// One discrete, independently time-bounded step of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    pub name: &'static str,
    pub program: Program,
    pub args: Vec<OsString>,
}

impl StageSpec {
    fn run(program: &'static [&'static str], args: Vec<OsString>) -> Self {
        Self {
            name: "run",
            program: Program::Toolchain(program),
            args,
        }
    }

    fn compile(program: &'static [&'static str], args: Vec<OsString>) -> Self {
        Self {
            name: "compile",
            program: Program::Toolchain(program),
            args,
        }
    }

    fn run_artifact(binary: PathBuf) -> Self {
        Self {
            name: "run",
            program: Program::Artifact(binary),
            args: Vec::new(),
        }
    }
}

/// Ordered stages for executing `source`, or `None` when the language has no
/// runner on record.
pub fn recipe_for(language: &str, source: &Path) -> Option<Vec<StageSpec>> {
    let file = source.as_os_str().to_os_string();
    let binary = source.with_extension(BINARY_EXTENSION);

    let stages = match language {
        "python" => vec![StageSpec::run(&["python3", "python"], vec![file])],
        "javascript" => vec![StageSpec::run(&["node"], vec![file])],
        "typescript" => vec![StageSpec::run(&["ts-node"], vec![file])],
        "java" => {
            let class_dir = source.parent()?.as_os_str().to_os_string();
            let class_name = source.file_stem()?.to_os_string();
            vec![
                StageSpec::compile(&["javac"], vec!["-d".into(), class_dir.clone(), file]),
                StageSpec::run(&["java"], vec!["-cp".into(), class_dir, class_name]),
            ]
        }
        "go" => vec![StageSpec::run(&["go"], vec!["run".into(), file])],
        "rust" => vec![
            StageSpec::compile(
                &["rustc"],
                vec![file, "-o".into(), binary.clone().into_os_string()],
            ),
            StageSpec::run_artifact(binary),
        ],
        "cpp" => vec![
            StageSpec::compile(
                &["g++"],
                vec![file, "-o".into(), binary.clone().into_os_string()],
            ),
            StageSpec::run_artifact(binary),
        ],
        "c" => vec![
            StageSpec::compile(
                &["gcc"],
                vec![file, "-o".into(), binary.clone().into_os_string()],
            ),
            StageSpec::run_artifact(binary),
        ],
        "csharp" => {
            let mut out_flag = OsString::from("-out:");
            out_flag.push(binary.as_os_str());
            vec![
                StageSpec::compile(&["csc"], vec![file, out_flag]),
                StageSpec::run_artifact(binary),
            ]
        }
        "php" => vec![StageSpec::run(&["php"], vec![file])],
        "ruby" => vec![StageSpec::run(&["ruby"], vec![file])],
        "r" => vec![StageSpec::run(&["Rscript"], vec![file])],
        "perl" => vec![StageSpec::run(&["perl"], vec![file])],
        "bash" => vec![StageSpec::run(&["bash"], vec![file])],
        "powershell" => vec![StageSpec::run(
            &["pwsh", "powershell"],
            vec!["-File".into(), file],
        )],
        _ => return None,
    };

    Some(stages)
}
