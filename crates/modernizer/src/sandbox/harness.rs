use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};
use tracing::{debug, debug_span, warn};
use wait_timeout::ChildExt;

use crate::config::SandboxSettings;

use super::error::SandboxError;
use super::outcome::ExecutionOutcome;
use super::recipe::{
    canonical_language, recipe_for, source_file_name, Program, StageSpec,
};

const TEMP_DIR_PREFIX: &str = "modernizer_";

/// How long to wait for a stage's output once its process group is gone.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Runs a candidate and reports how it went. Implemented by the execution
/// harness; the pipeline only sees this seam.
pub trait CodeValidator: Send + Sync {
    fn validate(&self, code: &str, language: &str, framework: Option<&str>) -> ExecutionOutcome;
}

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Wall-clock bound for every stage.
    pub timeout: Duration,
    /// Parent of the per-run directories; the system temp dir when `None`.
    pub temp_directory: Option<PathBuf>,
}

impl SandboxConfig {
    pub fn from_settings(settings: &SandboxSettings) -> Self {
        Self {
            timeout: Duration::from_secs(settings.timeout_secs),
            temp_directory: settings.temp_directory.as_ref().map(PathBuf::from),
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::from_settings(&SandboxSettings::default())
    }
}

/// Executes untrusted code in fresh processes inside a fresh temp directory.
#[derive(Debug, Clone)]
pub struct ExecutionHarness {
    config: SandboxConfig,
}

enum StageResult {
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut,
}

impl ExecutionHarness {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Runs `code` as `language` and reports the outcome. Never fails: every
    /// internal error becomes a failed outcome.
    pub fn execute(&self, code: &str, language: &str, framework: Option<&str>) -> ExecutionOutcome {
        let language = canonical_language(language);
        let _span = debug_span!(
            "sandbox",
            language = %language,
            framework = framework.unwrap_or("none"),
        )
        .entered();

        match self.try_execute(code, &language) {
            Ok(outcome) => outcome,
            Err(SandboxError::ToolchainMissing { candidates }) => {
                debug!("No toolchain found among {:?}", candidates);
                ExecutionOutcome::toolchain_missing(&language)
            }
            Err(e) => {
                warn!("Sandbox failure: {}", e);
                ExecutionOutcome::sandbox_error(e)
            }
        }
    }

    fn try_execute(&self, code: &str, language: &str) -> Result<ExecutionOutcome, SandboxError> {
        // Every file a stage writes lands in this directory, which is removed
        // with its contents when it drops.
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);
        let work_dir = match &self.config.temp_directory {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .map_err(SandboxError::CreateWorkDir)?;

        let source = work_dir.path().join(source_file_name(language, code));
        std::fs::write(&source, code).map_err(SandboxError::WriteSource)?;

        let Some(stages) = recipe_for(language, &source) else {
            debug!("No recipe for '{}', accepting without execution", language);
            return Ok(ExecutionOutcome::unverified());
        };

        for stage in &stages {
            match self.run_stage(stage, work_dir.path())? {
                StageResult::Exited {
                    status,
                    stdout,
                    stderr,
                } => {
                    if !status.success() {
                        return Ok(ExecutionOutcome::failure(diagnostic(
                            stage, status, &stdout, &stderr,
                        )));
                    }
                }
                StageResult::TimedOut => {
                    debug!("Stage '{}' exceeded {:?}", stage.name, self.config.timeout);
                    return Ok(ExecutionOutcome::timed_out());
                }
            }
        }

        Ok(ExecutionOutcome::success())
    }

    fn run_stage(&self, stage: &StageSpec, work_dir: &Path) -> Result<StageResult, SandboxError> {
        let program = resolve_program(&stage.program)?;
        let started = Instant::now();

        let mut command = Command::new(&program);
        command
            .args(&stage.args)
            .current_dir(work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own group, so the stage and everything it starts can be killed together.
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| match (&stage.program, e.kind()) {
                (Program::Toolchain(candidates), std::io::ErrorKind::NotFound) => {
                    SandboxError::ToolchainMissing {
                        candidates: candidates.iter().map(|c| c.to_string()).collect(),
                    }
                }
                _ => SandboxError::Spawn {
                    program: program.clone(),
                    source: e,
                },
            })?;

        // Stdin stays open and empty, so interactive reads block until the timeout.
        let stdin = child.stdin.take();
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let waited = child.wait_timeout(self.config.timeout);
        drop(stdin);

        // Background processes left by a finished stage go too.
        kill_process_group(&child);

        let waited = waited.map_err(|e| SandboxError::Wait {
            program: program.clone(),
            source: e,
        });
        let Some(status) = waited? else {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(StageResult::TimedOut);
        };

        let stdout = collect_output(stdout_reader);
        let stderr = collect_output(stderr_reader);

        debug!(
            "Stage '{}' ({}) exited with {} after {:?}",
            stage.name,
            program.display(),
            status,
            started.elapsed()
        );

        Ok(StageResult::Exited {
            status,
            stdout,
            stderr,
        })
    }
}

impl CodeValidator for ExecutionHarness {
    fn validate(&self, code: &str, language: &str, framework: Option<&str>) -> ExecutionOutcome {
        self.execute(code, language, framework)
    }
}

fn resolve_program(program: &Program) -> Result<PathBuf, SandboxError> {
    match program {
        Program::Toolchain(candidates) => candidates
            .iter()
            .find_map(|candidate| which::which(candidate).ok())
            .ok_or_else(|| SandboxError::ToolchainMissing {
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        Program::Artifact(path) => Ok(path.clone()),
    }
}

/// SIGKILL to the stage's process group. The group may already be empty.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Ok(pgid) = i32::try_from(child.id()) {
        let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> Option<Receiver<String>> {
    stream.map(|mut reader| {
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });
        rx
    })
}

/// A process that escaped the group may still hold the pipe open; its output
/// is dropped after a grace period instead of blocking the run.
fn collect_output(reader: Option<Receiver<String>>) -> String {
    reader
        .and_then(|rx| rx.recv_timeout(OUTPUT_GRACE).ok())
        .unwrap_or_default()
}

/// Standard error if non-empty, else standard output, else the exit status.
fn diagnostic(stage: &StageSpec, status: ExitStatus, stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    format!("{} stage exited with {}", stage.name, status)
}
