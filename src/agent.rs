use std::env;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::artifact_io::expand_home;
use crate::error::{GuideError, ToolFailure};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);
const READER_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeCommandConfig {
    pub program: String,
    pub fallback_paths: Vec<PathBuf>,
    pub args: Vec<String>,
    pub system_prompt_flag: String,
    pub model: Option<String>,
}

#[cfg(test)]
impl Default for ClaudeCommandConfig {
    fn default() -> Self {
        crate::config::GuideConfig::default().claude
    }
}

/// One single-shot generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub system: Option<&'a str>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    Text(String),
    Failed(ToolFailure),
}

impl ToolReply {
    /// Usable response text; failures and empty output both read as `None`.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Anything that can answer a single prompt. `Err` is reserved for a missing
/// tool; every other failure comes back as `ToolReply::Failed`.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<ToolReply, GuideError>;
}

pub trait BinaryResolver {
    fn resolve(&self) -> Option<PathBuf>;
    fn describe_search(&self) -> String;
}

/// Finds the claude binary on `PATH`, then in the fallback locations. The
/// first answer, found or not, is kept for the life of the resolver.
#[derive(Debug)]
pub struct ClaudeResolver {
    program: String,
    fallback_paths: Vec<PathBuf>,
    search_path: Option<OsString>,
    resolved: OnceLock<Option<PathBuf>>,
}

impl ClaudeResolver {
    pub fn new(program: impl Into<String>, fallback_paths: Vec<PathBuf>) -> Self {
        Self::with_search_path(program, fallback_paths, env::var_os("PATH"))
    }

    pub fn with_search_path(
        program: impl Into<String>,
        fallback_paths: Vec<PathBuf>,
        search_path: Option<OsString>,
    ) -> Self {
        Self {
            program: program.into(),
            fallback_paths,
            search_path,
            resolved: OnceLock::new(),
        }
    }

    fn lookup(&self) -> Option<PathBuf> {
        let program = self.program.trim();
        if !program.is_empty() {
            if program.contains(std::path::MAIN_SEPARATOR) || program.starts_with('~') {
                let candidate = expand_home(program);
                if is_executable_file(&candidate) {
                    return Some(candidate);
                }
            } else if let Some(found) = search_executable_path(program, self.search_path.as_ref())
            {
                return Some(found);
            }
        }
        self.fallback_paths
            .iter()
            .find(|candidate| is_executable_file(candidate))
            .cloned()
    }
}

impl BinaryResolver for ClaudeResolver {
    fn resolve(&self) -> Option<PathBuf> {
        self.resolved
            .get_or_init(|| {
                let found = self.lookup();
                debug!(program = %self.program, resolved = ?found, "resolved claude binary");
                found
            })
            .clone()
    }

    fn describe_search(&self) -> String {
        let mut searched = vec![format!("{} on PATH", self.program)];
        searched.extend(
            self.fallback_paths
                .iter()
                .map(|path| path.display().to_string()),
        );
        searched.join(", ")
    }
}

fn search_executable_path(program: &str, search_path: Option<&OsString>) -> Option<PathBuf> {
    let search_path = search_path?;
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Runs the claude CLI in print mode: prompt on stdin, answer on stdout.
pub struct ClaudeCli<R = ClaudeResolver> {
    config: ClaudeCommandConfig,
    resolver: R,
}

impl ClaudeCli<ClaudeResolver> {
    pub fn from_config(config: ClaudeCommandConfig) -> Self {
        let resolver = ClaudeResolver::new(config.program.clone(), config.fallback_paths.clone());
        Self::with_resolver(config, resolver)
    }
}

impl<R: BinaryResolver> ClaudeCli<R> {
    pub fn with_resolver(config: ClaudeCommandConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    /// Fails early when the binary is missing, before any session chrome.
    pub fn ensure_available(&self) -> Result<PathBuf, GuideError> {
        self.resolver
            .resolve()
            .ok_or_else(|| GuideError::ToolNotFound {
                searched: self.resolver.describe_search(),
            })
    }
}

impl<R: BinaryResolver> TextGenerator for ClaudeCli<R> {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<ToolReply, GuideError> {
        let binary = self.ensure_available()?;
        let started = Instant::now();
        let reply = run_single_shot(&binary, &self.config, request);
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "claude call finished");
        Ok(reply)
    }
}

pub(crate) fn build_command_args(config: &ClaudeCommandConfig, system: Option<&str>) -> Vec<String> {
    let mut args = config.args.clone();
    if let Some(model) = config
        .model
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        args.push("--model".to_string());
        args.push(model.to_string());
    }
    if let Some(system) = system.filter(|value| !value.trim().is_empty()) {
        args.push(config.system_prompt_flag.clone());
        args.push(system.to_string());
    }
    args
}

fn run_single_shot(
    binary: &Path,
    config: &ClaudeCommandConfig,
    request: &GenerationRequest<'_>,
) -> ToolReply {
    let mut command = Command::new(binary);
    command
        .args(build_command_args(config, request.system))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!("Could not run claude CLI: {err}");
            return ToolReply::Failed(ToolFailure::Spawn(err.to_string()));
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        let prompt = request.prompt.to_string();
        // The pipe closes when `stdin` drops at the end of the thread.
        thread::spawn(move || {
            let _ = stdin.write_all(prompt.as_bytes());
        });
    }
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);
    let deadline = Instant::now() + request.timeout;

    let status = match wait_until(&mut child, deadline) {
        Ok(Some(status)) => status,
        Ok(None) => {
            // Readers are left detached: descendants of the killed process may
            // still hold the pipes open.
            warn!("Claude CLI timed out.");
            return ToolReply::Failed(ToolFailure::Timeout(request.timeout.as_secs()));
        }
        Err(err) => {
            warn!("Claude CLI failed while waiting for process: {err}");
            return ToolReply::Failed(ToolFailure::Io(err.to_string()));
        }
    };

    // A background descendant can keep the pipes open after the tool exits.
    let reader_deadline = deadline.max(Instant::now() + READER_GRACE);
    let Some(stdout) = join_reader(stdout_reader, reader_deadline) else {
        warn!("Claude CLI timed out.");
        return ToolReply::Failed(ToolFailure::Timeout(request.timeout.as_secs()));
    };
    let stderr = join_reader(stderr_reader, reader_deadline).unwrap_or_default();
    if !status.success() {
        let stderr = stderr.trim().to_string();
        warn!("Claude CLI error: {stderr}");
        return ToolReply::Failed(ToolFailure::NonzeroExit {
            code: status.code(),
            stderr,
        });
    }
    ToolReply::Text(stdout.trim().to_string())
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// Collects a reader's output, giving up once `deadline` passes. A reader that
/// is still blocked is left detached and yields `None`.
fn join_reader(handle: Option<thread::JoinHandle<String>>, deadline: Instant) -> Option<String> {
    let Some(handle) = handle else {
        return Some(String::new());
    };
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
    Some(handle.join().unwrap_or_default())
}

/// Waits for the child, killing it once `deadline` has passed. `Ok(None)`
/// means the deadline fired.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}


#[cfg(test)]
#[path = "../tests/unit/agent_tests.rs"]
mod tests;
