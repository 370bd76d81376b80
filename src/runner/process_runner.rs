//! Process runner owning a single child process lifecycle.

use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

use super::output_half::OutputHalf;
use super::terminate;
use crate::types::{Error, Result};

/// Runner for a single external process.
///
/// Owns exactly one OS process for its lifetime: construct it with a command
/// and argument list, [`run`](Self::run) it (blocking until exit with full
/// output capture, or returning as soon as the pid is known), and
/// [`stop`](Self::stop) it later in a platform-appropriate way. After
/// termination the runner is inert; there is no restart.
///
/// A runner is meant to be driven by one logical caller at a time. The
/// `&mut self` receivers enforce this at compile time; no further locking
/// is done.
pub struct ProcessRunner {
    command: String,
    arguments: Vec<String>,
    process: Option<Child>,
    captured_stdout: Option<String>,
    captured_stderr: Option<String>,
    exit_code: i32,
    pid: Option<u32>,
}

impl ProcessRunner {
    /// Create a new runner for the given executable and arguments.
    ///
    /// Nothing is validated or spawned here; a command that cannot be
    /// launched is reported by [`run`](Self::run) as
    /// [`Error::ProcessStart`].
    pub fn new(command: &str, arguments: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            process: None,
            captured_stdout: None,
            captured_stderr: None,
            exit_code: -1,
            pid: None,
        }
    }

    /// The resolved command line: command and arguments joined with single
    /// spaces.
    ///
    /// No quoting or escaping is applied; arguments containing spaces must
    /// be pre-escaped by the caller. Note the child's argv is passed to the
    /// OS as a vector, so this form is diagnostic only.
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.arguments.join(" "))
        }
    }

    /// Captured stdout text; `None` until a blocking run has completed.
    pub fn output(&self) -> Option<&str> {
        self.captured_stdout.as_deref()
    }

    /// Captured stderr text; `None` until a blocking run has completed.
    pub fn stderr(&self) -> Option<&str> {
        self.captured_stderr.as_deref()
    }

    /// The child's exit code; `-1` until a blocking run has completed.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// The child's process id; `None` until the process has started.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Start the child process.
    ///
    /// In non-blocking mode the pid is returned as soon as it is known and
    /// the captured-output fields and exit code stay unset. In blocking mode
    /// both output streams are drained to end-of-stream concurrently (a
    /// stream left unread can fill its pipe buffer and deadlock the child),
    /// the full text of each is stored, the exit code is stored, and only
    /// then is the pid returned. The exit code is never set before both
    /// streams have been fully drained.
    ///
    /// # Errors
    ///
    /// [`Error::Process`] if this runner has already started a process: a
    /// runner owns exactly one OS process for its lifetime and never
    /// restarts. [`Error::ProcessStart`] if the child could not be
    /// launched (the runner stays idle and may be retried), and in
    /// blocking mode [`Error::NonZeroExit`] if it exited with a non-zero
    /// code. On a non-zero exit the captured output remains available on
    /// the runner for diagnostics.
    pub async fn run(&mut self, blocking: bool) -> Result<u32> {
        if self.pid.is_some() {
            return Err(Error::Process("process already started".to_string()));
        }

        debug!("Process command: {}", self.command_line());

        let mut command = Command::new(&self.command);
        command.args(&self.arguments);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| Error::ProcessStart {
            command: self.command_line(),
            source: e,
        })?;

        let pid = child
            .id()
            .ok_or_else(|| Error::ProcessLookup("spawned child reported no pid".to_string()))?;
        self.pid = Some(pid);

        if !blocking {
            self.process = Some(child);
            return Ok(pid);
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Process("stdout not available".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Process("stderr not available".to_string()))?;

        // Both drains start before either is awaited, so neither stream can
        // starve the other.
        let stdout_rx = OutputHalf::new(stdout).capture();
        let stderr_rx = OutputHalf::new(stderr).capture();

        let captured_stdout = stdout_rx
            .await
            .map_err(|_| Error::Process("stdout capture task dropped".to_string()))??;
        let captured_stderr = stderr_rx
            .await
            .map_err(|_| Error::Process("stderr capture task dropped".to_string()))??;

        debug!("Process output: {}", captured_stdout);

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);

        self.captured_stdout = Some(captured_stdout);
        self.captured_stderr = Some(captured_stderr);
        self.exit_code = exit_code;
        self.process = Some(child);

        debug!("Exit code: {}", exit_code);

        if exit_code != 0 {
            return Err(Error::NonZeroExit {
                code: exit_code,
                stdout: self.captured_stdout.clone().unwrap_or_default(),
                stderr: self.captured_stderr.clone().unwrap_or_default(),
            });
        }

        Ok(pid)
    }

    /// Request termination of the owned process.
    ///
    /// On Windows-family systems this runs `taskkill /F /T` against the pid
    /// so the whole child tree goes down. On POSIX-family systems it sends
    /// SIGTERM first (graceful, the process may honor it), follows up with
    /// an unconditional `kill -9`, and finally issues the library-level kill
    /// to release any remaining OS handle.
    ///
    /// Returns `Ok(true)` once termination has been requested; the process
    /// is not guaranteed to have exited by then, so poll
    /// [`try_wait`](Self::try_wait) to observe the exit. Stopping an
    /// already-exited process is idempotent: "no such process" outcomes
    /// from the forceful kill are treated as success.
    ///
    /// # Errors
    ///
    /// [`Error::ProcessLookup`] if the process was never started, and
    /// [`Error::ProcessKill`] if a termination command itself failed.
    pub async fn stop(&mut self) -> Result<bool> {
        let pid = self
            .pid
            .ok_or_else(|| Error::ProcessLookup("process was never started".to_string()))?;

        debug!("Stopping process {}", pid);

        #[cfg(windows)]
        terminate::kill_process_tree(pid).await?;

        #[cfg(unix)]
        {
            terminate::signal_term(pid)?;
            terminate::force_kill(pid).await?;
            // Release any handle still held; fails on an already-reaped
            // child, which is fine.
            if let Some(child) = self.process.as_mut() {
                let _ = child.start_kill();
            }
        }

        Ok(true)
    }

    /// Wait for the process to exit and return its status.
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus> {
        match self.process.as_mut() {
            Some(child) => child
                .wait()
                .await
                .map_err(|e| Error::Process(format!("Failed to wait for process: {}", e))),
            None => Err(Error::Process("process not started".to_string())),
        }
    }

    /// Check if the process has exited without blocking.
    pub fn try_wait(&mut self) -> Result<Option<std::process::ExitStatus>> {
        match self.process.as_mut() {
            Some(child) => child
                .try_wait()
                .map_err(|e| Error::Process(format!("Failed to check process status: {}", e))),
            None => Err(Error::Process("process not started".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_runner_starts_unset() {
        let runner = ProcessRunner::new("echo", &["hello"]);
        assert_eq!(runner.exit_code(), -1);
        assert!(runner.output().is_none());
        assert!(runner.stderr().is_none());
        assert!(runner.id().is_none());
    }

    #[test]
    fn command_line_joins_with_single_spaces() {
        let runner = ProcessRunner::new("pact-mock-service", &["start", "--port", "1234"]);
        assert_eq!(runner.command_line(), "pact-mock-service start --port 1234");
    }

    #[test]
    fn command_line_without_arguments_is_bare_command() {
        let runner = ProcessRunner::new("pact-mock-service", &[]);
        assert_eq!(runner.command_line(), "pact-mock-service");
    }

    #[tokio::test]
    async fn run_nonexistent_command_fails_to_start() {
        let mut runner = ProcessRunner::new("nonexistent_command_12345", &[]);
        let err = runner.run(true).await.unwrap_err();
        match err {
            Error::ProcessStart { command, .. } => {
                assert_eq!(command, "nonexistent_command_12345");
            }
            e => panic!("expected ProcessStart error, got: {}", e),
        }
    }

    #[tokio::test]
    async fn stop_before_run_fails_lookup() {
        let mut runner = ProcessRunner::new("echo", &[]);
        let err = runner.stop().await.unwrap_err();
        assert!(matches!(err, Error::ProcessLookup(_)));
    }

    #[tokio::test]
    async fn try_wait_before_run_is_an_error() {
        let mut runner = ProcessRunner::new("echo", &[]);
        assert!(runner.try_wait().is_err());
    }
}
