//! Error types for process launch, capture, and termination.

/// Errors surfaced by [`ProcessRunner`](crate::ProcessRunner).
///
/// Every failure carries enough context (exit code, captured output, or the
/// termination command's diagnostic text) for the caller to log or surface
/// it meaningfully. Nothing is retried or suppressed internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The child process could not be launched.
    #[error("failed to start process `{command}`: {source}")]
    ProcessStart {
        /// The command line that failed to launch.
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A blocking run completed, but the child exited with a non-zero code.
    ///
    /// The captured stdout/stderr are also left on the runner itself.
    #[error("process exited with non-zero exit code {code}")]
    NonZeroExit {
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The process identifier could not be resolved (e.g. `stop` before the
    /// process was ever started).
    #[error("could not resolve process id: {0}")]
    ProcessLookup(String),

    /// A platform termination command failed.
    #[error("unable to kill process {pid}: {diagnostic}")]
    ProcessKill { pid: u32, diagnostic: String },

    /// An I/O error while draining an output stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal process-management invariant violated.
    #[error("process error: {0}")]
    Process(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
