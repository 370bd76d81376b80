//! Process runner for driving external service executables.
//!
//! This crate manages the lifecycle of a single child process: start it,
//! capture its stdout and stderr in full, retrieve its exit code, and
//! terminate it in a platform-appropriate way. It is the process layer a
//! contract-testing orchestrator builds on; what command and arguments to
//! run is the caller's business.
//!
//! # Features
//!
//! - **Async**: built on tokio; both output streams are drained concurrently
//!   so the child can never deadlock on a full pipe buffer
//! - **Blocking and non-blocking runs**: wait for exit with full output
//!   capture, or return as soon as the pid is known
//! - **Cross-platform stop**: `taskkill /F /T` on Windows, SIGTERM followed
//!   by `kill -9` on POSIX
//!
//! # Example
//!
//! ```rust,no_run
//! use pact_process_runner::ProcessRunner;
//!
//! #[tokio::main]
//! async fn main() -> pact_process_runner::Result<()> {
//!     let mut runner = ProcessRunner::new("echo", &["hello", "world"]);
//!     let pid = runner.run(true).await?;
//!     println!("process {} said: {}", pid, runner.output().unwrap_or(""));
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Error and result types
//! - [`runner`] - The process runner and its stream-drain internals

pub mod runner;
pub mod types;

// Re-export the public surface at the crate root for convenience
pub use runner::ProcessRunner;
pub use types::{Error, Result};
