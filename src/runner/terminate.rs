//! Platform-specific process termination commands.
//!
//! Windows-family systems get `taskkill /F /T` so the whole child tree goes
//! down with the process. POSIX-family systems get a SIGTERM first (which
//! the process may honor and exit cleanly) followed by an unconditional
//! `kill -9`. Both forceful paths treat a pid that no longer exists as
//! success, so a second stop on a dead process is idempotent rather than an
//! error.

use crate::types::{Error, Result};

/// Build the Windows force-kill invocation for a pid.
///
/// Kept platform-independent so the command construction is testable
/// everywhere, not just on the platform that can execute it.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn taskkill_command(pid: u32) -> (&'static str, Vec<String>) {
    (
        "taskkill",
        vec![
            "/F".to_string(),
            "/T".to_string(),
            "/PID".to_string(),
            pid.to_string(),
        ],
    )
}

/// Build the POSIX force-kill invocation for a pid.
#[cfg_attr(not(unix), allow(dead_code))]
pub(crate) fn force_kill_command(pid: u32) -> (&'static str, Vec<String>) {
    ("kill", vec!["-9".to_string(), pid.to_string()])
}

/// Send SIGTERM to the process for graceful termination.
///
/// ESRCH (no such process) means the process already exited and is treated
/// as success. EPERM can show up for the same reason once the pid has been
/// recycled, so it is tolerated too.
#[cfg(unix)]
pub(crate) fn signal_term(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    tracing::debug!("Sending SIGTERM to process {}", pid);
    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) | Err(nix::errno::Errno::EPERM) => Ok(()),
        Err(e) => Err(Error::ProcessKill {
            pid,
            diagnostic: format!("SIGTERM failed: {}", e),
        }),
    }
}

/// Run `kill -9 <pid>` and inspect its error stream.
///
/// Any stderr output other than a "no such process" diagnostic fails with
/// [`Error::ProcessKill`].
#[cfg(unix)]
pub(crate) async fn force_kill(pid: u32) -> Result<()> {
    let (program, args) = force_kill_command(pid);
    tracing::debug!("Running {} {}", program, args.join(" "));

    let output = tokio::process::Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::ProcessKill {
            pid,
            diagnostic: format!("failed to invoke {}: {}", program, e),
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() || process_already_gone(&stderr) {
        Ok(())
    } else {
        Err(Error::ProcessKill {
            pid,
            diagnostic: stderr.trim().to_string(),
        })
    }
}

/// Run `taskkill /F /T /PID <pid>` and inspect its exit status.
///
/// taskkill exits 128 when the pid no longer exists; that is treated as
/// success. Any other failure carries taskkill's own diagnostic output.
#[cfg(windows)]
pub(crate) async fn kill_process_tree(pid: u32) -> Result<()> {
    let (program, args) = taskkill_command(pid);
    tracing::debug!("Running {} {}", program, args.join(" "));

    let output = tokio::process::Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::ProcessKill {
            pid,
            diagnostic: format!("failed to invoke {}: {}", program, e),
        })?;

    if output.status.success() {
        return Ok(());
    }

    let diagnostic = format!(
        "{} {}",
        String::from_utf8_lossy(&output.stdout).trim(),
        String::from_utf8_lossy(&output.stderr).trim()
    );
    if output.status.code() == Some(128) || process_already_gone(&diagnostic) {
        return Ok(());
    }

    Err(Error::ProcessKill {
        pid,
        diagnostic: diagnostic.trim().to_string(),
    })
}

/// Whether a kill command's diagnostic text says the pid was already gone.
fn process_already_gone(diagnostic: &str) -> bool {
    let lowered = diagnostic.to_lowercase();
    lowered.contains("no such process") || lowered.contains("not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taskkill_forces_whole_tree() {
        let (program, args) = taskkill_command(4321);
        assert_eq!(program, "taskkill");
        assert_eq!(args, vec!["/F", "/T", "/PID", "4321"]);
    }

    #[test]
    fn force_kill_uses_sigkill() {
        let (program, args) = force_kill_command(4321);
        assert_eq!(program, "kill");
        assert_eq!(args, vec!["-9", "4321"]);
    }

    #[test]
    fn gone_pid_diagnostics_are_recognized() {
        assert!(process_already_gone("kill: (99999): No such process"));
        assert!(process_already_gone(
            "ERROR: The process \"99999\" not found."
        ));
        assert!(!process_already_gone("Operation not permitted"));
    }

    #[cfg(unix)]
    #[test]
    fn sigterm_to_dead_pid_is_a_noop() {
        // Very unlikely to be a live pid; ESRCH must be tolerated.
        assert!(signal_term(999_999).is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn force_kill_dead_pid_is_idempotent() {
        assert!(force_kill(999_999).await.is_ok());
    }
}
