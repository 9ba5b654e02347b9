//! External dependency restore.
//!
//! Runs the configured restore command (`dotnet restore <solution>` by
//! default) with output captured and no interactive shell, and checks
//! the exit code. A non-zero exit aborts the request before any load —
//! proceeding would produce misleading "no diagnostics" results from an
//! incomplete dependency set.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::AnalysisError;

/// Invoker for the external restore command.
pub struct Restorer {
    command: PathBuf,
    args: Vec<String>,
}

impl Default for Restorer {
    fn default() -> Self {
        Self::new("dotnet", vec!["restore".to_string()])
    }
}

impl Restorer {
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Restore dependencies for the solution at `solution_path`,
    /// blocking the calling task until the process exits.
    ///
    /// The child is not killed if the request is cancelled: a restore
    /// that stops halfway leaves the package cache half-populated.
    pub async fn run(&self, solution_path: &Path) -> Result<(), AnalysisError> {
        let resolved =
            which::which(&self.command).map_err(|e| AnalysisError::RestoreFailed {
                code: None,
                output: format!("{}: {e}", self.command.display()),
            })?;

        let output = Command::new(&resolved)
            .args(&self.args)
            .arg(solution_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AnalysisError::RestoreFailed {
                code: None,
                output: format!("spawning restore command: {e}"),
            })?;

        if output.status.success() {
            tracing::debug!(solution = %solution_path.display(), "restore completed");
            return Ok(());
        }

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !captured.is_empty() {
                captured.push('\n');
            }
            captured.push_str(stderr.trim_end());
        }

        tracing::warn!(
            solution = %solution_path.display(),
            code = ?output.status.code(),
            "restore failed"
        );
        Err(AnalysisError::RestoreFailed {
            code: output.status.code(),
            output: captured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_exit_is_success() {
        let restorer = Restorer::new("true", vec![]);
        assert!(restorer.run(Path::new("/sln/app.sln")).await.is_ok());
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_code_and_output() {
        // The solution path lands in $0 of `sh -c`, leaving the script as-is.
        let restorer = Restorer::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo restoring; echo error NU1101 >&2; exit 3".to_string(),
            ],
        );
        let err = restorer.run(Path::new("/sln/app.sln")).await.unwrap_err();
        match err {
            AnalysisError::RestoreFailed { code, output } => {
                assert_eq!(code, Some(3));
                assert!(output.contains("restoring"));
                assert!(output.contains("error NU1101"));
            }
            other => panic!("expected RestoreFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_command_is_a_restore_failure() {
        let restorer = Restorer::new("restore-command-that-does-not-exist", vec![]);
        let err = restorer.run(Path::new("/sln/app.sln")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::RestoreFailed { code: None, .. }));
    }
}
