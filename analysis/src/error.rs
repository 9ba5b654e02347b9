//! Request-scoped pipeline errors.
//!
//! All variants terminate only the current request; the server process
//! keeps running. Nothing here is retried automatically.

use thiserror::Error;

/// The engine failed to open or parse a solution.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SolutionLoadError {
    message: String,
}

impl SolutionLoadError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure of one analysis request.
///
/// A project that cannot produce a compilation is deliberately *not*
/// represented here — that case is skipped per project and logged, it
/// never aborts the request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The external restore command exited non-zero (or could not run).
    /// The pipeline aborts before any load is attempted.
    #[error("dependency restore failed (exit code {code:?})")]
    RestoreFailed {
        /// Exit code when the process ran; `None` when it was killed by
        /// a signal or never started.
        code: Option<i32>,
        /// Captured stdout + stderr of the restore command.
        output: String,
    },

    /// The workspace failed to open the solution file.
    #[error("failed to load solution: {0}")]
    SolutionLoadFailed(#[from] SolutionLoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_failed_display_includes_exit_code() {
        let err = AnalysisError::RestoreFailed {
            code: Some(3),
            output: "error NU1101".to_string(),
        };
        assert!(err.to_string().contains("Some(3)"));
    }

    #[test]
    fn load_error_converts_into_analysis_error() {
        let err: AnalysisError = SolutionLoadError::new("missing.sln not found").into();
        assert!(matches!(err, AnalysisError::SolutionLoadFailed(_)));
        assert!(err.to_string().contains("missing.sln not found"));
    }
}
