//! The engine seam and the external compiler-host adapter.
//!
//! Parsing and semantic analysis are not reimplemented here. The
//! pipeline consumes them as an opaque capability: "given a solution
//! path, produce the loaded-solution model". [`HostEngine`] fulfils
//! that by running an external compiler host process and decoding the
//! model from its stdout.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::SolutionLoadError;
use crate::model::LoadedSolution;

/// The analysis engine's single capability.
///
/// Loading is slow (the engine parses and binds every project) and
/// must suspend only the calling task. Implementations return a `Send`
/// future so requests can run on any worker.
pub trait SolutionEngine: Send + Sync + 'static {
    /// Open and bind the solution at `path`.
    fn open_solution(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<LoadedSolution, SolutionLoadError>> + Send;
}

/// Production engine: an external compiler host invoked per load.
///
/// The configured command is run with the solution path appended as the
/// final argument; it must print the loaded-solution model as JSON on
/// stdout and exit zero.
pub struct HostEngine {
    command: PathBuf,
    args: Vec<String>,
}

impl HostEngine {
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl SolutionEngine for HostEngine {
    async fn open_solution(&self, path: &Path) -> Result<LoadedSolution, SolutionLoadError> {
        let resolved = which::which(&self.command).map_err(|e| {
            SolutionLoadError::new(format!("{}: {e}", self.command.display()))
        })?;

        tracing::debug!(
            host = %resolved.display(),
            solution = %path.display(),
            "loading solution via compiler host"
        );

        let output = Command::new(&resolved)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SolutionLoadError::new(format!("spawning compiler host: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SolutionLoadError::new(format!(
                "compiler host exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| SolutionLoadError::new(format!("decoding compiler host output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// `cat <solution>` makes the fixture file itself play the part of
    /// the compiler host output.
    fn fixture(json: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.to_string().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn decodes_host_output_into_model() {
        let file = fixture(&serde_json::json!({
            "projects": [{ "name": "App" }]
        }));
        let engine = HostEngine::new("cat", vec![]);
        let solution = engine.open_solution(file.path()).await.unwrap();
        assert_eq!(solution.projects.len(), 1);
        assert_eq!(solution.projects[0].name, "App");
    }

    #[tokio::test]
    async fn nonzero_host_exit_is_a_load_failure() {
        let engine = HostEngine::new("false", vec![]);
        let err = engine
            .open_solution(Path::new("/sln/app.sln"))
            .await
            .unwrap_err();
        assert!(err.message().contains("compiler host exited"));
    }

    #[tokio::test]
    async fn host_stderr_is_surfaced_on_failure() {
        let engine = HostEngine::new(
            "sh",
            vec!["-c".to_string(), "echo no such solution >&2; exit 2".to_string()],
        );
        let err = engine
            .open_solution(Path::new("/sln/app.sln"))
            .await
            .unwrap_err();
        assert!(err.message().contains("no such solution"));
    }

    #[tokio::test]
    async fn unparseable_host_output_is_a_load_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"MSBuild version 17.8").unwrap();
        let engine = HostEngine::new("cat", vec![]);
        let err = engine.open_solution(file.path()).await.unwrap_err();
        assert!(err.message().contains("decoding compiler host output"));
    }

    #[tokio::test]
    async fn missing_host_command_is_a_load_failure() {
        let engine = HostEngine::new("feedback-host-that-does-not-exist", vec![]);
        assert!(engine.open_solution(Path::new("/sln/app.sln")).await.is_err());
    }
}
