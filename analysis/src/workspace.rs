//! Session registry — the lifecycle home of loaded solutions.
//!
//! One [`Session`] per solution path, created on first request and kept
//! until process shutdown. Loading is expensive, so it is memoized per
//! session; a session's load and extraction run inside one critical
//! section guarded by the session's own lock. Requests against
//! different paths never contend on each other.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::engine::SolutionEngine;
use crate::error::AnalysisError;
use crate::model::LoadedSolution;

/// Registry of sessions keyed by solution path.
pub struct WorkspaceManager {
    sessions: Mutex<HashMap<PathBuf, Arc<Session>>>,
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up or create the session for `path`.
    ///
    /// The registry lock covers only the map access; the returned
    /// session carries its own lock for the slow work.
    pub async fn session(&self, path: &Path) -> Arc<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Session::new(path)))
            .clone()
    }
}

/// The loaded-solution state for one solution path.
pub struct Session {
    path: PathBuf,
    state: Mutex<Option<LoadedSolution>>,
}

impl Session {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the loaded solution, loading it first if this
    /// session has none (or if `refresh` discards the memoized one).
    ///
    /// The session lock is held across load *and* `f`: exactly one load
    /// may be in flight per session, and extraction never interleaves
    /// with a reload. `f` is pure CPU work over the model, so holding
    /// the lock through it keeps the discipline simple.
    pub async fn with_solution<E, T>(
        &self,
        engine: &E,
        refresh: bool,
        f: impl FnOnce(&LoadedSolution) -> T,
    ) -> Result<T, AnalysisError>
    where
        E: SolutionEngine,
    {
        let mut state = self.state.lock().await;
        if refresh {
            state.take();
        }
        let solution = match &mut *state {
            Some(solution) => solution,
            empty @ None => {
                let loaded = engine.open_solution(&self.path).await?;
                log_load_diagnostics(&self.path, &loaded);
                empty.insert(loaded)
            }
        };
        Ok(f(solution))
    }
}

/// Load-time diagnostics describe workspace integrity, not code
/// quality; they go to the log, never into results.
fn log_load_diagnostics(path: &Path, solution: &LoadedSolution) {
    if solution.diagnostics.is_empty() {
        return;
    }
    tracing::warn!(
        solution = %path.display(),
        count = solution.diagnostics.len(),
        "diagnostics while loading the solution"
    );
    for diag in &solution.diagnostics {
        tracing::warn!(kind = %diag.kind, "  {}", diag.message);
    }
}
