//! Analyzer facade — the request dispatcher's view of the pipeline.
//!
//! One call runs one request end to end: restore → session lookup →
//! (memoized) load → extract → aggregate. Failures are request-scoped;
//! nothing here retries and nothing here takes the process down.

use std::path::Path;

use feedback_types::Diagnostic;

use crate::engine::SolutionEngine;
use crate::error::AnalysisError;
use crate::extract::{self, BuildOutputFilter};
use crate::restore::Restorer;
use crate::workspace::WorkspaceManager;

/// The diagnostics-collection service, generic over the engine seam.
pub struct Analyzer<E> {
    engine: E,
    restorer: Restorer,
    workspaces: WorkspaceManager,
    filter: BuildOutputFilter,
}

impl<E: SolutionEngine> Analyzer<E> {
    #[must_use]
    pub fn new(engine: E, restorer: Restorer, filter: BuildOutputFilter) -> Self {
        Self {
            engine,
            restorer,
            workspaces: WorkspaceManager::new(),
            filter,
        }
    }

    /// Full-diagnostics mode: every build-blocking diagnostic in the
    /// solution, ordered by project then engine order.
    ///
    /// `refresh` discards the session's memoized solution before
    /// extracting, forcing a reload.
    pub async fn compile_errors(
        &self,
        solution_path: &Path,
        refresh: bool,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        self.restorer.run(solution_path).await?;
        let session = self.workspaces.session(solution_path).await;
        let errors = session
            .with_solution(&self.engine, refresh, |solution| {
                extract::compile_errors(solution, &self.filter)
            })
            .await?;
        tracing::info!(
            solution = %solution_path.display(),
            count = errors.len(),
            "collected compile errors"
        );
        Ok(errors)
    }

    /// Syntax-only mode: does any document in the solution fail to parse?
    pub async fn has_syntax_errors(&self, solution_path: &Path) -> Result<bool, AnalysisError> {
        self.restorer.run(solution_path).await?;
        let session = self.workspaces.session(solution_path).await;
        let found = session
            .with_solution(&self.engine, false, extract::has_syntax_errors)
            .await?;
        tracing::info!(
            solution = %solution_path.display(),
            has_syntax_errors = found,
            "checked syntax"
        );
        Ok(found)
    }
}
