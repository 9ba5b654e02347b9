//! Diagnostic extraction, filtering, and aggregation.
//!
//! Walks a loaded solution project by project, keeps build-blocking
//! diagnostics, drops generated-output noise, normalizes positions,
//! and concatenates per-project lists in project order. No re-sorting
//! and no deduplication: two projects that legitimately share a file
//! (multi-targeting) report the same diagnostic twice.

use std::path::{Component, Path};

use feedback_types::{Diagnostic, Span};

use crate::model::LoadedSolution;

/// Filter for diagnostics that live under an intermediate-build-output
/// directory (MSBuild's `obj/` by default). Matches whole path
/// components, so `obj/Debug/Gen.cs` is excluded while `objects.cs`
/// is not.
#[derive(Debug, Clone)]
pub struct BuildOutputFilter {
    segments: Vec<String>,
}

impl Default for BuildOutputFilter {
    fn default() -> Self {
        Self::new(vec!["obj".to_string()])
    }
}

impl BuildOutputFilter {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn excludes(&self, path: &Path) -> bool {
        path.components().any(|component| {
            matches!(
                component,
                Component::Normal(name) if self.segments.iter().any(|seg| name == seg.as_str())
            )
        })
    }
}

/// Collect the solution's build-blocking diagnostics, in project order,
/// engine order within each project.
///
/// A project without a compiled representation is skipped — even the
/// first one. One project's compile failure must not erase valid
/// diagnostics found in its siblings.
pub fn compile_errors(solution: &LoadedSolution, filter: &BuildOutputFilter) -> Vec<Diagnostic> {
    let mut all = Vec::new();

    for project in &solution.projects {
        let Some(compilation) = &project.compilation else {
            tracing::debug!(project = %project.name, "compilation unavailable, skipping project");
            continue;
        };

        let mut kept = 0usize;
        for raw in &compilation.diagnostics {
            if !raw.is_build_blocking() {
                continue;
            }
            if let Some(path) = &raw.file_path
                && filter.excludes(path)
            {
                continue;
            }

            let file_path = raw
                .file_path
                .as_deref()
                .or(project.file_path.as_deref())
                .map(|p| p.display().to_string())
                .unwrap_or_default();

            all.push(Diagnostic::new(
                raw.message.clone(),
                project.name.clone(),
                file_path,
                Span::from_zero_indexed(
                    raw.start.line,
                    raw.start.column,
                    raw.end.line,
                    raw.end.column,
                ),
            ));
            kept += 1;
        }
        tracing::debug!(project = %project.name, kept, "extracted project diagnostics");
    }

    all
}

/// Whether any document in any project failed to parse cleanly.
/// Short-circuits on the first document with a syntax diagnostic.
#[must_use]
pub fn has_syntax_errors(solution: &LoadedSolution) -> bool {
    solution
        .projects
        .iter()
        .flat_map(|project| &project.documents)
        .any(|document| !document.syntax_diagnostics.is_empty())
}
