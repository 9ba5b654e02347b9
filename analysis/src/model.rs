//! Serde model of a loaded solution, as reported by the compiler host.
//!
//! This is the JSON contract between the service and the external
//! analysis engine: a solution is a list of projects, each with an
//! optional compiled representation and its documents. Positions are
//! 0-indexed here; conversion to the client-facing 1-indexed form
//! happens in extraction via `Span::from_zero_indexed`.

use std::path::PathBuf;

use serde::Deserialize;

/// An in-memory solution as produced by one engine load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadedSolution {
    /// Diagnostics emitted by the loading step itself (malformed project
    /// references and the like). Logged, never returned to clients.
    #[serde(default)]
    pub diagnostics: Vec<LoadDiagnostic>,
    /// Projects in the order the engine exposes them; that order is
    /// stable for a given load and drives result ordering.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A workspace-integrity diagnostic from the loading step.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadDiagnostic {
    #[serde(default)]
    pub kind: String,
    pub message: String,
}

/// One compilable unit within the solution.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub name: String,
    /// Path of the project file itself; the fallback location for
    /// diagnostics with no associated source file.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    /// Absent for projects that cannot produce a compiled
    /// representation (non-code projects, broken references).
    #[serde(default)]
    pub compilation: Option<Compilation>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// A project's compiled representation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Compilation {
    /// Engine-ordered diagnostics; that order is preserved in results.
    #[serde(default)]
    pub diagnostics: Vec<RawDiagnostic>,
}

/// A source document and its parse-level diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_path: PathBuf,
    #[serde(default)]
    pub syntax_diagnostics: Vec<RawDiagnostic>,
}

/// A diagnostic exactly as the engine reports it: raw severity,
/// elevation flag, optional source file, 0-indexed positions.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDiagnostic {
    pub message: String,
    pub severity: Severity,
    /// "Warning treated as error" - build-blocking despite base severity.
    #[serde(default)]
    pub warning_as_error: bool,
    /// Absent for diagnostics without a source location (e.g. missing
    /// assembly references).
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    pub start: RawPosition,
    pub end: RawPosition,
}

impl RawDiagnostic {
    /// Whether this diagnostic blocks the build: severity `Error`, or a
    /// warning explicitly elevated to error. Plain warnings, info, and
    /// hidden diagnostics are excluded from results.
    #[must_use]
    pub fn is_build_blocking(&self) -> bool {
        self.severity == Severity::Error || self.warning_as_error
    }
}

/// Engine-reported severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// A 0-indexed line/column position as the engine reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct RawPosition {
    pub line: u32,
    pub column: u32,
}
