//! Domain types for the feedback server.
//!
//! This crate contains pure data types shared between the analysis
//! pipeline and the RPC layer: no IO, no async, minimal dependencies.

use serde::{Deserialize, Serialize};

/// A 1-indexed source span: `(start_line, start_column, end_line, end_column)`.
///
/// The analysis engine reports 0-indexed positions; clients expect
/// 1-indexed ones. [`Span::from_zero_indexed`] is the single place that
/// conversion happens — the +1 offset on every component is an
/// externally visible compatibility contract and must not drift.
///
/// Ordering (`start_line <= end_line`, and column order on equal lines)
/// is whatever the engine produced; it is not re-validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 4]", from = "[u32; 4]")]
pub struct Span {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

impl Span {
    /// Convert an engine-reported 0-indexed position into the 1-indexed
    /// span exposed to clients. Adds exactly 1 to each component.
    #[must_use]
    pub fn from_zero_indexed(
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            start_line: start_line + 1,
            start_column: start_column + 1,
            end_line: end_line + 1,
            end_column: end_column + 1,
        }
    }

    #[must_use]
    pub fn start_line(self) -> u32 {
        self.start_line
    }

    #[must_use]
    pub fn start_column(self) -> u32 {
        self.start_column
    }

    #[must_use]
    pub fn end_line(self) -> u32 {
        self.end_line
    }

    #[must_use]
    pub fn end_column(self) -> u32 {
        self.end_column
    }

    /// The wire representation: `[start_line, start_column, end_line, end_column]`.
    #[must_use]
    pub fn as_array(self) -> [u32; 4] {
        [
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column,
        ]
    }
}

impl From<Span> for [u32; 4] {
    fn from(span: Span) -> Self {
        span.as_array()
    }
}

impl From<[u32; 4]> for Span {
    /// Values are taken as already 1-indexed (the wire form).
    fn from([start_line, start_column, end_line, end_column]: [u32; 4]) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// A single build-blocking diagnostic, normalized for clients.
///
/// Fields are private; construction goes through [`Diagnostic::new`] and
/// consumers read via accessors. Serializes directly into the wire shape
/// (`errorText`, `projectName`, `filePath`, `position`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message. Non-empty as produced by the engine.
    #[serde(rename = "errorText")]
    message: String,
    /// Owning project name; empty when unavailable.
    #[serde(rename = "projectName")]
    project_name: String,
    /// Source file path, or the project's own file path when the
    /// diagnostic has no associated source file.
    #[serde(rename = "filePath")]
    file_path: String,
    #[serde(rename = "position")]
    span: Span,
}

impl Diagnostic {
    #[must_use]
    pub fn new(message: String, project_name: String, file_path: String, span: Span) -> Self {
        Self {
            message,
            project_name,
            file_path,
            span,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}
