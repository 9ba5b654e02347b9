//! Diagnostic collection pipeline for the feedback server.
//!
//! Given a solution path, the pipeline runs strictly in sequence:
//! restore external dependencies, load the solution through the
//! analysis engine, extract and filter compile/syntax diagnostics,
//! normalize positions, and aggregate per-project results.
//!
//! The compiler engine itself is an external collaborator behind the
//! [`SolutionEngine`] seam; [`HostEngine`] is the production adapter
//! that shells out to a compiler host process.

pub mod engine;
pub mod model;

mod error;
mod extract;
mod restore;
mod service;
mod workspace;

pub use engine::{HostEngine, SolutionEngine};
pub use error::{AnalysisError, SolutionLoadError};
pub use extract::BuildOutputFilter;
pub use restore::Restorer;
pub use service::Analyzer;
pub use workspace::{Session, WorkspaceManager};
