//! Errors surfaced by the match lifecycle.

use crate::module::{LoadPhase, ModuleError};

/// Errors that can occur while building or driving a match.
///
/// A failed lookup is not an error: typed queries return `Option` instead.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A module's load step failed. Loading stopped at this module and the
    /// match must be discarded.
    #[error("Module {module} failed to load in {phase} phase: {source}")]
    ModuleLoad {
        module: String,
        phase: LoadPhase,
        #[source]
        source: ModuleError,
    },
    /// The match's modules were already allocated from its manifest
    #[error("Match modules have already been allocated")]
    AlreadyAllocated,
    /// A manifest returned the same module instance more than once
    #[error("Module {0} appears more than once in the manifest")]
    DuplicateModule(String),
    /// A manifest named a module with no registered constructor
    #[error("Unknown module: {0}")]
    UnknownModule(String),
}
