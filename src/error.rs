//! Error taxonomy for the evolutionary engine.
//!
//! Configuration problems are rejected before any generation runs.
//! Structural violations indicate a collaborator bug and abort the run
//! rather than silently repairing chromosome structure.

use crate::chromosome::ObjectKind;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EvoError>;

/// All failures the engine can produce.
#[derive(Debug, Error)]
pub enum EvoError {
    /// Invalid numeric parameter: zero sizes, percentages outside 0–100,
    /// tournament size exceeding population, etc.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A chromosome's node chain is broken: cycle, empty sequence, or
    /// inconsistent links. Always a collaborator bug; the run aborts.
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// A variation or evaluation collaborator cannot handle a node's
    /// object kind.
    #[error("object kind {kind:?} not supported by {operation}")]
    UnsupportedObjectKind {
        kind: ObjectKind,
        operation: &'static str,
    },

    /// The chromosome's fitness is stale or was never computed.
    ///
    /// Recoverable: call the evaluator first. Never surfaced to the
    /// runner's caller.
    #[error("chromosome has not been evaluated")]
    NotEvaluated,

    /// The external fitness evaluator failed.
    #[error("fitness evaluation failed: {0}")]
    Evaluation(String),

    /// Writing rendered output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
