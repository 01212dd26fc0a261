//! Error type shared by the registry, genome and evaluator.

use thiserror::Error;

/// Errors raised by NEAT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NeatError {
    /// A genome without connection genes was passed to an alignment operation
    /// (`distance` or `crossover`).
    #[error("genome has no connection genes")]
    EmptyGenome,

    /// A node was requested by a position the registry never minted.
    #[error("node {id} does not exist (registry holds {available} nodes)")]
    UnknownNode {
        /// The requested 1-based position.
        id: usize,
        /// Number of nodes the registry has minted.
        available: usize,
    },

    /// Two genomes from different evolutionary runs were combined.
    ///
    /// Their innovation numbers come from unrelated registries and cannot be aligned.
    #[error("genomes belong to different innovation registries")]
    RegistryMismatch,

    /// The genome contains a cycle in its enabled connections.
    #[error("genome contains cycles; feedforward evaluation requires an acyclic graph")]
    CyclicGenome,

    /// The evaluator was fed the wrong number of inputs.
    #[error("input length mismatch: expected {expected}, got {got}")]
    InputLengthMismatch {
        /// Number of input nodes in the network.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}

/// Result alias for NEAT operations.
pub type Result<T> = std::result::Result<T, NeatError>;
