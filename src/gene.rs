//! Gene types for NEAT genomes.
//!
//! This module defines the heritable building blocks of a genome:
//! - [`Innovation`]: the historical marking shared by every gene kind
//! - [`NodeGene`]: a neuron, classified by its horizontal position
//! - [`ConnectionGene`]: a directed, weighted edge between two nodes
//!
//! Genes are plain values. Connections refer to their endpoints by node
//! innovation, so a genome's node set acts as the arena those handles index.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Historical marking of a structural gene.
///
/// Assigned once by the registry and never reused within a run. Nodes and
/// connections draw from independent counters, both starting at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Innovation(pub u64);

impl Innovation {
    /// Raw innovation number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Innovation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Common view over node and connection genes used by [`GeneSet`](crate::GeneSet).
pub trait Gene {
    /// Key used for set membership.
    type Key: Copy + Eq + Hash + fmt::Debug;

    /// The membership key of this gene.
    fn key(&self) -> Self::Key;

    /// The historical marking used for sorted insertion and alignment.
    fn innovation(&self) -> Innovation;
}

/// The role of a node, derived from its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// `x <= 0`: receives external values.
    Input,
    /// `0 < x < 1`: added through mutation.
    Hidden,
    /// `x >= 1`: produces network output.
    Output,
}

impl NodeRole {
    /// Classify a horizontal position.
    #[must_use]
    pub fn from_x(x: f32) -> Self {
        if x <= 0.0 {
            Self::Input
        } else if x >= 1.0 {
            Self::Output
        } else {
            Self::Hidden
        }
    }
}

/// A node gene representing a neuron.
///
/// Two nodes are the same gene iff their innovation numbers match; the
/// coordinates are layout data and take no part in equality or ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeGene {
    /// Innovation number minted by the registry.
    pub innovation: Innovation,
    /// Horizontal position: 0 for inputs, 1 for outputs, in between for hidden nodes.
    pub x: f32,
    /// Vertical layout coordinate.
    pub y: f32,
}

impl NodeGene {
    /// Create a node at the given coordinates.
    #[must_use]
    pub const fn new(innovation: Innovation, x: f32, y: f32) -> Self {
        Self { innovation, x, y }
    }

    /// The role this node plays, derived from `x`.
    #[must_use]
    pub fn role(&self) -> NodeRole {
        NodeRole::from_x(self.x)
    }
}

impl PartialEq for NodeGene {
    fn eq(&self, other: &Self) -> bool {
        self.innovation == other.innovation
    }
}

impl Eq for NodeGene {}

impl Hash for NodeGene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.innovation.hash(state);
    }
}

impl PartialOrd for NodeGene {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeGene {
    fn cmp(&self, other: &Self) -> Ordering {
        self.innovation.cmp(&other.innovation)
    }
}

impl Gene for NodeGene {
    type Key = Innovation;

    #[inline]
    fn key(&self) -> Innovation {
        self.innovation
    }

    #[inline]
    fn innovation(&self) -> Innovation {
        self.innovation
    }
}

/// Structural identity of a connection: its ordered endpoints.
///
/// `(a, b)` and `(b, a)` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionKey {
    /// Innovation of the source node.
    pub from: Innovation,
    /// Innovation of the target node.
    pub to: Innovation,
}

impl ConnectionKey {
    /// Key for the edge `from -> to`.
    #[must_use]
    pub const fn new(from: Innovation, to: Innovation) -> Self {
        Self { from, to }
    }
}

/// A connection gene representing a weighted link between two nodes.
///
/// `PartialEq` compares the full value. Deduplication goes through
/// [`ConnectionGene::key`], which only looks at the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    /// Innovation number shared by every genome holding this edge.
    pub innovation: Innovation,
    /// Source node innovation.
    pub from: Innovation,
    /// Target node innovation.
    pub to: Innovation,
    /// The connection weight.
    pub weight: f32,
    /// Whether this connection is active.
    /// Disabled connections are skipped during evaluation but preserved for crossover.
    pub enabled: bool,
}

impl ConnectionGene {
    /// Create an enabled connection with zero weight.
    #[must_use]
    pub const fn new(innovation: Innovation, from: Innovation, to: Innovation) -> Self {
        Self {
            innovation,
            from,
            to,
            weight: 0.0,
            enabled: true,
        }
    }

    /// Set the weight, builder style.
    #[must_use]
    pub const fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Structural identity of this edge.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> ConnectionKey {
        ConnectionKey::new(self.from, self.to)
    }
}

impl Gene for ConnectionGene {
    type Key = ConnectionKey;

    #[inline]
    fn key(&self) -> ConnectionKey {
        ConnectionGene::key(self)
    }

    #[inline]
    fn innovation(&self) -> Innovation {
        self.innovation
    }
}
