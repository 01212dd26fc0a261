//! Innovation tracking for NEAT.
//!
//! One [`Neat`] registry lives for the duration of an evolutionary run and is
//! the single authority for historical markings. Every genome holds a handle
//! to it. When two genomes independently create the edge `(from, to)`, the
//! registry hands both the same innovation number, so crossover and distance
//! later treat the two genes as homologous instead of disjoint.
//!
//! Nodes and connections are numbered by separate append-only counters:
//!
//! - **Nodes**: `innovation = nodes minted so far + 1`
//! - **Connections**: `innovation = distinct edges registered so far + 1`
//!
//! Minting goes through a mutex so genomes mutated from different threads can
//! never register one edge under two numbers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::activation::Activation;
use crate::error::{NeatError, Result};
use crate::gene::{ConnectionGene, ConnectionKey, Innovation, NodeGene, NodeRole};
use crate::gene_set::GeneSet;
use crate::genome::Genome;

/// Tunable coefficients for distance and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    /// Coefficient for excess genes in compatibility distance.
    pub c1: f32,
    /// Coefficient for disjoint genes in compatibility distance.
    pub c2: f32,
    /// Coefficient for the average weight difference of matching genes.
    pub c3: f32,
    /// Genomes with fewer connection genes than this are not normalized by size.
    pub small_genome_threshold: usize,
    /// Half-width of the uniform perturbation applied by weight-shift.
    pub weight_shift_strength: f32,
    /// Range for new and replaced weights: `[-weight_random_strength, weight_random_strength]`.
    pub weight_random_strength: f32,
    /// Probability of the add-link operator firing per `mutate` call.
    pub mutate_link_chance: f32,
    /// Probability of the add-node operator firing per `mutate` call.
    pub mutate_node_chance: f32,
    /// Probability of the weight-shift operator firing per `mutate` call.
    pub mutate_weight_shift_chance: f32,
    /// Probability of the weight-random operator firing per `mutate` call.
    pub mutate_weight_random_chance: f32,
    /// Probability of the link-toggle operator firing per `mutate` call.
    pub mutate_link_toggle_chance: f32,
    /// Node pairs add-link samples before giving up.
    pub link_attempts: usize,
    /// Whether splitting a connection that was already split elsewhere in the
    /// population reuses that hidden node's innovation.
    pub reuse_split_nodes: bool,
    /// Activation applied to hidden and output nodes during evaluation.
    pub activation: Activation,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            c1: 1.0,
            c2: 1.0,
            c3: 0.4,
            small_genome_threshold: 20,
            weight_shift_strength: 0.2,
            weight_random_strength: 1.0,
            mutate_link_chance: 0.2,
            mutate_node_chance: 0.1,
            mutate_weight_shift_chance: 0.6,
            mutate_weight_random_chance: 0.3,
            mutate_link_toggle_chance: 0.3,
            link_attempts: 32,
            reuse_split_nodes: true,
            activation: Activation::Tanh,
        }
    }
}

/// Mutable registry state behind the [`Neat`] handle.
#[derive(Debug, Default)]
struct InnovationRegistry {
    input_size: usize,
    output_size: usize,
    population_size: usize,
    /// Positional input nodes; replaced by `calculate`.
    input_nodes: Vec<NodeGene>,
    /// Hidden nodes of the last calculated genome.
    hidden_nodes: Vec<NodeGene>,
    /// Positional output nodes; replaced by `calculate`.
    output_nodes: Vec<NodeGene>,
    /// Every node ever minted, indexed by `innovation - 1`.
    all_nodes: Vec<NodeGene>,
    /// Every edge ever registered, keyed by its endpoints.
    all_connections: HashMap<ConnectionKey, ConnectionGene>,
    /// Connection innovation -> hidden node created by splitting it.
    split_nodes: HashMap<Innovation, Innovation>,
}

impl InnovationRegistry {
    fn reset(&mut self, input_size: usize, output_size: usize, population_size: usize) {
        *self = Self {
            input_size,
            output_size,
            population_size,
            ..Self::default()
        };

        for i in 0..input_size {
            let y = (i + 1) as f32 / (input_size + 1) as f32;
            let node = self.add_node_at(0.0, y);
            self.input_nodes.push(node);
        }
        for i in 0..output_size {
            let y = (i + 1) as f32 / (output_size + 1) as f32;
            let node = self.add_node_at(1.0, y);
            self.output_nodes.push(node);
        }

        debug!(input_size, output_size, population_size, "registry reset");
    }

    fn add_node_at(&mut self, x: f32, y: f32) -> NodeGene {
        let node = NodeGene::new(Innovation(self.all_nodes.len() as u64 + 1), x, y);
        self.all_nodes.push(node);
        node
    }

    fn get_node(&self, id: usize) -> Result<NodeGene> {
        id.checked_sub(1)
            .and_then(|pos| self.all_nodes.get(pos))
            .copied()
            .ok_or(NeatError::UnknownNode {
                id,
                available: self.all_nodes.len(),
            })
    }

    fn node(&self, innovation: Innovation) -> Option<NodeGene> {
        let pos = usize::try_from(innovation.get()).ok()?.checked_sub(1)?;
        self.all_nodes.get(pos).copied()
    }

    fn add_connection(&mut self, from: Innovation, to: Innovation) -> ConnectionGene {
        let key = ConnectionKey::new(from, to);
        if let Some(existing) = self.all_connections.get(&key) {
            trace!(%from, %to, innovation = %existing.innovation, "reusing connection innovation");
            return ConnectionGene::new(existing.innovation, from, to);
        }

        let innovation = Innovation(self.all_connections.len() as u64 + 1);
        let connection = ConnectionGene::new(innovation, from, to);
        self.all_connections.insert(key, connection);
        debug!(%from, %to, %innovation, "new connection innovation");
        connection
    }

    fn split_node(
        &mut self,
        connection: &ConnectionGene,
        from: &NodeGene,
        to: &NodeGene,
        genome_nodes: &GeneSet<NodeGene>,
        reuse: bool,
    ) -> NodeGene {
        if reuse {
            let previous = self
                .split_nodes
                .get(&connection.innovation)
                .filter(|node| !genome_nodes.contains(node))
                .and_then(|&node| self.node(node));
            if let Some(node) = previous {
                trace!(connection = %connection.innovation, node = %node.innovation, "reusing split node");
                return node;
            }
        }

        let node = self.add_node_at((from.x + to.x) * 0.5, (from.y + to.y) * 0.5);
        if reuse {
            self.split_nodes
                .entry(connection.innovation)
                .or_insert(node.innovation);
        }
        node
    }

    fn calculate(&mut self, nodes: &GeneSet<NodeGene>) {
        self.input_nodes.clear();
        self.hidden_nodes.clear();
        self.output_nodes.clear();

        for node in nodes {
            match node.role() {
                NodeRole::Input => self.input_nodes.push(*node),
                NodeRole::Hidden => self.hidden_nodes.push(*node),
                NodeRole::Output => self.output_nodes.push(*node),
            }
        }
    }
}

struct Shared {
    config: NeatConfig,
    registry: Mutex<InnovationRegistry>,
}

/// Shared handle to the innovation registry of one evolutionary run.
///
/// Cloning is cheap and yields another handle to the same registry; genomes
/// never hold a copy of the registry itself.
#[derive(Clone)]
pub struct Neat {
    shared: Arc<Shared>,
}

impl fmt::Debug for Neat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.lock();
        f.debug_struct("Neat")
            .field("input_size", &registry.input_size)
            .field("output_size", &registry.output_size)
            .field("nodes", &registry.all_nodes.len())
            .field("connections", &registry.all_connections.len())
            .finish_non_exhaustive()
    }
}

impl Neat {
    /// Create a registry with the default configuration.
    #[must_use]
    pub fn new(input_size: usize, output_size: usize, population_size: usize) -> Self {
        Self::with_config(
            input_size,
            output_size,
            population_size,
            NeatConfig::default(),
        )
    }

    /// Create a registry with an explicit configuration.
    #[must_use]
    pub fn with_config(
        input_size: usize,
        output_size: usize,
        population_size: usize,
        config: NeatConfig,
    ) -> Self {
        let neat = Self {
            shared: Arc::new(Shared {
                config,
                registry: Mutex::new(InnovationRegistry::default()),
            }),
        };
        neat.reset(input_size, output_size, population_size);
        neat
    }

    /// Clear all history and reseed the input and output nodes.
    ///
    /// Inputs are minted first at `x = 0`, then outputs at `x = 1`, each
    /// evenly spaced in `(0, 1)` along `y`. Genomes created before the reset
    /// refer to innovations that no longer exist.
    pub fn reset(&self, input_size: usize, output_size: usize, population_size: usize) {
        self.shared
            .registry
            .lock()
            .reset(input_size, output_size, population_size);
    }

    /// The run's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NeatConfig {
        &self.shared.config
    }

    /// Mint a new node at the origin.
    pub fn add_node(&self) -> NodeGene {
        self.add_node_at(0.0, 0.0)
    }

    /// Mint a new node at the given coordinates.
    pub fn add_node_at(&self, x: f32, y: f32) -> NodeGene {
        self.shared.registry.lock().add_node_at(x, y)
    }

    /// The node minted at 1-based position `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::UnknownNode`] if no node was minted at that position.
    pub fn get_node(&self, id: usize) -> Result<NodeGene> {
        self.shared.registry.lock().get_node(id)
    }

    /// The registry's record of a node, looked up by innovation.
    #[must_use]
    pub fn node(&self, innovation: Innovation) -> Option<NodeGene> {
        self.shared.registry.lock().node(innovation)
    }

    /// Register the edge `from -> to`.
    ///
    /// If the edge was created before anywhere in the population, the returned
    /// gene carries the existing innovation number. Weight is `0.0` and the gene
    /// is enabled either way; the caller sets the weight.
    pub fn add_connection(&self, from: &NodeGene, to: &NodeGene) -> ConnectionGene {
        self.shared
            .registry
            .lock()
            .add_connection(from.innovation, to.innovation)
    }

    /// The hidden node inserted when `connection` is split.
    ///
    /// Reuses the node another genome created for the same split when
    /// [`NeatConfig::reuse_split_nodes`] is set and `genome_nodes` does not
    /// already hold it; otherwise mints a node at the midpoint of `from` and `to`.
    pub fn split_node(
        &self,
        connection: &ConnectionGene,
        from: &NodeGene,
        to: &NodeGene,
        genome_nodes: &GeneSet<NodeGene>,
    ) -> NodeGene {
        let reuse = self.shared.config.reuse_split_nodes;
        self.shared
            .registry
            .lock()
            .split_node(connection, from, to, genome_nodes, reuse)
    }

    /// A seed genome: the input and output nodes, no connections.
    #[must_use]
    pub fn empty_genome(&self) -> Genome {
        let nodes: GeneSet<NodeGene> = {
            let registry = self.shared.registry.lock();
            // Positions 1..=inputs+outputs are the seed nodes minted by reset.
            registry
                .all_nodes
                .iter()
                .take(registry.input_size + registry.output_size)
                .copied()
                .collect()
        };
        Genome::from_parts(self.clone(), nodes, GeneSet::new())
    }

    /// Partition a genome's nodes into the registry's input, hidden and output caches.
    pub fn calculate(&self, genome: &Genome) {
        self.shared.registry.lock().calculate(genome.nodes());
    }

    /// Input nodes, positional; the seed inputs or those of the last calculated genome.
    #[must_use]
    pub fn input_nodes(&self) -> Vec<NodeGene> {
        self.shared.registry.lock().input_nodes.clone()
    }

    /// Hidden nodes of the last calculated genome.
    #[must_use]
    pub fn hidden_nodes(&self) -> Vec<NodeGene> {
        self.shared.registry.lock().hidden_nodes.clone()
    }

    /// Output nodes, positional; the seed outputs or those of the last calculated genome.
    #[must_use]
    pub fn output_nodes(&self) -> Vec<NodeGene> {
        self.shared.registry.lock().output_nodes.clone()
    }

    /// Number of nodes minted so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.shared.registry.lock().all_nodes.len()
    }

    /// Number of distinct edges registered so far.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.shared.registry.lock().all_connections.len()
    }

    /// Number of input nodes per genome.
    #[must_use]
    pub fn input_size(&self) -> usize {
        self.shared.registry.lock().input_size
    }

    /// Number of output nodes per genome.
    #[must_use]
    pub fn output_size(&self) -> usize {
        self.shared.registry.lock().output_size
    }

    /// Population size recorded at the last reset.
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.shared.registry.lock().population_size
    }

    /// Whether both handles refer to the same registry.
    #[inline]
    #[must_use]
    pub fn same_run(&self, other: &Neat) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
