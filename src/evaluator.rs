//! Feed-forward evaluator for NEAT genomes.
//!
//! [`Network::new`] compiles a [`Genome`] once: nodes are put in topological
//! order and each one records its enabled incoming edges. [`Network::evaluate`]
//! then runs a single forward pass per call.
//!
//! ## Determinism
//!
//! Ties in the topological order are broken by node innovation, and incoming
//! edges are summed in connection-innovation order. Two genomes with the same
//! genes therefore produce bit-identical outputs.

use std::collections::{HashMap, VecDeque};

use crate::activation::Activation;
use crate::error::{NeatError, Result};
use crate::gene::{Innovation, NodeRole};
use crate::genome::Genome;

/// An enabled edge into a [`NetworkNode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incoming {
    /// Index of the source node in [`Network::nodes`].
    pub source: usize,
    /// Connection weight.
    pub weight: f32,
}

/// Evaluation-time state of one node.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    pub innovation: Innovation,
    pub x: f32,
    pub y: f32,
    pub role: NodeRole,
    /// Value produced by the last [`Network::evaluate`] call.
    pub output: f32,
    /// Enabled incoming edges, sorted by connection innovation.
    pub incoming: Vec<Incoming>,
}

/// A compiled, evaluation-ready network.
#[derive(Debug, Clone)]
pub struct Network {
    /// Nodes in topological order.
    nodes: Vec<NetworkNode>,
    /// Node innovation -> index into `nodes`.
    index: HashMap<Innovation, usize>,
    /// Input node indices, ordered by innovation.
    input_indices: Vec<usize>,
    /// Output node indices, ordered by innovation.
    output_indices: Vec<usize>,
    activation: Activation,
}

impl Network {
    /// Compile a genome.
    ///
    /// Disabled connections are left out. The activation function comes from
    /// the genome's [`NeatConfig`](crate::NeatConfig).
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::CyclicGenome`] if the enabled connections form a
    /// cycle. Genomes built through this crate's mutations never do.
    pub fn new(genome: &Genome) -> Result<Self> {
        // Dense indices in innovation order.
        let mut innovations: Vec<Innovation> =
            genome.nodes().iter().map(|n| n.innovation).collect();
        innovations.sort_unstable();
        let dense: HashMap<Innovation, usize> = innovations
            .iter()
            .enumerate()
            .map(|(i, &innovation)| (innovation, i))
            .collect();
        let node_count = innovations.len();

        // Connections are already sorted by innovation.
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<Incoming>> = vec![Vec::new(); node_count];
        let mut in_degree = vec![0usize; node_count];
        for conn in genome.connections().iter().filter(|c| c.enabled) {
            let (Some(&from), Some(&to)) = (dense.get(&conn.from), dense.get(&conn.to)) else {
                continue;
            };
            successors[from].push(to);
            incoming[to].push(Incoming {
                source: from,
                weight: conn.weight,
            });
            in_degree[to] += 1;
        }

        // Kahn's algorithm; the queue is seeded in innovation order.
        let mut queue: VecDeque<usize> =
            (0..node_count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(node_count);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &next in &successors[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }
        if order.len() != node_count {
            return Err(NeatError::CyclicGenome);
        }

        let mut position = vec![0usize; node_count];
        for (pos, &idx) in order.iter().enumerate() {
            position[idx] = pos;
        }

        let mut nodes = Vec::with_capacity(node_count);
        for &idx in &order {
            let innovation = innovations[idx];
            let (x, y) = genome
                .nodes()
                .get_by_key(&innovation)
                .map_or((0.0, 0.0), |n| (n.x, n.y));
            nodes.push(NetworkNode {
                innovation,
                x,
                y,
                role: NodeRole::from_x(x),
                output: 0.0,
                incoming: incoming[idx]
                    .iter()
                    .map(|edge| Incoming {
                        source: position[edge.source],
                        weight: edge.weight,
                    })
                    .collect(),
            });
        }

        let index: HashMap<Innovation, usize> = nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.innovation, pos))
            .collect();
        let by_role = |role: NodeRole| -> Vec<usize> {
            innovations
                .iter()
                .filter_map(|innovation| index.get(innovation).copied())
                .filter(|&pos| nodes[pos].role == role)
                .collect()
        };
        let input_indices = by_role(NodeRole::Input);
        let output_indices = by_role(NodeRole::Output);

        Ok(Self {
            nodes,
            index,
            input_indices,
            output_indices,
            activation: genome.neat().config().activation,
        })
    }

    /// Run one forward pass.
    ///
    /// `inputs[i]` feeds the input node with the `i`-th lowest innovation.
    /// Outputs are returned in the same order over output nodes.
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::InputLengthMismatch`] if `inputs` does not have one
    /// value per input node.
    pub fn evaluate(&mut self, inputs: &[f32]) -> Result<Vec<f32>> {
        if inputs.len() != self.input_indices.len() {
            return Err(NeatError::InputLengthMismatch {
                expected: self.input_indices.len(),
                got: inputs.len(),
            });
        }

        for node in &mut self.nodes {
            node.output = 0.0;
        }
        for (&idx, &value) in self.input_indices.iter().zip(inputs) {
            self.nodes[idx].output = value;
        }

        for idx in 0..self.nodes.len() {
            if self.nodes[idx].role == NodeRole::Input {
                continue;
            }
            let sum: f32 = self.nodes[idx]
                .incoming
                .iter()
                .map(|edge| self.nodes[edge.source].output * edge.weight)
                .sum();
            self.nodes[idx].output = self.activation.apply(sum);
        }

        Ok(self
            .output_indices
            .iter()
            .map(|&idx| self.nodes[idx].output)
            .collect())
    }

    /// Output of a node after the last evaluation.
    #[must_use]
    pub fn node_output(&self, innovation: Innovation) -> Option<f32> {
        self.index.get(&innovation).map(|&idx| self.nodes[idx].output)
    }

    /// Nodes in evaluation order.
    #[must_use]
    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    /// Get the number of input nodes.
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.input_indices.len()
    }

    /// Get the number of output nodes.
    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.output_indices.len()
    }

    /// Activation applied to hidden and output nodes.
    #[must_use]
    pub const fn activation(&self) -> Activation {
        self.activation
    }
}
