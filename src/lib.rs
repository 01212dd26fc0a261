//! # NEAT Innovation
//!
//! `NeuroEvolution` of Augmenting Topologies (NEAT) genomes built around a
//! shared historical-innovation registry.
//!
//! ## Features
//!
//! - **Innovation Registry**: one [`Neat`] per run hands out node and
//!   connection innovation numbers, so the same structural change made by two
//!   genomes gets the same marking
//! - **Aligned Genomes**: connection genes are kept sorted by innovation, which
//!   makes compatibility distance and crossover a single merge pass
//! - **Mutation Operators**: add-link, add-node, weight shift, weight reset and
//!   link toggle, each a bounded no-op when it cannot apply
//! - **Network Evaluation**: [`Network`] runs a genome as a feed-forward net
//!
//! ## Quick Start
//!
//! ```rust
//! use neat_innovation::{Genome, Neat, Network};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Two inputs, one output, population of ten
//! let neat = Neat::new(2, 1, 10);
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let mut a = neat.empty_genome();
//! let mut b = neat.empty_genome();
//! for _ in 0..10 {
//!     a.mutate_link(&mut rng);
//!     b.mutate_link(&mut rng);
//! }
//!
//! let distance = a.distance(&b).expect("both genomes have connections");
//! println!("distance: {distance}");
//!
//! let mut child = Genome::crossover(&a, 1.0, &b, 0.5, &mut rng).expect("same run");
//! child.mutate(&mut rng);
//!
//! let mut network = Network::new(&child).expect("mutations keep the genome acyclic");
//! let output = network.evaluate(&[0.5, -0.5]).expect("two inputs");
//! println!("output: {output:?}");
//! ```
//!
//! ## Architecture
//!
//! ### Historical Innovation
//!
//! - **Connections**: the registry keys every edge by `(from, to)`. The first
//!   request mints `innovation = edges so far + 1`; later requests reuse it.
//! - **Nodes**: minted sequentially. Inputs come first, then outputs, then
//!   hidden nodes created by splitting connections.
//!
//! ### Shared Registry
//!
//! [`Neat`] is a cheap handle around `Arc<Mutex<_>>`. Every genome keeps one,
//! and only the registry mints numbers, so all genomes of a run agree on them.

pub mod activation;
pub mod error;
pub mod evaluator;
pub mod gene;
pub mod gene_set;
pub mod genome;
pub mod innovation;

// Re-exports for convenience
pub use activation::Activation;
pub use error::{NeatError, Result};
pub use evaluator::{Incoming, Network, NetworkNode};
pub use gene::{ConnectionGene, ConnectionKey, Gene, Innovation, NodeGene, NodeRole};
pub use gene_set::GeneSet;
pub use genome::{Alignment, Genome};
pub use innovation::{Neat, NeatConfig};
