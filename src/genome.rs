//! NEAT genome: ordered gene storage plus a handle to the run's registry.
//!
//! A [`Genome`] keeps its connection genes sorted by innovation number. Both
//! [`Genome::distance`] and [`Genome::crossover`] rely on that order to align
//! two genomes in a single merge pass. New structure is always registered
//! through the shared [`Neat`] registry, so homologous genes line up across
//! the whole population.

use std::cmp::Ordering;

use rand::Rng;
use tracing::trace;

use crate::error::{NeatError, Result};
use crate::gene::{ConnectionGene, ConnectionKey, Innovation, NodeGene, NodeRole};
use crate::gene_set::GeneSet;
use crate::innovation::Neat;

/// Gene counts from aligning two genomes by innovation number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Alignment {
    /// Genes present in both genomes.
    pub matching: usize,
    /// Unmatched genes inside the other genome's innovation range.
    pub disjoint: usize,
    /// Unmatched genes beyond the other genome's highest innovation.
    pub excess: usize,
    /// Mean absolute weight difference over matching genes; 0 when none match.
    pub average_weight_diff: f32,
}

/// An evolvable individual: connection and node genes sharing one registry.
///
/// Invariants:
/// - no two connections share endpoints;
/// - every connection endpoint is present in `nodes`;
/// - connections are sorted ascending by innovation.
#[derive(Debug, Clone)]
pub struct Genome {
    connections: GeneSet<ConnectionGene>,
    nodes: GeneSet<NodeGene>,
    neat: Neat,
}

impl Genome {
    pub(crate) fn from_parts(
        neat: Neat,
        nodes: GeneSet<NodeGene>,
        connections: GeneSet<ConnectionGene>,
    ) -> Self {
        Self {
            connections,
            nodes,
            neat,
        }
    }

    /// The registry this genome draws innovations from.
    #[inline]
    #[must_use]
    pub fn neat(&self) -> &Neat {
        &self.neat
    }

    /// Connection genes, sorted by innovation.
    #[inline]
    #[must_use]
    pub fn connections(&self) -> &GeneSet<ConnectionGene> {
        &self.connections
    }

    /// Node genes.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &GeneSet<NodeGene> {
        &self.nodes
    }

    /// Nodes with the given role, in storage order.
    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &NodeGene> + '_ {
        self.nodes.iter().filter(move |n| n.role() == role)
    }

    /// Get the number of enabled connections.
    #[must_use]
    pub fn num_enabled_connections(&self) -> usize {
        self.connections.iter().filter(|c| c.enabled).count()
    }

    /// Find a connection by its innovation number.
    #[must_use]
    pub fn find_connection_by_innovation(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        let genes = self.connections.as_slice();
        genes
            .binary_search_by_key(&innovation, |c| c.innovation)
            .ok()
            .map(|pos| &genes[pos])
    }

    /// Whether the structural invariants hold.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.connections.is_sorted_by_innovation()
            && self
                .connections
                .iter()
                .all(|c| self.nodes.contains(&c.from) && self.nodes.contains(&c.to))
    }

    /// Link two of this genome's nodes with the given weight.
    ///
    /// The edge is registered with the registry, reusing the innovation number
    /// if any genome created `from -> to` before. Returns `None` if either node
    /// is missing from this genome, the nodes are the same, or the edge exists.
    pub fn add_connection(
        &mut self,
        from: &NodeGene,
        to: &NodeGene,
        weight: f32,
    ) -> Option<ConnectionGene> {
        if from.innovation == to.innovation
            || !self.nodes.contains(&from.innovation)
            || !self.nodes.contains(&to.innovation)
            || self
                .connections
                .contains(&ConnectionKey::new(from.innovation, to.innovation))
        {
            return None;
        }

        let connection = self.neat.add_connection(from, to).with_weight(weight);
        self.connections.add_sorted(connection);
        Some(connection)
    }

    /// Align two genomes by innovation number.
    ///
    /// # Errors
    ///
    /// [`NeatError::RegistryMismatch`] if the genomes come from different runs,
    /// [`NeatError::EmptyGenome`] if either has no connection genes.
    pub fn alignment(&self, other: &Genome) -> Result<Alignment> {
        check_parents(self, other)?;

        let a = self.connections.as_slice();
        let b = other.connections.as_slice();
        let (mut i, mut j) = (0, 0);
        let mut alignment = Alignment::default();
        let mut weight_diff_sum = 0.0;

        while i < a.len() && j < b.len() {
            match a[i].innovation.cmp(&b[j].innovation) {
                Ordering::Equal => {
                    alignment.matching += 1;
                    weight_diff_sum += (a[i].weight - b[j].weight).abs();
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    alignment.disjoint += 1;
                    i += 1;
                }
                Ordering::Greater => {
                    alignment.disjoint += 1;
                    j += 1;
                }
            }
        }

        // At most one side has genes left.
        alignment.excess = (a.len() - i) + (b.len() - j);
        if alignment.matching > 0 {
            alignment.average_weight_diff = weight_diff_sum / alignment.matching as f32;
        }
        Ok(alignment)
    }

    /// Compatibility distance to another genome.
    ///
    /// `c1 * excess / N + c2 * disjoint / N + c3 * average_weight_diff`, where
    /// `N` is the larger connection count, or 1 for genomes below
    /// [`NeatConfig::small_genome_threshold`](crate::NeatConfig::small_genome_threshold).
    /// Symmetric in its arguments.
    ///
    /// # Errors
    ///
    /// Same as [`Genome::alignment`].
    pub fn distance(&self, other: &Genome) -> Result<f32> {
        let alignment = self.alignment(other)?;
        let config = self.neat.config();

        let mut n = self.connections.len().max(other.connections.len());
        if n < config.small_genome_threshold {
            n = 1;
        }
        let n = n as f32;

        Ok(config.c1 * alignment.excess as f32 / n
            + config.c2 * alignment.disjoint as f32 / n
            + config.c3 * alignment.average_weight_diff)
    }

    /// Combine two parents into a new genome.
    ///
    /// Matching genes come from either parent with equal probability, carrying
    /// that parent's weight and enabled flag. Disjoint and excess genes come from
    /// the fitter parent only; on a tie each one is kept with probability 0.5.
    /// The child's nodes are the seed inputs and outputs plus every endpoint of an
    /// inherited connection. No innovations are minted.
    ///
    /// # Errors
    ///
    /// [`NeatError::RegistryMismatch`] if the parents come from different runs,
    /// [`NeatError::EmptyGenome`] if either has no connection genes.
    pub fn crossover<R: Rng>(
        g1: &Genome,
        fitness1: f32,
        g2: &Genome,
        fitness2: f32,
        rng: &mut R,
    ) -> Result<Genome> {
        check_parents(g1, g2)?;

        let fitter = fitness1.partial_cmp(&fitness2).unwrap_or(Ordering::Equal);
        let a = g1.connections.as_slice();
        let b = g2.connections.as_slice();
        let mut child = g1.neat.empty_genome();
        let (mut i, mut j) = (0, 0);

        loop {
            let inherited = match (a.get(i), b.get(j)) {
                (Some(ca), Some(cb)) => match ca.innovation.cmp(&cb.innovation) {
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        Some(if rng.random::<bool>() { ca } else { cb })
                    }
                    Ordering::Less => {
                        i += 1;
                        keep_unmatched(fitter, true, rng).then_some(ca)
                    }
                    Ordering::Greater => {
                        j += 1;
                        keep_unmatched(fitter, false, rng).then_some(cb)
                    }
                },
                (Some(ca), None) => {
                    i += 1;
                    keep_unmatched(fitter, true, rng).then_some(ca)
                }
                (None, Some(cb)) => {
                    j += 1;
                    keep_unmatched(fitter, false, rng).then_some(cb)
                }
                (None, None) => break,
            };

            if let Some(connection) = inherited {
                // Merge order is ascending, so appending keeps the child sorted.
                child.connections.add(*connection);
            }
        }

        let endpoints: Vec<Innovation> = child
            .connections
            .iter()
            .flat_map(|c| [c.from, c.to])
            .collect();
        for innovation in endpoints {
            let node = g1
                .nodes
                .get_by_key(&innovation)
                .or_else(|| g2.nodes.get_by_key(&innovation))
                .copied()
                .or_else(|| g1.neat.node(innovation));
            if let Some(node) = node {
                child.nodes.add(node);
            }
        }

        Ok(child)
    }

    /// Roll every mutation operator once against its configured chance.
    ///
    /// Operators are independent: zero, one or several may fire.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) {
        let config = self.neat.config();
        let link = config.mutate_link_chance;
        let node = config.mutate_node_chance;
        let shift = config.mutate_weight_shift_chance;
        let random = config.mutate_weight_random_chance;
        let toggle = config.mutate_link_toggle_chance;

        if rng.random::<f32>() < link {
            self.mutate_link(rng);
        }
        if rng.random::<f32>() < node {
            self.mutate_node(rng);
        }
        if rng.random::<f32>() < shift {
            self.mutate_weight_shift(rng);
        }
        if rng.random::<f32>() < random {
            self.mutate_weight_random(rng);
        }
        if rng.random::<f32>() < toggle {
            self.mutate_link_toggle(rng);
        }
    }

    /// Try to link two unconnected nodes, oriented from lower to higher `x`.
    ///
    /// Gives up after [`NeatConfig::link_attempts`](crate::NeatConfig::link_attempts)
    /// samples. Returns whether a connection was added.
    pub fn mutate_link<R: Rng>(&mut self, rng: &mut R) -> bool {
        let attempts = self.neat.config().link_attempts;
        let strength = self.neat.config().weight_random_strength;

        if self.nodes.len() >= 2 {
            for _ in 0..attempts {
                let a = self.nodes[rng.random_range(0..self.nodes.len())];
                let b = self.nodes[rng.random_range(0..self.nodes.len())];

                if a.x == b.x {
                    continue;
                }
                let (from, to) = if a.x < b.x { (a, b) } else { (b, a) };
                if self
                    .connections
                    .contains(&ConnectionKey::new(from.innovation, to.innovation))
                {
                    continue;
                }

                let weight = random_weight(rng, strength);
                if self.add_connection(&from, &to, weight).is_some() {
                    return true;
                }
            }
        }

        trace!(attempts, "add-link found no free node pair");
        false
    }

    /// Split a random connection with a new hidden node.
    ///
    /// The original gene is replaced by `from -> middle` (weight 1.0) and
    /// `middle -> to` (original weight and enabled flag). Returns whether the
    /// genome changed.
    pub fn mutate_node<R: Rng>(&mut self, rng: &mut R) -> bool {
        let Some(index) = self.connections.choose_index(rng) else {
            trace!("add-node skipped: no connections");
            return false;
        };
        let original = self.connections[index];
        let (Some(&from), Some(&to)) = (
            self.nodes.get_by_key(&original.from),
            self.nodes.get_by_key(&original.to),
        ) else {
            return false;
        };

        let middle = self.neat.split_node(&original, &from, &to, &self.nodes);
        let into = self.neat.add_connection(&from, &middle).with_weight(1.0);
        let mut out = self
            .neat
            .add_connection(&middle, &to)
            .with_weight(original.weight);
        out.enabled = original.enabled;

        self.connections.remove_at(index);
        self.connections.add_sorted(into);
        self.connections.add_sorted(out);
        self.nodes.add(middle);
        true
    }

    /// Perturb a random connection's weight by up to `weight_shift_strength`.
    pub fn mutate_weight_shift<R: Rng>(&mut self, rng: &mut R) -> bool {
        let strength = self.neat.config().weight_shift_strength;
        self.modify_random_connection(rng, |conn, rng| {
            conn.weight += random_weight(rng, strength);
        })
    }

    /// Replace a random connection's weight with a fresh uniform value.
    pub fn mutate_weight_random<R: Rng>(&mut self, rng: &mut R) -> bool {
        let strength = self.neat.config().weight_random_strength;
        self.modify_random_connection(rng, |conn, rng| {
            conn.weight = random_weight(rng, strength);
        })
    }

    /// Flip a random connection's enabled flag.
    pub fn mutate_link_toggle<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.modify_random_connection(rng, |conn, _| {
            conn.enabled = !conn.enabled;
        })
    }

    fn modify_random_connection<R, F>(&mut self, rng: &mut R, op: F) -> bool
    where
        R: Rng,
        F: FnOnce(&mut ConnectionGene, &mut R),
    {
        let Some(index) = self.connections.choose_index(rng) else {
            trace!("weight mutation skipped: no connections");
            return false;
        };
        match self.connections.get_mut(index) {
            Some(conn) => {
                op(conn, rng);
                true
            }
            None => false,
        }
    }
}

/// Both genomes must share a registry and carry connection genes.
fn check_parents(g1: &Genome, g2: &Genome) -> Result<()> {
    if !g1.neat.same_run(&g2.neat) {
        return Err(NeatError::RegistryMismatch);
    }
    if g1.connections.is_empty() || g2.connections.is_empty() {
        return Err(NeatError::EmptyGenome);
    }
    Ok(())
}

/// Whether an unmatched gene from the first (`from_first`) or second parent survives.
fn keep_unmatched<R: Rng>(fitter: Ordering, from_first: bool, rng: &mut R) -> bool {
    match fitter {
        Ordering::Greater => from_first,
        Ordering::Less => !from_first,
        Ordering::Equal => rng.random::<bool>(),
    }
}

/// Uniform weight in `[-strength, strength]`.
fn random_weight<R: Rng>(rng: &mut R, strength: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::innovation::NeatConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn node(neat: &Neat, id: usize) -> NodeGene {
        neat.get_node(id).unwrap()
    }

    /// Genome over `neat`'s seed nodes with the given `(from, to, weight)` links.
    fn genome_with(neat: &Neat, links: &[(usize, usize, f32)]) -> Genome {
        let mut genome = neat.empty_genome();
        for &(from, to, weight) in links {
            genome
                .add_connection(&node(neat, from), &node(neat, to), weight)
                .unwrap();
        }
        genome
    }

    #[test]
    fn test_mutate_link_on_seed_genome() {
        let neat = Neat::new(3, 3, 10);
        let mut genome = neat.empty_genome();
        let mut rng = test_rng();

        assert!(genome.mutate_link(&mut rng));
        assert_eq!(genome.connections().len(), 1);

        let conn = genome.connections()[0];
        let from = genome.nodes().get_by_key(&conn.from).unwrap();
        let to = genome.nodes().get_by_key(&conn.to).unwrap();
        assert!(from.x < to.x, "edge must run from lower to higher x");
        assert!(conn.weight.abs() <= neat.config().weight_random_strength);
        assert!(conn.enabled);
    }

    #[test]
    fn test_mutate_link_exhausts_quietly() {
        let neat = Neat::new(1, 1, 10);
        let mut genome = neat.empty_genome();
        let mut rng = test_rng();

        assert!(genome.mutate_link(&mut rng));
        // The only valid pair is taken now.
        assert!(!genome.mutate_link(&mut rng));
        assert_eq!(genome.connections().len(), 1);
    }

    #[test]
    fn test_independent_links_share_innovation() {
        let neat = Neat::new(3, 3, 10);
        let mut g1 = neat.empty_genome();
        let mut g2 = neat.empty_genome();

        // Another edge first, so g2's edge is not trivially innovation 1.
        g2.add_connection(&node(&neat, 1), &node(&neat, 5), 0.1)
            .unwrap();
        let c1 = g1
            .add_connection(&node(&neat, 2), &node(&neat, 4), 0.3)
            .unwrap();
        let c2 = g2
            .add_connection(&node(&neat, 2), &node(&neat, 4), -0.7)
            .unwrap();

        assert_eq!(c1.innovation, c2.innovation);
        assert!(g2.is_well_formed());
        assert_eq!(g2.connections()[0].innovation, Innovation(1));
    }

    #[test]
    fn test_add_connection_rejects_duplicates_and_foreign_nodes() {
        let neat = Neat::new(2, 1, 10);
        let mut genome = neat.empty_genome();
        let a = node(&neat, 1);
        let out = node(&neat, 3);

        assert!(genome.add_connection(&a, &out, 0.5).is_some());
        assert!(genome.add_connection(&a, &out, 0.9).is_none());
        assert!(genome.add_connection(&a, &a, 0.9).is_none());

        let stranger = neat.add_node_at(0.5, 0.5);
        assert!(genome.add_connection(&a, &stranger, 0.9).is_none());
    }

    #[test]
    fn test_mutate_node_replaces_connection() {
        let neat = Neat::new(2, 1, 10);
        let mut genome = genome_with(&neat, &[(1, 3, 0.75)]);
        genome.mutate_link_toggle(&mut test_rng());
        let original = genome.connections()[0];
        let initial_nodes = genome.nodes().len();
        let mut rng = test_rng();

        assert!(genome.mutate_node(&mut rng));
        assert_eq!(genome.nodes().len(), initial_nodes + 1);
        assert_eq!(genome.connections().len(), 2);
        assert!(genome.find_connection_by_innovation(original.innovation).is_none());
        assert!(genome.is_well_formed());

        let middle = genome.nodes_with_role(NodeRole::Hidden).next().copied().unwrap();
        assert!((middle.x - 0.5).abs() < 1e-6);

        let into = genome
            .connections()
            .get_by_key(&ConnectionKey::new(original.from, middle.innovation))
            .unwrap();
        let out = genome
            .connections()
            .get_by_key(&ConnectionKey::new(middle.innovation, original.to))
            .unwrap();
        assert!((into.weight - 1.0).abs() < 1e-6);
        assert!(into.enabled);
        assert!((out.weight - original.weight).abs() < 1e-6);
        assert_eq!(out.enabled, original.enabled);
    }

    #[test]
    fn test_mutate_node_reuses_population_split() {
        let neat = Neat::new(1, 1, 10);
        let mut g1 = genome_with(&neat, &[(1, 2, 0.5)]);
        let mut g2 = g1.clone();
        let mut rng = test_rng();

        assert!(g1.mutate_node(&mut rng));
        assert!(g2.mutate_node(&mut rng));

        let h1: Vec<_> = g1.nodes_with_role(NodeRole::Hidden).collect();
        let h2: Vec<_> = g2.nodes_with_role(NodeRole::Hidden).collect();
        assert_eq!(h1[0].innovation, h2[0].innovation);

        let i1: Vec<_> = g1.connections().iter().map(|c| c.innovation).collect();
        let i2: Vec<_> = g2.connections().iter().map(|c| c.innovation).collect();
        assert_eq!(i1, i2);
        assert!(g1.distance(&g2).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_mutate_node_on_empty_genome_is_noop() {
        let neat = Neat::new(2, 2, 10);
        let mut genome = neat.empty_genome();
        assert!(!genome.mutate_node(&mut test_rng()));
        assert_eq!(genome.nodes().len(), 4);
        assert_eq!(neat.node_count(), 4);
    }

    #[test]
    fn test_weight_mutations() {
        let neat = Neat::new(1, 1, 10);
        let mut genome = genome_with(&neat, &[(1, 2, 0.5)]);
        let mut rng = test_rng();

        for _ in 0..50 {
            let before = genome.connections()[0].weight;
            assert!(genome.mutate_weight_shift(&mut rng));
            let after = genome.connections()[0].weight;
            assert!((after - before).abs() <= neat.config().weight_shift_strength + 1e-5);
        }

        for _ in 0..50 {
            assert!(genome.mutate_weight_random(&mut rng));
            let weight = genome.connections()[0].weight;
            assert!(weight.abs() <= neat.config().weight_random_strength);
        }
    }

    #[test]
    fn test_link_toggle_flips() {
        let neat = Neat::new(1, 1, 10);
        let mut genome = genome_with(&neat, &[(1, 2, 0.5)]);
        let mut rng = test_rng();

        assert!(genome.mutate_link_toggle(&mut rng));
        assert!(!genome.connections()[0].enabled);
        assert!(genome.mutate_link_toggle(&mut rng));
        assert!(genome.connections()[0].enabled);
    }

    #[test]
    fn test_weight_mutations_on_empty_genome_are_noops() {
        let neat = Neat::new(1, 1, 10);
        let mut genome = neat.empty_genome();
        let mut rng = test_rng();
        assert!(!genome.mutate_weight_shift(&mut rng));
        assert!(!genome.mutate_weight_random(&mut rng));
        assert!(!genome.mutate_link_toggle(&mut rng));
    }

    #[test]
    fn test_mutation_preserves_invariants() {
        let config = NeatConfig {
            mutate_link_chance: 1.0,
            mutate_node_chance: 0.5,
            mutate_weight_shift_chance: 1.0,
            mutate_weight_random_chance: 0.5,
            mutate_link_toggle_chance: 0.5,
            ..NeatConfig::default()
        };
        let neat = Neat::with_config(3, 2, 10, config);
        let mut genome = neat.empty_genome();
        let mut rng = test_rng();

        for _ in 0..100 {
            genome.mutate(&mut rng);
            assert!(genome.is_well_formed());
        }
        assert!(!genome.connections().is_empty());
    }

    #[test]
    fn test_alignment_counts() {
        let neat = Neat::new(3, 1, 10);
        // Register 1->4 (#1), 2->4 (#2), 3->4 (#3) in order.
        let full = genome_with(&neat, &[(1, 4, 0.0), (2, 4, 0.0), (3, 4, 0.0)]);
        assert_eq!(full.connections().len(), 3);

        let g1 = genome_with(&neat, &[(1, 4, 0.5), (3, 4, 0.5)]);
        let g2 = genome_with(&neat, &[(2, 4, 0.5)]);

        let alignment = g1.alignment(&g2).unwrap();
        assert_eq!(alignment.matching, 0);
        assert_eq!(alignment.disjoint, 2);
        assert_eq!(alignment.excess, 1);
        assert!(alignment.average_weight_diff.abs() < 1e-6);

        // N < 20 is not normalized: 1.0 * 1 + 1.0 * 2.
        assert!((g1.distance(&g2).unwrap() - 3.0).abs() < 1e-6);
        assert!((g2.distance(&g1).unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_with_matching_genes() {
        let neat = Neat::new(2, 1, 10);
        let g1 = genome_with(&neat, &[(1, 3, 0.5), (2, 3, -0.5)]);
        let g2 = genome_with(&neat, &[(1, 3, 1.0)]);

        // One excess gene plus c3 * |0.5 - 1.0|.
        let expected = 1.0 + 0.4 * 0.5;
        assert!((g1.distance(&g2).unwrap() - expected).abs() < 1e-6);
        assert!((g2.distance(&g1).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_normalizes_large_genomes() {
        let neat = Neat::new(20, 1, 10);
        let all: Vec<(usize, usize, f32)> = (1..=20).map(|i| (i, 21, 0.5)).collect();
        let g1 = genome_with(&neat, &all);
        let g2 = genome_with(&neat, &all[..10]);

        // 10 excess genes over N = 20.
        assert!((g1.distance(&g2).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let neat = Neat::new(2, 2, 10);
        let mut genome = neat.empty_genome();
        let mut rng = test_rng();
        for _ in 0..5 {
            genome.mutate_link(&mut rng);
            genome.mutate_node(&mut rng);
        }
        assert!(genome.distance(&genome).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_distance_rejects_empty_and_foreign_genomes() {
        let neat = Neat::new(1, 1, 10);
        let empty = neat.empty_genome();
        let linked = genome_with(&neat, &[(1, 2, 0.5)]);
        assert_eq!(linked.distance(&empty), Err(NeatError::EmptyGenome));
        assert_eq!(empty.distance(&linked), Err(NeatError::EmptyGenome));

        let other_run = Neat::new(1, 1, 10);
        let foreign = genome_with(&other_run, &[(1, 2, 0.5)]);
        assert_eq!(linked.distance(&foreign), Err(NeatError::RegistryMismatch));
    }

    #[test]
    fn test_crossover_takes_unmatched_genes_from_fitter_parent() {
        let neat = Neat::new(3, 1, 10);
        genome_with(&neat, &[(1, 4, 0.0), (2, 4, 0.0), (3, 4, 0.0)]);
        let g1 = genome_with(&neat, &[(1, 4, 0.5), (3, 4, 0.5)]);
        let g2 = genome_with(&neat, &[(2, 4, 0.5)]);
        let mut rng = test_rng();

        let child = Genome::crossover(&g1, 2.0, &g2, 1.0, &mut rng).unwrap();
        let innovations: Vec<u64> = child
            .connections()
            .iter()
            .map(|c| c.innovation.get())
            .collect();
        assert_eq!(innovations, vec![1, 3]);

        let child = Genome::crossover(&g1, 1.0, &g2, 2.0, &mut rng).unwrap();
        let innovations: Vec<u64> = child
            .connections()
            .iter()
            .map(|c| c.innovation.get())
            .collect();
        assert_eq!(innovations, vec![2]);
        assert!(child.is_well_formed());
    }

    #[test]
    fn test_crossover_matching_gene_comes_from_a_parent() {
        let neat = Neat::new(2, 1, 10);
        let g1 = genome_with(&neat, &[(1, 3, 0.5)]);
        let g2 = genome_with(&neat, &[(1, 3, -1.0)]);
        let mut rng = test_rng();

        let mut seen = (false, false);
        for _ in 0..50 {
            let child = Genome::crossover(&g1, 1.0, &g2, 1.0, &mut rng).unwrap();
            assert_eq!(child.connections().len(), 1);
            let weight = child.connections()[0].weight;
            if (weight - 0.5).abs() < 1e-6 {
                seen.0 = true;
            } else if (weight + 1.0).abs() < 1e-6 {
                seen.1 = true;
            } else {
                panic!("inherited weight {} from neither parent", weight);
            }
        }
        assert!(seen.0 && seen.1);
    }

    #[test]
    fn test_crossover_tie_inherits_from_both() {
        let neat = Neat::new(3, 1, 10);
        let g1 = genome_with(&neat, &[(1, 4, 0.5)]);
        let g2 = genome_with(&neat, &[(2, 4, 0.5)]);
        let mut rng = test_rng();

        let mut counts = [0usize; 2];
        for _ in 0..100 {
            let child = Genome::crossover(&g1, 1.0, &g2, 1.0, &mut rng).unwrap();
            assert!(child.is_well_formed());
            for conn in child.connections() {
                counts[conn.innovation.get() as usize - 1] += 1;
            }
        }
        assert!(counts[0] > 0 && counts[1] > 0);
    }

    #[test]
    fn test_crossover_copies_hidden_nodes_and_mints_nothing() {
        let neat = Neat::new(2, 1, 10);
        let mut g1 = genome_with(&neat, &[(1, 3, 0.5), (2, 3, 0.5)]);
        let g2 = genome_with(&neat, &[(1, 3, 0.5)]);
        let mut rng = test_rng();
        assert!(g1.mutate_node(&mut rng));

        let nodes_before = neat.node_count();
        let conns_before = neat.connection_count();
        let child = Genome::crossover(&g1, 5.0, &g2, 1.0, &mut rng).unwrap();

        assert_eq!(neat.node_count(), nodes_before);
        assert_eq!(neat.connection_count(), conns_before);
        assert!(child.is_well_formed());
        assert!(child.neat().same_run(&neat));
        assert_eq!(child.nodes_with_role(NodeRole::Hidden).count(), 1);
        assert_eq!(child.nodes_with_role(NodeRole::Input).count(), 2);
        assert_eq!(child.nodes_with_role(NodeRole::Output).count(), 1);
    }

    #[test]
    fn test_crossover_rejects_empty_parent() {
        let neat = Neat::new(1, 1, 10);
        let empty = neat.empty_genome();
        let linked = genome_with(&neat, &[(1, 2, 0.5)]);
        let mut rng = test_rng();

        assert_eq!(
            Genome::crossover(&linked, 1.0, &empty, 0.0, &mut rng).unwrap_err(),
            NeatError::EmptyGenome
        );
    }
}
