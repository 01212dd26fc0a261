//! Ordered unique gene storage.
//!
//! [`GeneSet`] combines set semantics with a deterministic, index-addressable
//! order. Random mutation targets are picked by position, and alignment walks
//! the same storage in innovation order, so both views must be one structure.
//!
//! Membership uses [`Gene::key`]: the innovation for nodes and the endpoint
//! pair for connections. The elements' own `PartialEq` is never consulted.

use std::collections::HashMap;
use std::ops::Index;

use rand::Rng;

use crate::gene::Gene;

/// A vector of unique genes with an auxiliary key index.
///
/// `add`, `contains` and `get_by_key` are O(1) amortized. `add_sorted` and
/// `remove` shift positions and are O(n), which is fine for genomes of tens to
/// low hundreds of genes.
#[derive(Debug, Clone)]
pub struct GeneSet<T: Gene> {
    items: Vec<T>,
    index: HashMap<T::Key, usize>,
}

impl<T: Gene> Default for GeneSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Gene> GeneSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty set with room for `capacity` genes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append a gene. Returns `false` and leaves the set untouched if a gene
    /// with the same key is already present.
    pub fn add(&mut self, gene: T) -> bool {
        let key = gene.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(gene);
        true
    }

    /// Insert a gene before the first element with a greater innovation number,
    /// keeping an innovation-sorted set sorted. No-op on a duplicate key.
    pub fn add_sorted(&mut self, gene: T) -> bool {
        if self.index.contains_key(&gene.key()) {
            return false;
        }
        let innovation = gene.innovation();
        let pos = self
            .items
            .iter()
            .position(|g| innovation < g.innovation())
            .unwrap_or(self.items.len());
        self.items.insert(pos, gene);
        self.reindex_from(pos);
        true
    }

    /// Remove the gene with the given key.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let pos = *self.index.get(key)?;
        Some(self.remove_at(pos))
    }

    /// Remove the gene at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        let gene = self.items.remove(index);
        self.index.remove(&gene.key());
        self.reindex_from(index);
        gene
    }

    /// Whether a gene with this key is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Gene at a position.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable gene at a position.
    ///
    /// Callers may change any field except the ones that make up the key.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Gene with the given key.
    #[must_use]
    pub fn get_by_key(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.items[pos])
    }

    /// Position of the gene with the given key.
    #[must_use]
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Number of genes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set holds no genes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First gene in storage order.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Last gene in storage order.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Iterate in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Genes as a slice, in storage order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Uniformly random position, or `None` when empty.
    pub fn choose_index<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.items.len()))
        }
    }

    /// Uniformly random gene, or `None` when empty.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        self.choose_index(rng).map(|i| &self.items[i])
    }

    /// Whether storage order is strictly ascending by innovation.
    #[must_use]
    pub fn is_sorted_by_innovation(&self) -> bool {
        self.items
            .windows(2)
            .all(|w| w[0].innovation() < w[1].innovation())
    }

    /// Remove every gene.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, gene) in self.items.iter().enumerate().skip(start) {
            self.index.insert(gene.key(), pos);
        }
    }
}

impl<T: Gene> Index<usize> for GeneSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T: Gene> IntoIterator for &'a GeneSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Gene> FromIterator<T> for GeneSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for gene in iter {
            set.add(gene);
        }
        set
    }
}

impl<T: Gene> Extend<T> for GeneSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for gene in iter {
            self.add(gene);
        }
    }
}
