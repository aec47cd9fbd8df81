//! Genetic operators: uniform crossover and swap mutation.
//!
//! Both operate on server-index gene vectors. Crossover produces two exact
//! complementary children per pair and reports the coin-flip mask alongside
//! them, so an observer can reconstruct every recombination. Mutation works
//! in place on offspring only; parents are never touched.
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use crate::chromosome::{Chromosome, IdGen};
use crate::selection::ParentPair;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The full outcome of one uniform crossover: the mask and both children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverOutcome {
    /// Per-position coin flips. `true` means child1 took parent1's gene.
    pub mask: Vec<bool>,
    /// Takes parent1's gene where the mask is set, parent2's elsewhere.
    pub child1: Chromosome,
    /// Exact complement of child1 at every position.
    pub child2: Chromosome,
}

/// Uniform crossover of one parent pair.
///
/// Draws an independent fair coin per position: `child1[i] = first[i]` when
/// the coin lands `true`, `second[i]` otherwise, and `child2` takes whichever
/// gene `child1` did not. Children are created with fresh ids and
/// unevaluated fitness.
///
/// # Panics
/// Panics if the parents' gene vectors differ in length.
pub fn uniform_crossover<R: Rng>(
    pair: &ParentPair,
    ids: &mut IdGen,
    rng: &mut R,
) -> CrossoverOutcome {
    let p1 = &pair.first.genes;
    let p2 = &pair.second.genes;
    assert_eq!(p1.len(), p2.len(), "parents must have equal length");

    let len = p1.len();
    let mask: Vec<bool> = (0..len).map(|_| rng.random_bool(0.5)).collect();

    let mut g1 = Vec::with_capacity(len);
    let mut g2 = Vec::with_capacity(len);
    for i in 0..len {
        if mask[i] {
            g1.push(p1[i]);
            g2.push(p2[i]);
        } else {
            g1.push(p2[i]);
            g2.push(p1[i]);
        }
    }

    CrossoverOutcome {
        mask,
        child1: Chromosome::with_genes(g1, ids),
        child2: Chromosome::with_genes(g2, ids),
    }
}

/// One applied swap mutation, for the generation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Id of the mutated offspring.
    pub chromosome_id: u64,
    /// The two positions whose genes were exchanged.
    pub positions: (usize, usize),
}

/// Swap mutation over a batch of offspring.
///
/// Each offspring independently mutates with probability `mutation_rate`:
/// two distinct positions are drawn uniformly and their genes exchanged.
/// The swap preserves the multiset of genes, so the set of used servers is
/// unchanged and only the per-service placement moves.
///
/// Offspring with fewer than two genes cannot swap and are skipped.
/// Returns a record per applied mutation, in offspring order.
pub fn mutate_offspring<R: Rng>(
    offspring: &mut [Chromosome],
    mutation_rate: f64,
    rng: &mut R,
) -> Vec<MutationRecord> {
    let mut records = Vec::new();
    for child in offspring.iter_mut() {
        let n = child.genes.len();
        if n < 2 {
            continue;
        }
        if rng.random_range(0.0..1.0) < mutation_rate {
            let i = rng.random_range(0..n);
            let j = loop {
                let j = rng.random_range(0..n);
                if j != i {
                    break j;
                }
            };
            child.genes.swap(i, j);
            records.push(MutationRecord {
                chromosome_id: child.id,
                positions: (i, j),
            });
        }
    }
    records
}
