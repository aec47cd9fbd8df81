//! Roulette-wheel parent-pair selection.
//!
//! Fitness here is minimization-oriented (lower = better), while roulette
//! sampling is proportional to a positive weight (higher = more likely), so
//! each individual's raw weight is the inverse-fitness form
//! `total_fitness / fitness_i`. Weights are normalized into a cumulative
//! distribution and parents are drawn by inverse-CDF sampling, with
//! replacement across the draw sequence.
//!
//! Two guards keep the pairing sane:
//! - a draw landing on the same individual as the immediately preceding
//!   draw is redrawn (prevents trivial self-mating between adjacent slots);
//! - a formed pair whose two slots are the identical individual (by id) is
//!   discarded rather than mated.
//!
//! When every fitness is equal the weights are equal and selection
//! degenerates to uniform random choice. That is expected behavior for a
//! converged population, not an error.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::chromosome::Chromosome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A pair of parents selected for crossover.
///
/// Holds cloned snapshots; the ids still name the population members the
/// snapshots were taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentPair {
    pub first: Chromosome,
    pub second: Chromosome,
}

/// Selects `parent_count / 2` parent pairs from `population` by
/// roulette-wheel sampling over inverted fitness.
///
/// The same individual may appear in several pairs (sampling is with
/// replacement); pairs whose slots coincide are discarded, so the result
/// may hold fewer than `parent_count / 2` pairs.
///
/// # Panics
/// Panics if `population` is empty or `parent_count` is odd or below 2.
/// The latter is checked by [`GaConfig::validate`](crate::GaConfig::validate)
/// before any run starts; tripping it here is a programming defect.
pub fn select_parent_pairs<R: Rng>(
    population: &[Chromosome],
    parent_count: usize,
    rng: &mut R,
) -> Vec<ParentPair> {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    assert!(
        parent_count >= 2 && parent_count % 2 == 0,
        "parent_count must be even and >= 2"
    );

    let n = population.len();
    let cumulative = cumulative_weights(population);

    let mut picks = Vec::with_capacity(parent_count);
    let mut prev: Option<usize> = None;
    for _ in 0..parent_count {
        let idx = loop {
            let candidate = draw_index(&cumulative, n, rng);
            // Redraw on a repeat of the immediately preceding pick. With a
            // single individual there is nothing else to draw, so repeats
            // are allowed and the pair filter below discards them.
            if n == 1 || prev != Some(candidate) {
                break candidate;
            }
        };
        picks.push(idx);
        prev = Some(idx);
    }

    let mut pairs = Vec::with_capacity(parent_count / 2);
    for slots in picks.chunks_exact(2) {
        let (a, b) = (slots[0], slots[1]);
        if population[a].id == population[b].id {
            continue;
        }
        pairs.push(ParentPair {
            first: population[a].clone(),
            second: population[b].clone(),
        });
    }
    pairs
}

/// Normalized cumulative distribution of inverse-fitness weights.
///
/// Returns an empty vec when the weights sum to zero (all-zero fitness),
/// which makes the draw fall back to uniform choice.
fn cumulative_weights(population: &[Chromosome]) -> Vec<f64> {
    // Guard against division by zero: fitness is zero only for a degenerate
    // zero-cost catalog, which still must select uniformly, not crash.
    const EPSILON: f64 = 1e-10;

    let total: f64 = population.iter().map(|c| c.fitness).sum();
    let weights: Vec<f64> = population
        .iter()
        .map(|c| total / c.fitness.max(EPSILON))
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 || !weight_sum.is_finite() {
        return Vec::new();
    }

    let mut acc = 0.0;
    weights
        .iter()
        .map(|w| {
            acc += w / weight_sum;
            acc
        })
        .collect()
}

/// Inverse-CDF draw: first cumulative bucket at or above a uniform value.
fn draw_index<R: Rng>(cumulative: &[f64], n: usize, rng: &mut R) -> usize {
    if cumulative.is_empty() {
        return rng.random_range(0..n);
    }
    let u = rng.random_range(0.0..1.0);
    cumulative
        .iter()
        .position(|&c| c >= u)
        .unwrap_or(n - 1) // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::IdGen;
    use crate::random::create_rng;

    fn make_population(fitnesses: &[f64]) -> Vec<Chromosome> {
        let mut ids = IdGen::default();
        fitnesses
            .iter()
            .map(|&f| {
                let mut c = Chromosome::with_genes(vec![0, 0, 0], &mut ids);
                c.fitness = f;
                c
            })
            .collect()
    }

    #[test]
    fn test_returns_requested_pair_count() {
        let pop = make_population(&[100.0, 120.0, 140.0, 160.0, 180.0]);
        let mut rng = create_rng(42);

        let pairs = select_parent_pairs(&pop, 6, &mut rng);
        // Consecutive-draw rejection makes self-pairs impossible here, so
        // nothing is discarded.
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_pair_slots_never_identical() {
        let pop = make_population(&[100.0, 120.0, 140.0, 160.0]);
        let mut rng = create_rng(42);

        for _ in 0..200 {
            for pair in select_parent_pairs(&pop, 4, &mut rng) {
                assert_ne!(pair.first.id, pair.second.id);
            }
        }
    }

    #[test]
    fn test_favors_low_fitness() {
        // Index 2 has by far the best (lowest) fitness.
        let pop = make_population(&[1000.0, 500.0, 10.0, 800.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..5000 {
            for pair in select_parent_pairs(&pop, 2, &mut rng) {
                for parent in [&pair.first, &pair.second] {
                    let idx = pop.iter().position(|c| c.id == parent.id).unwrap();
                    counts[idx] += 1;
                }
            }
        }
        assert!(
            counts[2] > counts[0] && counts[2] > counts[1] && counts[2] > counts[3],
            "best individual should be selected most often: {counts:?}"
        );
    }

    #[test]
    fn test_equal_fitness_degenerates_to_uniform() {
        let pop = make_population(&[250.0, 250.0, 250.0, 250.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let draws = 5000;
        for _ in 0..draws {
            for pair in select_parent_pairs(&pop, 2, &mut rng) {
                for parent in [&pair.first, &pair.second] {
                    let idx = pop.iter().position(|c| c.id == parent.id).unwrap();
                    counts[idx] += 1;
                }
            }
        }
        // 10000 parent slots over 4 individuals; each should land well
        // above 1500 under uniformity.
        for &c in &counts {
            assert!(c > 1500, "expected roughly uniform selection: {counts:?}");
        }
    }

    #[test]
    fn test_zero_fitness_population_does_not_panic() {
        let pop = make_population(&[0.0, 0.0, 0.0]);
        let mut rng = create_rng(42);

        let pairs = select_parent_pairs(&pop, 4, &mut rng);
        assert!(pairs.len() <= 2);
    }

    #[test]
    fn test_single_individual_yields_no_pairs() {
        // Both slots of every pair hit the only member, so everything is
        // discarded by the identity filter.
        let pop = make_population(&[100.0]);
        let mut rng = create_rng(42);

        let pairs = select_parent_pairs(&pop, 4, &mut rng);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_value_equal_individuals_are_distinct() {
        // Identical genes and fitness, but different ids: a pair of the two
        // is a valid mating, not a self-pair.
        let pop = make_population(&[100.0, 100.0]);
        let mut rng = create_rng(42);

        let pairs = select_parent_pairs(&pop, 2, &mut rng);
        assert_eq!(pairs.len(), 1);
        assert_ne!(pairs[0].first.id, pairs[0].second.id);
    }

    #[test]
    #[should_panic(expected = "parent_count must be even and >= 2")]
    fn test_odd_parent_count_panics() {
        let pop = make_population(&[100.0, 200.0]);
        let mut rng = create_rng(42);
        select_parent_pairs(&pop, 3, &mut rng);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<Chromosome> = Vec::new();
        let mut rng = create_rng(42);
        select_parent_pairs(&pop, 2, &mut rng);
    }
}
