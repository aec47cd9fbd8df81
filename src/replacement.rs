//! Elitist generational replacement.
//!
//! The next generation is assembled from three ranked sources, in order:
//! the best `elite_count` of the current population (unconditional
//! carry-over), then offspring best-first, then the best of the remaining
//! non-elite current members until the population size is reached exactly.
//! Every placed individual is a fresh-id deep copy, so later in-place
//! mutation can never reach back into a previous generation.

use crate::chromosome::{Chromosome, IdGen};
use std::cmp::Ordering;

/// Builds the next generation of exactly `population_size` individuals.
///
/// Elitism guarantees the best-known fitness never regresses within a run:
/// the top `elite_count` of `current` survive no matter how the offspring
/// turned out.
///
/// # Panics
/// Panics if `elite_count` exceeds `population_size`, or if `current` and
/// `offspring` together cannot fill `population_size` slots. Both are
/// upheld by the driver; a failure is a programming defect.
pub fn elitist_replacement(
    current: &[Chromosome],
    offspring: &[Chromosome],
    elite_count: usize,
    population_size: usize,
    ids: &mut IdGen,
) -> Vec<Chromosome> {
    assert!(
        elite_count <= population_size,
        "elite_count must not exceed population_size"
    );

    let current_ranked = ranked_indices(current);
    let offspring_ranked = ranked_indices(offspring);

    let elite_take = elite_count.min(current.len());
    let mut next = Vec::with_capacity(population_size);

    for &idx in current_ranked.iter().take(elite_take) {
        if next.len() >= population_size {
            break;
        }
        next.push(current[idx].clone_fresh(ids));
    }
    for &idx in &offspring_ranked {
        if next.len() >= population_size {
            break;
        }
        next.push(offspring[idx].clone_fresh(ids));
    }
    for &idx in current_ranked.iter().skip(elite_take) {
        if next.len() >= population_size {
            break;
        }
        next.push(current[idx].clone_fresh(ids));
    }

    assert_eq!(
        next.len(),
        population_size,
        "replacement must produce exactly population_size individuals"
    );
    next
}

/// Indices sorted by fitness ascending (best first). Stable, so ties keep
/// their original order and the result is deterministic.
fn ranked_indices(individuals: &[Chromosome]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..individuals.len()).collect();
    order.sort_by(|&a, &b| {
        individuals[a]
            .fitness
            .partial_cmp(&individuals[b].fitness)
            .unwrap_or(Ordering::Equal)
    });
    order
}
