//! Generation traces and the observer seam.
//!
//! The optimization loop produces data; rendering it is a consumer concern.
//! A [`GaObserver`] receives the evaluated initial population of each run
//! and a [`GenerationTrace`] per generation: the population entering the
//! generation, the selected parent pairs, every crossover's mask and
//! children, the applied mutations, the evaluated post-mutation offspring,
//! and the replacement population. Observers must not influence the
//! numeric outcome; the engine hands out shared references only.
//!
//! All trace types serialize with serde, so a reporting layer can render
//! them as JSON (or anything else) without touching the engine.

use crate::chromosome::Chromosome;
use crate::operators::{CrossoverOutcome, MutationRecord};
use crate::selection::ParentPair;
use serde::{Deserialize, Serialize};

/// Everything that happened in one generation of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationTrace {
    /// Index of the run this generation belongs to.
    pub run_id: usize,
    /// Generation number, starting at 1.
    pub generation: usize,
    /// The evaluated population at the start of the generation.
    pub population: Vec<Chromosome>,
    /// Parent pairs chosen by selection.
    pub parent_pairs: Vec<ParentPair>,
    /// Mask and both children of every crossover, in pair order.
    pub crossovers: Vec<CrossoverOutcome>,
    /// Swap mutations applied to offspring.
    pub mutations: Vec<MutationRecord>,
    /// Offspring after mutation, re-evaluated.
    pub offspring: Vec<Chromosome>,
    /// The population produced by replacement.
    pub next_population: Vec<Chromosome>,
}

/// Callback interface for observing a run.
///
/// All methods default to no-ops, so an observer implements only what it
/// needs.
pub trait GaObserver {
    /// Called once per run with the evaluated initial population.
    fn on_init(&mut self, _run_id: usize, _population: &[Chromosome]) {}

    /// Called at the end of every generation.
    fn on_generation(&mut self, _trace: &GenerationTrace) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl GaObserver for NoopObserver {}

/// Observer that retains every trace in memory.
///
/// Useful for tests and for rendering a whole experiment after the fact.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectingObserver {
    /// `(run_id, population)` per run, in run order.
    pub initial_populations: Vec<(usize, Vec<Chromosome>)>,
    /// Every generation trace, in emission order.
    pub generations: Vec<GenerationTrace>,
}

impl CollectingObserver {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traces belonging to one run.
    pub fn run_generations(&self, run_id: usize) -> Vec<&GenerationTrace> {
        self.generations
            .iter()
            .filter(|t| t.run_id == run_id)
            .collect()
    }
}

impl GaObserver for CollectingObserver {
    fn on_init(&mut self, run_id: usize, population: &[Chromosome]) {
        self.initial_populations
            .push((run_id, population.to_vec()));
    }

    fn on_generation(&mut self, trace: &GenerationTrace) {
        self.generations.push(trace.clone());
    }
}
