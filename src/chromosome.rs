//! Chromosome encoding and population generation.
//!
//! A chromosome is one server index per microservice: position `i` names
//! the server hosting microservice `i`. Individuals carry a cached fitness
//! (initialized to `f64::INFINITY` until evaluated) and a unique `id`.
//!
//! Ids exist because "same individual" must mean identity, not value: two
//! distinct individuals can hold identical genes, and selection discards a
//! pair only when both slots are literally the same population member.
//! Whenever a chromosome is copied into a new generation it receives a
//! fresh id, so no two individuals alive in one population ever share one.

use crate::problem::Problem;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A candidate assignment of microservices to servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Identity within a run. Fresh on every cross-generation copy.
    pub id: u64,
    /// Server index per microservice. Length equals the microservice count.
    pub genes: Vec<usize>,
    /// Cached fitness (lower is better). `INFINITY` until evaluated.
    pub fitness: f64,
}

impl Chromosome {
    /// Creates a chromosome with the given genes and an unevaluated fitness.
    pub fn with_genes(genes: Vec<usize>, ids: &mut IdGen) -> Self {
        Self {
            id: ids.next_id(),
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Creates a uniformly random chromosome for `problem`.
    ///
    /// Each gene is drawn independently from the full server range. No
    /// feasibility screening happens here: infeasible individuals are
    /// expected and handled entirely by the fitness penalty.
    pub fn random<R: Rng>(problem: &Problem, ids: &mut IdGen, rng: &mut R) -> Self {
        let server_count = problem.server_count();
        let genes = (0..problem.service_count())
            .map(|_| rng.random_range(0..server_count))
            .collect();
        Self::with_genes(genes, ids)
    }

    /// Deep copy with a fresh id.
    ///
    /// Used whenever an individual crosses into the next generation (elite
    /// or fill), so later in-place mutation of the copy can never alias
    /// back into the generation it came from.
    pub fn clone_fresh(&self, ids: &mut IdGen) -> Self {
        Self {
            id: ids.next_id(),
            genes: self.genes.clone(),
            fitness: self.fitness,
        }
    }

    /// Evaluates and caches this chromosome's fitness.
    pub fn evaluate(&mut self, problem: &Problem, lambda: f64) {
        self.fitness = problem.fitness(&self.genes, lambda);
    }
}

/// Monotonic id source for chromosomes. One per run.
#[derive(Debug, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    /// Returns the next unused id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Generates and evaluates an initial population of `size` random
/// chromosomes.
pub fn random_population<R: Rng>(
    problem: &Problem,
    size: usize,
    lambda: f64,
    ids: &mut IdGen,
    rng: &mut R,
) -> Vec<Chromosome> {
    (0..size)
        .map(|_| {
            let mut c = Chromosome::random(problem, ids, rng);
            c.evaluate(problem, lambda);
            c
        })
        .collect()
}
