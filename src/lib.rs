//! Genetic-algorithm engine for microservice-to-server placement.
//!
//! Searches for a low-cost assignment of a fixed set of microservices to a
//! fixed set of servers under per-server CPU and RAM capacities. This is a
//! variant of bin packing with a secondary cost objective: every used server
//! contributes its cost once, and capacity violations are folded into the
//! objective through a penalty term, so infeasible individuals may exist in
//! the population but are pushed out by selection pressure.
//!
//! # Core Types
//!
//! - [`Problem`]: Immutable catalog of [`Server`]s and [`Microservice`]s,
//!   plus the fitness evaluator (minimization: lower is better)
//! - [`Chromosome`]: One server index per microservice, with cached fitness
//! - [`GaConfig`]: Algorithm parameters (population size, elitism, rates)
//! - [`GaRunner`]: Executes one evolutionary run and the multi-run experiment
//! - [`ExperimentResult`]: Per-run results plus aggregate statistics
//!
//! # Observation
//!
//! The engine itself never prints. Each generation's full state (population,
//! selected parent pairs, crossover masks and children, mutations,
//! replacement population) is handed to a [`GaObserver`], and run-level data
//! flows out through [`RunResult`]. Rendering is a consumer concern.
//!
//! # Submodules
//!
//! - [`selection`]: Roulette-wheel parent-pair sampling over inverted fitness
//! - [`operators`]: Uniform crossover and swap mutation
//! - [`replacement`]: Elitist generational replacement
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Coello (2002), *Theoretical and Numerical Constraint-Handling Techniques*
//! - Coffman et al. (1996), *Approximation Algorithms for Bin Packing*

pub mod chromosome;
pub mod config;
pub mod operators;
pub mod problem;
pub mod random;
pub mod replacement;
pub mod runner;
pub mod selection;
pub mod trace;

pub use chromosome::{random_population, Chromosome, IdGen};
pub use config::GaConfig;
pub use operators::{CrossoverOutcome, MutationRecord};
pub use problem::{Microservice, Problem, Server};
pub use runner::{ExperimentResult, ExperimentSummary, GaRunner, RunResult};
pub use selection::ParentPair;
pub use trace::{CollectingObserver, GaObserver, GenerationTrace, NoopObserver};
