//! Evolutionary loop execution and the multi-run experiment driver.
//!
//! [`GaRunner`] runs the full pipeline per generation
//! (selection -> crossover -> mutation -> replacement), stops a run early
//! after a configured number of generations without strict improvement,
//! and repeats the whole run as independent trials with per-run seeds,
//! finishing with aggregate statistics across trials.
//!
//! Everything is single-threaded and synchronous; the only shared state
//! across runs is the append-only result list.

use crate::chromosome::{random_population, Chromosome, IdGen};
use crate::config::GaConfig;
use crate::operators::{mutate_offspring, uniform_crossover};
use crate::problem::Problem;
use crate::random::create_rng;
use crate::replacement::elitist_replacement;
use crate::selection::select_parent_pairs;
use crate::trace::{GaObserver, GenerationTrace, NoopObserver};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// Result of one independent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Index of the run within the experiment.
    pub run_id: usize,

    /// The best individual found during the run.
    pub best: Chromosome,

    /// Best fitness value (same as `best.fitness`).
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run ended on the no-improvement limit rather than the
    /// generation limit.
    pub stopped_early: bool,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,

    /// Best-known fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Aggregate statistics over all runs of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Mean of the per-run best fitness values.
    pub mean_best_fitness: f64,
    /// Minimum of the per-run best fitness values.
    pub min_best_fitness: f64,
    /// Standard deviation (population form) of the per-run best fitness.
    pub std_dev_best_fitness: f64,
    /// Mean run duration.
    pub mean_elapsed: Duration,
    /// Minimum run duration.
    pub min_elapsed: Duration,
}

/// Result of a full experiment: every run plus the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Per-run results, in run order.
    pub runs: Vec<RunResult>,
    /// Statistics across runs.
    pub summary: ExperimentSummary,
}

impl ExperimentResult {
    /// The best individual across all runs.
    pub fn best(&self) -> &Chromosome {
        &self
            .runs
            .iter()
            .min_by(|a, b| {
                a.best_fitness
                    .partial_cmp(&b.best_fitness)
                    .unwrap_or(Ordering::Equal)
            })
            .expect("experiment holds at least one run")
            .best
    }
}

/// Executes GA runs and experiments.
///
/// # Usage
///
/// ```
/// use u_assign::{GaConfig, GaRunner, Microservice, Problem, Server};
///
/// let problem = Problem::new(
///     vec![
///         Server::new("A", 16.0, 64.0, 100.0),
///         Server::new("B", 8.0, 32.0, 60.0),
///     ],
///     vec![
///         Microservice::new("S1", 4.0, 16.0),
///         Microservice::new("S2", 2.0, 8.0),
///     ],
/// );
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// assert_eq!(result.runs.len(), config.runs);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the full experiment without observation.
    ///
    /// # Panics
    /// Panics if the configuration or problem is invalid (call
    /// [`GaConfig::validate`] / [`Problem::validate`] first for a
    /// descriptive error).
    pub fn run(problem: &Problem, config: &GaConfig) -> ExperimentResult {
        Self::run_with_observer(problem, config, &mut NoopObserver)
    }

    /// Runs the full experiment, reporting every generation to `observer`.
    ///
    /// Run `r` is seeded with `base_seed + r` where the base seed comes
    /// from the configuration (or OS entropy when unset), so a seeded
    /// experiment replays byte-identically and each run stays an
    /// independent trial.
    pub fn run_with_observer(
        problem: &Problem,
        config: &GaConfig,
        observer: &mut dyn GaObserver,
    ) -> ExperimentResult {
        config.validate().expect("invalid GaConfig");
        problem.validate().expect("invalid Problem");

        let base_seed = config.seed.unwrap_or_else(rand::random);

        let mut runs = Vec::with_capacity(config.runs);
        for run_id in 0..config.runs {
            let seed = base_seed.wrapping_add(run_id as u64);
            runs.push(Self::run_once(problem, config, run_id, seed, observer));
        }

        let summary = summarize(&runs);
        ExperimentResult { runs, summary }
    }

    /// Executes one run with an explicit seed.
    ///
    /// # Panics
    /// Panics if the configuration or problem is invalid.
    pub fn run_once(
        problem: &Problem,
        config: &GaConfig,
        run_id: usize,
        seed: u64,
        observer: &mut dyn GaObserver,
    ) -> RunResult {
        config.validate().expect("invalid GaConfig");
        problem.validate().expect("invalid Problem");

        let start = Instant::now();
        let mut rng = create_rng(seed);
        let mut ids = IdGen::default();

        let mut population = random_population(
            problem,
            config.population_size,
            config.lambda,
            &mut ids,
            &mut rng,
        );
        observer.on_init(run_id, &population);

        let mut best = best_of(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(best.fitness);

        let mut no_improvement = 0usize;
        let mut generations_run = 0usize;
        let mut stopped_early = false;

        for generation in 1..=config.generations {
            generations_run = generation;

            // Selection
            let pairs = select_parent_pairs(&population, config.parent_count, &mut rng);

            // Crossover
            let mut crossovers = Vec::with_capacity(pairs.len());
            let mut offspring = Vec::with_capacity(pairs.len() * 2);
            for pair in &pairs {
                let mut outcome = uniform_crossover(pair, &mut ids, &mut rng);
                outcome.child1.evaluate(problem, config.lambda);
                outcome.child2.evaluate(problem, config.lambda);
                offspring.push(outcome.child1.clone());
                offspring.push(outcome.child2.clone());
                crossovers.push(outcome);
            }

            // Mutation, then re-evaluate the offspring batch
            let mutations = mutate_offspring(&mut offspring, config.mutation_rate, &mut rng);
            for child in &mut offspring {
                child.evaluate(problem, config.lambda);
            }

            // Replacement
            let next = elitist_replacement(
                &population,
                &offspring,
                config.elite_count,
                config.population_size,
                &mut ids,
            );
            debug_assert!(next
                .iter()
                .all(|c| c.genes.len() == problem.service_count()));

            let trace = GenerationTrace {
                run_id,
                generation,
                population: population.clone(),
                parent_pairs: pairs,
                crossovers,
                mutations,
                offspring,
                next_population: next.clone(),
            };
            observer.on_generation(&trace);

            population = next;

            // Early stopping: only a strict improvement of the best-known
            // fitness resets the counter.
            let gen_best = best_of(&population);
            if gen_best.fitness < best.fitness {
                best = gen_best.clone();
                no_improvement = 0;
            } else {
                no_improvement += 1;
            }
            fitness_history.push(best.fitness);

            if config.max_no_improvement > 0 && no_improvement >= config.max_no_improvement {
                stopped_early = true;
                break;
            }
        }

        RunResult {
            run_id,
            best_fitness: best.fitness,
            best,
            generations: generations_run,
            stopped_early,
            elapsed: start.elapsed(),
            fitness_history,
        }
    }
}

/// The individual with the lowest fitness.
fn best_of(population: &[Chromosome]) -> &Chromosome {
    population
        .iter()
        .min_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap_or(Ordering::Equal)
        })
        .expect("population must not be empty")
}

/// Mean, minimum, and standard deviation across runs.
fn summarize(runs: &[RunResult]) -> ExperimentSummary {
    let n = runs.len() as f64;
    let best: Vec<f64> = runs.iter().map(|r| r.best_fitness).collect();

    let mean = best.iter().sum::<f64>() / n;
    let min = best.iter().copied().fold(f64::INFINITY, f64::min);
    let variance = best.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;

    let total_elapsed: Duration = runs.iter().map(|r| r.elapsed).sum();
    let mean_elapsed = total_elapsed / runs.len() as u32;
    let min_elapsed = runs
        .iter()
        .map(|r| r.elapsed)
        .min()
        .unwrap_or_default();

    ExperimentSummary {
        mean_best_fitness: mean,
        min_best_fitness: min,
        std_dev_best_fitness: variance.sqrt(),
        mean_elapsed,
        min_elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Microservice, Server};
    use crate::trace::CollectingObserver;

    /// Feasible instance: five light services over three mid-size servers.
    fn solvable_problem() -> Problem {
        Problem::new(
            vec![
                Server::new("A", 8.0, 32.0, 50.0),
                Server::new("B", 8.0, 32.0, 80.0),
                Server::new("C", 16.0, 64.0, 90.0),
            ],
            vec![
                Microservice::new("S1", 2.0, 4.0),
                Microservice::new("S2", 2.0, 4.0),
                Microservice::new("S3", 2.0, 4.0),
                Microservice::new("S4", 2.0, 4.0),
                Microservice::new("S5", 2.0, 4.0),
            ],
        )
    }

    /// One ample server: every assignment is feasible with fitness 100.
    fn trivial_problem() -> Problem {
        Problem::new(
            vec![Server::new("Only", 64.0, 256.0, 100.0)],
            vec![
                Microservice::new("S1", 4.0, 16.0),
                Microservice::new("S2", 2.0, 8.0),
            ],
        )
    }

    fn test_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_parent_count(10)
            .with_seed(42)
    }

    #[test]
    fn test_experiment_runs_all_trials() {
        let result = GaRunner::run(&solvable_problem(), &test_config().with_runs(3));
        assert_eq!(result.runs.len(), 3);
        for (i, run) in result.runs.iter().enumerate() {
            assert_eq!(run.run_id, i);
            assert!(run.generations >= 1);
        }
    }

    #[test]
    fn test_finds_good_placement() {
        // Five services of 2 cpu each: a single 8-cpu server cannot host
        // all of them, so the optimum is C alone at 90; the best
        // two-server split (A+B) costs 130, A+C 140.
        let result = GaRunner::run(
            &solvable_problem(),
            &test_config().with_generations(100).with_runs(3),
        );
        let best = result.best();
        assert!(solvable_problem().is_feasible(&best.genes));
        assert!(
            result.summary.min_best_fitness <= 140.0,
            "expected at most a two-server placement, got {}",
            result.summary.min_best_fitness
        );
    }

    #[test]
    fn test_trivial_problem_fitness_is_server_cost() {
        let result = GaRunner::run(&trivial_problem(), &test_config().with_runs(2));
        for run in &result.runs {
            assert_eq!(run.best_fitness, 100.0);
        }
        assert_eq!(result.summary.mean_best_fitness, 100.0);
        assert_eq!(result.summary.min_best_fitness, 100.0);
        assert_eq!(result.summary.std_dev_best_fitness, 0.0);
    }

    #[test]
    fn test_early_stop_at_exact_no_improvement_limit() {
        // Every individual already sits at the optimum, so no generation
        // improves and the run must stop after exactly the limit.
        let config = test_config().with_max_no_improvement(10).with_generations(50);
        let mut observer = NoopObserver;
        let result = GaRunner::run_once(&trivial_problem(), &config, 0, 42, &mut observer);

        assert!(result.stopped_early);
        assert_eq!(result.generations, 10);
    }

    #[test]
    fn test_disabled_early_stop_runs_all_generations() {
        let config = test_config()
            .with_max_no_improvement(0)
            .with_generations(20)
            .with_runs(1);
        let result = GaRunner::run(&trivial_problem(), &config);
        assert_eq!(result.runs[0].generations, 20);
        assert!(!result.runs[0].stopped_early);
        // Initialization plus one entry per generation.
        assert_eq!(result.runs[0].fitness_history.len(), 21);
    }

    #[test]
    fn test_best_fitness_monotonically_non_increasing() {
        let result = GaRunner::run(&solvable_problem(), &test_config().with_runs(2));
        for run in &result.runs {
            for window in run.fitness_history.windows(2) {
                assert!(
                    window[1] <= window[0],
                    "elitism must keep best fitness from regressing: {} > {}",
                    window[1],
                    window[0]
                );
            }
        }
    }

    #[test]
    fn test_population_size_invariant_every_generation() {
        let config = test_config().with_runs(1);
        let mut observer = CollectingObserver::new();
        GaRunner::run_with_observer(&solvable_problem(), &config, &mut observer);

        assert!(!observer.generations.is_empty());
        for trace in &observer.generations {
            assert_eq!(trace.population.len(), config.population_size);
            assert_eq!(trace.next_population.len(), config.population_size);
        }
    }

    #[test]
    fn test_chromosome_length_invariant_every_generation() {
        let problem = solvable_problem();
        let mut observer = CollectingObserver::new();
        GaRunner::run_with_observer(&problem, &test_config().with_runs(1), &mut observer);

        for trace in &observer.generations {
            for c in trace
                .population
                .iter()
                .chain(&trace.offspring)
                .chain(&trace.next_population)
            {
                assert_eq!(c.genes.len(), problem.service_count());
                assert!(c.genes.iter().all(|&g| g < problem.server_count()));
            }
        }
    }

    #[test]
    fn test_seeded_experiment_is_deterministic() {
        let problem = solvable_problem();
        let config = test_config().with_runs(2);

        let mut observer_a = CollectingObserver::new();
        let result_a = GaRunner::run_with_observer(&problem, &config, &mut observer_a);
        let mut observer_b = CollectingObserver::new();
        let result_b = GaRunner::run_with_observer(&problem, &config, &mut observer_b);

        // Identical seeds must reproduce identical traces and results,
        // byte for byte (elapsed time excluded).
        assert_eq!(observer_a, observer_b);
        for (a, b) in result_a.runs.iter().zip(&result_b.runs) {
            assert_eq!(a.best, b.best);
            assert_eq!(a.fitness_history, b.fitness_history);
            assert_eq!(a.generations, b.generations);
        }
    }

    #[test]
    fn test_runs_are_independent_trials() {
        let problem = solvable_problem();
        let config = test_config().with_runs(2);
        let mut observer = CollectingObserver::new();
        GaRunner::run_with_observer(&problem, &config, &mut observer);

        // Different per-run seeds: the initial populations must differ.
        let (_, ref first) = observer.initial_populations[0];
        let (_, ref second) = observer.initial_populations[1];
        let genes_a: Vec<&Vec<usize>> = first.iter().map(|c| &c.genes).collect();
        let genes_b: Vec<&Vec<usize>> = second.iter().map(|c| &c.genes).collect();
        assert_ne!(genes_a, genes_b);
    }

    #[test]
    fn test_crossover_trace_matches_offspring() {
        let config = test_config().with_runs(1);
        let mut observer = CollectingObserver::new();
        GaRunner::run_with_observer(&solvable_problem(), &config, &mut observer);

        for trace in &observer.generations {
            assert_eq!(trace.crossovers.len(), trace.parent_pairs.len());
            assert_eq!(trace.offspring.len(), 2 * trace.crossovers.len());
            // Offspring carry the ids minted at crossover.
            for (pair_idx, cx) in trace.crossovers.iter().enumerate() {
                assert_eq!(trace.offspring[2 * pair_idx].id, cx.child1.id);
                assert_eq!(trace.offspring[2 * pair_idx + 1].id, cx.child2.id);
            }
        }
    }

    #[test]
    fn test_summary_statistics() {
        fn run_result(run_id: usize, best_fitness: f64, millis: u64) -> RunResult {
            let mut ids = IdGen::default();
            let mut best = Chromosome::with_genes(vec![0], &mut ids);
            best.fitness = best_fitness;
            RunResult {
                run_id,
                best,
                best_fitness,
                generations: 1,
                stopped_early: false,
                elapsed: Duration::from_millis(millis),
                fitness_history: vec![best_fitness],
            }
        }

        let runs = vec![
            run_result(0, 100.0, 30),
            run_result(1, 200.0, 10),
            run_result(2, 300.0, 20),
        ];
        let summary = summarize(&runs);

        assert_eq!(summary.mean_best_fitness, 200.0);
        assert_eq!(summary.min_best_fitness, 100.0);
        // Population standard deviation of {100, 200, 300}.
        let expected = (20000.0f64 / 3.0).sqrt();
        assert!((summary.std_dev_best_fitness - expected).abs() < 1e-9);
        assert_eq!(summary.mean_elapsed, Duration::from_millis(20));
        assert_eq!(summary.min_elapsed, Duration::from_millis(10));
    }

    #[test]
    #[should_panic(expected = "invalid GaConfig")]
    fn test_invalid_config_is_fatal_before_any_run() {
        let config = GaConfig::default().with_parent_count(3);
        GaRunner::run(&solvable_problem(), &config);
    }

    #[test]
    #[should_panic(expected = "invalid Problem")]
    fn test_invalid_problem_is_fatal() {
        let problem = Problem::new(vec![], vec![]);
        GaRunner::run(&problem, &GaConfig::default().with_seed(1));
    }
}
