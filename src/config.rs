//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop and
//! the surrounding experiment (multiple independent runs).

use serde::{Deserialize, Serialize};

/// Configuration for the placement GA.
///
/// Controls population size, parent selection volume, operator rates, the
/// capacity-violation penalty weight, termination, and how many independent
/// runs the experiment performs.
///
/// # Builder Pattern
///
/// ```
/// use u_assign::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_parent_count(4)
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of individuals in the population.
    ///
    /// Held exactly constant at every generation boundary by replacement.
    pub population_size: usize,

    /// Maximum number of generations per run.
    pub generations: usize,

    /// Number of best individuals carried unconditionally into the next
    /// generation. Guarantees the best-known fitness never regresses
    /// within a run.
    pub elite_count: usize,

    /// Number of parents selected per generation. Must be even and >= 2;
    /// `parent_count / 2` pairs produce `parent_count` offspring.
    pub parent_count: usize,

    /// Probability of mutating each offspring (0.0-1.0).
    pub mutation_rate: f64,

    /// Penalty weight for capacity violations.
    ///
    /// Large values make any overflow dominate cost differences, which is
    /// what pushes the population toward feasible assignments.
    pub lambda: f64,

    /// Generations without strict improvement of the best fitness before a
    /// run stops early. Set to 0 to disable early stopping.
    pub max_no_improvement: usize,

    /// Number of independent runs in one experiment.
    pub runs: usize,

    /// Base random seed for reproducibility.
    ///
    /// Run `r` is seeded with `seed + r`, so a whole experiment replays
    /// byte-identically from one seed. `None` draws a seed from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            generations: 50,
            elite_count: 2,
            parent_count: 2,
            mutation_rate: 0.2,
            lambda: 1000.0,
            max_no_improvement: 10,
            runs: 5,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations per run.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the number of parents selected per generation.
    pub fn with_parent_count(mut self, n: usize) -> Self {
        self.parent_count = n;
        self
    }

    /// Sets the mutation rate, clamped to 0.0-1.0.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the capacity-violation penalty weight.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the no-improvement limit (0 to disable early stopping).
    pub fn with_max_no_improvement(mut self, n: usize) -> Self {
        self.max_no_improvement = n;
        self
    }

    /// Sets the number of independent runs per experiment.
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    /// Sets the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid. The
    /// runner calls this before the first run starts; an invalid
    /// configuration is fatal, never partially executed.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.elite_count > self.population_size {
            return Err("elite_count must not exceed population_size".into());
        }
        if self.parent_count < 2 || self.parent_count % 2 != 0 {
            return Err("parent_count must be even and >= 2".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within 0.0..=1.0".into());
        }
        if self.lambda < 0.0 {
            return Err("lambda must be non-negative".into());
        }
        if self.runs == 0 {
            return Err("runs must be at least 1".into());
        }
        Ok(())
    }
}
