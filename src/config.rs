//! Run configuration.
//!
//! [`EvoConfig`] holds every parameter that controls a run. Invalid values
//! are rejected by [`EvoConfig::validate`] before any generation executes;
//! unlike silently clamping builders, out-of-range numbers are errors here
//! because a percentage typo should fail loudly.

use crate::chromosome::ObjectKind;
use crate::error::{EvoError, Result};
use std::path::PathBuf;

/// Parameters for one evolutionary run.
///
/// # Builder Pattern
///
/// ```
/// use seqevo::{EvoConfig, ObjectKind};
///
/// let config = EvoConfig::new(ObjectKind::Integer)
///     .with_num_gens(50)
///     .with_pop_size(100)
///     .with_tourn_size(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvoConfig {
    /// Number of generations to run. Must be at least 1.
    pub num_gens: usize,

    /// Target population size, held exactly at every generation boundary.
    pub pop_size: usize,

    /// Node count of each freshly initialized chromosome.
    pub indiv_size: usize,

    /// Tournament size; `1..=pop_size`.
    pub tourn_size: usize,

    /// Percentage chance (0–100) that an individual is mutated in a
    /// generation.
    pub mut_perc: u32,

    /// Percentage chance (0–100) that an individual takes part in a
    /// crossover in a generation.
    pub cross_perc: u32,

    /// Node payload variant for the whole run.
    pub kind: ObjectKind,

    /// Appends a per-generation summary to `output_path` when set.
    pub visualize: bool,

    /// Destination for visualization output; required when `visualize`.
    pub output_path: Option<PathBuf>,

    /// Enables the evaluation cache. Only honored by the
    /// with-replacement entry point.
    pub cache: bool,

    /// Whether to evaluate individuals in parallel using rayon.
    /// Requires the `parallel` feature; ignored otherwise.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl EvoConfig {
    /// Defaults mirroring a small exploratory run.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            num_gens: 20,
            pop_size: 50,
            indiv_size: 10,
            tourn_size: 2,
            mut_perc: 5,
            cross_perc: 25,
            kind,
            visualize: false,
            output_path: None,
            cache: false,
            parallel: false,
            seed: None,
        }
    }

    /// Sets the number of generations.
    pub fn with_num_gens(mut self, n: usize) -> Self {
        self.num_gens = n;
        self
    }

    /// Sets the population size.
    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    /// Sets the initial chromosome length.
    pub fn with_indiv_size(mut self, n: usize) -> Self {
        self.indiv_size = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tourn_size(mut self, n: usize) -> Self {
        self.tourn_size = n;
        self
    }

    /// Sets the per-individual mutation percentage (0–100).
    pub fn with_mut_perc(mut self, perc: u32) -> Self {
        self.mut_perc = perc;
        self
    }

    /// Sets the per-individual crossover percentage (0–100).
    pub fn with_cross_perc(mut self, perc: u32) -> Self {
        self.cross_perc = perc;
        self
    }

    /// Enables visualization output to `path`.
    pub fn with_visualization(mut self, path: impl Into<PathBuf>) -> Self {
        self.visualize = true;
        self.output_path = Some(path.into());
        self
    }

    /// Enables or disables the evaluation cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates every parameter, returning a typed configuration error
    /// for the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.num_gens == 0 {
            return Err(EvoError::Configuration(
                "num_gens must be at least 1".into(),
            ));
        }
        if self.pop_size == 0 {
            return Err(EvoError::Configuration(
                "pop_size must be at least 1".into(),
            ));
        }
        if self.indiv_size == 0 {
            return Err(EvoError::Configuration(
                "indiv_size must be at least 1".into(),
            ));
        }
        if self.tourn_size == 0 {
            return Err(EvoError::Configuration(
                "tourn_size must be at least 1".into(),
            ));
        }
        if self.tourn_size > self.pop_size {
            return Err(EvoError::Configuration(format!(
                "tourn_size {} exceeds pop_size {}",
                self.tourn_size, self.pop_size
            )));
        }
        if self.mut_perc > 100 {
            return Err(EvoError::Configuration(format!(
                "mut_perc {} outside 0-100",
                self.mut_perc
            )));
        }
        if self.cross_perc > 100 {
            return Err(EvoError::Configuration(format!(
                "cross_perc {} outside 0-100",
                self.cross_perc
            )));
        }
        if self.visualize && self.output_path.is_none() {
            return Err(EvoError::Configuration(
                "visualize requires an output_path".into(),
            ));
        }
        Ok(())
    }
}
