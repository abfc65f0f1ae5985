//! The generation driver and the two public run entry points.
//!
//! One generation is the strict sequence EVALUATE → SELECT → VARY →
//! REPLACE. Evaluation writes every fitness back (consulting the cache
//! when enabled) before selection begins; replacement re-establishes the
//! exact population size; the best individual ever seen is tracked across
//! the whole run and returned at TERMINATE.

use crate::cache::EvalCache;
use crate::chromosome::Chromosome;
use crate::config::EvoConfig;
use crate::error::{EvoError, Result};
use crate::population::Population;
use crate::render;
use crate::selection::{tournament, ParentPool};
use crate::types::EvoProblem;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::HashMap;

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct EvoResult {
    /// The best individual observed across the entire run.
    pub best: Chromosome,

    /// Its fitness (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Best-ever fitness after each generation's EVALUATE phase.
    /// Non-increasing under the minimization convention (elitism).
    pub fitness_history: Vec<f64>,
}

/// Parent-selection replacement policy for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionMode {
    /// Each member supplies at most one parent per cycle through the
    /// population ([`ParentPool`] semantics).
    WithoutReplacement,
    /// Every draw is an independent tournament; the same member may
    /// parent several slots in one generation.
    WithReplacement,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```
/// use seqevo::{BasicProblem, EvoConfig, EvoRunner, NodePayload, ObjectKind};
///
/// // minimize the sum of integer payloads
/// let problem = BasicProblem::new(|c| {
///     c.iter()
///         .map(|p| match p {
///             NodePayload::Integer(v) => *v as f64,
///             _ => 0.0,
///         })
///         .sum()
/// });
/// let config = EvoConfig::new(ObjectKind::Integer)
///     .with_num_gens(10)
///     .with_pop_size(20)
///     .with_indiv_size(5)
///     .with_mut_perc(40)
///     .with_cross_perc(40)
///     .with_seed(42);
/// let result = EvoRunner::run(&problem, &config).unwrap();
/// assert!(result.best_fitness.is_finite());
/// ```
pub struct EvoRunner;

impl EvoRunner {
    /// Runs without selection replacement: within one generation every
    /// member supplies at most one parent until all have been drawn once.
    /// The evaluation cache is never consulted.
    pub fn run<P: EvoProblem>(problem: &P, config: &EvoConfig) -> Result<EvoResult> {
        Self::drive(problem, config, SelectionMode::WithoutReplacement, false)
    }

    /// Runs with selection replacement: the same member may be drawn for
    /// several parent slots in one generation. Honors `config.cache`.
    pub fn run_with_replacement<P: EvoProblem>(
        problem: &P,
        config: &EvoConfig,
    ) -> Result<EvoResult> {
        Self::drive(problem, config, SelectionMode::WithReplacement, config.cache)
    }

    fn drive<P: EvoProblem>(
        problem: &P,
        config: &EvoConfig,
        mode: SelectionMode,
        use_cache: bool,
    ) -> Result<EvoResult> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        info!(
            "starting run: {} generations, population {}, chromosome length {}, mode {mode:?}",
            config.num_gens, config.pop_size, config.indiv_size
        );

        // INIT
        let mut population =
            Population::random(config.pop_size, config.indiv_size, config.kind, &mut rng)?;
        let mut cache = use_cache.then(EvalCache::new);
        let mut best: Option<(Chromosome, f64)> = None;
        let mut fitness_history = Vec::with_capacity(config.num_gens);

        for generation in 0..config.num_gens {
            // EVALUATE
            evaluate_population(problem, &mut population, cache.as_mut(), config.parallel)?;
            let gen_best = population.best()?;
            let gen_best_fitness = gen_best.fitness()?;
            // best-ever is monotone: only a strictly better individual
            // replaces it, so ties keep the first seen
            let improved = match &best {
                Some((_, best_fitness)) => gen_best_fitness < *best_fitness,
                None => true,
            };
            if improved {
                best = Some((gen_best.clone(), gen_best_fitness));
            }
            let best_fitness = best
                .as_ref()
                .expect("best is set on the first generation")
                .1;
            fitness_history.push(best_fitness);
            problem.on_generation(generation, best_fitness);
            debug!("generation {generation}: best fitness so far {best_fitness}");

            if config.visualize {
                let path = config
                    .output_path
                    .as_ref()
                    .expect("validate() requires output_path when visualize is set");
                render::write_generation(path, generation, gen_best_fitness, gen_best)?;
            }

            // SELECT + VARY + REPLACE
            let mut pool = match mode {
                SelectionMode::WithoutReplacement => Some(ParentPool::new(population.len())),
                SelectionMode::WithReplacement => None,
            };
            let mut next = Vec::with_capacity(config.pop_size);
            for _ in 0..config.pop_size {
                let parent_idx = match pool.as_mut() {
                    Some(pool) => pool.draw(&population, config.tourn_size, &mut rng)?,
                    None => tournament(&population, config.tourn_size, &mut rng)?,
                };
                let mut child = population.members()[parent_idx].clone();

                // independent rolls: an individual may undergo both,
                // either, or neither operator in one generation
                if rng.random_range(0u32..100) < config.mut_perc {
                    problem.mutate(&mut child, &mut rng)?;
                    child.check_structure()?;
                }
                if rng.random_range(0u32..100) < config.cross_perc {
                    let mate_idx = tournament(&population, config.tourn_size, &mut rng)?;
                    let offspring =
                        problem.crossover(&child, &population.members()[mate_idx], &mut rng)?;
                    // the first offspring takes the parent's slot; any
                    // second offspring is dropped
                    let first = offspring.into_iter().next().ok_or_else(|| {
                        EvoError::StructuralInvariant(
                            "crossover produced no offspring".into(),
                        )
                    })?;
                    first.check_structure()?;
                    child = first;
                }
                next.push(child);
            }
            debug_assert_eq!(next.len(), config.pop_size);
            population = Population::from_members(next)?;
        }

        // TERMINATE
        let (best, best_fitness) =
            best.expect("num_gens >= 1 guarantees at least one evaluated generation");
        info!("run complete: best fitness {best_fitness}");
        Ok(EvoResult {
            best,
            best_fitness,
            generations: config.num_gens,
            fitness_history,
        })
    }
}

/// Evaluates every dirty member, consulting the cache when present.
///
/// All fitness values are written back before this returns, so selection
/// always sees a fully evaluated population.
fn evaluate_population<P: EvoProblem>(
    problem: &P,
    population: &mut Population,
    cache: Option<&mut EvalCache>,
    parallel: bool,
) -> Result<()> {
    match cache {
        Some(cache) => {
            // group dirty members by signature so structurally identical
            // chromosomes share a single evaluator call
            let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
            for i in 0..population.len() {
                if population.members()[i].is_evaluated() {
                    continue;
                }
                let signature = population.members()[i].signature();
                if let Some(fitness) = cache.lookup(signature) {
                    population.members_mut()[i].set_fitness(fitness);
                } else {
                    groups.entry(signature).or_default().push(i);
                }
            }
            let representatives: Vec<usize> = groups.values().map(|g| g[0]).collect();
            let results =
                evaluate_pending(problem, population.members(), &representatives, parallel)?;
            for (rep, fitness) in results {
                let signature = population.members()[rep].signature();
                cache.store(signature, fitness);
                for &i in &groups[&signature] {
                    population.members_mut()[i].set_fitness(fitness);
                }
            }
        }
        None => {
            let pending: Vec<usize> = (0..population.len())
                .filter(|&i| !population.members()[i].is_evaluated())
                .collect();
            let results = evaluate_pending(problem, population.members(), &pending, parallel)?;
            for (i, fitness) in results {
                population.members_mut()[i].set_fitness(fitness);
            }
        }
    }
    Ok(())
}

/// Rejects NaN and infinite fitness values, which would corrupt the
/// minimization ordering and the first-seen-wins tie rule.
fn finite_fitness(fitness: f64) -> Result<f64> {
    if fitness.is_finite() {
        Ok(fitness)
    } else {
        Err(EvoError::Evaluation(format!(
            "evaluator returned non-finite fitness {fitness}"
        )))
    }
}

#[cfg(feature = "parallel")]
fn evaluate_pending<P: EvoProblem>(
    problem: &P,
    members: &[Chromosome],
    pending: &[usize],
    parallel: bool,
) -> Result<Vec<(usize, f64)>> {
    if parallel {
        pending
            .par_iter()
            .map(|&i| {
                problem
                    .evaluate(&members[i])
                    .and_then(finite_fitness)
                    .map(|fitness| (i, fitness))
            })
            .collect()
    } else {
        evaluate_sequential(problem, members, pending)
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_pending<P: EvoProblem>(
    problem: &P,
    members: &[Chromosome],
    pending: &[usize],
    _parallel: bool,
) -> Result<Vec<(usize, f64)>> {
    evaluate_sequential(problem, members, pending)
}

fn evaluate_sequential<P: EvoProblem>(
    problem: &P,
    members: &[Chromosome],
    pending: &[usize],
) -> Result<Vec<(usize, f64)>> {
    pending
        .iter()
        .map(|&i| {
            problem
                .evaluate(&members[i])
                .and_then(finite_fitness)
                .map(|fitness| (i, fitness))
        })
        .collect()
}
