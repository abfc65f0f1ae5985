//! The problem trait: where domain-specific collaborators plug in.
//!
//! The engine owns population lifecycle, selection, variation gating, and
//! replacement; [`EvoProblem`] supplies the pieces that depend on what a
//! chromosome *means* — fitness evaluation and the concrete mutation and
//! crossover operator bodies.

use crate::chromosome::Chromosome;
use crate::error::Result;
use rand::Rng;

/// Defines an evolutionary search problem over node-sequence chromosomes.
///
/// Fitness is minimized: lower values are better. For maximization,
/// negate the objective.
///
/// Implementations must handle every [`ObjectKind`](crate::ObjectKind)
/// variant that can appear in a chromosome, or fail with
/// [`EvoError::UnsupportedObjectKind`](crate::EvoError::UnsupportedObjectKind);
/// the runner treats that as fatal for the run.
///
/// # Thread Safety
///
/// `EvoProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel when the `parallel` feature is enabled.
pub trait EvoProblem: Send + Sync {
    /// Computes the fitness of a chromosome. Lower is better.
    ///
    /// The returned value must be finite: NaN is unordered and infinities
    /// break the tie convention, so the runner rejects both with
    /// [`EvoError::Evaluation`](crate::EvoError::Evaluation).
    ///
    /// Typically the most expensive operation; distinct individuals may be
    /// evaluated concurrently.
    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64>;

    /// Perturbs a chromosome in place. May change its length.
    ///
    /// Structural edits made through [`Chromosome`] methods invalidate the
    /// cached fitness automatically; implementations that rewrite payloads
    /// another way must call
    /// [`mark_dirty`](crate::Chromosome::mark_dirty) themselves.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _chromosome: &mut Chromosome, _rng: &mut R) -> Result<()> {
        Ok(())
    }

    /// Produces one or two offspring by recombining two parents.
    ///
    /// The runner keeps the first offspring (it replaces the first
    /// parent's population slot) and drops any second one.
    ///
    /// The default implementation clones `parent1` (no recombination).
    fn crossover<R: Rng>(
        &self,
        parent1: &Chromosome,
        _parent2: &Chromosome,
        _rng: &mut R,
    ) -> Result<Vec<Chromosome>> {
        Ok(vec![parent1.clone()])
    }

    /// Called at the end of each generation's EVALUATE phase with the
    /// best-ever fitness. The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}
