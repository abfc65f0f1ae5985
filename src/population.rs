//! Population: the fixed-size set of chromosomes under evolution.
//!
//! Members are mutated in place only by the generation driver; every other
//! component sees the population read-only.

use crate::chromosome::{Chromosome, ObjectKind};
use crate::error::{EvoError, Result};
use rand::Rng;

/// An ordered collection of chromosomes for one generation.
///
/// Position in the member array is an individual's only identity within a
/// generation; there is no other ordering invariant.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Chromosome>,
}

impl Population {
    /// Creates `pop_size` fresh chromosomes of `indiv_size` random nodes.
    pub fn random<R: Rng>(
        pop_size: usize,
        indiv_size: usize,
        kind: ObjectKind,
        rng: &mut R,
    ) -> Result<Self> {
        if pop_size == 0 {
            return Err(EvoError::Configuration(
                "population size must be at least 1".into(),
            ));
        }
        let members = (0..pop_size)
            .map(|_| Chromosome::random(indiv_size, kind, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { members })
    }

    /// Wraps an assembled member list (used by the driver at REPLACE).
    pub fn from_members(members: Vec<Chromosome>) -> Result<Self> {
        if members.is_empty() {
            return Err(EvoError::Configuration(
                "population must contain at least one member".into(),
            ));
        }
        Ok(Self { members })
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Never true for a constructed population.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Read-only member access.
    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }

    /// Mutable member access, reserved for the generation driver.
    pub(crate) fn members_mut(&mut self) -> &mut [Chromosome] {
        &mut self.members
    }

    /// The member with the lowest fitness (minimization, first-seen wins
    /// ties). Fails with [`EvoError::NotEvaluated`] if any member is dirty.
    pub fn best(&self) -> Result<&Chromosome> {
        let mut best: Option<(&Chromosome, f64)> = None;
        for member in &self.members {
            let fitness = member.fitness()?;
            match best {
                Some((_, best_fitness)) if fitness >= best_fitness => {}
                _ => best = Some((member, fitness)),
            }
        }
        // from_members and random both reject empty populations
        Ok(best.expect("population is never empty").0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::NodePayload;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluated(values: &[i64], fitness: f64) -> Chromosome {
        let mut c = Chromosome::from_payloads(
            ObjectKind::Integer,
            values.iter().map(|&v| NodePayload::Integer(v)).collect(),
        )
        .unwrap();
        c.set_fitness(fitness);
        c
    }

    #[test]
    fn test_random_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop = Population::random(12, 4, ObjectKind::Real, &mut rng).unwrap();
        assert_eq!(pop.len(), 12);
        assert!(pop.members().iter().all(|c| c.len() == 4));
    }

    #[test]
    fn test_zero_pop_size_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Population::random(0, 4, ObjectKind::Integer, &mut rng).unwrap_err();
        assert!(matches!(err, EvoError::Configuration(_)));
    }

    #[test]
    fn test_best_requires_full_evaluation() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop = Population::random(3, 2, ObjectKind::Integer, &mut rng).unwrap();
        assert!(matches!(pop.best(), Err(EvoError::NotEvaluated)));
    }

    #[test]
    fn test_best_picks_minimum_first_seen() {
        let pop = Population::from_members(vec![
            evaluated(&[1], 3.0),
            evaluated(&[2], 1.0),
            evaluated(&[3], 1.0),
            evaluated(&[4], 2.0),
        ])
        .unwrap();
        let best = pop.best().unwrap();
        // ties break toward the first member seen
        assert_eq!(best.payloads(), vec![NodePayload::Integer(2)]);
    }
}
