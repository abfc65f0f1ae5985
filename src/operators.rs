//! Built-in structural variation operators.
//!
//! Generic operators over node-sequence chromosomes, capability-complete
//! for every [`ObjectKind`](crate::chromosome::ObjectKind) variant. They are deliberately simple; richer
//! domain-specific operators belong in an [`EvoProblem`] implementation.
//!
//! # Mutation Operators
//!
//! - [`point_mutation`]: re-randomize one node payload — O(n)
//! - [`swap_mutation`]: exchange two node payloads — O(n)
//! - [`insert_mutation`]: grow by one random node — O(n)
//! - [`delete_mutation`]: shrink by one node, never below one — O(n)
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: exchange tails at independent cut points,
//!   producing two offspring whose lengths may differ from the parents'

use crate::chromosome::{Chromosome, NodePayload};
use crate::error::{EvoError, Result};
use crate::types::EvoProblem;
use rand::Rng;

/// Re-randomizes the payload of one random node.
pub fn point_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<()> {
    let pos = rng.random_range(0..chromosome.len());
    let payload = NodePayload::random(chromosome.kind(), rng);
    chromosome.set_payload(pos, payload)
}

/// Exchanges the payloads of two random nodes.
pub fn swap_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<()> {
    let n = chromosome.len();
    if n < 2 {
        return Ok(());
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    if i == j {
        return Ok(());
    }
    let a = *chromosome
        .payload_at(i)
        .ok_or_else(|| EvoError::StructuralInvariant("position out of range".into()))?;
    let b = *chromosome
        .payload_at(j)
        .ok_or_else(|| EvoError::StructuralInvariant("position out of range".into()))?;
    chromosome.set_payload(i, b)?;
    chromosome.set_payload(j, a)
}

/// Inserts one random node at a random position.
pub fn insert_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<()> {
    let pos = rng.random_range(0..=chromosome.len());
    let payload = NodePayload::random(chromosome.kind(), rng);
    chromosome.insert(pos, payload)
}

/// Removes one random node. No-op on single-node chromosomes, which must
/// stay non-empty.
pub fn delete_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<()> {
    if chromosome.len() < 2 {
        return Ok(());
    }
    let pos = rng.random_range(0..chromosome.len());
    chromosome.remove(pos).map(|_| ())
}

/// Single-point crossover with independent cut points per parent.
///
/// `child1` takes `parent1`'s head and `parent2`'s tail, `child2` the
/// reverse. Offspring lengths may differ from either parent, but the
/// combined node count is conserved and both offspring are non-empty and
/// unevaluated.
pub fn single_point_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut R,
) -> Result<(Chromosome, Chromosome)> {
    if parent1.kind() != parent2.kind() {
        return Err(EvoError::StructuralInvariant(format!(
            "cannot cross {:?} with {:?} chromosomes",
            parent1.kind(),
            parent2.kind()
        )));
    }
    let cut1 = cut_point(parent1.len(), rng);
    let cut2 = cut_point(parent2.len(), rng);

    let p1 = parent1.payloads();
    let p2 = parent2.payloads();

    let mut child1: Vec<NodePayload> = p1[..cut1].to_vec();
    child1.extend_from_slice(&p2[cut2..]);
    let mut child2: Vec<NodePayload> = p2[..cut2].to_vec();
    child2.extend_from_slice(&p1[cut1..]);

    Ok((
        Chromosome::from_payloads(parent1.kind(), child1)?,
        Chromosome::from_payloads(parent2.kind(), child2)?,
    ))
}

/// Cut after at least one node; single-node parents contribute whole.
fn cut_point<R: Rng>(len: usize, rng: &mut R) -> usize {
    if len > 1 {
        rng.random_range(1..len)
    } else {
        1
    }
}

/// A ready-made [`EvoProblem`] wiring the built-in operators to a
/// caller-supplied fitness function.
///
/// Mutation picks uniformly among the four built-in mutations; crossover
/// is [`single_point_crossover`]. Suitable as a starter domain and for
/// exercising the engine in tests and benchmarks.
pub struct BasicProblem<F>
where
    F: Fn(&Chromosome) -> f64 + Send + Sync,
{
    fitness_fn: F,
}

impl<F> BasicProblem<F>
where
    F: Fn(&Chromosome) -> f64 + Send + Sync,
{
    pub fn new(fitness_fn: F) -> Self {
        Self { fitness_fn }
    }
}

impl<F> EvoProblem for BasicProblem<F>
where
    F: Fn(&Chromosome) -> f64 + Send + Sync,
{
    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64> {
        Ok((self.fitness_fn)(chromosome))
    }

    fn mutate<R: Rng>(&self, chromosome: &mut Chromosome, rng: &mut R) -> Result<()> {
        match rng.random_range(0..4) {
            0 => point_mutation(chromosome, rng),
            1 => swap_mutation(chromosome, rng),
            2 => insert_mutation(chromosome, rng),
            _ => delete_mutation(chromosome, rng),
        }
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>> {
        let (c1, c2) = single_point_crossover(parent1, parent2, rng)?;
        Ok(vec![c1, c2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::ObjectKind;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_point_mutation_keeps_length_and_structure() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut c = Chromosome::random(6, ObjectKind::Bits, &mut rng).unwrap();
            c.set_fitness(1.0);
            point_mutation(&mut c, &mut rng).unwrap();
            assert_eq!(c.len(), 6);
            assert!(c.check_structure().is_ok());
            assert!(!c.is_evaluated(), "mutation must dirty the fitness");
        }
    }

    #[test]
    fn test_swap_mutation_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut c = Chromosome::random(8, ObjectKind::Integer, &mut rng).unwrap();
            let mut before = c.payloads();
            swap_mutation(&mut c, &mut rng).unwrap();
            let mut after = c.payloads();
            let key = |p: &NodePayload| match p {
                NodePayload::Integer(v) => *v,
                other => panic!("unexpected payload {other:?}"),
            };
            before.sort_by_key(key);
            after.sort_by_key(key);
            assert_eq!(before, after);
            assert!(c.check_structure().is_ok());
        }
    }

    #[test]
    fn test_insert_and_delete_change_length_by_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = Chromosome::random(5, ObjectKind::Real, &mut rng).unwrap();
        insert_mutation(&mut c, &mut rng).unwrap();
        assert_eq!(c.len(), 6);
        delete_mutation(&mut c, &mut rng).unwrap();
        assert_eq!(c.len(), 5);
        assert!(c.check_structure().is_ok());
    }

    #[test]
    fn test_delete_never_empties() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = Chromosome::random(1, ObjectKind::Integer, &mut rng).unwrap();
        for _ in 0..10 {
            delete_mutation(&mut c, &mut rng).unwrap();
        }
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_crossover_conserves_nodes() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let p1 = Chromosome::random(7, ObjectKind::Integer, &mut rng).unwrap();
            let p2 = Chromosome::random(4, ObjectKind::Integer, &mut rng).unwrap();
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng).unwrap();
            assert_eq!(c1.len() + c2.len(), 11);
            assert!(c1.len() >= 1 && c2.len() >= 1);
            assert!(c1.check_structure().is_ok());
            assert!(c2.check_structure().is_ok());
            assert!(!c1.is_evaluated() && !c2.is_evaluated());
        }
    }

    #[test]
    fn test_crossover_single_node_parents() {
        let mut rng = StdRng::seed_from_u64(2);
        let p1 = Chromosome::random(1, ObjectKind::Bits, &mut rng).unwrap();
        let p2 = Chromosome::random(1, ObjectKind::Bits, &mut rng).unwrap();
        let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng).unwrap();
        // with single-node parents each child is a copy of one parent
        assert!(c1.structurally_eq(&p1));
        assert!(c2.structurally_eq(&p2));
    }

    #[test]
    fn test_crossover_kind_mismatch_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let p1 = Chromosome::random(3, ObjectKind::Integer, &mut rng).unwrap();
        let p2 = Chromosome::random(3, ObjectKind::Real, &mut rng).unwrap();
        assert!(matches!(
            single_point_crossover(&p1, &p2, &mut rng),
            Err(EvoError::StructuralInvariant(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_crossover_offspring_valid(seed in 0u64..500, len1 in 1usize..15, len2 in 1usize..15) {
            let mut rng = StdRng::seed_from_u64(seed);
            let p1 = Chromosome::random(len1, ObjectKind::Integer, &mut rng).unwrap();
            let p2 = Chromosome::random(len2, ObjectKind::Integer, &mut rng).unwrap();
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng).unwrap();
            prop_assert!(c1.check_structure().is_ok());
            prop_assert!(c2.check_structure().is_ok());
            prop_assert_eq!(c1.len() + c2.len(), len1 + len2);
        }

        #[test]
        fn prop_mutation_pipeline_valid(seed in 0u64..500, len in 1usize..12) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut c = Chromosome::random(len, ObjectKind::Bits, &mut rng).unwrap();
            for _ in 0..8 {
                point_mutation(&mut c, &mut rng).unwrap();
                insert_mutation(&mut c, &mut rng).unwrap();
                swap_mutation(&mut c, &mut rng).unwrap();
                delete_mutation(&mut c, &mut rng).unwrap();
            }
            prop_assert!(c.check_structure().is_ok());
            prop_assert!(c.len() >= 1);
        }
    }
}
