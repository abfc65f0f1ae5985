//! Tournament selection over a population.
//!
//! One tournament samples `tourn_size` distinct member indices and returns
//! the sampled index with the lowest fitness (minimization, first-seen wins
//! ties). [`ParentPool`] layers without-replacement bookkeeping on top for
//! the driver's exclusive selection mode.

use crate::error::{EvoError, Result};
use crate::population::Population;
use rand::seq::index;
use rand::Rng;

/// Runs one tournament and returns the winning member index.
///
/// Indices within a single tournament are sampled without repetition.
/// Fails with a configuration error if `tourn_size` is zero or exceeds the
/// population size; with [`EvoError::NotEvaluated`] if a sampled member is
/// dirty.
pub fn tournament<R: Rng>(
    population: &Population,
    tourn_size: usize,
    rng: &mut R,
) -> Result<usize> {
    if tourn_size == 0 {
        return Err(EvoError::Configuration(
            "tournament size must be at least 1".into(),
        ));
    }
    if tourn_size > population.len() {
        return Err(EvoError::Configuration(format!(
            "tournament size {tourn_size} exceeds population size {}",
            population.len()
        )));
    }
    let sampled = index::sample(rng, population.len(), tourn_size);
    best_of(population, sampled.into_iter())
}

/// Winner among candidate indices: lowest fitness, first-seen on ties.
fn best_of<I: Iterator<Item = usize>>(population: &Population, candidates: I) -> Result<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for idx in candidates {
        let fitness = population.members()[idx].fitness()?;
        match winner {
            Some((_, best)) if fitness >= best => {}
            _ => winner = Some((idx, fitness)),
        }
    }
    winner
        .map(|(idx, _)| idx)
        .ok_or_else(|| EvoError::Configuration("tournament had no candidates".into()))
}

/// Without-replacement parent bookkeeping for one generation.
///
/// Tracks which member indices have not yet supplied a parent. Each draw
/// runs a tournament restricted to the remaining pool and removes the
/// winner. When fewer than `tourn_size` candidates remain the tournament
/// is clamped to the pool size, and once the pool empties it refills with
/// every index (wrap-around), so no index is drawn twice before all have
/// been drawn once.
#[derive(Debug)]
pub struct ParentPool {
    remaining: Vec<usize>,
    pop_len: usize,
}

impl ParentPool {
    /// Pool over a population of `pop_len` members.
    pub fn new(pop_len: usize) -> Self {
        Self {
            remaining: (0..pop_len).collect(),
            pop_len,
        }
    }

    /// Indices that have not yet supplied a parent this cycle.
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    /// Draws one parent index via a pool-restricted tournament.
    pub fn draw<R: Rng>(
        &mut self,
        population: &Population,
        tourn_size: usize,
        rng: &mut R,
    ) -> Result<usize> {
        if tourn_size == 0 {
            return Err(EvoError::Configuration(
                "tournament size must be at least 1".into(),
            ));
        }
        if tourn_size > self.pop_len {
            return Err(EvoError::Configuration(format!(
                "tournament size {tourn_size} exceeds population size {}",
                self.pop_len
            )));
        }
        if population.len() != self.pop_len {
            return Err(EvoError::Configuration(format!(
                "pool built for {} members, population has {}",
                self.pop_len,
                population.len()
            )));
        }
        if self.remaining.is_empty() {
            self.remaining = (0..self.pop_len).collect();
        }
        let k = tourn_size.min(self.remaining.len());
        let sampled = index::sample(rng, self.remaining.len(), k);
        let winner_slot = best_of_slots(population, &self.remaining, sampled.into_iter())?;
        Ok(self.remaining.swap_remove(winner_slot))
    }
}

/// Winner among `pool[slot]` candidates, returned as the slot within
/// `pool` so the caller can remove it.
fn best_of_slots<I: Iterator<Item = usize>>(
    population: &Population,
    pool: &[usize],
    slots: I,
) -> Result<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for slot in slots {
        let fitness = population.members()[pool[slot]].fitness()?;
        match winner {
            Some((_, best)) if fitness >= best => {}
            _ => winner = Some((slot, fitness)),
        }
    }
    winner
        .map(|(slot, _)| slot)
        .ok_or_else(|| EvoError::Configuration("tournament had no candidates".into()))
}
