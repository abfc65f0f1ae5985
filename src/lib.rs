//! Generational evolutionary search over node-sequence chromosomes.
//!
//! Evolves a fixed-size population of [`Chromosome`]s — ordered chains of
//! typed nodes — toward individuals that score well under a pluggable
//! fitness objective. The engine owns the population lifecycle, tournament
//! parent selection, probabilistic variation gating, generational
//! replacement, and an optional evaluation cache; the domain plugs in
//! through [`EvoProblem`], which supplies fitness evaluation and the
//! concrete mutation/crossover operator bodies.
//!
//! # Conventions
//!
//! - Fitness is an `f64` and is **minimized**; ties break toward the
//!   first individual seen.
//! - All randomness flows through one seedable generator, so a fixed
//!   `seed` reproduces a run exactly.
//! - The best individual ever observed is never lost (elitism) and is
//!   returned when the run terminates.
//!
//! # Entry Points
//!
//! [`EvoRunner::run`] selects parents without replacement (each member
//! supplies at most one parent per cycle through the population);
//! [`EvoRunner::run_with_replacement`] lets the same member parent several
//! slots and can additionally memoize fitness by structural signature.
//!
//! # Features
//!
//! - `parallel`: rayon-based parallel fitness evaluation
//! - `serde`: serialization for configuration and payload types

pub mod cache;
pub mod chromosome;
pub mod config;
pub mod error;
pub mod operators;
pub mod population;
pub mod render;
pub mod runner;
pub mod selection;
pub mod types;

pub use cache::EvalCache;
pub use chromosome::{Chromosome, NodePayload, ObjectKind};
pub use config::EvoConfig;
pub use error::{EvoError, Result};
pub use operators::BasicProblem;
pub use population::Population;
pub use render::{render, RenderMode};
pub use runner::{EvoResult, EvoRunner};
pub use selection::{tournament, ParentPool};
pub use types::EvoProblem;
