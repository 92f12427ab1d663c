//! # Psycho-Core
//!
//! Core types and utilities for population-scale psychological simulation:
//! Big Five traits and archetypes, the psychological profile model, summary
//! statistics, seeded randomness and the deterministic simulation clock.

pub mod batch;
pub mod error;
pub mod ocean;
pub mod profile;
pub mod rng;
pub mod stats;
pub mod types;

pub use batch::{BatchOutcome, ItemFailure};
pub use error::{EntityKind, Error, Result};
pub use ocean::*;
pub use profile::*;
pub use rng::SimRng;
pub use stats::Statistics;
pub use types::*;
