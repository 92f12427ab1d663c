//! # Psycho-Profile
//!
//! Psychological profile generation: archetype templates or random draws,
//! cultural personality bias, explicit trait overrides, and the
//! trait-to-attribute mapping table that fills in risk, motivation, social,
//! bias, emotional, learning and cultural attributes.

pub mod generator;
pub mod mapping;

pub use generator::{GeneratorConfig, ProfileGenerator, ProfileSpec};
pub use mapping::{AttributeMapping, TraitWeights};
