//! # Psycho-Engine
//!
//! Synchronous facade over a simulated population.
//!
//! ## Architecture
//!
//! ```text
//! ProfileSpec ──▶ ProfileGenerator ──▶ PopulationStore ◀── time steps (rayon)
//!                                          │
//!        stimuli, incentives, policies, groups, models, assessments
//!                                          │
//!                                   DomainEvent ──▶ EventLog + EventSinks
//!                                          │
//!                                  AnalyticsSnapshot
//! ```
//!
//! The engine owns every entity. Profiles live in an arena and are referred
//! to by [`ProfileId`](psycho_core::ProfileId) everywhere else. Every
//! mutation appends a [`DomainEvent`] to a bounded log and notifies the
//! subscribed sinks synchronously.

pub mod config;
pub mod engine;
pub mod events;
pub mod simulation;
pub mod store;

pub use config::{EngineConfig, EventConfig, PolicyConfig, SimulationConfig};
pub use engine::PsychologyEngine;
pub use events::{DomainEvent, EventLog, EventRecord, EventSink, RecordingSink};
pub use simulation::StepSummary;
pub use store::{PendingUpdate, PopulationStore};
