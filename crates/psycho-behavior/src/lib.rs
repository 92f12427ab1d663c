//! # Psycho-Behavior
//!
//! Behavioral prediction on top of psychological profiles:
//!
//! - **Stimulus responses**: intensity, response type, behavior changes
//! - **Behavioral economics**: prospect theory, anchoring, framing, social
//!   proof, mental accounting and hyperbolic discounting models
//! - **Incentives**: lever-based incentive design and targeting
//! - **Policy reactions**: per-profile analysis with partial-failure batches
//! - **Assessments**: voting, compliance, security, lifecycle, technology
//!   and entrepreneurship

pub mod assessments;
pub mod economics;
pub mod incentive;
pub mod policy;
pub mod response;
pub mod stimulus;

pub use economics::{
    BehavioralEconomicsModel, DecisionContext, ModelParameters, ModelRegistry, ModelStatus,
    ModelType, ValidationMetrics, ValidationScenario,
};
pub use incentive::{
    IncentiveFit, IncentiveLever, IncentiveModeler, IncentiveSpec, IncentiveStatus,
    IncentiveStructure, IncentiveType, PopulationFit,
};
pub use policy::{
    PolicyDetails, PolicyPsychologyResponse, PolicyReaction, PolicyResponseAnalyzer, PolicyType,
};
pub use response::{BehavioralResponse, ResponseConfig, ResponseEngine, ResponseType};
pub use stimulus::{Frame, Stimulus, StimulusDetails, StimulusType};
