//! Behavioral-economics models.
//!
//! Six parameterized models, each applied to a profile and a decision
//! context to produce a scalar valuation or decision weight:
//!
//! | Model | Output |
//! |-------|--------|
//! | prospect theory | subjective value `w(p) · v(x)` |
//! | anchoring | adjusted estimate |
//! | framing | framed valuation of an outcome |
//! | social proof | adoption decision weight, 0–100 |
//! | mental accounting | effective transferable amount |
//! | hyperbolic discounting | present value of a delayed reward |
//!
//! Profile attributes personalize the literature defaults: a profile with
//! neutral (50) biases uses the default parameters unchanged.

use chrono::{DateTime, Utc};
use psycho_core::stats::bounded;
use psycho_core::{EntityKind, Error, PsychologicalProfile, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::stimulus::Frame;

/// Literature defaults shared across the models
pub mod constants {
    pub const LOSS_AVERSION: f64 = 2.25;
    pub const RISK_AVERSION_COEFFICIENT: f64 = 0.88;
    pub const PROBABILITY_WEIGHTING: f64 = 0.61;
    pub const DISCOUNT_RATE: f64 = 0.03;
    pub const SOCIAL_PROOF_THRESHOLD: f64 = 0.3;
    pub const ANCHORING_STRENGTH: f64 = 0.4;
    pub const FRAMING_EFFECT_SIZE: f64 = 0.2;
    pub const HYPERBOLIC_BETA: f64 = 0.7;
    pub const ACCOUNTING_SEPARATION: f64 = 0.3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    ProspectTheory,
    MentalAccounting,
    HyperbolicDiscounting,
    SocialProof,
    Anchoring,
    Framing,
}

impl ModelType {
    pub const ALL: [ModelType; 6] = [
        ModelType::ProspectTheory,
        ModelType::MentalAccounting,
        ModelType::HyperbolicDiscounting,
        ModelType::SocialProof,
        ModelType::Anchoring,
        ModelType::Framing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelType::ProspectTheory => "prospect_theory",
            ModelType::MentalAccounting => "mental_accounting",
            ModelType::HyperbolicDiscounting => "hyperbolic_discounting",
            ModelType::SocialProof => "social_proof",
            ModelType::Anchoring => "anchoring",
            ModelType::Framing => "framing",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        ModelType::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| Error::UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Experimental,
    Validated,
    Production,
    Deprecated,
}

impl ModelStatus {
    /// Forward-only lifecycle; deprecated is terminal
    pub fn can_transition_to(&self, next: ModelStatus) -> bool {
        matches!(
            (self, next),
            (ModelStatus::Experimental, ModelStatus::Validated)
                | (ModelStatus::Validated, ModelStatus::Production)
                | (ModelStatus::Experimental, ModelStatus::Deprecated)
                | (ModelStatus::Validated, ModelStatus::Deprecated)
                | (ModelStatus::Production, ModelStatus::Deprecated)
        )
    }
}

/// Named parameter bag with per-name defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters(pub BTreeMap<String, f64>);

impl ModelParameters {
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.0
            .get(name)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    pub fn defaults_for(model: ModelType) -> Self {
        use constants::*;
        let p = ModelParameters::default();
        match model {
            ModelType::ProspectTheory => p
                .with("loss_aversion", LOSS_AVERSION)
                .with("risk_aversion_coefficient", RISK_AVERSION_COEFFICIENT)
                .with("probability_weighting", PROBABILITY_WEIGHTING),
            ModelType::MentalAccounting => p.with("accounting_separation", ACCOUNTING_SEPARATION),
            ModelType::HyperbolicDiscounting => p
                .with("discount_rate", DISCOUNT_RATE)
                .with("present_bias", HYPERBOLIC_BETA),
            ModelType::SocialProof => p
                .with("social_influence_strength", 60.0)
                .with("group_size_effect", 0.3)
                .with("similarity_bonus", 0.4)
                .with("threshold", SOCIAL_PROOF_THRESHOLD),
            ModelType::Anchoring => p.with("adjustment_insufficiency", ANCHORING_STRENGTH),
            ModelType::Framing => p.with("framing_sensitivity", FRAMING_EFFECT_SIZE),
        }
    }
}

/// Decision context; each model reads the fields it needs and defaults the rest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionContext {
    /// Signed outcome (gain > 0, loss < 0)
    pub outcome: Option<f64>,
    pub probability: Option<f64>,
    pub anchor: Option<f64>,
    pub true_value: Option<f64>,
    pub frame: Option<Frame>,
    /// Fraction of the reference group already adopting, 0–1
    pub peer_adoption: Option<f64>,
    pub group_size: Option<f64>,
    /// Similarity to the reference group, 0–1
    pub similarity: Option<f64>,
    pub amount: Option<f64>,
    pub source_account: Option<String>,
    pub target_account: Option<String>,
    pub reward: Option<f64>,
    pub delay: Option<f64>,
}

impl DecisionContext {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("outcome", self.outcome),
            ("anchor", self.anchor),
            ("true_value", self.true_value),
            ("amount", self.amount),
            ("reward", self.reward),
        ];
        for (name, v) in finite {
            if let Some(v) = v {
                if !v.is_finite() {
                    return Err(Error::Validation(format!("{name} must be finite")));
                }
            }
        }
        let unit = [
            ("probability", self.probability),
            ("peer_adoption", self.peer_adoption),
            ("similarity", self.similarity),
        ];
        for (name, v) in unit {
            if let Some(v) = v {
                if !(0.0..=1.0).contains(&v) {
                    return Err(Error::Validation(format!("{name} must be within [0, 1]")));
                }
            }
        }
        let non_negative = [("group_size", self.group_size), ("delay", self.delay)];
        for (name, v) in non_negative {
            if let Some(v) = v {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::Validation(format!("{name} must be non-negative")));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub sample_size: usize,
}

/// Held-out case: the model output is compared against `threshold` and the
/// resulting binary prediction against `expected`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationScenario {
    pub profile: PsychologicalProfile,
    pub context: DecisionContext,
    pub threshold: f64,
    pub expected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralEconomicsModel {
    pub model_type: ModelType,
    pub parameters: ModelParameters,
    pub applicable_contexts: Vec<String>,
    pub population_segments: Vec<String>,
    pub validation: ValidationMetrics,
    pub status: ModelStatus,
    pub last_validated: Option<DateTime<Utc>>,
}

impl BehavioralEconomicsModel {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            model_type,
            parameters: ModelParameters::defaults_for(model_type),
            applicable_contexts: Vec::new(),
            population_segments: vec!["general".to_string()],
            validation: ValidationMetrics::default(),
            status: ModelStatus::Experimental,
            last_validated: None,
        }
    }

    /// Apply the model to a profile in a decision context
    pub fn apply(&self, profile: &PsychologicalProfile, ctx: &DecisionContext) -> Result<f64> {
        ctx.validate()?;
        let p = &self.parameters;
        let value = match self.model_type {
            ModelType::ProspectTheory => {
                let lambda = p.get_or("loss_aversion", constants::LOSS_AVERSION)
                    * (0.5 + profile.risk_profile.loss_aversion / 100.0);
                let alpha =
                    p.get_or("risk_aversion_coefficient", constants::RISK_AVERSION_COEFFICIENT);
                let gamma = p.get_or("probability_weighting", constants::PROBABILITY_WEIGHTING);
                prospect_value(ctx.outcome.unwrap_or(0.0), alpha, lambda)
                    * probability_weight(ctx.probability.unwrap_or(1.0), gamma)
            }
            ModelType::Anchoring => {
                let anchor = ctx.anchor.unwrap_or(0.0);
                let truth = ctx.true_value.unwrap_or(anchor);
                let strength = p.get_or("adjustment_insufficiency", constants::ANCHORING_STRENGTH);
                let insufficiency =
                    (strength * profile.cognitive_biases.anchoring_bias / 50.0).clamp(0.0, 1.0);
                anchor + (truth - anchor) * (1.0 - insufficiency)
            }
            ModelType::Framing => {
                let outcome = ctx.outcome.unwrap_or(0.0);
                let s = p.get_or("framing_sensitivity", constants::FRAMING_EFFECT_SIZE)
                    * profile.cognitive_biases.framing_effect
                    / 50.0;
                match ctx.frame {
                    Some(Frame::Gain) => outcome * (1.0 + s),
                    Some(Frame::Loss) => outcome * (1.0 - s),
                    None => outcome,
                }
            }
            ModelType::SocialProof => {
                let adoption = ctx.peer_adoption.unwrap_or(0.0);
                let strength = p.get_or("social_influence_strength", 60.0) / 100.0
                    * profile.cognitive_biases.herding
                    / 50.0;
                let threshold = p.get_or("threshold", constants::SOCIAL_PROOF_THRESHOLD);
                let activation = if threshold <= 0.0 || adoption >= threshold {
                    1.0
                } else {
                    adoption / threshold
                };
                let group = (1.0 + ctx.group_size.unwrap_or(0.0)).ln();
                let damping = 1.0 / (1.0 + p.get_or("group_size_effect", 0.3) * group);
                let similarity =
                    1.0 + ctx.similarity.unwrap_or(0.0) * p.get_or("similarity_bonus", 0.4);
                bounded(100.0 * adoption * strength * activation * damping * similarity)
            }
            ModelType::MentalAccounting => {
                let amount = ctx.amount.unwrap_or(0.0);
                if ctx.source_account == ctx.target_account {
                    amount
                } else {
                    let base =
                        p.get_or("accounting_separation", constants::ACCOUNTING_SEPARATION);
                    let separation = (base * (0.5 + profile.personality.conscientiousness / 100.0))
                        .clamp(0.0, 1.0);
                    amount * (1.0 - separation)
                }
            }
            ModelType::HyperbolicDiscounting => {
                let reward = ctx.reward.unwrap_or(0.0);
                let delay = ctx.delay.unwrap_or(0.0);
                let k = p.get_or("discount_rate", constants::DISCOUNT_RATE)
                    * (1.5 - profile.risk_profile.time_preference / 100.0);
                let beta = if delay > 0.0 {
                    p.get_or("present_bias", constants::HYPERBOLIC_BETA)
                } else {
                    1.0
                };
                beta * reward / (1.0 + k * delay)
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::PartialComputation {
                item: profile.id.to_string(),
                reason: format!("{} produced a non-finite value", self.model_type),
            })
        }
    }

    /// Score the model against held-out scenarios. Scenarios whose evaluation
    /// fails count as mispredictions.
    pub fn validate(&self, scenarios: &[ValidationScenario]) -> ValidationMetrics {
        let (mut tp, mut fp, mut tn, mut fn_) = (0usize, 0usize, 0usize, 0usize);
        for s in scenarios {
            let predicted = self
                .apply(&s.profile, &s.context)
                .map(|v| v > s.threshold)
                .unwrap_or(!s.expected);
            match (predicted, s.expected) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, false) => tn += 1,
                (false, true) => fn_ += 1,
            }
        }
        let ratio = |num: usize, den: usize| {
            if den == 0 {
                0.0
            } else {
                num as f64 / den as f64 * 100.0
            }
        };
        ValidationMetrics {
            accuracy: ratio(tp + tn, scenarios.len()),
            precision: ratio(tp, tp + fp),
            recall: ratio(tp, tp + fn_),
            sample_size: scenarios.len(),
        }
    }
}

/// `x^α` for gains, `−λ(−x)^α` for losses
pub fn prospect_value(x: f64, alpha: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        x.powf(alpha)
    } else {
        -lambda * (-x).powf(alpha)
    }
}

/// Tversky–Kahneman probability weighting
pub fn probability_weight(p: f64, gamma: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let pg = p.powf(gamma);
    pg / (pg + (1.0 - p).powf(gamma)).powf(1.0 / gamma)
}

/// Registered models, one per type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRegistry {
    models: BTreeMap<ModelType, BehavioralEconomicsModel>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// All six models with literature defaults. Prospect theory and social
    /// proof ship as production models with their published validation
    /// figures; the rest start as validated.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for t in ModelType::ALL {
            let mut model = BehavioralEconomicsModel::new(t);
            match t {
                ModelType::ProspectTheory => {
                    model.applicable_contexts =
                        vec!["investment".into(), "insurance".into(), "gambling".into()];
                    model.validation = ValidationMetrics {
                        accuracy: 75.0,
                        precision: 72.0,
                        recall: 78.0,
                        sample_size: 1000,
                    };
                    model.status = ModelStatus::Production;
                }
                ModelType::SocialProof => {
                    model.applicable_contexts =
                        vec!["consumer_choice".into(), "voting".into(), "adoption".into()];
                    model.validation = ValidationMetrics {
                        accuracy: 68.0,
                        precision: 65.0,
                        recall: 71.0,
                        sample_size: 800,
                    };
                    model.status = ModelStatus::Production;
                }
                _ => model.status = ModelStatus::Validated,
            }
            registry.models.insert(t, model);
        }
        registry
    }

    pub fn register(&mut self, model: BehavioralEconomicsModel) {
        self.models.insert(model.model_type, model);
    }

    pub fn get(&self, model_type: ModelType) -> Result<&BehavioralEconomicsModel> {
        self.models
            .get(&model_type)
            .ok_or_else(|| Error::not_found(EntityKind::Model, model_type))
    }

    pub fn models(&self) -> impl Iterator<Item = &BehavioralEconomicsModel> {
        self.models.values()
    }

    pub fn apply(
        &self,
        model_type: ModelType,
        profile: &PsychologicalProfile,
        ctx: &DecisionContext,
    ) -> Result<f64> {
        self.get(model_type)?.apply(profile, ctx)
    }

    /// Re-score a model and record the metrics
    pub fn validate(
        &mut self,
        model_type: ModelType,
        scenarios: &[ValidationScenario],
        at: DateTime<Utc>,
    ) -> Result<ValidationMetrics> {
        let model = self
            .models
            .get_mut(&model_type)
            .ok_or_else(|| Error::not_found(EntityKind::Model, model_type))?;
        let metrics = model.validate(scenarios);
        model.validation = metrics;
        model.last_validated = Some(at);
        Ok(metrics)
    }

    pub fn set_status(&mut self, model_type: ModelType, status: ModelStatus) -> Result<()> {
        let model = self
            .models
            .get_mut(&model_type)
            .ok_or_else(|| Error::not_found(EntityKind::Model, model_type))?;
        if !model.status.can_transition_to(status) {
            return Err(Error::Validation(format!(
                "model {} cannot move from {:?} to {:?}",
                model_type, model.status, status
            )));
        }
        model.status = status;
        Ok(())
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use psycho_core::{ProfileId, SimClock};
    use uuid::Uuid;

    fn profile() -> PsychologicalProfile {
        PsychologicalProfile::baseline(ProfileId(Uuid::nil()), 50.0, SimClock::default().now())
    }

    fn apply(t: ModelType, ctx: DecisionContext) -> f64 {
        ModelRegistry::with_defaults().apply(t, &profile(), &ctx).unwrap()
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(matches!("astrology".parse::<ModelType>(), Err(Error::UnknownModel(_))));
        assert_eq!("Prospect-Theory".parse::<ModelType>().ok(), Some(ModelType::ProspectTheory));
    }

    #[test]
    fn test_unregistered_model_not_found() {
        let registry = ModelRegistry::empty();
        let err = registry
            .apply(ModelType::Framing, &profile(), &DecisionContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: EntityKind::Model, .. }));
    }

    #[test]
    fn test_prospect_losses_loom_larger() {
        let outcome = |x| DecisionContext { outcome: Some(x), ..Default::default() };
        let gain = apply(ModelType::ProspectTheory, outcome(100.0));
        let loss = apply(ModelType::ProspectTheory, outcome(-100.0));
        assert_relative_eq!(gain, 100f64.powf(0.88), epsilon = 1e-9);
        // neutral loss aversion keeps lambda at 2.25
        assert_relative_eq!(loss, -2.25 * 100f64.powf(0.88), epsilon = 1e-9);
    }

    #[test]
    fn test_probability_weighting_shape() {
        assert_eq!(probability_weight(0.0, 0.61), 0.0);
        assert_eq!(probability_weight(1.0, 0.61), 1.0);
        // small probabilities overweighted, large ones underweighted
        assert!(probability_weight(0.05, 0.61) > 0.05);
        assert!(probability_weight(0.9, 0.61) < 0.9);
    }

    #[test]
    fn test_anchoring_partial_adjustment() {
        let v = apply(
            ModelType::Anchoring,
            DecisionContext { anchor: Some(100.0), true_value: Some(200.0), ..Default::default() },
        );
        assert_relative_eq!(v, 160.0, epsilon = 1e-9);
    }

    #[test]
    fn test_framing_directions() {
        let framed = |frame| DecisionContext {
            outcome: Some(100.0),
            frame: Some(frame),
            ..Default::default()
        };
        let gain = apply(ModelType::Framing, framed(Frame::Gain));
        let loss = apply(ModelType::Framing, framed(Frame::Loss));
        assert_relative_eq!(gain, 120.0, epsilon = 1e-9);
        assert_relative_eq!(loss, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_social_proof_monotonic_in_adoption() {
        let mut last = -1.0;
        for adoption in [0.0, 0.1, 0.3, 0.6, 1.0] {
            let v = apply(
                ModelType::SocialProof,
                DecisionContext {
                    peer_adoption: Some(adoption),
                    group_size: Some(10.0),
                    ..Default::default()
                },
            );
            assert!(v >= last);
            assert!((0.0..=100.0).contains(&v));
            last = v;
        }
    }

    #[test]
    fn test_mental_accounting_same_account_passthrough() {
        let same = apply(
            ModelType::MentalAccounting,
            DecisionContext { amount: Some(100.0), ..Default::default() },
        );
        let moved = apply(
            ModelType::MentalAccounting,
            DecisionContext {
                amount: Some(100.0),
                source_account: Some("bonus".into()),
                target_account: Some("rent".into()),
                ..Default::default()
            },
        );
        assert_eq!(same, 100.0);
        assert_relative_eq!(moved, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hyperbolic_present_bias() {
        let delayed = |days| DecisionContext {
            reward: Some(100.0),
            delay: Some(days),
            ..Default::default()
        };
        let now = apply(ModelType::HyperbolicDiscounting, delayed(0.0));
        let later = apply(ModelType::HyperbolicDiscounting, delayed(10.0));
        assert_eq!(now, 100.0);
        assert_relative_eq!(later, 0.7 * 100.0 / 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_context_rejected() {
        let registry = ModelRegistry::with_defaults();
        let ctx = DecisionContext { probability: Some(2.0), ..Default::default() };
        assert!(registry.apply(ModelType::ProspectTheory, &profile(), &ctx).is_err());
    }

    #[test]
    fn test_validation_metrics() {
        let model = BehavioralEconomicsModel::new(ModelType::Framing);
        let scenario = |outcome: f64, expected: bool| ValidationScenario {
            profile: profile(),
            context: DecisionContext { outcome: Some(outcome), ..Default::default() },
            threshold: 50.0,
            expected,
        };
        let metrics = model.validate(&[
            scenario(80.0, true),
            scenario(20.0, false),
            scenario(90.0, false),
            scenario(10.0, true),
        ]);
        assert_eq!(metrics.sample_size, 4);
        assert_relative_eq!(metrics.accuracy, 50.0);
        assert_relative_eq!(metrics.precision, 50.0);
        assert_relative_eq!(metrics.recall, 50.0);
    }

    #[test]
    fn test_status_lifecycle() {
        let mut registry = ModelRegistry::with_defaults();
        assert!(registry.set_status(ModelType::Anchoring, ModelStatus::Production).is_ok());
        assert!(registry.set_status(ModelType::Anchoring, ModelStatus::Validated).is_err());
        assert!(registry.set_status(ModelType::Anchoring, ModelStatus::Deprecated).is_ok());
        assert!(registry.set_status(ModelType::Anchoring, ModelStatus::Production).is_err());
    }
}
