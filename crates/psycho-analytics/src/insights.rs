//! Behavioral-economics and predictive insights.

use psycho_behavior::{
    BehavioralEconomicsModel, BehavioralResponse, DecisionContext, Frame, ModelStatus, ModelType,
    PolicyPsychologyResponse, PolicyReaction, ValidationMetrics,
};
use psycho_core::stats::{mean, percentage};
use psycho_core::PsychologicalProfile;
use psycho_social::SocialDynamics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bias level above which a bias counts as active
pub const BIAS_ACTIVE: f64 = 60.0;

/// Mean behavior change beyond which a trend is reported as moving
pub const TREND_THRESHOLD: f64 = 5.0;

/// Responses needed before trend confidence saturates
pub const TREND_SATURATION: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_type: ModelType,
    pub status: ModelStatus,
    /// `None` for a model with no validation evidence
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicsInsights {
    /// Percent of profiles with each bias above the activation level
    pub bias_activation: BTreeMap<String, f64>,
    /// Percent of profiles per decision style
    pub decision_patterns: BTreeMap<String, f64>,
    /// Percent of profiles per risk-tolerance band
    pub risk_levels: BTreeMap<String, f64>,
    /// Mean social-proof pull at reference adoption levels
    pub social_influence: BTreeMap<String, f64>,
    /// Mean perceived value of a 100-unit outcome under each frame
    pub framing_effectiveness: BTreeMap<String, f64>,
    pub prospect_validation: Option<ValidationMetrics>,
    pub models: Vec<ModelSummary>,
}

fn band(value: f64, low: &'static str, mid: &'static str, high: &'static str) -> &'static str {
    if value < 40.0 {
        low
    } else if value > 60.0 {
        high
    } else {
        mid
    }
}

fn shares(labels: impl Iterator<Item = &'static str>, total: usize) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), percentage(n, total)))
        .collect()
}

fn has_evidence(model: &BehavioralEconomicsModel) -> bool {
    model.validation.sample_size > 0 && model.status != ModelStatus::Deprecated
}

/// Mean model output over profiles; failed evaluations are left out
fn mean_output(
    model: &BehavioralEconomicsModel,
    profiles: &[&PsychologicalProfile],
    ctx: &DecisionContext,
) -> Option<f64> {
    let values: Vec<f64> = profiles
        .iter()
        .filter_map(|p| model.apply(p, ctx).ok())
        .collect();
    (!values.is_empty()).then(|| mean(&values))
}

pub fn economics(
    profiles: &[&PsychologicalProfile],
    models: &[&BehavioralEconomicsModel],
) -> EconomicsInsights {
    let mut models: Vec<&BehavioralEconomicsModel> = models.to_vec();
    models.sort_by_key(|m| m.model_type);
    let summaries = models
        .iter()
        .map(|m| ModelSummary {
            model_type: m.model_type,
            status: m.status,
            accuracy: has_evidence(m).then_some(m.validation.accuracy),
        })
        .collect();
    let find = |t: ModelType| models.iter().copied().find(|m| m.model_type == t);

    let prospect_validation = find(ModelType::ProspectTheory)
        .filter(|m| has_evidence(m))
        .map(|m| m.validation);

    if profiles.is_empty() {
        return EconomicsInsights {
            prospect_validation,
            models: summaries,
            ..Default::default()
        };
    }

    let n = profiles.len();
    let mut bias_activation = BTreeMap::new();
    for i in 0..7 {
        let name = profiles[0].cognitive_biases.named()[i].0;
        let active = profiles
            .iter()
            .filter(|p| p.cognitive_biases.named()[i].1 > BIAS_ACTIVE)
            .count();
        bias_activation.insert(name.to_string(), percentage(active, n));
    }

    let decision_patterns = shares(
        profiles
            .iter()
            .map(|p| band(p.risk_profile.decision_speed, "deliberative", "balanced", "intuitive")),
        n,
    );
    let risk_levels = shares(
        profiles
            .iter()
            .map(|p| band(p.risk_profile.risk_tolerance, "low", "moderate", "high")),
        n,
    );

    let mut social_influence = BTreeMap::new();
    if let Some(model) = find(ModelType::SocialProof) {
        for (label, adoption) in [("minority", 0.1), ("threshold", 0.3), ("majority", 0.6)] {
            let ctx = DecisionContext {
                peer_adoption: Some(adoption),
                ..Default::default()
            };
            if let Some(v) = mean_output(model, profiles, &ctx) {
                social_influence.insert(label.to_string(), v);
            }
        }
    }

    let mut framing_effectiveness = BTreeMap::new();
    if let Some(model) = find(ModelType::Framing) {
        for (label, frame) in [("gain", Frame::Gain), ("loss", Frame::Loss)] {
            let ctx = DecisionContext {
                outcome: Some(100.0),
                frame: Some(frame),
                ..Default::default()
            };
            if let Some(v) = mean_output(model, profiles, &ctx) {
                framing_effectiveness.insert(label.to_string(), v);
            }
        }
    }

    EconomicsInsights {
        bias_activation,
        decision_patterns,
        risk_levels,
        social_influence,
        framing_effectiveness,
        prospect_validation,
        models: summaries,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    /// Most common initial reaction; ties go to the first reaction in
    /// declaration order
    pub predicted_outcome: PolicyReaction,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPrediction {
    pub direction: TrendDirection,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub impact: f64,
    pub mitigation: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictiveInsights {
    /// Mean accuracy of models with validation evidence
    pub behavior_prediction_accuracy: Option<f64>,
    pub policy_outcomes: BTreeMap<String, PolicyOutcome>,
    /// Keyed `domain.behavior`
    pub social_trends: BTreeMap<String, TrendPrediction>,
    /// Only risks backed by data are present
    pub risk_assessments: BTreeMap<String, RiskAssessment>,
}

pub fn predictive(
    profiles: &[&PsychologicalProfile],
    responses: &[&BehavioralResponse],
    dynamics: &[&SocialDynamics],
    policy_responses: &[&PolicyPsychologyResponse],
    models: &[&BehavioralEconomicsModel],
) -> PredictiveInsights {
    let accuracies: Vec<f64> = models
        .iter()
        .filter(|m| has_evidence(m))
        .map(|m| m.validation.accuracy)
        .collect();
    let behavior_prediction_accuracy = (!accuracies.is_empty()).then(|| mean(&accuracies));

    let mut by_policy: BTreeMap<&str, Vec<&PolicyPsychologyResponse>> = BTreeMap::new();
    for r in policy_responses {
        by_policy.entry(r.policy_id.as_str()).or_default().push(*r);
    }
    let policy_outcomes = by_policy
        .into_iter()
        .map(|(id, group)| {
            let mut counts: BTreeMap<PolicyReaction, usize> = BTreeMap::new();
            for r in &group {
                *counts.entry(r.initial_reaction).or_default() += 1;
            }
            let mut predicted = PolicyReaction::Neutral;
            let mut best = 0;
            for (reaction, n) in counts {
                if n > best {
                    predicted = reaction;
                    best = n;
                }
            }
            let confidence = mean(&group.iter().map(|r| r.confidence).collect::<Vec<_>>());
            (
                id.to_string(),
                PolicyOutcome {
                    predicted_outcome: predicted,
                    confidence: confidence * best as f64 / group.len() as f64,
                },
            )
        })
        .collect();

    let mut social_trends = BTreeMap::new();
    if !responses.is_empty() {
        let coverage = (responses.len() as f64 / TREND_SATURATION as f64).min(1.0);
        let confidence =
            coverage * mean(&responses.iter().map(|r| r.confidence).collect::<Vec<_>>());
        let mut sums: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for r in responses {
            for (domain, behavior, value) in r.behavior_changes.entries() {
                sums.entry(format!("{domain}.{behavior}")).or_default().push(value);
            }
        }
        for (key, values) in sums {
            let change = mean(&values);
            let direction = if change > TREND_THRESHOLD {
                TrendDirection::Increasing
            } else if change < -TREND_THRESHOLD {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            };
            social_trends.insert(key, TrendPrediction { direction, confidence });
        }
    }

    let mut risk_assessments = BTreeMap::new();
    if !policy_responses.is_empty() {
        let opposed: Vec<f64> = policy_responses
            .iter()
            .filter(|r| r.initial_reaction == PolicyReaction::Negative)
            .map(|r| r.predicted_behaviors.resistance)
            .collect();
        risk_assessments.insert(
            "policy_resistance".to_string(),
            RiskAssessment {
                probability: percentage(opposed.len(), policy_responses.len()),
                impact: mean(&opposed),
                mitigation: vec![
                    "explain the policy rationale".to_string(),
                    "engage trusted community leaders".to_string(),
                ],
            },
        );
    }
    if !dynamics.is_empty() {
        let polarization: Vec<f64> = dynamics.iter().map(|d| d.phenomena.polarization).collect();
        let polarized = polarization.iter().filter(|p| **p > 60.0).count();
        risk_assessments.insert(
            "social_polarization".to_string(),
            RiskAssessment {
                probability: percentage(polarized, dynamics.len()),
                impact: mean(&polarization),
                mitigation: vec!["cross-group dialogue programs".to_string()],
            },
        );
    }
    if !profiles.is_empty() {
        let fragile = profiles
            .iter()
            .filter(|p| p.emotional_profile.emotional_stability < 40.0)
            .count();
        let strain: Vec<f64> = profiles
            .iter()
            .map(|p| 100.0 - p.emotional_profile.stress_resilience)
            .collect();
        risk_assessments.insert(
            "collective_anxiety".to_string(),
            RiskAssessment {
                probability: percentage(fragile, profiles.len()),
                impact: mean(&strain),
                mitigation: vec![
                    "stress support services".to_string(),
                    "transparent public communication".to_string(),
                ],
            },
        );
    }

    PredictiveInsights {
        behavior_prediction_accuracy,
        policy_outcomes,
        social_trends,
        risk_assessments,
    }
}

/// Mean quality per data type; types with no records are absent
pub fn data_quality(
    profiles: &[&PsychologicalProfile],
    responses: &[&BehavioralResponse],
    policy_responses: &[&PolicyPsychologyResponse],
) -> BTreeMap<String, f64> {
    let mut metrics = BTreeMap::new();
    if !profiles.is_empty() {
        let dq: Vec<f64> = profiles.iter().map(|p| p.data_quality).collect();
        metrics.insert("profiles".to_string(), mean(&dq));
    }
    if !responses.is_empty() {
        let c: Vec<f64> = responses.iter().map(|r| r.confidence).collect();
        metrics.insert("responses".to_string(), mean(&c));
    }
    if !policy_responses.is_empty() {
        let c: Vec<f64> = policy_responses.iter().map(|r| r.confidence).collect();
        metrics.insert("policy_responses".to_string(), mean(&c));
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use psycho_behavior::ModelRegistry;
    use psycho_core::{ProfileId, SimClock};
    use uuid::Uuid;

    fn profile(n: u128, level: f64) -> PsychologicalProfile {
        let at = SimClock::default().now();
        PsychologicalProfile::baseline(ProfileId(Uuid::from_u128(n)), level, at)
    }

    #[test]
    fn test_economics_without_data() {
        let insights = economics(&[], &[]);
        assert_eq!(insights, EconomicsInsights::default());
        let predictive = predictive(&[], &[], &[], &[], &[]);
        assert_eq!(predictive, PredictiveInsights::default());
        assert!(data_quality(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_bias_and_risk_bands() {
        let people = [profile(1, 30.0), profile(2, 50.0), profile(3, 70.0), profile(4, 70.0)];
        let refs: Vec<&PsychologicalProfile> = people.iter().collect();
        let insights = economics(&refs, &[]);
        assert_eq!(insights.bias_activation["herding"], 50.0);
        assert_eq!(insights.risk_levels["low"], 25.0);
        assert_eq!(insights.risk_levels["moderate"], 25.0);
        assert_eq!(insights.risk_levels["high"], 50.0);
        assert_eq!(insights.decision_patterns["intuitive"], 50.0);
        assert!(insights.framing_effectiveness.is_empty());
        assert_eq!(insights.prospect_validation, None);
    }

    #[test]
    fn test_registered_models_feed_insights() {
        let registry = ModelRegistry::with_defaults();
        let models: Vec<&BehavioralEconomicsModel> = registry.models().collect();
        let people = [profile(1, 50.0)];
        let refs: Vec<&PsychologicalProfile> = people.iter().collect();

        let insights = economics(&refs, &models);
        assert_eq!(insights.models.len(), 6);
        assert_eq!(insights.prospect_validation.map(|v| v.accuracy), Some(75.0));
        assert_relative_eq!(insights.framing_effectiveness["gain"], 120.0, epsilon = 1e-9);
        assert_relative_eq!(insights.framing_effectiveness["loss"], 80.0, epsilon = 1e-9);
        assert!(insights.social_influence["majority"] > insights.social_influence["minority"]);

        let predictive = predictive(&refs, &[], &[], &[], &models);
        assert_eq!(predictive.behavior_prediction_accuracy, Some(71.5));
        assert!(predictive.social_trends.is_empty());
        assert!(predictive.risk_assessments.contains_key("collective_anxiety"));
        assert!(!predictive.risk_assessments.contains_key("policy_resistance"));
    }
}
