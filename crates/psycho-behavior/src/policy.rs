//! Population reaction to policies.
//!
//! Every active profile is run through the same pipeline: value alignment
//! and source trust give a signed reaction score, which drives the initial
//! reaction, the predicted behaviors, and a four-phase adaptation timeline
//! scaled by the policy's transition period. A profile that cannot be
//! analyzed becomes an [`ItemFailure`] and the batch carries on.

use chrono::{DateTime, Utc};
use psycho_core::stats::{bounded, signed};
use psycho_core::{
    BatchOutcome, Error, ItemFailure, ProfileId, PsychologicalProfile, Result, ValueKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transition period assumed when a policy does not name one
pub const DEFAULT_TRANSITION_DAYS: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Regulatory,
    Economic,
    Social,
    Health,
    Environmental,
    Workplace,
    Security,
    Cultural,
}

impl PolicyType {
    pub const ALL: [PolicyType; 8] = [
        PolicyType::Regulatory,
        PolicyType::Economic,
        PolicyType::Social,
        PolicyType::Health,
        PolicyType::Environmental,
        PolicyType::Workplace,
        PolicyType::Security,
        PolicyType::Cultural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyType::Regulatory => "regulatory",
            PolicyType::Economic => "economic",
            PolicyType::Social => "social",
            PolicyType::Health => "health",
            PolicyType::Environmental => "environmental",
            PolicyType::Workplace => "workplace",
            PolicyType::Security => "security",
            PolicyType::Cultural => "cultural",
        }
    }

    pub fn default_promoted(&self) -> &'static [ValueKind] {
        use ValueKind::*;
        match self {
            PolicyType::Regulatory => &[Security, Conformity],
            PolicyType::Economic => &[Achievement, Power],
            PolicyType::Social => &[Universalism, Benevolence],
            PolicyType::Health => &[Security, Benevolence],
            PolicyType::Environmental => &[Universalism],
            PolicyType::Workplace => &[Achievement, SelfDirection],
            PolicyType::Security => &[Security, Conformity, Tradition],
            PolicyType::Cultural => &[Tradition, Conformity],
        }
    }

    pub fn default_threatened(&self) -> &'static [ValueKind] {
        use ValueKind::*;
        match self {
            PolicyType::Regulatory => &[SelfDirection, Stimulation],
            PolicyType::Economic => &[Security],
            PolicyType::Social => &[Power, Tradition],
            PolicyType::Health => &[Hedonism, SelfDirection],
            PolicyType::Environmental => &[Power, Hedonism],
            PolicyType::Workplace => &[Tradition],
            PolicyType::Security => &[SelfDirection, Universalism],
            PolicyType::Cultural => &[Stimulation, SelfDirection],
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PolicyType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Validation(format!("unknown policy type: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDetails {
    pub name: String,
    pub policy_type: PolicyType,
    /// How much the policy touches daily life, 0–100
    #[serde(default = "default_level")]
    pub impact_level: f64,
    #[serde(default = "default_level")]
    pub enforcement_level: f64,
    #[serde(default = "default_level")]
    pub complexity: f64,
    /// Personal economic effect, -100 to 100
    #[serde(default)]
    pub economic_impact: Option<f64>,
    /// Overrides the per-type defaults when present
    #[serde(default)]
    pub promoted_values: Option<Vec<ValueKind>>,
    #[serde(default)]
    pub threatened_values: Option<Vec<ValueKind>>,
    /// Trust in the issuing authority; derived per profile when absent
    #[serde(default)]
    pub source_trust: Option<f64>,
    #[serde(default)]
    pub transition_period_days: Option<f64>,
}

fn default_level() -> f64 {
    50.0
}

impl PolicyDetails {
    pub fn new(name: impl Into<String>, policy_type: PolicyType) -> Self {
        Self {
            name: name.into(),
            policy_type,
            impact_level: default_level(),
            enforcement_level: default_level(),
            complexity: default_level(),
            economic_impact: None,
            promoted_values: None,
            threatened_values: None,
            source_trust: None,
            transition_period_days: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("impact_level", self.impact_level),
            ("enforcement_level", self.enforcement_level),
            ("complexity", self.complexity),
        ] {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(Error::Validation(format!("{name} must be within [0, 100]")));
            }
        }
        if let Some(t) = self.source_trust {
            if !t.is_finite() || !(0.0..=100.0).contains(&t) {
                return Err(Error::Validation("source_trust must be within [0, 100]".into()));
            }
        }
        if let Some(e) = self.economic_impact {
            if !e.is_finite() || !(-100.0..=100.0).contains(&e) {
                return Err(Error::Validation("economic_impact must be within [-100, 100]".into()));
            }
        }
        if let Some(d) = self.transition_period_days {
            if !d.is_finite() || d <= 0.0 {
                return Err(Error::Validation("transition_period_days must be positive".into()));
            }
        }
        Ok(())
    }

    pub fn promoted(&self) -> &[ValueKind] {
        self.promoted_values
            .as_deref()
            .unwrap_or_else(|| self.policy_type.default_promoted())
    }

    pub fn threatened(&self) -> &[ValueKind] {
        self.threatened_values
            .as_deref()
            .unwrap_or_else(|| self.policy_type.default_threatened())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyReaction {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Confused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    Prediction,
    Observed,
    Survey,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveProcessing {
    pub comprehension: f64,
    pub personal_relevance: f64,
    pub fairness_perception: f64,
    pub trust_in_source: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedBehaviors {
    pub compliance: f64,
    pub support: f64,
    pub advocacy: f64,
    pub resistance: f64,
    pub avoidance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub duration_days: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationPhases {
    pub shock: Phase,
    pub resistance: Phase,
    pub exploration: Phase,
    pub commitment: Phase,
}

impl AdaptationPhases {
    pub fn total_days(&self) -> f64 {
        self.shock.duration_days
            + self.resistance.duration_days
            + self.exploration.duration_days
            + self.commitment.duration_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfluenceFactors {
    pub personal_experience: f64,
    pub social_pressure: f64,
    pub authority_influence: f64,
    pub media_influence: f64,
    pub economic_self_interest: f64,
}

/// Signed, -100 to 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongTermEffects {
    pub trust_in_institutions: f64,
    pub social_cohesion: f64,
    pub economic_behavior: f64,
    pub political_engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPsychologyResponse {
    pub policy_id: String,
    pub policy_type: PolicyType,
    pub profile_id: ProfileId,
    pub initial_reaction: PolicyReaction,
    pub reaction_intensity: f64,
    pub reaction_speed: f64,
    pub cognitive_processing: CognitiveProcessing,
    pub predicted_behaviors: PredictedBehaviors,
    pub adaptation_phases: AdaptationPhases,
    pub influence_factors: InfluenceFactors,
    pub long_term_effects: LongTermEffects,
    pub confidence: f64,
    pub data_source: DataSource,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PolicyResponseAnalyzer {
    min_data_quality: f64,
}

impl PolicyResponseAnalyzer {
    pub fn new(min_data_quality: f64) -> Self {
        Self { min_data_quality }
    }

    /// Analyze every active profile. Invalid details fail the whole call;
    /// a profile that cannot be analyzed is reported and skipped.
    pub fn analyze<'a, I>(
        &self,
        policy_id: &str,
        details: &PolicyDetails,
        profiles: I,
        at: DateTime<Utc>,
    ) -> Result<BatchOutcome<PolicyPsychologyResponse>>
    where
        I: IntoIterator<Item = &'a PsychologicalProfile>,
    {
        if policy_id.trim().is_empty() {
            return Err(Error::Validation("policy id must not be empty".into()));
        }
        details.validate()?;

        let outcome: BatchOutcome<_> = profiles
            .into_iter()
            .filter(|p| p.active)
            .map(|p| self.analyze_one(policy_id, details, p, at))
            .collect();

        for ItemFailure { item_id, reason } in &outcome.failures {
            tracing::warn!("Policy {} skipped profile {}: {}", policy_id, item_id, reason);
        }
        tracing::info!(
            "Analyzed policy {} ({}): {} responses, {} failures",
            policy_id,
            details.policy_type,
            outcome.results.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    pub fn analyze_one(
        &self,
        policy_id: &str,
        details: &PolicyDetails,
        profile: &PsychologicalProfile,
        at: DateTime<Utc>,
    ) -> Result<PolicyPsychologyResponse> {
        if profile.data_quality < self.min_data_quality {
            return Err(Error::PartialComputation {
                item: profile.id.to_string(),
                reason: format!(
                    "data quality {:.1} below minimum {:.1}",
                    profile.data_quality, self.min_data_quality
                ),
            });
        }

        let traits = &profile.personality;
        let social = &profile.social_psychology;
        let biases = &profile.cognitive_biases;
        let emotional = &profile.emotional_profile;
        let values = &profile.motivation_system.values;
        let economic_impact = details.economic_impact.unwrap_or(0.0);

        let promoted = values.mean_of(details.promoted());
        let threatened = values.mean_of(details.threatened());
        let alignment = promoted.unwrap_or(50.0) - threatened.unwrap_or(50.0);
        let trust = details
            .source_trust
            .unwrap_or(0.6 * social.authority_respect + 0.4 * social.social_trust);
        let score = 0.6 * alignment + 0.4 * (trust - 50.0);
        if !score.is_finite() {
            return Err(Error::PartialComputation {
                item: profile.id.to_string(),
                reason: "reaction score is not finite".into(),
            });
        }

        let cognitive_processing = CognitiveProcessing {
            comprehension: bounded(
                0.4 * profile.learning_profile.learning_speed
                    + 0.3 * traits.openness
                    + 0.3 * profile.risk_profile.information_seeking
                    - 0.5 * (details.complexity - 50.0),
            ),
            personal_relevance: bounded(0.6 * details.impact_level + 0.4 * economic_impact.abs()),
            fairness_perception: bounded(50.0 + 0.5 * alignment),
            trust_in_source: bounded(trust),
        };

        let initial_reaction = if cognitive_processing.comprehension < 30.0 {
            PolicyReaction::Confused
        } else if promoted.is_some_and(|v| v > 60.0) && threatened.is_some_and(|v| v > 60.0) {
            PolicyReaction::Mixed
        } else if score > 10.0 {
            PolicyReaction::Positive
        } else if score < -10.0 {
            PolicyReaction::Negative
        } else {
            PolicyReaction::Neutral
        };

        let support = bounded(50.0 + score);
        let compliance = bounded(
            0.3 * traits.conscientiousness
                + 0.3 * social.authority_respect
                + 0.2 * details.enforcement_level
                + 0.2 * support,
        );
        let defiance = 0.4 + 0.6 * (100.0 - traits.agreeableness) / 100.0;
        let resistance = bounded((50.0 - score) * defiance);
        let predicted_behaviors = PredictedBehaviors {
            compliance,
            support,
            advocacy: bounded(support * (0.4 + 0.6 * traits.extraversion / 100.0)),
            resistance,
            avoidance: bounded(
                0.4 * (100.0 - compliance)
                    + 0.3 * biases.status_quo_bias
                    + 0.3 * (100.0 - details.enforcement_level),
            ),
        };

        let reaction_intensity = bounded(
            0.8 * score.abs() + 0.3 * details.impact_level + 0.1 * traits.neuroticism,
        );
        let base = details.transition_period_days.unwrap_or(DEFAULT_TRANSITION_DAYS);
        let inertia = (biases.status_quo_bias + (100.0 - emotional.adaptability_to_change)) / 200.0;
        let adaptation_phases = AdaptationPhases {
            shock: Phase {
                duration_days: base * 0.05 * (0.5 + traits.neuroticism / 100.0),
                intensity: bounded(reaction_intensity * (0.5 + traits.neuroticism / 200.0)),
            },
            resistance: Phase {
                duration_days: base * 0.25 * (0.5 + inertia),
                intensity: resistance,
            },
            exploration: Phase {
                duration_days: base * 0.3 * (1.5 - traits.openness / 100.0),
                intensity: bounded(
                    0.5 * traits.openness + 0.5 * profile.learning_profile.curiosity_level,
                ),
            },
            commitment: Phase {
                duration_days: base * 0.4 * (1.5 - emotional.adaptability_to_change / 100.0),
                intensity: compliance,
            },
        };

        let influence_factors = InfluenceFactors {
            personal_experience: cognitive_processing.personal_relevance,
            social_pressure: bounded(0.6 * social.social_influence + 0.4 * biases.herding),
            authority_influence: social.authority_respect,
            media_influence: bounded(
                0.5 * biases.availability_heuristic + 0.5 * biases.framing_effect,
            ),
            economic_self_interest: bounded(
                0.25 * (values.power + values.achievement) + 0.5 * economic_impact.abs(),
            ),
        };

        let long_term_effects = LongTermEffects {
            trust_in_institutions: signed(0.3 * score + 0.2 * (trust - 50.0)),
            social_cohesion: signed(0.2 * score * traits.agreeableness / 50.0),
            economic_behavior: signed(
                0.5 * economic_impact * profile.risk_profile.risk_tolerance / 100.0,
            ),
            political_engagement: signed(0.3 * score.abs() + 0.2 * (traits.extraversion - 50.0)),
        };

        Ok(PolicyPsychologyResponse {
            policy_id: policy_id.to_string(),
            policy_type: details.policy_type,
            profile_id: profile.id,
            initial_reaction,
            reaction_intensity,
            reaction_speed: bounded(
                0.6 * profile.risk_profile.decision_speed + 0.4 * traits.extraversion,
            ),
            cognitive_processing,
            predicted_behaviors,
            adaptation_phases,
            influence_factors,
            long_term_effects,
            confidence: bounded(40.0 + 0.4 * profile.data_quality),
            data_source: DataSource::Prediction,
            assessed_at: at,
        })
    }
}

impl Default for PolicyResponseAnalyzer {
    fn default() -> Self {
        Self::new(20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_core::SimClock;
    use uuid::Uuid;

    fn profile(n: u128, level: f64) -> PsychologicalProfile {
        let at = SimClock::default().now();
        PsychologicalProfile::baseline(ProfileId(Uuid::from_u128(n)), level, at)
    }

    fn now() -> DateTime<Utc> {
        SimClock::default().now()
    }

    #[test]
    fn test_parse_policy_type() {
        assert_eq!("Environmental".parse::<PolicyType>().ok(), Some(PolicyType::Environmental));
        assert!("lottery".parse::<PolicyType>().is_err());
    }

    #[test]
    fn test_failing_profile_reported_rest_analyzed() {
        let mut weak = profile(2, 50.0);
        weak.data_quality = 5.0;
        let profiles = vec![profile(1, 50.0), weak, profile(3, 50.0)];
        let details = PolicyDetails::new("Carbon tax", PolicyType::Environmental);
        let outcome = PolicyResponseAnalyzer::default()
            .analyze("carbon-tax", &details, &profiles, now())
            .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].item_id, profiles[1].id.to_string());
    }

    #[test]
    fn test_inactive_profiles_skipped() {
        let mut retired = profile(1, 50.0);
        retired.active = false;
        let outcome = PolicyResponseAnalyzer::default()
            .analyze("p", &PolicyDetails::new("p", PolicyType::Social), [&retired], now())
            .unwrap();
        assert!(outcome.results.is_empty());
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_invalid_details_rejected() {
        let mut details = PolicyDetails::new("p", PolicyType::Health);
        details.source_trust = Some(150.0);
        let err = PolicyResponseAnalyzer::default()
            .analyze("p", &details, [&profile(1, 50.0)], now())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_value_alignment_drives_reaction() {
        let mut green = profile(1, 50.0);
        green.motivation_system.values.universalism = 95.0;
        green.motivation_system.values.power = 10.0;
        green.motivation_system.values.hedonism = 10.0;
        let mut brown = profile(2, 50.0);
        brown.motivation_system.values.universalism = 10.0;
        brown.motivation_system.values.power = 95.0;
        brown.motivation_system.values.hedonism = 90.0;

        let analyzer = PolicyResponseAnalyzer::default();
        let details = PolicyDetails::new("Clean air", PolicyType::Environmental);
        let g = analyzer.analyze_one("p", &details, &green, now()).unwrap();
        let b = analyzer.analyze_one("p", &details, &brown, now()).unwrap();
        assert_eq!(g.initial_reaction, PolicyReaction::Positive);
        assert_eq!(b.initial_reaction, PolicyReaction::Negative);
        assert!(g.predicted_behaviors.support > b.predicted_behaviors.support);
        assert!(b.predicted_behaviors.resistance > g.predicted_behaviors.resistance);
        assert!(g.long_term_effects.trust_in_institutions > 0.0);
    }

    #[test]
    fn test_mixed_and_confused_reactions() {
        let analyzer = PolicyResponseAnalyzer::default();
        let details = PolicyDetails::new("Everything act", PolicyType::Regulatory);
        let torn = profile(1, 80.0);
        assert_eq!(
            analyzer.analyze_one("p", &details, &torn, now()).unwrap().initial_reaction,
            PolicyReaction::Mixed
        );

        let lost = profile(2, 20.0);
        let mut complex = details.clone();
        complex.complexity = 90.0;
        assert_eq!(
            analyzer.analyze_one("p", &complex, &lost, now()).unwrap().initial_reaction,
            PolicyReaction::Confused
        );
    }

    #[test]
    fn test_phases_scale_with_transition_period() {
        let analyzer = PolicyResponseAnalyzer::default();
        let p = profile(1, 50.0);
        let mut details = PolicyDetails::new("p", PolicyType::Workplace);
        let default = analyzer.analyze_one("p", &details, &p, now()).unwrap();
        details.transition_period_days = Some(180.0);
        let long = analyzer.analyze_one("p", &details, &p, now()).unwrap();
        let ratio = long.adaptation_phases.total_days() / default.adaptation_phases.total_days();
        assert!((ratio - 2.0).abs() < 1e-9);
        // neutral profile: 4.5 + 22.5 + 27 + 36 days
        assert!((default.adaptation_phases.total_days() - 90.0).abs() < 1e-9);
    }
}
