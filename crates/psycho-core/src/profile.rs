//! Psychological profile data model.
//!
//! Every numeric field is on the bounded 0–100 scale. [`PsychologicalProfile::normalize`]
//! re-establishes that invariant and must run after any mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ocean::{PersonalityArchetype, PersonalityTraits};
use crate::stats::bounded;
use crate::types::ProfileId;

fn clamp_all<const N: usize>(fields: [&mut f64; N]) {
    for f in fields {
        *f = bounded(*f);
    }
}

/// Risk and decision-making style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_tolerance: f64,
    pub loss_aversion: f64,
    /// Patience; high values discount the future less
    pub time_preference: f64,
    pub uncertainty_tolerance: f64,
    pub decision_speed: f64,
    pub information_seeking: f64,
}

impl RiskProfile {
    pub fn from_array(v: [f64; 6]) -> Self {
        let mut r = Self {
            risk_tolerance: v[0],
            loss_aversion: v[1],
            time_preference: v[2],
            uncertainty_tolerance: v[3],
            decision_speed: v[4],
            information_seeking: v[5],
        };
        r.normalize();
        r
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.risk_tolerance,
            self.loss_aversion,
            self.time_preference,
            self.uncertainty_tolerance,
            self.decision_speed,
            self.information_seeking,
        ]
    }

    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("risk_tolerance", self.risk_tolerance),
            ("loss_aversion", self.loss_aversion),
            ("time_preference", self.time_preference),
            ("uncertainty_tolerance", self.uncertainty_tolerance),
            ("decision_speed", self.decision_speed),
            ("information_seeking", self.information_seeking),
        ]
    }

    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.risk_tolerance,
            &mut self.loss_aversion,
            &mut self.time_preference,
            &mut self.uncertainty_tolerance,
            &mut self.decision_speed,
            &mut self.information_seeking,
        ]);
    }
}

/// Schwartz basic values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Security,
    Achievement,
    Hedonism,
    Stimulation,
    SelfDirection,
    Universalism,
    Benevolence,
    Tradition,
    Conformity,
    Power,
}

impl ValueKind {
    pub const ALL: [ValueKind; 10] = [
        ValueKind::Security,
        ValueKind::Achievement,
        ValueKind::Hedonism,
        ValueKind::Stimulation,
        ValueKind::SelfDirection,
        ValueKind::Universalism,
        ValueKind::Benevolence,
        ValueKind::Tradition,
        ValueKind::Conformity,
        ValueKind::Power,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Security => "security",
            ValueKind::Achievement => "achievement",
            ValueKind::Hedonism => "hedonism",
            ValueKind::Stimulation => "stimulation",
            ValueKind::SelfDirection => "self_direction",
            ValueKind::Universalism => "universalism",
            ValueKind::Benevolence => "benevolence",
            ValueKind::Tradition => "tradition",
            ValueKind::Conformity => "conformity",
            ValueKind::Power => "power",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScores {
    pub security: f64,
    pub achievement: f64,
    pub hedonism: f64,
    pub stimulation: f64,
    pub self_direction: f64,
    pub universalism: f64,
    pub benevolence: f64,
    pub tradition: f64,
    pub conformity: f64,
    pub power: f64,
}

impl ValueScores {
    pub fn get(&self, kind: ValueKind) -> f64 {
        match kind {
            ValueKind::Security => self.security,
            ValueKind::Achievement => self.achievement,
            ValueKind::Hedonism => self.hedonism,
            ValueKind::Stimulation => self.stimulation,
            ValueKind::SelfDirection => self.self_direction,
            ValueKind::Universalism => self.universalism,
            ValueKind::Benevolence => self.benevolence,
            ValueKind::Tradition => self.tradition,
            ValueKind::Conformity => self.conformity,
            ValueKind::Power => self.power,
        }
    }

    /// Mean score over `kinds`, or `None` when the list is empty
    pub fn mean_of(&self, kinds: &[ValueKind]) -> Option<f64> {
        if kinds.is_empty() {
            return None;
        }
        Some(kinds.iter().map(|k| self.get(*k)).sum::<f64>() / kinds.len() as f64)
    }

    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.security,
            &mut self.achievement,
            &mut self.hedonism,
            &mut self.stimulation,
            &mut self.self_direction,
            &mut self.universalism,
            &mut self.benevolence,
            &mut self.tradition,
            &mut self.conformity,
            &mut self.power,
        ]);
    }
}

/// Maslow need levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Physiological,
    Safety,
    Belonging,
    Esteem,
    SelfActualization,
}

impl NeedKind {
    pub const ALL: [NeedKind; 5] = [
        NeedKind::Physiological,
        NeedKind::Safety,
        NeedKind::Belonging,
        NeedKind::Esteem,
        NeedKind::SelfActualization,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotivationSystem {
    pub physiological_needs: f64,
    pub safety_needs: f64,
    pub belonging_needs: f64,
    pub esteem_needs: f64,
    pub self_actualization: f64,
    pub values: ValueScores,
}

impl MotivationSystem {
    pub fn need(&self, kind: NeedKind) -> f64 {
        match kind {
            NeedKind::Physiological => self.physiological_needs,
            NeedKind::Safety => self.safety_needs,
            NeedKind::Belonging => self.belonging_needs,
            NeedKind::Esteem => self.esteem_needs,
            NeedKind::SelfActualization => self.self_actualization,
        }
    }

    pub fn named_needs(&self) -> [(&'static str, f64); 5] {
        [
            ("physiological_needs", self.physiological_needs),
            ("safety_needs", self.safety_needs),
            ("belonging_needs", self.belonging_needs),
            ("esteem_needs", self.esteem_needs),
            ("self_actualization", self.self_actualization),
        ]
    }

    /// Mean of the five need levels
    pub fn need_satisfaction(&self) -> f64 {
        NeedKind::ALL.iter().map(|k| self.need(*k)).sum::<f64>() / 5.0
    }

    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.physiological_needs,
            &mut self.safety_needs,
            &mut self.belonging_needs,
            &mut self.esteem_needs,
            &mut self.self_actualization,
        ]);
        self.values.normalize();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialPsychology {
    pub social_influence: f64,
    pub authority_respect: f64,
    pub group_identity: f64,
    pub social_trust: f64,
    pub cultural_adaptability: f64,
    pub leadership_tendency: f64,
    pub cooperation_preference: f64,
}

impl SocialPsychology {
    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.social_influence,
            &mut self.authority_respect,
            &mut self.group_identity,
            &mut self.social_trust,
            &mut self.cultural_adaptability,
            &mut self.leadership_tendency,
            &mut self.cooperation_preference,
        ]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveBiases {
    pub confirmation_bias: f64,
    pub availability_heuristic: f64,
    pub anchoring_bias: f64,
    pub status_quo_bias: f64,
    pub optimism_bias: f64,
    pub herding: f64,
    pub framing_effect: f64,
}

impl CognitiveBiases {
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("confirmation_bias", self.confirmation_bias),
            ("availability_heuristic", self.availability_heuristic),
            ("anchoring_bias", self.anchoring_bias),
            ("status_quo_bias", self.status_quo_bias),
            ("optimism_bias", self.optimism_bias),
            ("herding", self.herding),
            ("framing_effect", self.framing_effect),
        ]
    }

    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.confirmation_bias,
            &mut self.availability_heuristic,
            &mut self.anchoring_bias,
            &mut self.status_quo_bias,
            &mut self.optimism_bias,
            &mut self.herding,
            &mut self.framing_effect,
        ]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalProfile {
    pub emotional_stability: f64,
    pub stress_resilience: f64,
    pub adaptability_to_change: f64,
    pub optimism_level: f64,
    pub empathy_level: f64,
    pub emotional_expression: f64,
}

impl EmotionalProfile {
    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.emotional_stability,
            &mut self.stress_resilience,
            &mut self.adaptability_to_change,
            &mut self.optimism_level,
            &mut self.empathy_level,
            &mut self.emotional_expression,
        ]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningProfile {
    pub learning_speed: f64,
    pub curiosity_level: f64,
    pub feedback_receptivity: f64,
    pub habit_formation: f64,
    pub innovation_tendency: f64,
}

impl LearningProfile {
    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.learning_speed,
            &mut self.curiosity_level,
            &mut self.feedback_receptivity,
            &mut self.habit_formation,
            &mut self.innovation_tendency,
        ]);
    }
}

/// Background label used when a profile carries none
pub const MIXED_BACKGROUND: &str = "Mixed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalIdentity {
    pub cultural_background: String,
    pub cultural_flexibility: f64,
    pub traditionalism: f64,
    pub modernization: f64,
    pub religiosity: f64,
    pub nationalism_level: f64,
}

impl CulturalIdentity {
    /// Background bucket for diversity statistics
    pub fn background_bucket(&self) -> &str {
        let trimmed = self.cultural_background.trim();
        if trimmed.is_empty() {
            MIXED_BACKGROUND
        } else {
            trimmed
        }
    }

    pub fn normalize(&mut self) {
        clamp_all([
            &mut self.cultural_flexibility,
            &mut self.traditionalism,
            &mut self.modernization,
            &mut self.religiosity,
            &mut self.nationalism_level,
        ]);
    }
}

/// Links to external simulation entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLinks {
    pub citizen_id: Option<String>,
    pub migrant_id: Option<String>,
    pub business_owner_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    #[default]
    Generated,
    Observed,
    Survey,
    Imported,
}

/// Complete psychological profile of one simulated agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalProfile {
    pub id: ProfileId,
    pub links: ProfileLinks,
    pub personality: PersonalityTraits,
    pub risk_profile: RiskProfile,
    pub motivation_system: MotivationSystem,
    pub social_psychology: SocialPsychology,
    pub cognitive_biases: CognitiveBiases,
    pub emotional_profile: EmotionalProfile,
    pub learning_profile: LearningProfile,
    pub cultural_identity: CulturalIdentity,
    pub archetype: Option<PersonalityArchetype>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_quality: f64,
    pub source: ProfileSource,
}

impl PsychologicalProfile {
    /// Profile with every attribute at `level` and no archetype
    pub fn baseline(id: ProfileId, level: f64, at: DateTime<Utc>) -> Self {
        let level = bounded(level);
        let values = ValueScores {
            security: level,
            achievement: level,
            hedonism: level,
            stimulation: level,
            self_direction: level,
            universalism: level,
            benevolence: level,
            tradition: level,
            conformity: level,
            power: level,
        };
        PsychologicalProfile {
            id,
            links: ProfileLinks::default(),
            personality: PersonalityTraits::new(level, level, level, level, level),
            risk_profile: RiskProfile::from_array([level; 6]),
            motivation_system: MotivationSystem {
                physiological_needs: level,
                safety_needs: level,
                belonging_needs: level,
                esteem_needs: level,
                self_actualization: level,
                values,
            },
            social_psychology: SocialPsychology {
                social_influence: level,
                authority_respect: level,
                group_identity: level,
                social_trust: level,
                cultural_adaptability: level,
                leadership_tendency: level,
                cooperation_preference: level,
            },
            cognitive_biases: CognitiveBiases {
                confirmation_bias: level,
                availability_heuristic: level,
                anchoring_bias: level,
                status_quo_bias: level,
                optimism_bias: level,
                herding: level,
                framing_effect: level,
            },
            emotional_profile: EmotionalProfile {
                emotional_stability: level,
                stress_resilience: level,
                adaptability_to_change: level,
                optimism_level: level,
                empathy_level: level,
                emotional_expression: level,
            },
            learning_profile: LearningProfile {
                learning_speed: level,
                curiosity_level: level,
                feedback_receptivity: level,
                habit_formation: level,
                innovation_tendency: level,
            },
            cultural_identity: CulturalIdentity {
                cultural_background: String::new(),
                cultural_flexibility: level,
                traditionalism: level,
                modernization: level,
                religiosity: level,
                nationalism_level: level,
            },
            archetype: None,
            active: true,
            created_at: at,
            last_updated: at,
            data_quality: 85.0,
            source: ProfileSource::Generated,
        }
    }

    /// Re-clamp every numeric field and repair timestamp ordering
    pub fn normalize(&mut self) {
        self.personality.normalize();
        self.risk_profile.normalize();
        self.motivation_system.normalize();
        self.social_psychology.normalize();
        self.cognitive_biases.normalize();
        self.emotional_profile.normalize();
        self.learning_profile.normalize();
        self.cultural_identity.normalize();
        self.data_quality = bounded(self.data_quality);
        if self.last_updated < self.created_at {
            self.last_updated = self.created_at;
        }
    }

    /// Mark the profile updated at `at`; never moves `last_updated` backwards
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_updated {
            self.last_updated = at;
        }
    }

    /// Every numeric field in declaration order, for invariant checks
    pub fn numeric_fields(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(64);
        out.extend(self.personality.to_vector());
        out.extend(self.risk_profile.to_array());
        out.extend(self.motivation_system.named_needs().iter().map(|(_, v)| *v));
        out.extend(ValueKind::ALL.iter().map(|k| self.motivation_system.values.get(*k)));
        let s = &self.social_psychology;
        out.extend([
            s.social_influence,
            s.authority_respect,
            s.group_identity,
            s.social_trust,
            s.cultural_adaptability,
            s.leadership_tendency,
            s.cooperation_preference,
        ]);
        out.extend(self.cognitive_biases.named().iter().map(|(_, v)| *v));
        let e = &self.emotional_profile;
        out.extend([
            e.emotional_stability,
            e.stress_resilience,
            e.adaptability_to_change,
            e.optimism_level,
            e.empathy_level,
            e.emotional_expression,
        ]);
        let l = &self.learning_profile;
        out.extend([
            l.learning_speed,
            l.curiosity_level,
            l.feedback_receptivity,
            l.habit_formation,
            l.innovation_tendency,
        ]);
        let c = &self.cultural_identity;
        out.extend([
            c.cultural_flexibility,
            c.traditionalism,
            c.modernization,
            c.religiosity,
            c.nationalism_level,
        ]);
        out.push(self.data_quality);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimClock;
    use uuid::Uuid;

    fn uniform_profile(level: f64) -> PsychologicalProfile {
        PsychologicalProfile::baseline(ProfileId(Uuid::nil()), level, SimClock::default().now())
    }

    #[test]
    fn test_normalize_repairs_out_of_range() {
        let mut p = uniform_profile(50.0);
        p.social_psychology.social_trust = 180.0;
        p.cognitive_biases.herding = f64::NAN;
        p.data_quality = -3.0;
        p.normalize();
        assert_eq!(p.social_psychology.social_trust, 100.0);
        assert_eq!(p.cognitive_biases.herding, 50.0);
        assert_eq!(p.data_quality, 0.0);
        assert!(p.numeric_fields().iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut p = uniform_profile(50.0);
        let before = p.last_updated;
        p.touch(before - chrono::Duration::days(1));
        assert_eq!(p.last_updated, before);
    }

    #[test]
    fn test_background_bucket_defaults_to_mixed() {
        let p = uniform_profile(50.0);
        assert_eq!(p.cultural_identity.background_bucket(), MIXED_BACKGROUND);
    }

    #[test]
    fn test_value_mean_of_empty_is_none() {
        let p = uniform_profile(40.0);
        assert_eq!(p.motivation_system.values.mean_of(&[]), None);
        assert_eq!(
            p.motivation_system.values.mean_of(&[ValueKind::Power, ValueKind::Security]),
            Some(40.0)
        );
    }
}
