//! Stimulus → behavioral response prediction.
//!
//! Response intensity starts at the neutral 50 and is shifted by three
//! additive terms:
//!
//! | Term | Source |
//! |------|--------|
//! | personality modifier | Big Five deviations weighted per stimulus type |
//! | value alignment | promoted vs. opposed values, plus personal impact |
//! | bias effect | framing, novelty (status-quo bias), peer adoption (herding) |
//!
//! The sign of `intensity − 50` past the 40/60 thresholds decides support or
//! opposition, and drives the direction of every behavior change.

use chrono::{DateTime, Utc};
use psycho_core::stats::{bounded, signed};
use psycho_core::{ProfileId, PsychologicalProfile, ResponseId, Result, SimClock, SimRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stimulus::{Frame, Stimulus, StimulusDetails, StimulusType};

/// Contributions smaller than this are not reported as drivers
const DRIVER_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Support,
    Oppose,
    Neutral,
    /// Reserved for observed data; never produced by prediction
    Adapt,
    /// Reserved for observed data; never produced by prediction
    Resist,
    /// Reserved for observed data; never produced by prediction
    Ignore,
}

impl ResponseType {
    /// Classify an intensity: above 60 supports, below 40 opposes
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity > 60.0 {
            ResponseType::Support
        } else if intensity < 40.0 {
            ResponseType::Oppose
        } else {
            ResponseType::Neutral
        }
    }

    /// +1 for support, -1 for oppose, 0 otherwise
    pub fn direction(&self) -> f64 {
        match self {
            ResponseType::Support => 1.0,
            ResponseType::Oppose => -1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponseType::Support => "support",
            ResponseType::Oppose => "oppose",
            ResponseType::Neutral => "neutral",
            ResponseType::Adapt => "adapt",
            ResponseType::Resist => "resist",
            ResponseType::Ignore => "ignore",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicChanges {
    pub spending: f64,
    pub saving: f64,
    pub investment: f64,
    pub work_effort: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialChanges {
    pub social_engagement: f64,
    pub trust_level: f64,
    pub cooperation: f64,
    pub leadership: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticalChanges {
    pub support_level: f64,
    pub participation: f64,
    pub compliance: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalChanges {
    pub cultural_adaptation: f64,
    pub tradition_adherence: f64,
    pub innovation_adoption: f64,
}

/// Signed behavior deltas in [-100, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorChanges {
    pub economic: EconomicChanges,
    pub social: SocialChanges,
    pub political: PoliticalChanges,
    pub cultural: CulturalChanges,
}

impl BehaviorChanges {
    /// `(domain, metric, value)` for every delta
    pub fn entries(&self) -> [(&'static str, &'static str, f64); 14] {
        [
            ("economic", "spending", self.economic.spending),
            ("economic", "saving", self.economic.saving),
            ("economic", "investment", self.economic.investment),
            ("economic", "work_effort", self.economic.work_effort),
            ("social", "social_engagement", self.social.social_engagement),
            ("social", "trust_level", self.social.trust_level),
            ("social", "cooperation", self.social.cooperation),
            ("social", "leadership", self.social.leadership),
            ("political", "support_level", self.political.support_level),
            ("political", "participation", self.political.participation),
            ("political", "compliance", self.political.compliance),
            ("cultural", "cultural_adaptation", self.cultural.cultural_adaptation),
            ("cultural", "tradition_adherence", self.cultural.tradition_adherence),
            ("cultural", "innovation_adoption", self.cultural.innovation_adoption),
        ]
    }
}

/// How quickly a response settles into habit or fades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationMetrics {
    pub adaptation_rate: f64,
    pub habitualize_rate: f64,
    pub fatigue_rate: f64,
    pub duration_days: u32,
}

impl Default for AdaptationMetrics {
    fn default() -> Self {
        Self {
            adaptation_rate: 50.0,
            habitualize_rate: 30.0,
            fatigue_rate: 20.0,
            duration_days: 90,
        }
    }
}

/// One predicted (or observed) reaction of a profile to a stimulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralResponse {
    pub id: ResponseId,
    pub profile_id: ProfileId,
    pub stimulus: Stimulus,
    pub response_type: ResponseType,
    pub response_intensity: f64,
    pub response_speed: f64,
    pub response_consistency: f64,
    pub primary_drivers: Vec<String>,
    pub conflicting_factors: Vec<String>,
    pub behavior_changes: BehaviorChanges,
    pub adaptation: AdaptationMetrics,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    /// Strictly increasing across all responses of an engine
    pub sequence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Scales every cognitive-bias contribution
    pub bias_strength_multiplier: f64,
    pub adaptation: AdaptationMetrics,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            bias_strength_multiplier: 1.0,
            adaptation: AdaptationMetrics::default(),
        }
    }
}

/// Named additive contributions to response intensity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensityBreakdown {
    pub personality: f64,
    pub values: f64,
    pub impact: f64,
    pub framing: f64,
    pub novelty: f64,
    pub social_proof: f64,
}

impl IntensityBreakdown {
    pub fn total(&self) -> f64 {
        self.personality
            + self.values
            + self.impact
            + self.framing
            + self.novelty
            + self.social_proof
    }

    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("personality", self.personality),
            ("values", self.values),
            ("impact", self.impact),
            ("framing", self.framing),
            ("novelty", self.novelty),
            ("social_proof", self.social_proof),
        ]
    }

    /// Contributions agreeing with (`same_sign = true`) or working against the
    /// net shift, strongest first
    fn factors(&self, same_sign: bool) -> Vec<String> {
        let net = self.total();
        let mut picked: Vec<(&'static str, f64)> = self
            .named()
            .into_iter()
            .filter(|(_, v)| v.abs() > DRIVER_THRESHOLD)
            .filter(|(_, v)| (v.signum() == net.signum()) == same_sign)
            .collect();
        picked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then(a.0.cmp(b.0)));
        picked.into_iter().map(|(n, _)| n.to_string()).collect()
    }
}

/// Predicts [`BehavioralResponse`]s from profiles and stimuli
#[derive(Debug, Clone, Default)]
pub struct ResponseEngine {
    config: ResponseConfig,
}

impl ResponseEngine {
    pub fn new(config: ResponseConfig) -> Self {
        Self { config }
    }

    /// Deterministic intensity decomposition for a profile/stimulus pair
    pub fn breakdown(
        &self,
        profile: &PsychologicalProfile,
        stimulus: &Stimulus,
    ) -> IntensityBreakdown {
        let details = &stimulus.details;
        let values = &profile.motivation_system.values;
        let biases = &profile.cognitive_biases;
        let m = self.config.bias_strength_multiplier;

        let promoted = values.mean_of(&details.promoted_values).map_or(0.0, |v| 0.4 * (v - 50.0));
        let opposed = values.mean_of(&details.opposed_values).map_or(0.0, |v| 0.4 * (v - 50.0));

        // Bias terms are centred: a bias of 50 leaves intensity unchanged
        let framing = match details.framing {
            Some(Frame::Gain) => 0.1 * (biases.framing_effect - 50.0),
            Some(Frame::Loss) => -0.1 * (biases.framing_effect - 50.0),
            None => 0.0,
        };
        let novelty = details
            .novelty
            .map_or(0.0, |n| -0.2 * (biases.status_quo_bias - 50.0) * n / 100.0);
        let social_proof = details
            .peer_adoption
            .map_or(0.0, |a| 0.2 * (biases.herding - 50.0) * a);

        IntensityBreakdown {
            personality: personality_modifier(stimulus.kind, profile),
            values: promoted - opposed,
            impact: details.magnitude.map_or(0.0, |x| 0.1 * x),
            framing: framing * m,
            novelty: novelty * m,
            social_proof: social_proof * m,
        }
    }

    pub fn intensity(&self, profile: &PsychologicalProfile, stimulus: &Stimulus) -> f64 {
        bounded(50.0 + self.breakdown(profile, stimulus).total())
    }

    /// Predict a response. Consumes randomness only for the id and behavior
    /// deltas, so identical seeds reproduce identical responses.
    pub fn predict(
        &self,
        profile: &PsychologicalProfile,
        stimulus: Stimulus,
        rng: &mut SimRng,
        clock: &mut SimClock,
    ) -> Result<BehavioralResponse> {
        stimulus.details.validate()?;

        let breakdown = self.breakdown(profile, &stimulus);
        let intensity = bounded(50.0 + breakdown.total());
        let response_type = ResponseType::from_intensity(intensity);
        let id = ResponseId::generate(rng);
        let behavior_changes = behavior_changes(response_type.direction(), intensity, rng);

        let p = &profile.personality;
        let response_speed = bounded(
            0.6 * profile.risk_profile.decision_speed
                + 0.2 * p.extraversion
                + 0.2 * (100.0 - p.conscientiousness),
        );
        let response_consistency = bounded(
            0.5 * p.conscientiousness
                + 0.3 * profile.emotional_profile.emotional_stability
                + 0.2 * profile.learning_profile.habit_formation,
        );

        tracing::debug!(
            "Profile {} -> {} ({}): {} at {:.1}",
            profile.id,
            stimulus.id,
            stimulus.kind,
            response_type,
            intensity
        );

        Ok(BehavioralResponse {
            id,
            profile_id: profile.id,
            primary_drivers: breakdown.factors(true),
            conflicting_factors: breakdown.factors(false),
            stimulus,
            response_type,
            response_intensity: intensity,
            response_speed,
            response_consistency,
            behavior_changes,
            adaptation: self.config.adaptation,
            confidence: bounded(40.0 + 0.4 * profile.data_quality),
            timestamp: clock.now(),
            sequence: clock.next_sequence(),
        })
    }
}

/// Weighted Big Five deviations from neutral, per stimulus type
fn personality_modifier(kind: StimulusType, profile: &PsychologicalProfile) -> f64 {
    let p = &profile.personality;
    let o = p.openness - 50.0;
    let c = p.conscientiousness - 50.0;
    let e = p.extraversion - 50.0;
    let a = p.agreeableness - 50.0;
    let n = p.neuroticism - 50.0;
    match kind {
        StimulusType::Policy => 0.2 * c + 0.1 * a - 0.1 * n,
        StimulusType::Economic => 0.2 * o - 0.15 * n + 0.05 * e,
        StimulusType::Social => 0.25 * e + 0.1 * a,
        StimulusType::Environmental => 0.2 * o + 0.1 * a,
        StimulusType::Cultural => 0.2 * o - 0.1 * c,
    }
}

/// `direction · intensity/100 · |N(mean, std)|`, clamped to the signed scale
fn change(direction: f64, intensity: f64, mean: f64, std: f64, rng: &mut SimRng) -> f64 {
    signed(direction * intensity / 100.0 * rng.normal(mean, std).abs())
}

fn behavior_changes(direction: f64, intensity: f64, rng: &mut SimRng) -> BehaviorChanges {
    let d = direction;
    let i = intensity;
    BehaviorChanges {
        economic: EconomicChanges {
            spending: change(d, i, 20.0, 10.0, rng),
            saving: change(-d, i, 15.0, 8.0, rng),
            investment: change(d, i, 25.0, 12.0, rng),
            work_effort: change(d, i, 10.0, 5.0, rng),
        },
        social: SocialChanges {
            social_engagement: change(d, i, 15.0, 8.0, rng),
            trust_level: change(d, i, 20.0, 10.0, rng),
            cooperation: change(d, i, 18.0, 9.0, rng),
            leadership: change(d, i, 12.0, 6.0, rng),
        },
        political: PoliticalChanges {
            support_level: change(d, i, 30.0, 15.0, rng),
            participation: change(d, i, 25.0, 12.0, rng),
            compliance: change(d, i, 20.0, 10.0, rng),
        },
        cultural: CulturalChanges {
            cultural_adaptation: change(d, i, 15.0, 8.0, rng),
            tradition_adherence: change(-d, i, 18.0, 9.0, rng),
            innovation_adoption: change(d, i, 22.0, 11.0, rng),
        },
    }
}

/// Responses without magnitude details, for bulk "what-if" runs
pub fn neutral_stimulus(kind: StimulusType, id: impl Into<String>) -> Stimulus {
    Stimulus::new(kind, id).with_details(StimulusDetails::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_core::{PersonalityTraits, ValueKind};
    use uuid::Uuid;

    fn profile(level: f64) -> PsychologicalProfile {
        PsychologicalProfile::baseline(ProfileId(Uuid::nil()), level, SimClock::default().now())
    }

    #[test]
    fn test_intensity_thresholds() {
        assert_eq!(ResponseType::from_intensity(39.0), ResponseType::Oppose);
        assert_eq!(ResponseType::from_intensity(40.0), ResponseType::Neutral);
        assert_eq!(ResponseType::from_intensity(60.0), ResponseType::Neutral);
        assert_eq!(ResponseType::from_intensity(61.0), ResponseType::Support);
    }

    #[test]
    fn test_neutral_profile_neutral_stimulus() {
        let engine = ResponseEngine::default();
        let mut rng = SimRng::seeded(1);
        let mut clock = SimClock::default();
        let stimulus = neutral_stimulus(StimulusType::Economic, "e1");
        let r = engine
            .predict(&profile(50.0), stimulus, &mut rng, &mut clock)
            .unwrap();
        assert_eq!(r.response_type, ResponseType::Neutral);
        assert_eq!(r.response_intensity, 50.0);
        assert_eq!(r.behavior_changes, BehaviorChanges::default());
        assert!(r.primary_drivers.is_empty());
    }

    #[test]
    fn test_promoted_values_drive_support() {
        let engine = ResponseEngine::default();
        let mut p = profile(50.0);
        p.motivation_system.values.universalism = 100.0;
        p.motivation_system.values.power = 0.0;
        let stimulus =
            Stimulus::new(StimulusType::Environmental, "green").with_details(StimulusDetails {
                promoted_values: vec![ValueKind::Universalism],
                opposed_values: vec![ValueKind::Power],
                ..Default::default()
            });
        let mut clock = SimClock::default();
        let r = engine.predict(&p, stimulus, &mut SimRng::seeded(2), &mut clock).unwrap();
        // 50 + 0.4*50 + 0.4*50
        assert_eq!(r.response_intensity, 90.0);
        assert_eq!(r.response_type, ResponseType::Support);
        assert_eq!(r.primary_drivers, vec!["values".to_string()]);
        assert!(r.behavior_changes.economic.spending >= 0.0);
        assert!(r.behavior_changes.economic.saving <= 0.0);
        assert!(r.behavior_changes.cultural.tradition_adherence <= 0.0);
    }

    #[test]
    fn test_opposition_flips_directions() {
        let engine = ResponseEngine::default();
        let mut p = profile(50.0);
        p.personality = PersonalityTraits::new(50.0, 0.0, 50.0, 0.0, 100.0);
        let stimulus = Stimulus::new(StimulusType::Policy, "tax").with_details(StimulusDetails {
            magnitude: Some(-100.0),
            ..Default::default()
        });
        let mut clock = SimClock::default();
        let r = engine.predict(&p, stimulus, &mut SimRng::seeded(3), &mut clock).unwrap();
        assert_eq!(r.response_type, ResponseType::Oppose);
        assert!(r.behavior_changes.political.support_level <= 0.0);
        assert!(r.behavior_changes.economic.saving >= 0.0);
        assert!(r.conflicting_factors.is_empty());
    }

    #[test]
    fn test_deltas_bounded_and_sequence_increases() {
        let engine = ResponseEngine::default();
        let mut p = profile(100.0);
        p.personality = PersonalityTraits::new(100.0, 100.0, 100.0, 100.0, 0.0);
        let mut rng = SimRng::seeded(4);
        let mut clock = SimClock::default();
        let mut last = 0;
        for kind in StimulusType::ALL {
            let r = engine.predict(&p, neutral_stimulus(kind, "s"), &mut rng, &mut clock).unwrap();
            assert!(r.sequence > last);
            last = r.sequence;
            for (_, _, v) in r.behavior_changes.entries() {
                assert!((-100.0..=100.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_bias_terms_centred_on_fifty() {
        let engine = ResponseEngine::default();
        let framed = |frame| {
            Stimulus::new(StimulusType::Economic, "offer").with_details(StimulusDetails {
                framing: Some(frame),
                peer_adoption: Some(1.0),
                ..Default::default()
            })
        };

        let neutral = profile(50.0);
        for frame in [Frame::Gain, Frame::Loss] {
            let b = engine.breakdown(&neutral, &framed(frame));
            assert_eq!(b.framing, 0.0);
            assert_eq!(b.social_proof, 0.0);
        }

        let susceptible = profile(100.0);
        assert_eq!(engine.breakdown(&susceptible, &framed(Frame::Gain)).framing, 5.0);
        assert_eq!(engine.breakdown(&susceptible, &framed(Frame::Loss)).framing, -5.0);
        assert_eq!(engine.breakdown(&susceptible, &framed(Frame::Gain)).social_proof, 10.0);

        let contrarian = profile(0.0);
        assert_eq!(engine.breakdown(&contrarian, &framed(Frame::Gain)).framing, -5.0);
        assert_eq!(engine.breakdown(&contrarian, &framed(Frame::Loss)).framing, 5.0);
        assert_eq!(engine.breakdown(&contrarian, &framed(Frame::Gain)).social_proof, -10.0);
    }

    #[test]
    fn test_invalid_details_rejected() {
        let engine = ResponseEngine::default();
        let stimulus = Stimulus::new(StimulusType::Social, "x").with_details(StimulusDetails {
            novelty: Some(300.0),
            ..Default::default()
        });
        let mut clock = SimClock::default();
        assert!(engine
            .predict(&profile(50.0), stimulus, &mut SimRng::seeded(5), &mut clock)
            .is_err());
    }

    #[test]
    fn test_same_seed_same_response() {
        let engine = ResponseEngine::default();
        let p = profile(70.0);
        let run = || {
            let mut clock = SimClock::default();
            let stimulus = neutral_stimulus(StimulusType::Social, "s");
            engine
                .predict(&p, stimulus, &mut SimRng::seeded(6), &mut clock)
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
