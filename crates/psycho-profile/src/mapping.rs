//! Trait-to-attribute mapping tables.
//!
//! Every derived attribute of a profile is a weighted linear combination of
//! the Big Five plus independent Gaussian noise, clamped to 0–100.
//!
//! ## Weight convention
//!
//! A positive weight `w` contributes `w · trait`; a negative weight contributes
//! `|w| · (100 − trait)`. So `risk_tolerance = 0.6·O + 0.4·(100 − N)` is written
//! as `openness: 0.6, neuroticism: -0.4`.

use psycho_core::stats::bounded;
use psycho_core::{
    CognitiveBiases, EmotionalProfile, LearningProfile, MotivationSystem, PersonalityTraits,
    RiskProfile, SimRng, SocialPsychology, ValueScores,
};
use serde::{Deserialize, Serialize};

/// Trait weights for a single derived attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitWeights {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub noise_mean: f64,
    pub noise_std: f64,
}

impl TraitWeights {
    fn new(o: f64, c: f64, e: f64, a: f64, n: f64) -> Self {
        Self {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
            noise_mean: 0.0,
            noise_std: 10.0,
        }
    }

    /// Attribute independent of personality: pure `N(mean, std)`
    fn constant(mean: f64, std: f64) -> Self {
        Self {
            openness: 0.0,
            conscientiousness: 0.0,
            extraversion: 0.0,
            agreeableness: 0.0,
            neuroticism: 0.0,
            noise_mean: mean,
            noise_std: std,
        }
    }

    fn noise(mut self, mean: f64, std: f64) -> Self {
        self.noise_mean = mean;
        self.noise_std = std;
        self
    }

    /// Deterministic part of the mapping
    pub fn linear(&self, traits: &PersonalityTraits) -> f64 {
        term(self.openness, traits.openness)
            + term(self.conscientiousness, traits.conscientiousness)
            + term(self.extraversion, traits.extraversion)
            + term(self.agreeableness, traits.agreeableness)
            + term(self.neuroticism, traits.neuroticism)
    }

    pub fn apply(&self, traits: &PersonalityTraits, rng: &mut SimRng) -> f64 {
        bounded(self.linear(traits) + rng.normal(self.noise_mean, self.noise_std))
    }
}

fn term(weight: f64, value: f64) -> f64 {
    if weight >= 0.0 {
        weight * value
    } else {
        -weight * (100.0 - value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    pub risk_tolerance: TraitWeights,
    pub loss_aversion: TraitWeights,
    pub time_preference: TraitWeights,
    pub uncertainty_tolerance: TraitWeights,
    pub decision_speed: TraitWeights,
    pub information_seeking: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationWeights {
    pub physiological_needs: TraitWeights,
    pub safety_needs: TraitWeights,
    pub belonging_needs: TraitWeights,
    pub esteem_needs: TraitWeights,
    pub self_actualization: TraitWeights,
    pub security: TraitWeights,
    pub achievement: TraitWeights,
    pub hedonism: TraitWeights,
    pub stimulation: TraitWeights,
    pub self_direction: TraitWeights,
    pub universalism: TraitWeights,
    pub benevolence: TraitWeights,
    pub tradition: TraitWeights,
    pub conformity: TraitWeights,
    pub power: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialWeights {
    pub social_influence: TraitWeights,
    pub authority_respect: TraitWeights,
    pub group_identity: TraitWeights,
    pub social_trust: TraitWeights,
    pub cultural_adaptability: TraitWeights,
    pub leadership_tendency: TraitWeights,
    pub cooperation_preference: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasWeights {
    pub confirmation_bias: TraitWeights,
    pub availability_heuristic: TraitWeights,
    pub anchoring_bias: TraitWeights,
    pub status_quo_bias: TraitWeights,
    pub optimism_bias: TraitWeights,
    pub herding: TraitWeights,
    pub framing_effect: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalWeights {
    pub emotional_stability: TraitWeights,
    pub stress_resilience: TraitWeights,
    pub adaptability_to_change: TraitWeights,
    pub optimism_level: TraitWeights,
    pub empathy_level: TraitWeights,
    pub emotional_expression: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningWeights {
    pub learning_speed: TraitWeights,
    pub curiosity_level: TraitWeights,
    pub feedback_receptivity: TraitWeights,
    pub habit_formation: TraitWeights,
    pub innovation_tendency: TraitWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CulturalWeights {
    pub cultural_flexibility: TraitWeights,
    pub traditionalism: TraitWeights,
    pub modernization: TraitWeights,
    pub religiosity: TraitWeights,
    pub nationalism_level: TraitWeights,
}

/// Complete mapping table from traits to every derived attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeMapping {
    pub risk: RiskWeights,
    pub motivation: MotivationWeights,
    pub social: SocialWeights,
    pub biases: BiasWeights,
    pub emotional: EmotionalWeights,
    pub learning: LearningWeights,
    pub cultural: CulturalWeights,
}

impl Default for AttributeMapping {
    fn default() -> Self {
        Self {
            risk: RiskWeights {
                risk_tolerance: TraitWeights::new(0.6, 0.0, 0.0, 0.0, -0.4),
                // Noise carries a 50-point baseline
                loss_aversion: TraitWeights::new(-0.3, 0.0, 0.0, 0.0, 0.5).noise(50.0, 15.0),
                time_preference: TraitWeights::new(0.0, 0.7, 0.0, 0.0, 0.0).noise(0.0, 15.0),
                uncertainty_tolerance: TraitWeights::new(0.8, 0.0, 0.0, 0.0, 0.0).noise(0.0, 12.0),
                decision_speed: TraitWeights::new(0.0, 0.0, 0.6, 0.0, 0.0).noise(0.0, 15.0),
                information_seeking: TraitWeights::new(0.0, 0.8, 0.0, 0.0, 0.0),
            },
            motivation: MotivationWeights {
                physiological_needs: TraitWeights::constant(70.0, 20.0),
                safety_needs: TraitWeights::constant(60.0, 20.0),
                belonging_needs: TraitWeights::new(0.0, 0.0, 0.6, 0.4, 0.0).noise(0.0, 15.0),
                esteem_needs: TraitWeights::new(0.0, 0.3, 0.5, 0.0, 0.0).noise(0.0, 20.0),
                self_actualization: TraitWeights::new(0.7, 0.3, 0.0, 0.0, 0.0).noise(0.0, 20.0),
                security: TraitWeights::new(-0.6, 0.0, 0.0, 0.0, 0.4),
                achievement: TraitWeights::new(0.0, 0.8, 0.2, 0.0, 0.0),
                hedonism: TraitWeights::new(0.0, -0.4, 0.6, 0.0, 0.0),
                stimulation: TraitWeights::new(0.8, 0.0, 0.2, 0.0, 0.0),
                self_direction: TraitWeights::new(0.7, 0.0, 0.0, -0.3, 0.0),
                universalism: TraitWeights::new(0.4, 0.0, 0.0, 0.6, 0.0),
                benevolence: TraitWeights::new(0.0, 0.2, 0.0, 0.8, 0.0),
                tradition: TraitWeights::new(-0.7, 0.3, 0.0, 0.0, 0.0),
                conformity: TraitWeights::new(-0.4, 0.0, 0.0, 0.6, 0.0),
                power: TraitWeights::new(0.0, 0.0, 0.6, -0.4, 0.0),
            },
            social: SocialWeights {
                social_influence: TraitWeights::new(0.0, -0.4, 0.0, 0.6, 0.0),
                authority_respect: TraitWeights::new(0.0, 0.7, 0.0, 0.3, 0.0),
                group_identity: TraitWeights::new(-0.5, 0.0, 0.0, 0.5, 0.0),
                social_trust: TraitWeights::new(0.0, 0.0, 0.0, 0.8, -0.2),
                cultural_adaptability: TraitWeights::new(0.8, 0.0, 0.0, 0.2, 0.0),
                leadership_tendency: TraitWeights::new(0.0, 0.3, 0.7, 0.0, 0.0),
                cooperation_preference: TraitWeights::new(0.0, 0.2, 0.0, 0.8, 0.0),
            },
            biases: BiasWeights {
                confirmation_bias: TraitWeights::new(-0.6, 0.0, 0.0, 0.0, 0.4),
                availability_heuristic: TraitWeights::new(0.0, -0.5, 0.0, 0.0, 0.5),
                anchoring_bias: TraitWeights::new(-0.7, 0.3, 0.0, 0.0, 0.0),
                status_quo_bias: TraitWeights::new(-0.8, 0.0, 0.0, 0.0, 0.2),
                optimism_bias: TraitWeights::new(0.0, 0.0, 0.6, 0.0, -0.4),
                herding: TraitWeights::new(0.0, -0.4, 0.0, 0.6, 0.0),
                framing_effect: TraitWeights::new(0.0, -0.5, 0.0, 0.0, 0.5),
            },
            emotional: EmotionalWeights {
                emotional_stability: TraitWeights::new(0.0, 0.2, 0.0, 0.0, -0.8),
                stress_resilience: TraitWeights::new(0.0, 0.3, 0.0, 0.0, -0.7),
                adaptability_to_change: TraitWeights::new(0.7, 0.0, 0.0, 0.0, -0.3),
                optimism_level: TraitWeights::new(0.0, 0.0, 0.6, 0.0, -0.4),
                empathy_level: TraitWeights::new(0.2, 0.0, 0.0, 0.8, 0.0),
                emotional_expression: TraitWeights::new(0.0, -0.3, 0.7, 0.0, 0.0),
            },
            learning: LearningWeights {
                learning_speed: TraitWeights::new(0.6, 0.4, 0.0, 0.0, 0.0),
                curiosity_level: TraitWeights::new(0.8, 0.0, 0.2, 0.0, 0.0),
                feedback_receptivity: TraitWeights::new(0.6, 0.0, 0.0, 0.0, -0.4),
                habit_formation: TraitWeights::new(-0.2, 0.8, 0.0, 0.0, 0.0),
                innovation_tendency: TraitWeights::new(0.8, 0.0, 0.2, 0.0, 0.0),
            },
            cultural: CulturalWeights {
                cultural_flexibility: TraitWeights::new(0.7, 0.0, 0.0, 0.3, 0.0),
                traditionalism: TraitWeights::new(-0.6, 0.4, 0.0, 0.0, 0.0),
                modernization: TraitWeights::new(0.8, 0.0, 0.2, 0.0, 0.0),
                religiosity: TraitWeights::constant(40.0, 20.0),
                nationalism_level: TraitWeights::constant(50.0, 20.0),
            },
        }
    }
}

impl AttributeMapping {
    pub fn risk_profile(&self, t: &PersonalityTraits, rng: &mut SimRng) -> RiskProfile {
        let w = &self.risk;
        RiskProfile {
            risk_tolerance: w.risk_tolerance.apply(t, rng),
            loss_aversion: w.loss_aversion.apply(t, rng),
            time_preference: w.time_preference.apply(t, rng),
            uncertainty_tolerance: w.uncertainty_tolerance.apply(t, rng),
            decision_speed: w.decision_speed.apply(t, rng),
            information_seeking: w.information_seeking.apply(t, rng),
        }
    }

    pub fn motivation_system(&self, t: &PersonalityTraits, rng: &mut SimRng) -> MotivationSystem {
        let w = &self.motivation;
        MotivationSystem {
            physiological_needs: w.physiological_needs.apply(t, rng),
            safety_needs: w.safety_needs.apply(t, rng),
            belonging_needs: w.belonging_needs.apply(t, rng),
            esteem_needs: w.esteem_needs.apply(t, rng),
            self_actualization: w.self_actualization.apply(t, rng),
            values: ValueScores {
                security: w.security.apply(t, rng),
                achievement: w.achievement.apply(t, rng),
                hedonism: w.hedonism.apply(t, rng),
                stimulation: w.stimulation.apply(t, rng),
                self_direction: w.self_direction.apply(t, rng),
                universalism: w.universalism.apply(t, rng),
                benevolence: w.benevolence.apply(t, rng),
                tradition: w.tradition.apply(t, rng),
                conformity: w.conformity.apply(t, rng),
                power: w.power.apply(t, rng),
            },
        }
    }

    pub fn social_psychology(&self, t: &PersonalityTraits, rng: &mut SimRng) -> SocialPsychology {
        let w = &self.social;
        SocialPsychology {
            social_influence: w.social_influence.apply(t, rng),
            authority_respect: w.authority_respect.apply(t, rng),
            group_identity: w.group_identity.apply(t, rng),
            social_trust: w.social_trust.apply(t, rng),
            cultural_adaptability: w.cultural_adaptability.apply(t, rng),
            leadership_tendency: w.leadership_tendency.apply(t, rng),
            cooperation_preference: w.cooperation_preference.apply(t, rng),
        }
    }

    pub fn cognitive_biases(&self, t: &PersonalityTraits, rng: &mut SimRng) -> CognitiveBiases {
        let w = &self.biases;
        CognitiveBiases {
            confirmation_bias: w.confirmation_bias.apply(t, rng),
            availability_heuristic: w.availability_heuristic.apply(t, rng),
            anchoring_bias: w.anchoring_bias.apply(t, rng),
            status_quo_bias: w.status_quo_bias.apply(t, rng),
            optimism_bias: w.optimism_bias.apply(t, rng),
            herding: w.herding.apply(t, rng),
            framing_effect: w.framing_effect.apply(t, rng),
        }
    }

    pub fn emotional_profile(&self, t: &PersonalityTraits, rng: &mut SimRng) -> EmotionalProfile {
        let w = &self.emotional;
        EmotionalProfile {
            emotional_stability: w.emotional_stability.apply(t, rng),
            stress_resilience: w.stress_resilience.apply(t, rng),
            adaptability_to_change: w.adaptability_to_change.apply(t, rng),
            optimism_level: w.optimism_level.apply(t, rng),
            empathy_level: w.empathy_level.apply(t, rng),
            emotional_expression: w.emotional_expression.apply(t, rng),
        }
    }

    pub fn learning_profile(&self, t: &PersonalityTraits, rng: &mut SimRng) -> LearningProfile {
        let w = &self.learning;
        LearningProfile {
            learning_speed: w.learning_speed.apply(t, rng),
            curiosity_level: w.curiosity_level.apply(t, rng),
            feedback_receptivity: w.feedback_receptivity.apply(t, rng),
            habit_formation: w.habit_formation.apply(t, rng),
            innovation_tendency: w.innovation_tendency.apply(t, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_weight_uses_complement() {
        let w = TraitWeights::new(0.6, 0.0, 0.0, 0.0, -0.4);
        let t = PersonalityTraits::new(80.0, 50.0, 50.0, 50.0, 20.0);
        // 0.6 * 80 + 0.4 * (100 - 20)
        assert!((w.linear(&t) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_ignores_traits() {
        let w = TraitWeights::constant(70.0, 0.0);
        let mut rng = SimRng::seeded(1);
        let low = PersonalityTraits::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let high = PersonalityTraits::new(100.0, 100.0, 100.0, 100.0, 100.0);
        assert_eq!(w.apply(&low, &mut rng), 70.0);
        assert_eq!(w.apply(&high, &mut rng), 70.0);
    }

    #[test]
    fn test_apply_is_bounded() {
        let w = TraitWeights::new(1.0, 0.0, 0.0, 0.0, 0.0).noise(80.0, 40.0);
        let t = PersonalityTraits::new(100.0, 50.0, 50.0, 50.0, 50.0);
        let mut rng = SimRng::seeded(3);
        for _ in 0..200 {
            let v = w.apply(&t, &mut rng);
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn test_open_profiles_tolerate_more_risk() {
        let mapping = AttributeMapping::default();
        let w = &mapping.risk.risk_tolerance;
        let open = PersonalityTraits::new(90.0, 50.0, 50.0, 50.0, 20.0);
        let closed = PersonalityTraits::new(20.0, 50.0, 50.0, 50.0, 80.0);
        assert!(w.linear(&open) > w.linear(&closed));
    }
}
