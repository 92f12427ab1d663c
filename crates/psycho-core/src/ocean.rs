//! Big Five (OCEAN) personality traits, archetypes and segments.
//!
//! Traits are scored on a 0–100 scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::stats::bounded;

/// OCEAN (Big Five) personality trait scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    /// Openness to Experience: creativity, curiosity, intellectual interests
    pub openness: f64,

    /// Conscientiousness: organization, dependability, self-discipline
    pub conscientiousness: f64,

    /// Extraversion: sociability, assertiveness, positive emotions
    pub extraversion: f64,

    /// Agreeableness: cooperation, trust, compliance
    pub agreeableness: f64,

    /// Neuroticism: emotional instability, anxiety, moodiness
    pub neuroticism: f64,
}

impl PersonalityTraits {
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Self {
        Self {
            openness: bounded(openness),
            conscientiousness: bounded(conscientiousness),
            extraversion: bounded(extraversion),
            agreeableness: bounded(agreeableness),
            neuroticism: bounded(neuroticism),
        }
    }

    pub fn neutral() -> Self {
        Self::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }

    pub fn get(&self, t: OceanTrait) -> f64 {
        match t {
            OceanTrait::Openness => self.openness,
            OceanTrait::Conscientiousness => self.conscientiousness,
            OceanTrait::Extraversion => self.extraversion,
            OceanTrait::Agreeableness => self.agreeableness,
            OceanTrait::Neuroticism => self.neuroticism,
        }
    }

    pub fn set(&mut self, t: OceanTrait, value: f64) {
        let v = bounded(value);
        match t {
            OceanTrait::Openness => self.openness = v,
            OceanTrait::Conscientiousness => self.conscientiousness = v,
            OceanTrait::Extraversion => self.extraversion = v,
            OceanTrait::Agreeableness => self.agreeableness = v,
            OceanTrait::Neuroticism => self.neuroticism = v,
        }
    }

    /// Get the dominant trait (highest score, earliest trait on ties)
    pub fn dominant_trait(&self) -> OceanTrait {
        let mut best = OceanTrait::Openness;
        for t in OceanTrait::ALL {
            if self.get(t) > self.get(best) {
                best = t;
            }
        }
        best
    }

    /// Get traits that are significantly high (> 65)
    pub fn high_traits(&self) -> Vec<OceanTrait> {
        OceanTrait::ALL
            .into_iter()
            .filter(|t| self.get(*t) > 65.0)
            .collect()
    }

    /// Get traits that are significantly low (< 35)
    pub fn low_traits(&self) -> Vec<OceanTrait> {
        OceanTrait::ALL
            .into_iter()
            .filter(|t| self.get(*t) < 35.0)
            .collect()
    }

    /// Convert to feature vector
    pub fn to_vector(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }

    /// Weighted blend with another score set; `alpha` is the weight of `other`
    pub fn blend(&self, other: &PersonalityTraits, alpha: f64) -> PersonalityTraits {
        let a = alpha.clamp(0.0, 1.0);
        let b = 1.0 - a;

        PersonalityTraits::new(
            self.openness * b + other.openness * a,
            self.conscientiousness * b + other.conscientiousness * a,
            self.extraversion * b + other.extraversion * a,
            self.agreeableness * b + other.agreeableness * a,
            self.neuroticism * b + other.neuroticism * a,
        )
    }

    /// Blend only the traits present in `partial`
    pub fn blend_partial(&self, partial: &PartialTraits, alpha: f64) -> PersonalityTraits {
        let a = alpha.clamp(0.0, 1.0);
        let mut out = *self;
        for t in OceanTrait::ALL {
            if let Some(target) = partial.get(t) {
                out.set(t, self.get(t) * (1.0 - a) + target * a);
            }
        }
        out
    }

    /// Replace the traits present in `partial`
    pub fn overridden(&self, partial: &PartialTraits) -> PersonalityTraits {
        let mut out = *self;
        for t in OceanTrait::ALL {
            if let Some(v) = partial.get(t) {
                out.set(t, v);
            }
        }
        out
    }

    pub fn normalize(&mut self) {
        *self = Self::new(
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        );
    }

    /// Segments this trait vector falls into
    pub fn segments(&self) -> Vec<PersonalitySegment> {
        PersonalitySegment::ALL
            .into_iter()
            .filter(|s| s.matches(self))
            .collect()
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Subset of traits, used for cultural bias entries and explicit overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTraits {
    pub openness: Option<f64>,
    pub conscientiousness: Option<f64>,
    pub extraversion: Option<f64>,
    pub agreeableness: Option<f64>,
    pub neuroticism: Option<f64>,
}

impl PartialTraits {
    pub fn get(&self, t: OceanTrait) -> Option<f64> {
        match t {
            OceanTrait::Openness => self.openness,
            OceanTrait::Conscientiousness => self.conscientiousness,
            OceanTrait::Extraversion => self.extraversion,
            OceanTrait::Agreeableness => self.agreeableness,
            OceanTrait::Neuroticism => self.neuroticism,
        }
    }

    pub fn is_empty(&self) -> bool {
        OceanTrait::ALL.iter().all(|t| self.get(*t).is_none())
    }
}

/// Individual OCEAN trait enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OceanTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl OceanTrait {
    pub const ALL: [OceanTrait; 5] = [
        OceanTrait::Openness,
        OceanTrait::Conscientiousness,
        OceanTrait::Extraversion,
        OceanTrait::Agreeableness,
        OceanTrait::Neuroticism,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OceanTrait::Openness => "openness",
            OceanTrait::Conscientiousness => "conscientiousness",
            OceanTrait::Extraversion => "extraversion",
            OceanTrait::Agreeableness => "agreeableness",
            OceanTrait::Neuroticism => "neuroticism",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            OceanTrait::Openness => "O",
            OceanTrait::Conscientiousness => "C",
            OceanTrait::Extraversion => "E",
            OceanTrait::Agreeableness => "A",
            OceanTrait::Neuroticism => "N",
        }
    }
}

/// Named starting template for profile generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityArchetype {
    /// High O, high C, high E, low N: risk-seeking builder
    Entrepreneur,
    /// Low O, high C: cautious, loss-averse
    Conservative,
    /// Very high O: novelty-seeking, information hungry
    Innovator,
    /// Low O, high C, high A: custom and continuity
    Traditionalist,
    /// Very high E, high A: organizes and persuades others
    SocialLeader,
}

impl PersonalityArchetype {
    pub const ALL: [PersonalityArchetype; 5] = [
        PersonalityArchetype::Entrepreneur,
        PersonalityArchetype::Conservative,
        PersonalityArchetype::Innovator,
        PersonalityArchetype::Traditionalist,
        PersonalityArchetype::SocialLeader,
    ];

    pub fn traits(&self) -> PersonalityTraits {
        use PersonalityArchetype::*;
        match self {
            Entrepreneur => PersonalityTraits::new(85.0, 80.0, 75.0, 45.0, 25.0),
            Conservative => PersonalityTraits::new(25.0, 75.0, 45.0, 60.0, 55.0),
            Innovator => PersonalityTraits::new(95.0, 55.0, 60.0, 50.0, 35.0),
            Traditionalist => PersonalityTraits::new(20.0, 80.0, 40.0, 70.0, 45.0),
            SocialLeader => PersonalityTraits::new(65.0, 70.0, 90.0, 75.0, 30.0),
        }
    }

    /// Risk template as `[tolerance, loss aversion, time preference,
    /// uncertainty tolerance, decision speed, information seeking]`
    pub fn risk_template(&self) -> [f64; 6] {
        match self {
            PersonalityArchetype::Entrepreneur => [85.0, 30.0, 40.0, 80.0, 80.0, 60.0],
            PersonalityArchetype::Conservative => [20.0, 80.0, 75.0, 25.0, 35.0, 65.0],
            PersonalityArchetype::Innovator => [80.0, 35.0, 45.0, 90.0, 70.0, 85.0],
            PersonalityArchetype::Traditionalist => [25.0, 70.0, 80.0, 20.0, 40.0, 50.0],
            PersonalityArchetype::SocialLeader => [60.0, 45.0, 55.0, 60.0, 75.0, 60.0],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PersonalityArchetype::Entrepreneur => "entrepreneur",
            PersonalityArchetype::Conservative => "conservative",
            PersonalityArchetype::Innovator => "innovator",
            PersonalityArchetype::Traditionalist => "traditionalist",
            PersonalityArchetype::SocialLeader => "social_leader",
        }
    }
}

impl fmt::Display for PersonalityArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PersonalityArchetype {
    type Err = Error;

    /// Case- and separator-insensitive: `SOCIAL_LEADER`, `social-leader`
    /// and `SocialLeader` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "entrepreneur" => Ok(PersonalityArchetype::Entrepreneur),
            "conservative" => Ok(PersonalityArchetype::Conservative),
            "innovator" => Ok(PersonalityArchetype::Innovator),
            "traditionalist" => Ok(PersonalityArchetype::Traditionalist),
            "socialleader" => Ok(PersonalityArchetype::SocialLeader),
            _ => Err(Error::UnknownArchetype(s.to_string())),
        }
    }
}

/// Personality bucket used for incentive targeting and analytics rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalitySegment {
    HighOpenness,
    HighConscientiousness,
    HighExtraversion,
    HighAgreeableness,
    HighNeuroticism,
    LowNeuroticism,
}

impl PersonalitySegment {
    pub const ALL: [PersonalitySegment; 6] = [
        PersonalitySegment::HighOpenness,
        PersonalitySegment::HighConscientiousness,
        PersonalitySegment::HighExtraversion,
        PersonalitySegment::HighAgreeableness,
        PersonalitySegment::HighNeuroticism,
        PersonalitySegment::LowNeuroticism,
    ];

    pub fn matches(&self, traits: &PersonalityTraits) -> bool {
        match self {
            PersonalitySegment::HighOpenness => traits.openness > 60.0,
            PersonalitySegment::HighConscientiousness => traits.conscientiousness > 60.0,
            PersonalitySegment::HighExtraversion => traits.extraversion > 60.0,
            PersonalitySegment::HighAgreeableness => traits.agreeableness > 60.0,
            PersonalitySegment::HighNeuroticism => traits.neuroticism > 60.0,
            PersonalitySegment::LowNeuroticism => traits.neuroticism < 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traits_clamp() {
        let t = PersonalityTraits::new(150.0, -20.0, f64::NAN, 50.0, 50.0);
        assert_eq!(t.openness, 100.0);
        assert_eq!(t.conscientiousness, 0.0);
        assert_eq!(t.extraversion, 50.0);
    }

    #[test]
    fn test_dominant_trait() {
        let t = PersonalityTraits::new(90.0, 30.0, 40.0, 50.0, 20.0);
        assert_eq!(t.dominant_trait(), OceanTrait::Openness);
        assert_eq!(t.high_traits(), vec![OceanTrait::Openness]);
        assert_eq!(t.low_traits(), vec![OceanTrait::Conscientiousness, OceanTrait::Neuroticism]);
    }

    #[test]
    fn test_blend_partial_only_touches_present() {
        let base = PersonalityTraits::neutral();
        let bias = PartialTraits {
            openness: Some(100.0),
            ..Default::default()
        };
        let out = base.blend_partial(&bias, 0.3);
        assert!((out.openness - 65.0).abs() < 1e-9);
        assert_eq!(out.conscientiousness, 50.0);
    }

    #[test]
    fn test_archetype_parse_variants() {
        for s in ["ENTREPRENEUR", "Entrepreneur", "entrepreneur"] {
            assert_eq!(
                s.parse::<PersonalityArchetype>().ok(),
                Some(PersonalityArchetype::Entrepreneur)
            );
        }
        for s in ["SOCIAL_LEADER", "social-leader", "SocialLeader"] {
            assert_eq!(
                s.parse::<PersonalityArchetype>().ok(),
                Some(PersonalityArchetype::SocialLeader)
            );
        }
        assert!(matches!(
            "Wizard".parse::<PersonalityArchetype>(),
            Err(Error::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_segments() {
        let t = PersonalityTraits::new(70.0, 50.0, 50.0, 65.0, 30.0);
        assert_eq!(
            t.segments(),
            vec![
                PersonalitySegment::HighOpenness,
                PersonalitySegment::HighAgreeableness,
                PersonalitySegment::LowNeuroticism
            ]
        );
    }
}
