//! Profile generation.
//!
//! A profile starts from an archetype template or five independent normal
//! draws, is pulled toward its culture's personality bias, takes explicit
//! overrides, and then derives every other attribute through the
//! [`AttributeMapping`] table.

use chrono::{DateTime, Utc};
use psycho_core::stats::bounded;
use psycho_core::{
    CulturalIdentity, Error, OceanTrait, PartialTraits, PersonalityArchetype, PersonalityTraits,
    ProfileId, ProfileLinks, ProfileSource, PsychologicalProfile, Result, RiskProfile, SimRng,
    MIXED_BACKGROUND,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::mapping::AttributeMapping;

/// Weight of the cultural bias when blending it into base personality
pub const CULTURAL_BLEND: f64 = 0.3;

/// Weight of an archetype's risk template against the trait-derived risk profile
pub const ARCHETYPE_RISK_BLEND: f64 = 0.5;

/// Data quality assigned to freshly generated profiles
pub const GENERATED_DATA_QUALITY: f64 = 85.0;

/// Request to create one profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSpec {
    pub links: ProfileLinks,
    /// Archetype name; parsed case- and separator-insensitively
    pub archetype: Option<String>,
    pub cultural_background: Option<String>,
    /// Explicit trait values that win over archetype, draws and culture
    pub trait_overrides: PartialTraits,
    pub source: ProfileSource,
    pub data_quality: Option<f64>,
}

impl ProfileSpec {
    pub fn archetype(name: impl Into<String>) -> Self {
        Self {
            archetype: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.cultural_background = Some(background.into());
        self
    }

    pub fn with_overrides(mut self, overrides: PartialTraits) -> Self {
        self.trait_overrides = overrides;
        self
    }
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Spread of random trait draws, 0–1; the draw std is `20 · variation`
    pub personality_variation: f64,
    /// Per-culture personality bias blended 70/30 into base traits
    pub cultural_bias: BTreeMap<String, PartialTraits>,
    pub mapping: AttributeMapping,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            personality_variation: 0.3,
            cultural_bias: BTreeMap::new(),
            mapping: AttributeMapping::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.personality_variation) {
            return Err(Error::Validation(format!(
                "personality_variation must be within [0, 1], got {}",
                self.personality_variation
            )));
        }
        for (culture, bias) in &self.cultural_bias {
            for t in OceanTrait::ALL {
                if let Some(v) = bias.get(t) {
                    if !v.is_finite() {
                        return Err(Error::Validation(format!(
                            "cultural bias for {culture} has non-finite {}",
                            t.name()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builds complete profiles from [`ProfileSpec`]s
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    config: GeneratorConfig,
}

impl ProfileGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a profile. Fails without consuming an id when the spec is
    /// invalid.
    pub fn generate(
        &self,
        spec: &ProfileSpec,
        rng: &mut SimRng,
        at: DateTime<Utc>,
    ) -> Result<PsychologicalProfile> {
        let archetype = spec
            .archetype
            .as_deref()
            .map(str::parse::<PersonalityArchetype>)
            .transpose()?;
        validate_overrides(&spec.trait_overrides)?;
        if let Some(q) = spec.data_quality {
            if !q.is_finite() {
                return Err(Error::Validation("data_quality must be finite".into()));
            }
        }

        let id = ProfileId::generate(rng);
        let personality = self.personality(archetype, spec, rng);
        let mapping = &self.config.mapping;

        let mut risk_profile = mapping.risk_profile(&personality, rng);
        if let Some(a) = archetype {
            risk_profile = blend_risk(&risk_profile, &a.risk_template(), ARCHETYPE_RISK_BLEND);
        }

        let background = spec
            .cultural_background
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(MIXED_BACKGROUND)
            .to_string();
        let cultural = &mapping.cultural;
        let cultural_identity = CulturalIdentity {
            cultural_background: background,
            cultural_flexibility: cultural.cultural_flexibility.apply(&personality, rng),
            traditionalism: cultural.traditionalism.apply(&personality, rng),
            modernization: cultural.modernization.apply(&personality, rng),
            religiosity: cultural.religiosity.apply(&personality, rng),
            nationalism_level: cultural.nationalism_level.apply(&personality, rng),
        };

        let mut profile = PsychologicalProfile {
            id,
            links: spec.links.clone(),
            personality,
            risk_profile,
            motivation_system: mapping.motivation_system(&personality, rng),
            social_psychology: mapping.social_psychology(&personality, rng),
            cognitive_biases: mapping.cognitive_biases(&personality, rng),
            emotional_profile: mapping.emotional_profile(&personality, rng),
            learning_profile: mapping.learning_profile(&personality, rng),
            cultural_identity,
            archetype,
            active: true,
            created_at: at,
            last_updated: at,
            data_quality: spec.data_quality.unwrap_or(GENERATED_DATA_QUALITY),
            source: spec.source,
        };
        profile.normalize();

        tracing::debug!(
            "Generated profile {} (archetype: {:?}, background: {})",
            profile.id,
            profile.archetype,
            profile.cultural_identity.cultural_background
        );

        Ok(profile)
    }

    fn personality(
        &self,
        archetype: Option<PersonalityArchetype>,
        spec: &ProfileSpec,
        rng: &mut SimRng,
    ) -> PersonalityTraits {
        let base = match archetype {
            Some(a) => a.traits(),
            None => {
                let std = 20.0 * self.config.personality_variation;
                PersonalityTraits::new(
                    rng.normal(50.0, std),
                    rng.normal(50.0, std),
                    rng.normal(50.0, std),
                    rng.normal(50.0, std),
                    rng.normal(50.0, std),
                )
            }
        };

        let blended = match spec
            .cultural_background
            .as_deref()
            .and_then(|b| self.config.cultural_bias.get(b.trim()))
        {
            Some(bias) => base.blend_partial(bias, CULTURAL_BLEND),
            None => base,
        };

        blended.overridden(&spec.trait_overrides)
    }
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }
}

fn validate_overrides(overrides: &PartialTraits) -> Result<()> {
    for t in OceanTrait::ALL {
        if let Some(v) = overrides.get(t) {
            if !v.is_finite() {
                return Err(Error::Validation(format!(
                    "override for {} must be finite",
                    t.name()
                )));
            }
        }
    }
    Ok(())
}

fn blend_risk(derived: &RiskProfile, template: &[f64; 6], alpha: f64) -> RiskProfile {
    let d = derived.to_array();
    let mut out = [0.0; 6];
    for (slot, (value, target)) in out.iter_mut().zip(d.iter().zip(template)) {
        *slot = bounded(value * (1.0 - alpha) + target * alpha);
    }
    RiskProfile::from_array(out)
}
