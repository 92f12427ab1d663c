//! Population-wide psychology distributions.

use psycho_core::stats::{mean, percentage};
use psycho_core::{
    OceanTrait, PersonalityArchetype, PsychologicalProfile, Statistics, ValueKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalHealth {
    pub emotional_stability: f64,
    pub stress_resilience: f64,
    pub adaptability: f64,
    /// Mean social trust
    pub social_cohesion: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationPsychology {
    pub total_profiles: usize,
    pub personality: BTreeMap<OceanTrait, Statistics>,
    /// Keyed by risk metric name
    pub risk: BTreeMap<String, Statistics>,
    /// Keyed by Maslow need name
    pub motivation: BTreeMap<String, Statistics>,
    pub values: BTreeMap<ValueKind, Statistics>,
    /// Percent of profiles per cultural background; sums to 100
    pub cultural_diversity: BTreeMap<String, f64>,
    pub archetypes: BTreeMap<PersonalityArchetype, usize>,
    pub health: PsychologicalHealth,
}

pub fn analyze(profiles: &[&PsychologicalProfile]) -> PopulationPsychology {
    if profiles.is_empty() {
        return PopulationPsychology::default();
    }

    let stats = |f: &dyn Fn(&PsychologicalProfile) -> f64| {
        Statistics::from_values(&profiles.iter().map(|p| f(*p)).collect::<Vec<_>>())
    };
    let avg = |f: &dyn Fn(&PsychologicalProfile) -> f64| {
        mean(&profiles.iter().map(|p| f(*p)).collect::<Vec<_>>())
    };

    let personality = OceanTrait::ALL
        .into_iter()
        .map(|t| (t, stats(&|p| p.personality.get(t))))
        .collect();

    let risk = (0..6)
        .map(|i| {
            let name = profiles[0].risk_profile.named()[i].0;
            (name.to_string(), stats(&|p| p.risk_profile.named()[i].1))
        })
        .collect();

    let motivation = (0..5)
        .map(|i| {
            let name = profiles[0].motivation_system.named_needs()[i].0;
            (name.to_string(), stats(&|p| p.motivation_system.named_needs()[i].1))
        })
        .collect();

    let values = ValueKind::ALL
        .into_iter()
        .map(|v| (v, stats(&|p| p.motivation_system.values.get(v))))
        .collect();

    let mut backgrounds: BTreeMap<String, usize> = BTreeMap::new();
    let mut archetypes: BTreeMap<PersonalityArchetype, usize> = BTreeMap::new();
    for p in profiles {
        *backgrounds
            .entry(p.cultural_identity.background_bucket().to_string())
            .or_default() += 1;
        if let Some(a) = p.archetype {
            *archetypes.entry(a).or_default() += 1;
        }
    }
    let cultural_diversity = backgrounds
        .into_iter()
        .map(|(culture, count)| (culture, percentage(count, profiles.len())))
        .collect();

    PopulationPsychology {
        total_profiles: profiles.len(),
        personality,
        risk,
        motivation,
        values,
        cultural_diversity,
        archetypes,
        health: PsychologicalHealth {
            emotional_stability: avg(&|p| p.emotional_profile.emotional_stability),
            stress_resilience: avg(&|p| p.emotional_profile.stress_resilience),
            adaptability: avg(&|p| p.emotional_profile.adaptability_to_change),
            social_cohesion: avg(&|p| p.social_psychology.social_trust),
        },
    }
}
