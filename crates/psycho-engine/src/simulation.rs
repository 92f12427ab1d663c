//! Time-step evolution of profiles.
//!
//! A step has two phases. The per-profile phase reads only one profile, its
//! creation baseline and its own new responses, so it runs in parallel with a
//! generator derived from `(seed, step, profile id)`. Everything that reduces
//! across profiles runs after all per-profile results are collected.

use chrono::{DateTime, Utc};
use psycho_core::stats::mean;
use psycho_core::{ProfileId, PsychologicalProfile, SimRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::store::PendingUpdate;

/// Outcome of one simulated step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub step: u64,
    pub at: DateTime<Utc>,
    pub profiles_updated: usize,
    pub responses_integrated: usize,
    pub groups_updated: usize,
    pub mean_social_trust: f64,
    pub mean_optimism: f64,
}

/// Generator for one profile in one step; independent of scheduling order
pub fn profile_rng(seed: u64, step: u64, id: ProfileId) -> SimRng {
    SimRng::derive(seed, &id.to_string(), step)
}

/// Next state of one profile: absorb new responses, decay toward the
/// baseline, then add mood noise
pub fn evolve_profile(
    update: &PendingUpdate<'_>,
    config: &SimulationConfig,
    rng: &mut SimRng,
) -> PsychologicalProfile {
    let mut next = update.profile.clone();
    let a = config.adaptation_speed;

    for r in update.new_responses {
        let changes = &r.behavior_changes;
        next.social_psychology.social_trust += a * changes.social.trust_level;
        next.emotional_profile.optimism_level += a * (r.response_intensity - 50.0);
        next.emotional_profile.adaptability_to_change += a * changes.cultural.innovation_adoption;
        next.learning_profile.habit_formation += a * (r.response_consistency - 50.0);
    }

    let decay = config.memory_decay_rate;
    let base = update.baseline;
    let pull = |current: &mut f64, target: f64| *current += decay * (target - *current);
    pull(
        &mut next.social_psychology.social_trust,
        base.social_psychology.social_trust,
    );
    pull(
        &mut next.emotional_profile.optimism_level,
        base.emotional_profile.optimism_level,
    );
    pull(
        &mut next.emotional_profile.adaptability_to_change,
        base.emotional_profile.adaptability_to_change,
    );
    pull(
        &mut next.learning_profile.habit_formation,
        base.learning_profile.habit_formation,
    );

    next.emotional_profile.optimism_level += rng.normal(0.0, config.response_volatility * 10.0);
    next.normalize();
    next
}

/// Per-profile phase of a step. Results come back in the order of `updates`.
pub fn evolve_all(
    updates: &[PendingUpdate<'_>],
    config: &SimulationConfig,
    seed: u64,
    step: u64,
) -> Vec<PsychologicalProfile> {
    updates
        .par_iter()
        .map(|u| {
            let mut rng = profile_rng(seed, step, u.profile.id);
            evolve_profile(u, config, &mut rng)
        })
        .collect()
}

/// New social trust of each member, pulled toward the group mean by
/// `strength · 0.1` of the gap
pub fn social_influence(members: &[&PsychologicalProfile], strength: f64) -> Vec<(ProfileId, f64)> {
    if members.is_empty() {
        return Vec::new();
    }
    let target = mean(
        &members
            .iter()
            .map(|p| p.social_psychology.social_trust)
            .collect::<Vec<_>>(),
    );
    members
        .iter()
        .map(|p| {
            let trust = p.social_psychology.social_trust;
            (p.id, trust + strength * 0.1 * (target - trust))
        })
        .collect()
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

    fn quiet() -> SimulationConfig {
        SimulationConfig {
            response_volatility: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_decay_toward_baseline() {
        let baseline = profile(1, 50.0);
        let mut drifted = baseline.clone();
        drifted.social_psychology.social_trust = 90.0;
        let update = PendingUpdate {
            profile: &drifted,
            baseline: &baseline,
            new_responses: &[],
        };
        let next = evolve_profile(&update, &quiet(), &mut SimRng::seeded(1));
        // 90 - 0.02 * 40
        assert!((next.social_psychology.social_trust - 89.2).abs() < 1e-9);
        assert_eq!(next.emotional_profile.optimism_level, 50.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let profiles: Vec<PsychologicalProfile> =
            (1..=20).map(|n| profile(n, 40.0 + n as f64)).collect();
        let updates: Vec<PendingUpdate<'_>> = profiles
            .iter()
            .map(|p| PendingUpdate {
                profile: p,
                baseline: p,
                new_responses: &[],
            })
            .collect();
        let config = SimulationConfig::default();
        let parallel = evolve_all(&updates, &config, 7, 3);
        let sequential: Vec<PsychologicalProfile> = updates
            .iter()
            .map(|u| evolve_profile(u, &config, &mut profile_rng(7, 3, u.profile.id)))
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_social_influence_converges() {
        let a = profile(1, 20.0);
        let b = profile(2, 80.0);
        let moved = social_influence(&[&a, &b], 0.5);
        assert!((moved[0].1 - 21.5).abs() < 1e-9);
        assert!((moved[1].1 - 78.5).abs() < 1e-9);
        assert!(social_influence(&[], 0.5).is_empty());
    }
}
