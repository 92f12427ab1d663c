//! # Psycho-Analytics
//!
//! Point-in-time analytics over a simulated population. [`AnalyticsSnapshot::generate`]
//! reads borrowed slices of engine state and never mutates them. Every section
//! degrades to an empty structure when its input is empty, and values the
//! engine does not model are `None` rather than a placeholder number.

pub mod insights;
pub mod patterns;
pub mod population;
pub mod rollups;

use chrono::{DateTime, Utc};
use psycho_behavior::{
    BehavioralEconomicsModel, BehavioralResponse, IncentiveStructure, PolicyPsychologyResponse,
};
use psycho_core::stats::mean;
use psycho_core::{ProfileId, PsychologicalProfile};
use psycho_social::SocialDynamics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use insights::{EconomicsInsights, PredictiveInsights};
pub use patterns::BehavioralPatterns;
pub use population::PopulationPsychology;
pub use rollups::{IncentiveRollup, PolicyRollup, SocialRollup};

/// Profile count at which the sample-size share of confidence saturates
pub const FULL_SAMPLE: usize = 100;

/// Borrowed view of everything analytics reads
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsInput<'a> {
    pub profiles: &'a [&'a PsychologicalProfile],
    pub responses: &'a [&'a BehavioralResponse],
    pub incentives: &'a [&'a IncentiveStructure],
    pub dynamics: &'a [&'a SocialDynamics],
    pub policy_responses: &'a [&'a PolicyPsychologyResponse],
    pub models: &'a [&'a BehavioralEconomicsModel],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub population: PopulationPsychology,
    pub behavioral_patterns: BehavioralPatterns,
    pub social: SocialRollup,
    pub policy: PolicyRollup,
    pub incentives: IncentiveRollup,
    pub economics: EconomicsInsights,
    pub predictive: PredictiveInsights,
    pub data_quality: BTreeMap<String, f64>,
    pub analysis_timestamp: DateTime<Utc>,
    /// Earliest to latest timestamp across every input record
    pub data_time_range: Option<TimeRange>,
    pub analysis_confidence: f64,
    pub sample_size: usize,
}

impl AnalyticsSnapshot {
    /// Snapshot of an empty engine
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            population: PopulationPsychology::default(),
            behavioral_patterns: BehavioralPatterns::default(),
            social: SocialRollup::default(),
            policy: PolicyRollup::default(),
            incentives: IncentiveRollup::default(),
            economics: EconomicsInsights::default(),
            predictive: PredictiveInsights::default(),
            data_quality: BTreeMap::new(),
            analysis_timestamp: at,
            data_time_range: None,
            analysis_confidence: 0.0,
            sample_size: 0,
        }
    }

    pub fn generate(input: &AnalyticsInput<'_>, at: DateTime<Utc>) -> Self {
        let index: BTreeMap<ProfileId, &PsychologicalProfile> =
            input.profiles.iter().map(|p| (p.id, *p)).collect();

        let snapshot = Self {
            population: population::analyze(input.profiles),
            behavioral_patterns: patterns::analyze(input.responses, &index, at),
            social: rollups::social(input.dynamics, &index),
            policy: rollups::policy(input.policy_responses, &index),
            incentives: rollups::incentives(input.incentives, input.profiles),
            economics: insights::economics(input.profiles, input.models),
            predictive: insights::predictive(
                input.profiles,
                input.responses,
                input.dynamics,
                input.policy_responses,
                input.models,
            ),
            data_quality: insights::data_quality(
                input.profiles,
                input.responses,
                input.policy_responses,
            ),
            analysis_timestamp: at,
            data_time_range: time_range(input),
            analysis_confidence: analysis_confidence(input.profiles),
            sample_size: input.profiles.len(),
        };

        tracing::info!(
            "Analytics snapshot: {} profiles, {} responses, {} groups, confidence {:.1}",
            snapshot.sample_size,
            input.responses.len(),
            input.dynamics.len(),
            snapshot.analysis_confidence
        );
        snapshot
    }
}

/// Weighted blend of sample size (30%) and mean data quality (70%)
pub fn analysis_confidence(profiles: &[&PsychologicalProfile]) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    let size_score = 100.0 * profiles.len().min(FULL_SAMPLE) as f64 / FULL_SAMPLE as f64;
    let quality = mean(&profiles.iter().map(|p| p.data_quality).collect::<Vec<_>>());
    0.3 * size_score + 0.7 * quality
}

fn time_range(input: &AnalyticsInput<'_>) -> Option<TimeRange> {
    let stamps = input
        .profiles
        .iter()
        .flat_map(|p| [p.created_at, p.last_updated])
        .chain(input.responses.iter().map(|r| r.timestamp))
        .chain(input.incentives.iter().map(|i| i.created_at))
        .chain(input.dynamics.iter().map(|d| d.computed_at))
        .chain(input.policy_responses.iter().map(|r| r.assessed_at));

    stamps.fold(None, |range, t| match range {
        None => Some(TimeRange { start: t, end: t }),
        Some(TimeRange { start, end }) => Some(TimeRange {
            start: start.min(t),
            end: end.max(t),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use psycho_core::{SimClock, SimRng};
    use psycho_profile::{ProfileGenerator, ProfileSpec};

    #[test]
    fn test_empty_input_yields_zero_snapshot() {
        let at = SimClock::default().now();
        let snapshot = AnalyticsSnapshot::generate(&AnalyticsInput::default(), at);
        assert_eq!(snapshot, AnalyticsSnapshot::empty(at));
    }

    #[test]
    fn test_confidence_blends_size_and_quality() {
        let mut clock = SimClock::default();
        let mut rng = SimRng::seeded(42);
        let generator = ProfileGenerator::default();
        let mut people = Vec::new();
        for _ in 0..10 {
            let person = generator.generate(&ProfileSpec::default(), &mut rng, clock.now());
            people.push(person.unwrap());
            clock.advance_days(1);
        }
        let refs: Vec<&PsychologicalProfile> = people.iter().collect();
        let input = AnalyticsInput {
            profiles: &refs,
            ..Default::default()
        };

        let snapshot = AnalyticsSnapshot::generate(&input, clock.now());
        let quality = mean(&people.iter().map(|p| p.data_quality).collect::<Vec<_>>());
        assert_relative_eq!(snapshot.analysis_confidence, 3.0 + 0.7 * quality, epsilon = 1e-9);
        assert_eq!(snapshot.sample_size, 10);
        assert_eq!(snapshot.population.total_profiles, 10);
        let range = snapshot.data_time_range.unwrap();
        assert_eq!((range.end - range.start).num_days(), 9);
        assert!(snapshot.data_quality.contains_key("profiles"));
    }
}
