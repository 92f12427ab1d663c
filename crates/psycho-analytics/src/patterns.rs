//! Behavioral response patterns.

use chrono::{DateTime, Duration, Utc};
use psycho_behavior::{BehavioralResponse, ResponseType, StimulusType};
use psycho_core::stats::{mean, percentage};
use psycho_core::{PersonalitySegment, ProfileId, PsychologicalProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trailing windows, in days, for intensity trends
pub const TREND_WINDOWS: [i64; 3] = [7, 30, 90];

/// Mean response intensity over trailing windows; `None` when a window saw
/// no responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensityTrends {
    pub last_7_days: Option<f64>,
    pub last_30_days: Option<f64>,
    pub last_90_days: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangePattern {
    /// Percent of responses that moved this behavior at all
    pub frequency: f64,
    /// Mean signed change among responses that moved it
    pub average_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralPatterns {
    pub response_count: usize,
    pub response_frequency: BTreeMap<ResponseType, usize>,
    pub intensity_trends: IntensityTrends,
    /// Mean adaptation rate per observed stimulus type
    pub adaptation_rates: BTreeMap<StimulusType, f64>,
    /// Mean response consistency of profiles in each personality segment
    pub consistency_by_segment: BTreeMap<PersonalitySegment, f64>,
    /// Domain → behavior → pattern
    pub behavior_changes: BTreeMap<String, BTreeMap<String, ChangePattern>>,
}

pub fn analyze(
    responses: &[&BehavioralResponse],
    profiles: &BTreeMap<ProfileId, &PsychologicalProfile>,
    at: DateTime<Utc>,
) -> BehavioralPatterns {
    if responses.is_empty() {
        return BehavioralPatterns::default();
    }

    let mut response_frequency: BTreeMap<ResponseType, usize> = BTreeMap::new();
    let mut adaptation: BTreeMap<StimulusType, Vec<f64>> = BTreeMap::new();
    let mut consistency: BTreeMap<PersonalitySegment, Vec<f64>> = BTreeMap::new();
    let mut changes: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();

    for r in responses {
        *response_frequency.entry(r.response_type).or_default() += 1;
        adaptation
            .entry(r.stimulus.kind)
            .or_default()
            .push(r.adaptation.adaptation_rate);
        if let Some(profile) = profiles.get(&r.profile_id) {
            for seg in PersonalitySegment::ALL {
                if seg.matches(&profile.personality) {
                    consistency.entry(seg).or_default().push(r.response_consistency);
                }
            }
        }
        for (domain, behavior, value) in r.behavior_changes.entries() {
            let moved = changes.entry((domain, behavior)).or_default();
            if value != 0.0 {
                moved.push(value);
            }
        }
    }

    let window = |days: i64| {
        let since = at - Duration::days(days);
        let values: Vec<f64> = responses
            .iter()
            .filter(|r| r.timestamp >= since && r.timestamp <= at)
            .map(|r| r.response_intensity)
            .collect();
        (!values.is_empty()).then(|| mean(&values))
    };

    let mut behavior_changes: BTreeMap<String, BTreeMap<String, ChangePattern>> = BTreeMap::new();
    for ((domain, behavior), moved) in changes {
        behavior_changes.entry(domain.to_string()).or_default().insert(
            behavior.to_string(),
            ChangePattern {
                frequency: percentage(moved.len(), responses.len()),
                average_change: mean(&moved),
            },
        );
    }

    BehavioralPatterns {
        response_count: responses.len(),
        response_frequency,
        intensity_trends: IntensityTrends {
            last_7_days: window(TREND_WINDOWS[0]),
            last_30_days: window(TREND_WINDOWS[1]),
            last_90_days: window(TREND_WINDOWS[2]),
        },
        adaptation_rates: adaptation.into_iter().map(|(k, v)| (k, mean(&v))).collect(),
        consistency_by_segment: consistency.into_iter().map(|(k, v)| (k, mean(&v))).collect(),
        behavior_changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_behavior::{ResponseEngine, Stimulus, StimulusDetails};
    use psycho_core::{SimClock, SimRng};
    use uuid::Uuid;

    #[test]
    fn test_empty_responses() {
        let patterns = analyze(&[], &BTreeMap::new(), SimClock::default().now());
        assert_eq!(patterns, BehavioralPatterns::default());
    }

    #[test]
    fn test_frequencies_windows_and_segments() {
        let mut clock = SimClock::default();
        let mut rng = SimRng::seeded(3);
        let mut profile =
            PsychologicalProfile::baseline(ProfileId(Uuid::from_u128(1)), 50.0, clock.now());
        profile.personality.conscientiousness = 80.0;
        let engine = ResponseEngine::default();

        let stimulus =
            Stimulus::new(StimulusType::Economic, "rate-cut").with_details(StimulusDetails {
                magnitude: Some(60.0),
                ..Default::default()
            });
        let early = engine.predict(&profile, stimulus.clone(), &mut rng, &mut clock).unwrap();
        clock.advance_days(20);
        let late = engine.predict(&profile, stimulus, &mut rng, &mut clock).unwrap();

        let mut profiles = BTreeMap::new();
        profiles.insert(profile.id, &profile);
        let patterns = analyze(&[&early, &late], &profiles, clock.now());

        assert_eq!(patterns.response_count, 2);
        assert_eq!(patterns.response_frequency.values().sum::<usize>(), 2);
        assert_eq!(patterns.adaptation_rates.len(), 1);
        assert!(patterns.adaptation_rates.contains_key(&StimulusType::Economic));
        assert!(patterns.intensity_trends.last_7_days.is_some());
        assert!(patterns.intensity_trends.last_30_days.is_some());
        assert_eq!(patterns.consistency_by_segment.len(), 1);
        assert!(patterns
            .consistency_by_segment
            .contains_key(&PersonalitySegment::HighConscientiousness));
        assert_eq!(patterns.behavior_changes.len(), 4);
    }
}
