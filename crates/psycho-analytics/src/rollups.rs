//! Rollups over group dynamics, policy reactions and incentives.

use psycho_behavior::{
    IncentiveLever, IncentiveModeler, IncentiveStructure, PolicyPsychologyResponse,
    PolicyReaction, PolicyType,
};
use psycho_core::stats::{mean, percentage};
use psycho_core::{IncentiveId, PersonalitySegment, ProfileId, PsychologicalProfile};
use psycho_social::{GroupType, SocialDynamics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phenomenon level above which a group counts as exhibiting it
pub const PHENOMENON_THRESHOLD: f64 = 60.0;

/// Number of levers reported as most effective
pub const TOP_LEVERS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Mean share of possible directed influence edges present, in percent
    pub network_density: f64,
    /// Leader influence strengths across every group, strongest first
    pub centrality_distribution: Vec<f64>,
    /// Mean Herfindahl index of leader strengths, in percent
    pub influence_concentration: f64,
}

/// Collective mood per group, ordered by computation time then group id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodSeries {
    pub optimism: Vec<f64>,
    pub anxiety: Vec<f64>,
    pub satisfaction: Vec<f64>,
    pub trust: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialRollup {
    pub group_count: usize,
    pub cohesion_by_type: BTreeMap<GroupType, f64>,
    /// Percent of leaders falling in each personality segment
    pub leadership_patterns: BTreeMap<PersonalitySegment, f64>,
    pub network: NetworkMetrics,
    /// Percent of groups where each phenomenon exceeds the threshold
    pub phenomena_frequency: BTreeMap<String, f64>,
    pub mood: MoodSeries,
}

pub fn social(
    dynamics: &[&SocialDynamics],
    profiles: &BTreeMap<ProfileId, &PsychologicalProfile>,
) -> SocialRollup {
    if dynamics.is_empty() {
        return SocialRollup::default();
    }

    let mut groups: Vec<&SocialDynamics> = dynamics.to_vec();
    groups.sort_by(|a, b| {
        a.computed_at
            .cmp(&b.computed_at)
            .then_with(|| a.group_id.cmp(&b.group_id))
    });

    let mut cohesion: BTreeMap<GroupType, Vec<f64>> = BTreeMap::new();
    let mut leader_segments: BTreeMap<PersonalitySegment, usize> = BTreeMap::new();
    let mut leader_count = 0;
    let mut densities = Vec::new();
    let mut concentrations = Vec::new();
    let mut centrality = Vec::new();
    let mut phenomena: BTreeMap<&str, usize> = BTreeMap::new();
    let mut mood = MoodSeries::default();

    for g in &groups {
        cohesion.entry(g.group_type).or_default().push(g.cohesion);

        let network = &g.influence_network;
        for leader in &network.leaders {
            leader_count += 1;
            if let Some(p) = profiles.get(leader) {
                for seg in PersonalitySegment::ALL {
                    if seg.matches(&p.personality) {
                        *leader_segments.entry(seg).or_default() += 1;
                    }
                }
            }
        }

        if g.group_size > 1 {
            let edges: usize = network.influence_reach.values().map(Vec::len).sum();
            let possible = g.group_size * (g.group_size - 1);
            densities.push(percentage(edges, possible));
        }

        let strengths: Vec<f64> = network.influence_strength.values().copied().collect();
        let total: f64 = strengths.iter().sum();
        if total > 0.0 {
            let hhi: f64 = strengths.iter().map(|s| (s / total).powi(2)).sum();
            concentrations.push(100.0 * hhi);
        }
        centrality.extend(strengths);

        for (name, level) in [
            ("conformity_pressure", g.phenomena.conformity_pressure),
            ("polarization", g.phenomena.polarization),
            ("groupthink", g.phenomena.groupthink),
            ("social_contagion", g.phenomena.social_contagion),
        ] {
            let hits = phenomena.entry(name).or_default();
            if level > PHENOMENON_THRESHOLD {
                *hits += 1;
            }
        }

        mood.optimism.push(g.collective_mood.optimism);
        mood.anxiety.push(g.collective_mood.anxiety);
        mood.satisfaction.push(g.collective_mood.satisfaction);
        mood.trust.push(g.collective_mood.trust);
    }

    centrality.sort_by(|a, b| b.total_cmp(a));

    SocialRollup {
        group_count: groups.len(),
        cohesion_by_type: cohesion.into_iter().map(|(k, v)| (k, mean(&v))).collect(),
        leadership_patterns: leader_segments
            .into_iter()
            .map(|(seg, n)| (seg, percentage(n, leader_count)))
            .collect(),
        network: NetworkMetrics {
            network_density: mean(&densities),
            centrality_distribution: centrality,
            influence_concentration: mean(&concentrations),
        },
        phenomena_frequency: phenomena
            .into_iter()
            .map(|(name, n)| (name.to_string(), percentage(n, groups.len())))
            .collect(),
        mood,
    }
}

/// Mean phase durations, in days
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimeline {
    pub shock: f64,
    pub resistance: f64,
    pub exploration: f64,
    pub commitment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRollup {
    pub response_count: usize,
    /// Mean of half support plus half compliance
    pub overall_effectiveness: f64,
    /// Percent of positive reactions among profiles in each segment
    pub response_rate_by_segment: BTreeMap<PersonalitySegment, f64>,
    pub compliance_by_type: BTreeMap<PolicyType, f64>,
    pub adaptation_timelines: BTreeMap<PolicyType, PhaseTimeline>,
    /// Mean signed long-term effect
    pub long_term_effectiveness: BTreeMap<PolicyType, f64>,
    pub unintended_consequences: BTreeMap<PolicyType, Vec<String>>,
}

pub fn policy(
    responses: &[&PolicyPsychologyResponse],
    profiles: &BTreeMap<ProfileId, &PsychologicalProfile>,
) -> PolicyRollup {
    if responses.is_empty() {
        return PolicyRollup::default();
    }

    let effectiveness: Vec<f64> = responses
        .iter()
        .map(|r| 0.5 * r.predicted_behaviors.support + 0.5 * r.predicted_behaviors.compliance)
        .collect();

    let mut segment_counts: BTreeMap<PersonalitySegment, (usize, usize)> = BTreeMap::new();
    let mut by_type: BTreeMap<PolicyType, Vec<&PolicyPsychologyResponse>> = BTreeMap::new();
    for r in responses {
        by_type.entry(r.policy_type).or_default().push(*r);
        if let Some(p) = profiles.get(&r.profile_id) {
            for seg in PersonalitySegment::ALL {
                if seg.matches(&p.personality) {
                    let (positive, total) = segment_counts.entry(seg).or_default();
                    *total += 1;
                    if r.initial_reaction == PolicyReaction::Positive {
                        *positive += 1;
                    }
                }
            }
        }
    }

    let mut compliance_by_type = BTreeMap::new();
    let mut adaptation_timelines = BTreeMap::new();
    let mut long_term_effectiveness = BTreeMap::new();
    let mut unintended_consequences = BTreeMap::new();
    for (policy_type, group) in by_type {
        let avg = |f: &dyn Fn(&PolicyPsychologyResponse) -> f64| {
            mean(&group.iter().map(|r| f(*r)).collect::<Vec<_>>())
        };
        compliance_by_type.insert(policy_type, avg(&|r| r.predicted_behaviors.compliance));
        adaptation_timelines.insert(
            policy_type,
            PhaseTimeline {
                shock: avg(&|r| r.adaptation_phases.shock.duration_days),
                resistance: avg(&|r| r.adaptation_phases.resistance.duration_days),
                exploration: avg(&|r| r.adaptation_phases.exploration.duration_days),
                commitment: avg(&|r| r.adaptation_phases.commitment.duration_days),
            },
        );
        let trust = avg(&|r| r.long_term_effects.trust_in_institutions);
        let cohesion = avg(&|r| r.long_term_effects.social_cohesion);
        long_term_effectiveness.insert(
            policy_type,
            avg(&|r| {
                let e = &r.long_term_effects;
                mean(&[
                    e.trust_in_institutions,
                    e.social_cohesion,
                    e.economic_behavior,
                    e.political_engagement,
                ])
            }),
        );

        let confused = group
            .iter()
            .filter(|r| r.initial_reaction == PolicyReaction::Confused)
            .count();
        let mut consequences = Vec::new();
        if avg(&|r| r.predicted_behaviors.resistance) > 50.0 {
            consequences.push("organized resistance".to_string());
        }
        if avg(&|r| r.predicted_behaviors.avoidance) > 50.0 {
            consequences.push("widespread avoidance".to_string());
        }
        if trust < -10.0 {
            consequences.push("erosion of institutional trust".to_string());
        }
        if cohesion < -10.0 {
            consequences.push("social fragmentation".to_string());
        }
        if percentage(confused, group.len()) > 25.0 {
            consequences.push("public confusion".to_string());
        }
        unintended_consequences.insert(policy_type, consequences);
    }

    PolicyRollup {
        response_count: responses.len(),
        overall_effectiveness: mean(&effectiveness),
        response_rate_by_segment: segment_counts
            .into_iter()
            .map(|(seg, (positive, total))| (seg, percentage(positive, total)))
            .collect(),
        compliance_by_type,
        adaptation_timelines,
        long_term_effectiveness,
        unintended_consequences,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncentiveRollup {
    pub incentive_count: usize,
    /// Expected participation across the population
    pub effectiveness: BTreeMap<IncentiveId, f64>,
    /// Percent of targeted-segment members likely to participate; `None`
    /// when no profile falls in a target segment
    pub targeting_accuracy: BTreeMap<IncentiveId, Option<f64>>,
    /// Expected participants per 1,000 cost units; `None` without a cost
    pub cost_effectiveness: BTreeMap<IncentiveId, Option<f64>>,
    pub sustainability: BTreeMap<IncentiveId, f64>,
    /// Percent of incentives carrying each side effect
    pub side_effect_frequency: BTreeMap<String, f64>,
    /// Levers ranked by the mean effectiveness of incentives using them
    pub most_effective_levers: Vec<IncentiveLever>,
    /// Incentive names targeting each segment
    pub personality_targeting: BTreeMap<PersonalitySegment, Vec<String>>,
}

pub fn incentives(
    incentives: &[&IncentiveStructure],
    profiles: &[&PsychologicalProfile],
) -> IncentiveRollup {
    if incentives.is_empty() {
        return IncentiveRollup::default();
    }

    let modeler = IncentiveModeler::new();
    let mut rollup = IncentiveRollup {
        incentive_count: incentives.len(),
        ..Default::default()
    };
    let mut side_effects: BTreeMap<&str, usize> = BTreeMap::new();
    let mut lever_scores: BTreeMap<IncentiveLever, Vec<f64>> = BTreeMap::new();

    for inc in incentives {
        let fit = modeler.population_fit(inc, profiles.iter().copied());
        rollup.effectiveness.insert(inc.id, fit.expected_participation);
        rollup
            .sustainability
            .insert(inc.id, inc.sustainability_factor);

        let targeted: Vec<f64> = profiles
            .iter()
            .filter(|p| {
                inc.target_personalities
                    .iter()
                    .any(|seg| seg.matches(&p.personality))
            })
            .map(|p| modeler.fit_for_profile(inc, p).participation_likelihood)
            .collect();
        let accuracy = (!targeted.is_empty()).then(|| {
            percentage(targeted.iter().filter(|l| **l >= 50.0).count(), targeted.len())
        });
        rollup.targeting_accuracy.insert(inc.id, accuracy);

        let cost = (inc.implementation_cost > 0.0 && fit.sample_size > 0).then(|| {
            let participants = fit.expected_participation / 100.0 * fit.sample_size as f64;
            1000.0 * participants / inc.implementation_cost
        });
        rollup.cost_effectiveness.insert(inc.id, cost);

        let effects = &inc.side_effects;
        let mut names: Vec<&str> = effects
            .economic
            .iter()
            .chain(&effects.social)
            .chain(&effects.psychological)
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        for name in names {
            *side_effects.entry(name).or_default() += 1;
        }

        for lever in inc.components.keys() {
            lever_scores
                .entry(*lever)
                .or_default()
                .push(fit.expected_participation);
        }
        for seg in &inc.target_personalities {
            rollup
                .personality_targeting
                .entry(*seg)
                .or_default()
                .push(inc.name.clone());
        }
    }

    rollup.side_effect_frequency = side_effects
        .into_iter()
        .map(|(name, n)| (name.to_string(), percentage(n, incentives.len())))
        .collect();

    let mut ranked: Vec<(IncentiveLever, f64)> = lever_scores
        .into_iter()
        .map(|(lever, v)| (lever, mean(&v)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    rollup.most_effective_levers = ranked
        .into_iter()
        .take(TOP_LEVERS)
        .map(|(lever, _)| lever)
        .collect();

    rollup
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_behavior::{IncentiveSpec, IncentiveType, PolicyDetails, PolicyResponseAnalyzer};
    use psycho_core::{SimClock, SimRng};
    use psycho_social::SocialDynamicsAggregator;
    use uuid::Uuid;

    fn people(n: u128) -> Vec<PsychologicalProfile> {
        let now = SimClock::default().now();
        (1..=n)
            .map(|i| {
                let id = ProfileId(Uuid::from_u128(i));
                let mut p = PsychologicalProfile::baseline(id, 50.0, now);
                p.personality.extraversion = 40.0 + i as f64;
                p
            })
            .collect()
    }

    fn lookup(profiles: &[PsychologicalProfile]) -> BTreeMap<ProfileId, &PsychologicalProfile> {
        profiles.iter().map(|p| (p.id, p)).collect()
    }

    #[test]
    fn test_empty_rollups() {
        let index = BTreeMap::new();
        assert_eq!(social(&[], &index), SocialRollup::default());
        assert_eq!(policy(&[], &index), PolicyRollup::default());
        assert_eq!(incentives(&[], &[]), IncentiveRollup::default());
    }

    #[test]
    fn test_social_rollup() {
        let profiles = people(25);
        let refs: Vec<&PsychologicalProfile> = profiles.iter().collect();
        let now = SimClock::default().now();
        let aggregator = SocialDynamicsAggregator::default();
        let a = aggregator.aggregate("guild", GroupType::ProfessionalNetwork, &refs, now);
        let b = aggregator.aggregate("district", GroupType::City, &refs[..10], now);

        let rollup = social(&[&a, &b], &lookup(&profiles));
        assert_eq!(rollup.group_count, 2);
        assert_eq!(rollup.cohesion_by_type.len(), 2);
        assert_eq!(rollup.mood.trust.len(), 2);
        assert_eq!(rollup.phenomena_frequency.len(), 4);
        let strengths = &rollup.network.centrality_distribution;
        assert_eq!(strengths.len(), 4);
        assert!(strengths.windows(2).all(|w| w[0] >= w[1]));
        assert!(rollup.network.network_density > 0.0);
        // The three most extraverted of 25 are above 60
        assert_eq!(rollup.leadership_patterns[&PersonalitySegment::HighExtraversion], 75.0);
    }

    #[test]
    fn test_policy_rollup() {
        let profiles = people(4);
        let now = SimClock::default().now();
        let details = PolicyDetails::new("clean air", PolicyType::Environmental);
        let outcome = PolicyResponseAnalyzer::default()
            .analyze("p1", &details, &profiles, now)
            .unwrap();
        let refs: Vec<&PolicyPsychologyResponse> = outcome.results.iter().collect();

        let rollup = policy(&refs, &lookup(&profiles));
        assert_eq!(rollup.response_count, 4);
        assert!((0.0..=100.0).contains(&rollup.overall_effectiveness));
        assert!(rollup.compliance_by_type.contains_key(&PolicyType::Environmental));
        let timeline = rollup.adaptation_timelines[&PolicyType::Environmental];
        assert!(timeline.shock > 0.0 && timeline.commitment > 0.0);
        assert!(rollup.unintended_consequences.contains_key(&PolicyType::Environmental));
    }

    #[test]
    fn test_incentive_rollup() {
        let profiles = people(5);
        let refs: Vec<&PsychologicalProfile> = profiles.iter().collect();
        let now = SimClock::default().now();
        let spec = IncentiveSpec::new("green bonus", IncentiveType::Environmental)
            .with_component(IncentiveLever::MonetaryReward, 3000.0)
            .with_component(IncentiveLever::PurposeAlignment, 85.0);
        let inc = IncentiveModeler::new()
            .create(&spec, &mut SimRng::seeded(1), now)
            .unwrap();

        let rollup = incentives(&[&inc], &refs);
        assert_eq!(rollup.incentive_count, 1);
        assert!(rollup.effectiveness[&inc.id] > 0.0);
        // No baseline profile is high in openness or agreeableness
        assert_eq!(rollup.targeting_accuracy[&inc.id], None);
        assert_eq!(rollup.cost_effectiveness[&inc.id].is_some(), inc.implementation_cost > 0.0);
        assert_eq!(rollup.most_effective_levers.len(), 2);
        assert_eq!(
            rollup.personality_targeting[&PersonalitySegment::HighAgreeableness],
            vec!["green bonus".to_string()]
        );
    }
}
