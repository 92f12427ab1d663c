//! Group-level social dynamics.
//!
//! A group's dynamics are a pure function of its member set: members are
//! sorted by id before anything is computed, so the same members in any
//! order (or repeated) produce the same result.

use chrono::{DateTime, Utc};
use psycho_core::stats::{bounded, mean};
use psycho_core::{OceanTrait, ProfileId, PsychologicalProfile, Statistics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    City,
    Neighborhood,
    Workplace,
    CulturalGroup,
    ReligiousGroup,
    PoliticalGroup,
    ProfessionalNetwork,
    Family,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupType::City => "city",
            GroupType::Neighborhood => "neighborhood",
            GroupType::Workplace => "workplace",
            GroupType::CulturalGroup => "cultural_group",
            GroupType::ReligiousGroup => "religious_group",
            GroupType::PoliticalGroup => "political_group",
            GroupType::ProfessionalNetwork => "professional_network",
            GroupType::Family => "family",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfluenceNetwork {
    /// Ordered strongest first
    pub leaders: Vec<ProfileId>,
    pub influence_strength: BTreeMap<ProfileId, f64>,
    pub influence_reach: BTreeMap<ProfileId, Vec<ProfileId>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectiveMood {
    pub optimism: f64,
    pub anxiety: f64,
    pub satisfaction: f64,
    pub trust: f64,
    pub excitement: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPhenomena {
    pub conformity_pressure: f64,
    pub polarization: f64,
    pub groupthink: f64,
    pub social_contagion: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeDynamics {
    pub change_resistance: f64,
    pub innovation_adoption: f64,
    pub adaptation_speed: f64,
    /// Share of adopters, in percent, needed before a change spreads
    pub tipping_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialDynamics {
    pub group_id: String,
    pub group_type: GroupType,
    pub group_size: usize,
    pub member_ids: Vec<ProfileId>,
    pub cohesion: f64,
    pub identity: f64,
    pub norms: Vec<String>,
    pub influence_network: InfluenceNetwork,
    pub collective_mood: CollectiveMood,
    pub phenomena: SocialPhenomena,
    pub change_dynamics: ChangeDynamics,
    pub computed_at: DateTime<Utc>,
}

impl SocialDynamics {
    /// Dynamics of a group with no members
    pub fn empty(group_id: impl Into<String>, group_type: GroupType, at: DateTime<Utc>) -> Self {
        Self {
            group_id: group_id.into(),
            group_type,
            group_size: 0,
            member_ids: Vec::new(),
            cohesion: 0.0,
            identity: 0.0,
            norms: Vec::new(),
            influence_network: InfluenceNetwork::default(),
            collective_mood: CollectiveMood::default(),
            phenomena: SocialPhenomena::default(),
            change_dynamics: ChangeDynamics::default(),
            computed_at: at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    pub max_leaders: usize,
    /// Group mean above which a trait or value becomes a norm
    pub norm_threshold: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            max_leaders: 5,
            norm_threshold: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SocialDynamicsAggregator {
    config: DynamicsConfig,
}

impl SocialDynamicsAggregator {
    pub fn new(config: DynamicsConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(
        &self,
        group_id: &str,
        group_type: GroupType,
        members: &[&PsychologicalProfile],
        at: DateTime<Utc>,
    ) -> SocialDynamics {
        let mut members: Vec<&PsychologicalProfile> = members.to_vec();
        members.sort_by_key(|p| p.id);
        members.dedup_by_key(|p| p.id);
        if members.is_empty() {
            return SocialDynamics::empty(group_id, group_type, at);
        }

        let avg = |f: &dyn Fn(&PsychologicalProfile) -> f64| {
            mean(&members.iter().map(|p| f(*p)).collect::<Vec<_>>())
        };
        let spread = |f: &dyn Fn(&PsychologicalProfile) -> f64| {
            Statistics::from_values(&members.iter().map(|p| f(*p)).collect::<Vec<_>>()).std_dev
        };

        let trait_spread = mean(
            &OceanTrait::ALL
                .iter()
                .map(|t| spread(&|p| p.personality.get(*t)))
                .collect::<Vec<_>>(),
        );
        let cohesion = bounded(
            avg(&|p| {
                0.5 * p.personality.agreeableness
                    + 0.3 * p.social_psychology.cooperation_preference
                    + 0.2 * p.social_psychology.group_identity
            }) - 0.5 * trait_spread,
        );
        let identity = bounded(
            avg(&|p| {
                0.6 * p.social_psychology.group_identity
                    + 0.2 * p.cultural_identity.traditionalism
                    + 0.2 * p.cultural_identity.nationalism_level
            }) - 0.3 * spread(&|p| p.social_psychology.group_identity),
        );

        let collective_mood = CollectiveMood {
            optimism: avg(&|p| p.emotional_profile.optimism_level),
            anxiety: 100.0 - avg(&|p| p.emotional_profile.emotional_stability),
            satisfaction: avg(&|p| p.motivation_system.need_satisfaction()),
            trust: avg(&|p| p.social_psychology.social_trust),
            excitement: avg(&|p| p.emotional_profile.emotional_expression),
        };

        let openness = avg(&|p| p.personality.openness);
        let conformity_pressure = bounded(
            0.5 * avg(&|p| p.motivation_system.values.conformity)
                + 0.3 * avg(&|p| p.cognitive_biases.herding)
                + 0.2 * cohesion,
        );
        let social_contagion = bounded(
            0.4 * avg(&|p| p.social_psychology.social_influence)
                + 0.3 * avg(&|p| p.personality.extraversion)
                + 0.3 * avg(&|p| p.emotional_profile.emotional_expression),
        );
        let phenomena = SocialPhenomena {
            conformity_pressure,
            polarization: bounded(
                spread(&|p| p.cultural_identity.traditionalism)
                    + spread(&|p| p.cultural_identity.nationalism_level),
            ),
            groupthink: bounded(
                0.4 * cohesion + 0.3 * conformity_pressure + 0.3 * (100.0 - openness),
            ),
            social_contagion,
        };

        let change_resistance = bounded(
            0.4 * avg(&|p| p.cognitive_biases.status_quo_bias)
                + 0.3 * avg(&|p| p.cultural_identity.traditionalism)
                + 0.3 * (100.0 - openness),
        );
        let change_dynamics = ChangeDynamics {
            change_resistance,
            innovation_adoption: bounded(
                0.5 * avg(&|p| p.learning_profile.innovation_tendency)
                    + 0.3 * openness
                    + 0.2 * avg(&|p| p.risk_profile.risk_tolerance),
            ),
            adaptation_speed: bounded(
                0.5 * avg(&|p| p.emotional_profile.adaptability_to_change)
                    + 0.3 * avg(&|p| p.learning_profile.learning_speed)
                    + 0.2 * (100.0 - change_resistance),
            ),
            tipping_point: bounded(20.0 + 0.4 * change_resistance - 0.2 * social_contagion),
        };

        let dynamics = SocialDynamics {
            group_id: group_id.to_string(),
            group_type,
            group_size: members.len(),
            member_ids: members.iter().map(|p| p.id).collect(),
            cohesion,
            identity,
            norms: self.norms(&members),
            influence_network: self.influence_network(&members),
            collective_mood,
            phenomena,
            change_dynamics,
            computed_at: at,
        };

        tracing::debug!(
            "Aggregated {} group {} ({} members, cohesion {:.1})",
            group_type,
            group_id,
            dynamics.group_size,
            dynamics.cohesion
        );
        dynamics
    }

    fn norms(&self, members: &[&PsychologicalProfile]) -> Vec<String> {
        let threshold = self.config.norm_threshold;
        let avg = |f: fn(&PsychologicalProfile) -> f64| {
            mean(&members.iter().map(|p| f(*p)).collect::<Vec<_>>())
        };
        let candidates: [(&str, f64); 6] = [
            ("rule following", avg(|p| p.personality.conscientiousness)),
            ("mutual support", avg(|p| p.personality.agreeableness)),
            ("openness to new ideas", avg(|p| p.personality.openness)),
            ("respect for tradition", avg(|p| p.motivation_system.values.tradition)),
            ("conformity to group expectations", avg(|p| p.motivation_system.values.conformity)),
            ("deference to authority", avg(|p| p.social_psychology.authority_respect)),
        ];
        candidates
            .into_iter()
            .filter(|(_, level)| *level > threshold)
            .map(|(norm, _)| norm.to_string())
            .collect()
    }

    /// Top-k members by `extraversion · leadership_tendency / 100`; ties go to
    /// the lower id. Leader `i` gets strength `100 · (k - i) / k` and reaches
    /// that share of the non-leaders, starting `i` places into the list.
    fn influence_network(&self, members: &[&PsychologicalProfile]) -> InfluenceNetwork {
        let n = members.len();
        let k = ((n as f64 * 0.1).ceil() as usize).max(1).min(self.config.max_leaders).min(n);
        if k == 0 {
            return InfluenceNetwork::default();
        }

        let mut ranked: Vec<(ProfileId, f64)> = members
            .iter()
            .map(|p| {
                (
                    p.id,
                    p.personality.extraversion * p.social_psychology.leadership_tendency / 100.0,
                )
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let leaders: Vec<ProfileId> = ranked.iter().take(k).map(|(id, _)| *id).collect();

        let followers: Vec<ProfileId> = members
            .iter()
            .map(|p| p.id)
            .filter(|id| !leaders.contains(id))
            .collect();
        let m = followers.len();

        let mut network = InfluenceNetwork {
            leaders: leaders.clone(),
            ..Default::default()
        };
        for (i, leader) in leaders.iter().enumerate() {
            let strength = 100.0 * (k - i) as f64 / k as f64;
            let count = (m as f64 * strength / 100.0).round() as usize;
            let reach = if m == 0 {
                Vec::new()
            } else {
                followers.iter().cycle().skip(i % m).take(count.min(m)).copied().collect()
            };
            network.influence_strength.insert(*leader, strength);
            network.influence_reach.insert(*leader, reach);
        }
        network
    }
}
