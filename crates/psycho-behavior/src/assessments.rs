//! Single-profile assessments consumed by neighbouring simulation systems:
//! elections, the legal system, security, demographics, technology and
//! business.

use psycho_core::stats::bounded;
use psycho_core::PsychologicalProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which assessment ran, for event logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Voting,
    LegalCompliance,
    SecurityThreat,
    Lifecycle,
    TechnologyAdoption,
    Entrepreneurship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    Economy,
    Social,
    Security,
    Environment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub platform: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Election {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingAssessment {
    pub voting_probability: f64,
    /// Best-aligned candidate; `None` when the ballot is empty
    pub candidate_preference: Option<String>,
    pub issue_importance: BTreeMap<Issue, f64>,
    pub partisanship: f64,
    pub swing_potential: f64,
}

pub fn voting_behavior(profile: &PsychologicalProfile, election: &Election) -> VotingAssessment {
    let p = &profile.personality;
    let v = &profile.motivation_system.values;
    let m = &profile.motivation_system;

    let partisanship = bounded(0.4 * (100.0 - p.openness) + 0.3 * v.conformity + 0.3 * v.tradition);

    let mut issue_importance = BTreeMap::new();
    issue_importance.insert(Issue::Economy, bounded(0.4 * v.security + 0.6 * v.achievement));
    issue_importance.insert(Issue::Social, bounded(0.5 * v.benevolence + 0.5 * v.universalism));
    issue_importance.insert(
        Issue::Security,
        bounded(0.7 * v.security + 0.3 * (100.0 - p.openness)),
    );
    issue_importance.insert(Issue::Environment, bounded(0.8 * v.universalism + 0.2 * p.openness));

    let mut best: Option<(&Candidate, f64)> = None;
    for candidate in &election.candidates {
        let score = candidate_alignment(profile, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    VotingAssessment {
        voting_probability: bounded(
            0.3 * p.conscientiousness
                + 0.2 * v.conformity
                + 0.2 * m.esteem_needs
                + 0.3 * (100.0 - p.neuroticism),
        ),
        candidate_preference: best.map(|(c, _)| c.id.clone()),
        issue_importance,
        partisanship,
        swing_potential: 100.0 - partisanship,
    }
}

fn candidate_alignment(profile: &PsychologicalProfile, candidate: &Candidate) -> f64 {
    let v = &profile.motivation_system.values;
    let bonus: f64 = candidate
        .platform
        .iter()
        .map(|issue| match issue {
            Issue::Security if v.security > 60.0 => 20.0,
            Issue::Economy if v.achievement > 60.0 => 15.0,
            Issue::Social if v.benevolence > 60.0 => 15.0,
            Issue::Environment if v.universalism > 60.0 => 10.0,
            _ => 0.0,
        })
        .sum();
    bounded(50.0 + bonus)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawType {
    Criminal,
    Civil,
    Regulatory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub compliance_probability: f64,
    pub deterrence_effectiveness: f64,
    pub risk_perception: f64,
    pub moral_alignment: f64,
    pub enforcement_sensitivity: f64,
}

pub fn legal_compliance(profile: &PsychologicalProfile, law: LawType) -> ComplianceAssessment {
    let p = &profile.personality;
    let v = &profile.motivation_system.values;
    let r = &profile.risk_profile;

    let moral_bonus = match law {
        LawType::Criminal => 0.3 * v.security + 0.2 * v.conformity,
        LawType::Civil => 0.3 * v.universalism + 0.2 * v.benevolence,
        LawType::Regulatory => 0.4 * v.conformity + 0.1 * v.security,
        LawType::Other => 0.0,
    };

    ComplianceAssessment {
        compliance_probability: bounded(
            0.3 * p.conscientiousness
                + 0.25 * v.conformity
                + 0.2 * v.security
                + 0.25 * (100.0 - p.neuroticism),
        ),
        deterrence_effectiveness: bounded(
            0.4 * (100.0 - r.risk_tolerance) + 0.3 * r.loss_aversion + 0.3 * p.conscientiousness,
        ),
        risk_perception: bounded(
            0.4 * p.neuroticism + 0.3 * (100.0 - r.risk_tolerance) + 0.3 * r.loss_aversion,
        ),
        moral_alignment: bounded(50.0 + moral_bonus),
        enforcement_sensitivity: bounded(
            0.4 * p.neuroticism + 0.3 * v.conformity + 0.3 * (100.0 - p.extraversion),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub kind: String,
    /// 0–100; 50 leaves perception at the personality baseline
    pub severity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatResponse {
    pub threat_perception: f64,
    pub cooperation_with_authorities: f64,
    pub vigilance: f64,
    pub panic_potential: f64,
    pub reporting_likelihood: f64,
}

pub fn security_threat_response(profile: &PsychologicalProfile, threat: &Threat) -> ThreatResponse {
    let p = &profile.personality;
    let v = &profile.motivation_system.values;
    let severity = bounded(threat.severity);

    let cooperation = bounded(
        0.3 * v.conformity + 0.3 * v.security + 0.2 * p.agreeableness + 0.2 * p.conscientiousness,
    );
    let panic = bounded(
        (0.5 * p.neuroticism
            + 0.3 * (100.0 - p.conscientiousness)
            + 0.2 * (100.0 - profile.risk_profile.uncertainty_tolerance))
            * (0.5 + severity / 100.0),
    );

    ThreatResponse {
        threat_perception: bounded(
            (0.4 * p.neuroticism + 0.3 * v.security + 0.3 * (100.0 - p.openness))
                * (0.5 + severity / 100.0),
        ),
        cooperation_with_authorities: cooperation,
        vigilance: bounded(0.3 * p.conscientiousness + 0.4 * v.security + 0.3 * p.neuroticism),
        panic_potential: panic,
        reporting_likelihood: bounded(
            0.3 * p.conscientiousness
                + 0.2 * v.conformity
                + 0.3 * cooperation
                + 0.2 * (100.0 - panic),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyPlanning {
    /// Desired number of children, 0–5
    pub children_desired: f64,
    pub marriage_importance: f64,
    pub family_stability_priority: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CareerPriorities {
    pub achievement_focus: f64,
    pub work_life_balance: f64,
    pub entrepreneurship: f64,
    pub leadership_aspiration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBehaviors {
    pub preventive_care: f64,
    pub risk_taking: f64,
    pub stress_management: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleAssessment {
    pub family_planning: FamilyPlanning,
    pub career: CareerPriorities,
    pub health: HealthBehaviors,
    pub migration_potential: f64,
    pub social_mobility: f64,
}

pub fn lifecycle_decisions(profile: &PsychologicalProfile) -> LifecycleAssessment {
    let p = &profile.personality;
    let m = &profile.motivation_system;
    let v = &m.values;
    let r = &profile.risk_profile;

    LifecycleAssessment {
        family_planning: FamilyPlanning {
            children_desired: ((0.3 * v.tradition
                + 0.3 * v.benevolence
                + 0.2 * m.belonging_needs
                + 0.2 * p.agreeableness)
                / 20.0)
                .clamp(0.0, 5.0),
            marriage_importance: bounded(
                0.4 * v.tradition + 0.3 * v.conformity + 0.3 * m.belonging_needs,
            ),
            family_stability_priority: bounded(0.4 * p.conscientiousness + 0.6 * v.security),
        },
        career: CareerPriorities {
            achievement_focus: bounded(
                0.5 * v.achievement + 0.3 * p.conscientiousness + 0.2 * m.esteem_needs,
            ),
            work_life_balance: bounded(
                0.3 * p.agreeableness + 0.4 * m.belonging_needs + 0.3 * (100.0 - v.achievement),
            ),
            entrepreneurship: bounded(
                0.3 * p.openness + 0.3 * (100.0 - p.neuroticism) + 0.4 * r.risk_tolerance,
            ),
            leadership_aspiration: bounded(
                0.4 * p.extraversion + 0.3 * v.power + 0.3 * m.esteem_needs,
            ),
        },
        health: HealthBehaviors {
            preventive_care: bounded(
                0.5 * p.conscientiousness + 0.3 * v.security + 0.2 * m.physiological_needs,
            ),
            risk_taking: bounded(0.6 * r.risk_tolerance + 0.4 * p.openness),
            stress_management: bounded(
                0.5 * (100.0 - p.neuroticism) + 0.3 * p.conscientiousness + 0.2 * m.safety_needs,
            ),
        },
        migration_potential: bounded(
            0.4 * p.openness + 0.3 * (100.0 - v.tradition) + 0.3 * r.risk_tolerance,
        ),
        social_mobility: bounded(
            0.3 * v.achievement
                + 0.3 * p.conscientiousness
                + 0.2 * p.openness
                + 0.2 * m.esteem_needs,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub id: String,
    /// Perceived complexity on a 0–10 scale
    #[serde(default)]
    pub complexity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdoptionAssessment {
    pub adoption_probability: f64,
    pub adoption_speed: f64,
    pub usage_intensity: f64,
    pub innovation_contribution: f64,
    pub ethical_concerns: f64,
}

pub fn technology_adoption(
    profile: &PsychologicalProfile,
    technology: &Technology,
) -> AdoptionAssessment {
    let p = &profile.personality;
    let v = &profile.motivation_system.values;
    let accessibility = technology
        .complexity
        .map(|c| bounded(100.0 - c * 10.0))
        .unwrap_or(50.0);

    AdoptionAssessment {
        adoption_probability: bounded(
            0.4 * p.openness + 0.2 * v.stimulation + 0.2 * v.achievement + 0.2 * accessibility,
        ),
        adoption_speed: bounded(
            0.5 * p.openness + 0.3 * v.stimulation + 0.2 * profile.risk_profile.risk_tolerance,
        ),
        usage_intensity: bounded(
            0.3 * p.conscientiousness + 0.3 * v.achievement + 0.4 * p.openness,
        ),
        innovation_contribution: bounded(
            0.4 * p.openness + 0.3 * v.self_direction + 0.3 * p.conscientiousness,
        ),
        ethical_concerns: bounded(
            0.4 * v.universalism + 0.3 * v.benevolence + 0.3 * p.agreeableness,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Service,
    Technology,
    Manufacturing,
    SocialEnterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStyle {
    Aggressive,
    Balanced,
    Conservative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipStyle {
    Collaborative,
    Authoritative,
    Servant,
    Transformational,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurshipAssessment {
    pub score: f64,
    pub business_type: BusinessType,
    pub risk_management: RiskStyle,
    pub leadership: LeadershipStyle,
    pub innovation_orientation: f64,
}

pub fn entrepreneurship_potential(profile: &PsychologicalProfile) -> EntrepreneurshipAssessment {
    let p = &profile.personality;
    let v = &profile.motivation_system.values;
    let risk = profile.risk_profile.risk_tolerance;

    let business_type = if p.openness > 70.0 && v.stimulation > 60.0 {
        BusinessType::Technology
    } else if v.achievement > 70.0 && p.conscientiousness > 60.0 {
        BusinessType::Manufacturing
    } else if p.agreeableness > 70.0 && v.benevolence > 60.0 {
        BusinessType::SocialEnterprise
    } else {
        BusinessType::Service
    };

    let risk_management = if risk > 70.0 {
        RiskStyle::Aggressive
    } else if risk < 30.0 {
        RiskStyle::Conservative
    } else {
        RiskStyle::Balanced
    };

    let leadership = if p.extraversion > 70.0 && v.power > 60.0 {
        LeadershipStyle::Authoritative
    } else if p.agreeableness > 70.0 && v.benevolence > 60.0 {
        LeadershipStyle::Servant
    } else if p.openness > 70.0 && v.self_direction > 60.0 {
        LeadershipStyle::Transformational
    } else {
        LeadershipStyle::Collaborative
    };

    EntrepreneurshipAssessment {
        score: bounded(
            0.25 * p.openness
                + 0.25 * (100.0 - p.neuroticism)
                + 0.2 * v.achievement
                + 0.15 * v.self_direction
                + 0.15 * risk,
        ),
        business_type,
        risk_management,
        leadership,
        innovation_orientation: bounded(
            0.4 * p.openness + 0.3 * v.stimulation + 0.3 * v.self_direction,
        ),
    }
}
