//! Owned population store.
//!
//! Profiles live in an arena addressed by insertion slot; every other entity
//! refers to a profile by [`ProfileId`] and never embeds a copy of it.

use chrono::{DateTime, Utc};
use psycho_behavior::{BehavioralResponse, IncentiveStructure, PolicyPsychologyResponse};
use psycho_core::{EntityKind, Error, IncentiveId, ProfileId, PsychologicalProfile, Result};
use psycho_social::SocialDynamics;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Slot {
    profile: PsychologicalProfile,
    /// Profile as created; memory decay pulls toward it
    baseline: PsychologicalProfile,
    responses: Vec<BehavioralResponse>,
    /// Responses already folded into the profile by a time step
    integrated: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PopulationStore {
    slots: Vec<Slot>,
    index: BTreeMap<ProfileId, usize>,
    incentives: BTreeMap<IncentiveId, IncentiveStructure>,
    dynamics: BTreeMap<String, SocialDynamics>,
    policy_responses: BTreeMap<String, Vec<PolicyPsychologyResponse>>,
}

/// Work item handed to a time step: the profile, its baseline, and the
/// responses recorded since the previous step
pub struct PendingUpdate<'a> {
    pub profile: &'a PsychologicalProfile,
    pub baseline: &'a PsychologicalProfile,
    pub new_responses: &'a [BehavioralResponse],
}

impl PopulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&mut self, profile: PsychologicalProfile) -> Result<ProfileId> {
        let id = profile.id;
        if self.index.contains_key(&id) {
            return Err(Error::Validation(format!("duplicate profile id: {id}")));
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Slot {
            baseline: profile.clone(),
            profile,
            responses: Vec::new(),
            integrated: 0,
        });
        Ok(id)
    }

    fn slot(&self, id: ProfileId) -> Result<&Slot> {
        self.index
            .get(&id)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| Error::not_found(EntityKind::Profile, id))
    }

    fn slot_mut(&mut self, id: ProfileId) -> Result<&mut Slot> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(Error::not_found(EntityKind::Profile, id)),
        }
    }

    pub fn profile(&self, id: ProfileId) -> Result<&PsychologicalProfile> {
        self.slot(id).map(|s| &s.profile)
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.index.contains_key(&id)
    }

    /// Apply `update`, then re-clamp and stamp the profile
    pub fn update_profile<F>(
        &mut self,
        id: ProfileId,
        at: DateTime<Utc>,
        update: F,
    ) -> Result<&PsychologicalProfile>
    where
        F: FnOnce(&mut PsychologicalProfile),
    {
        let slot = self.slot_mut(id)?;
        update(&mut slot.profile);
        slot.profile.id = id;
        slot.profile.normalize();
        slot.profile.touch(at);
        Ok(&slot.profile)
    }

    pub fn deactivate(
        &mut self,
        id: ProfileId,
        at: DateTime<Utc>,
    ) -> Result<&PsychologicalProfile> {
        self.update_profile(id, at, |p| p.active = false)
    }

    /// All profiles in insertion order
    pub fn profiles(&self) -> impl Iterator<Item = &PsychologicalProfile> {
        self.slots.iter().map(|s| &s.profile)
    }

    pub fn active_profiles(&self) -> impl Iterator<Item = &PsychologicalProfile> {
        self.profiles().filter(|p| p.active)
    }

    pub fn profile_count(&self) -> usize {
        self.slots.len()
    }

    pub fn record_response(&mut self, response: BehavioralResponse) -> Result<()> {
        self.slot_mut(response.profile_id)?.responses.push(response);
        Ok(())
    }

    pub fn responses_for(&self, id: ProfileId) -> Result<&[BehavioralResponse]> {
        self.slot(id).map(|s| s.responses.as_slice())
    }

    /// Every recorded response, grouped by profile in insertion order
    pub fn responses(&self) -> impl Iterator<Item = &BehavioralResponse> {
        self.slots.iter().flat_map(|s| s.responses.iter())
    }

    /// Active profiles with their pending responses, in insertion order
    pub fn pending_updates(&self) -> Vec<PendingUpdate<'_>> {
        self.slots
            .iter()
            .filter(|s| s.profile.active)
            .map(|s| PendingUpdate {
                profile: &s.profile,
                baseline: &s.baseline,
                new_responses: &s.responses[s.integrated..],
            })
            .collect()
    }

    /// Replace profiles with their updated versions and mark every recorded
    /// response of those profiles as integrated
    pub fn apply_updates(&mut self, updated: Vec<PsychologicalProfile>, at: DateTime<Utc>) {
        for mut profile in updated {
            if let Some(&i) = self.index.get(&profile.id) {
                let slot = &mut self.slots[i];
                profile.normalize();
                profile.touch(at);
                slot.profile = profile;
                slot.integrated = slot.responses.len();
            }
        }
    }

    pub fn insert_incentive(&mut self, incentive: IncentiveStructure) -> IncentiveId {
        let id = incentive.id;
        self.incentives.insert(id, incentive);
        id
    }

    pub fn incentive(&self, id: IncentiveId) -> Result<&IncentiveStructure> {
        self.incentives
            .get(&id)
            .ok_or_else(|| Error::not_found(EntityKind::Incentive, id))
    }

    pub fn incentive_mut(&mut self, id: IncentiveId) -> Result<&mut IncentiveStructure> {
        self.incentives
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(EntityKind::Incentive, id))
    }

    /// Incentives ordered by id
    pub fn incentives(&self) -> impl Iterator<Item = &IncentiveStructure> {
        self.incentives.values()
    }

    pub fn upsert_dynamics(&mut self, dynamics: SocialDynamics) {
        self.dynamics.insert(dynamics.group_id.clone(), dynamics);
    }

    pub fn dynamics(&self, group_id: &str) -> Result<&SocialDynamics> {
        self.dynamics
            .get(group_id)
            .ok_or_else(|| Error::not_found(EntityKind::Group, group_id))
    }

    /// Groups ordered by id
    pub fn all_dynamics(&self) -> impl Iterator<Item = &SocialDynamics> {
        self.dynamics.values()
    }

    /// Store the latest analysis of a policy, replacing any earlier one
    pub fn record_policy_responses(
        &mut self,
        policy_id: &str,
        responses: Vec<PolicyPsychologyResponse>,
    ) {
        self.policy_responses.insert(policy_id.to_string(), responses);
    }

    pub fn policy_responses(&self, policy_id: &str) -> Result<&[PolicyPsychologyResponse]> {
        self.policy_responses
            .get(policy_id)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::not_found(EntityKind::Policy, policy_id))
    }

    pub fn all_policy_responses(&self) -> impl Iterator<Item = &PolicyPsychologyResponse> {
        self.policy_responses.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_core::SimClock;
    use uuid::Uuid;

    fn profile(n: u128) -> PsychologicalProfile {
        let at = SimClock::default().now();
        PsychologicalProfile::baseline(ProfileId(Uuid::from_u128(n)), 50.0, at)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = PopulationStore::new();
        let id = store.insert_profile(profile(1)).unwrap();
        assert_eq!(store.profile(id).unwrap().id, id);
        assert!(store.insert_profile(profile(1)).unwrap_err().is_validation());

        let missing = store.profile(ProfileId(Uuid::from_u128(9))).unwrap_err();
        assert!(matches!(missing, Error::NotFound { kind: EntityKind::Profile, .. }));
    }

    #[test]
    fn test_update_clamps_and_touches() {
        let mut clock = SimClock::default();
        let mut store = PopulationStore::new();
        let id = store.insert_profile(profile(1)).unwrap();
        clock.advance_days(3);
        let updated = store
            .update_profile(id, clock.now(), |p| p.personality.openness = 140.0)
            .unwrap();
        assert_eq!(updated.personality.openness, 100.0);
        assert_eq!(updated.last_updated, clock.now());
    }

    #[test]
    fn test_deactivated_profiles_leave_pending_updates() {
        let now = SimClock::default().now();
        let mut store = PopulationStore::new();
        let a = store.insert_profile(profile(1)).unwrap();
        store.insert_profile(profile(2)).unwrap();
        store.deactivate(a, now).unwrap();
        assert_eq!(store.active_profiles().count(), 1);
        assert_eq!(store.pending_updates().len(), 1);
        assert_eq!(store.profile_count(), 2);
    }

    #[test]
    fn test_missing_entities() {
        let store = PopulationStore::new();
        assert!(matches!(
            store.dynamics("guild"),
            Err(Error::NotFound { kind: EntityKind::Group, .. })
        ));
        assert!(matches!(
            store.policy_responses("p1"),
            Err(Error::NotFound { kind: EntityKind::Policy, .. })
        ));
    }
}
