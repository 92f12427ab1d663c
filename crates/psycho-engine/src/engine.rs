//! Engine facade over the population store.

use psycho_analytics::{AnalyticsInput, AnalyticsSnapshot};
use psycho_behavior::assessments::{
    self, AdoptionAssessment, AssessmentKind, ComplianceAssessment, Election,
    EntrepreneurshipAssessment, LawType, LifecycleAssessment, Technology, Threat, ThreatResponse,
    VotingAssessment,
};
use psycho_behavior::{
    BehavioralEconomicsModel, BehavioralResponse, DecisionContext, IncentiveFit, IncentiveModeler,
    IncentiveSpec, IncentiveStatus, IncentiveStructure, ModelRegistry, ModelStatus, ModelType,
    PolicyDetails, PolicyPsychologyResponse, PolicyResponseAnalyzer, PopulationFit,
    ResponseEngine, Stimulus, StimulusDetails, StimulusType, ValidationMetrics,
    ValidationScenario,
};
use psycho_core::{
    BatchOutcome, IncentiveId, ProfileId, PsychologicalProfile, Result, SimClock, SimRng,
};
use psycho_profile::{ProfileGenerator, ProfileSpec};
use psycho_social::{
    EngagementProfile, FeedAnalysis, FeedPost, GroupType, SocialDynamics,
    SocialDynamicsAggregator, SocialMediaInfluence, SocialSignalAnalyzer,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::events::{DomainEvent, EventLog, EventRecord, EventSink};
use crate::simulation::{self, StepSummary};
use crate::store::PopulationStore;

/// Population psychology engine.
///
/// Owns every entity and is driven synchronously by its caller. All
/// randomness comes from the configured seed, and all timestamps from the
/// simulation clock, so the same calls on the same configuration produce the
/// same results.
pub struct PsychologyEngine {
    config: EngineConfig,
    store: PopulationStore,
    generator: ProfileGenerator,
    responses: ResponseEngine,
    models: ModelRegistry,
    incentives: IncentiveModeler,
    policy: PolicyResponseAnalyzer,
    aggregator: SocialDynamicsAggregator,
    signals: SocialSignalAnalyzer,
    rng: SimRng,
    clock: SimClock,
    events: EventLog,
    sinks: Vec<Arc<dyn EventSink>>,
    steps: u64,
}

impl PsychologyEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let clock = SimClock::new(config.epoch()?);
        info!(
            "Psychology engine starting (seed {}, epoch {})",
            config.seed,
            clock.now()
        );
        Ok(Self {
            store: PopulationStore::new(),
            generator: ProfileGenerator::new(config.generator.clone())?,
            responses: ResponseEngine::new(config.response.clone()),
            models: ModelRegistry::with_defaults(),
            incentives: IncentiveModeler::new(),
            policy: PolicyResponseAnalyzer::new(config.policy.min_data_quality),
            aggregator: SocialDynamicsAggregator::new(config.dynamics.clone()),
            signals: SocialSignalAnalyzer::new(),
            rng: SimRng::seeded(config.seed),
            clock,
            events: EventLog::new(config.events.capacity),
            sinks: Vec::new(),
            steps: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Register a sink; it sees every event emitted from now on
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Up to `limit` most recent events, oldest first
    pub fn events(&self, limit: usize) -> Vec<&EventRecord> {
        self.events.recent(limit)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    fn emit(&mut self, event: DomainEvent) {
        let record = self.events.push(event, self.clock.now());
        for sink in &self.sinks {
            sink.handle(record);
        }
    }

    // Profiles

    pub fn create_profile(&mut self, spec: ProfileSpec) -> Result<PsychologicalProfile> {
        let profile = self.generator.generate(&spec, &mut self.rng, self.clock.now())?;
        let id = self.store.insert_profile(profile.clone())?;
        debug!("Created profile {} ({:?})", id, profile.archetype);
        self.emit(DomainEvent::ProfileCreated { profile_id: id });
        Ok(profile)
    }

    pub fn profile(&self, id: ProfileId) -> Result<&PsychologicalProfile> {
        self.store.profile(id)
    }

    /// All profiles in creation order
    pub fn profiles(&self) -> impl Iterator<Item = &PsychologicalProfile> {
        self.store.profiles()
    }

    /// Exclude a profile from policy analysis, time steps and feed influence
    pub fn deactivate_profile(&mut self, id: ProfileId) -> Result<()> {
        self.store.deactivate(id, self.clock.now())?;
        self.emit(DomainEvent::ProfileDeactivated { profile_id: id });
        Ok(())
    }

    // Responses

    pub fn predict_response(
        &mut self,
        profile_id: ProfileId,
        stimulus_type: StimulusType,
        stimulus_id: &str,
        details: StimulusDetails,
    ) -> Result<BehavioralResponse> {
        let profile = self.store.profile(profile_id)?;
        let stimulus = Stimulus::new(stimulus_type, stimulus_id).with_details(details);
        let response = self
            .responses
            .predict(profile, stimulus, &mut self.rng, &mut self.clock)?;
        self.store.record_response(response.clone())?;
        self.emit(DomainEvent::ResponseRecorded {
            profile_id,
            response_id: response.id,
            stimulus: stimulus_type,
        });
        Ok(response)
    }

    pub fn responses_for(&self, profile_id: ProfileId) -> Result<&[BehavioralResponse]> {
        self.store.responses_for(profile_id)
    }

    // Incentives

    pub fn create_incentive(&mut self, spec: IncentiveSpec) -> Result<IncentiveStructure> {
        let incentive = self
            .incentives
            .create(&spec, &mut self.rng, self.clock.now())?;
        let id = self.store.insert_incentive(incentive.clone());
        info!(
            "Created incentive {} '{}' targeting {:?}",
            id, incentive.name, incentive.target_personalities
        );
        self.emit(DomainEvent::IncentiveCreated { incentive_id: id });
        Ok(incentive)
    }

    pub fn incentive(&self, id: IncentiveId) -> Result<&IncentiveStructure> {
        self.store.incentive(id)
    }

    pub fn incentives(&self) -> impl Iterator<Item = &IncentiveStructure> {
        self.store.incentives()
    }

    pub fn set_incentive_status(
        &mut self,
        id: IncentiveId,
        status: IncentiveStatus,
    ) -> Result<&IncentiveStructure> {
        let at = self.clock.now();
        let incentive = self.store.incentive_mut(id)?;
        let from = incentive.status;
        incentive.transition(status, at)?;
        self.emit(DomainEvent::IncentiveStatusChanged {
            incentive_id: id,
            from,
            to: status,
        });
        self.store.incentive(id)
    }

    pub fn incentive_fit(&self, id: IncentiveId, profile_id: ProfileId) -> Result<IncentiveFit> {
        let incentive = self.store.incentive(id)?;
        let profile = self.store.profile(profile_id)?;
        Ok(self.incentives.fit_for_profile(incentive, profile))
    }

    /// Fit of an incentive across every active profile
    pub fn population_fit(&self, id: IncentiveId) -> Result<PopulationFit> {
        let incentive = self.store.incentive(id)?;
        Ok(self
            .incentives
            .population_fit(incentive, self.store.active_profiles()))
    }

    // Policy

    /// Analyze a policy against every active profile. Profiles that cannot be
    /// analyzed are listed in the outcome's failures; the rest are stored.
    pub fn analyze_policy(
        &mut self,
        policy_id: &str,
        details: PolicyDetails,
    ) -> Result<BatchOutcome<PolicyPsychologyResponse>> {
        let outcome = self.policy.analyze(
            policy_id,
            &details,
            self.store.active_profiles(),
            self.clock.now(),
        )?;
        self.store
            .record_policy_responses(policy_id, outcome.results.clone());
        self.emit(DomainEvent::PolicyResponsesRecorded {
            policy_id: policy_id.to_string(),
            responses: outcome.results.len(),
            failures: outcome.failures.len(),
        });
        Ok(outcome)
    }

    pub fn policy_responses(&self, policy_id: &str) -> Result<&[PolicyPsychologyResponse]> {
        self.store.policy_responses(policy_id)
    }

    // Social

    /// Recompute a group from scratch. Every member must exist.
    pub fn update_social_dynamics(
        &mut self,
        group_id: &str,
        group_type: GroupType,
        members: &[ProfileId],
    ) -> Result<SocialDynamics> {
        let profiles = members
            .iter()
            .map(|id| self.store.profile(*id))
            .collect::<Result<Vec<_>>>()?;
        let dynamics = self
            .aggregator
            .aggregate(group_id, group_type, &profiles, self.clock.now());
        self.store.upsert_dynamics(dynamics.clone());
        self.emit(DomainEvent::DynamicsUpdated {
            group_id: group_id.to_string(),
            group_type,
            group_size: dynamics.group_size,
        });
        Ok(dynamics)
    }

    pub fn dynamics(&self, group_id: &str) -> Result<&SocialDynamics> {
        self.store.dynamics(group_id)
    }

    pub fn all_dynamics(&self) -> impl Iterator<Item = &SocialDynamics> {
        self.store.all_dynamics()
    }

    pub fn analyze_feed(&self, posts: &[FeedPost], civilization: Option<&str>) -> FeedAnalysis {
        self.signals.analyze_feed(posts, civilization)
    }

    pub fn engagement_for(&self, profile_id: ProfileId) -> Result<EngagementProfile> {
        Ok(self.signals.engagement_profile(self.store.profile(profile_id)?))
    }

    /// Forecast how a feed shifts the active population
    pub fn social_media_influence(&self, posts: &[FeedPost]) -> SocialMediaInfluence {
        let profiles: Vec<&PsychologicalProfile> = self.store.active_profiles().collect();
        self.signals.predict_social_media_influence(posts, &profiles)
    }

    // Behavioral economics

    pub fn apply_model(
        &mut self,
        model_type: ModelType,
        profile_id: ProfileId,
        ctx: &DecisionContext,
    ) -> Result<f64> {
        let profile = self.store.profile(profile_id)?;
        let value = self.models.apply(model_type, profile, ctx)?;
        self.emit(DomainEvent::ModelApplied {
            model_type,
            profile_id,
            value,
        });
        Ok(value)
    }

    /// Like [`apply_model`](Self::apply_model), with the model named as text
    pub fn apply_model_named(
        &mut self,
        model: &str,
        profile_id: ProfileId,
        ctx: &DecisionContext,
    ) -> Result<f64> {
        self.apply_model(model.parse()?, profile_id, ctx)
    }

    pub fn models(&self) -> impl Iterator<Item = &BehavioralEconomicsModel> {
        self.models.models()
    }

    pub fn register_model(&mut self, model: BehavioralEconomicsModel) {
        self.models.register(model);
    }

    pub fn validate_model(
        &mut self,
        model_type: ModelType,
        scenarios: &[ValidationScenario],
    ) -> Result<ValidationMetrics> {
        let metrics = self.models.validate(model_type, scenarios, self.clock.now())?;
        info!(
            "Validated {}: accuracy {:.1}% over {} scenarios",
            model_type, metrics.accuracy, metrics.sample_size
        );
        Ok(metrics)
    }

    pub fn set_model_status(&mut self, model_type: ModelType, status: ModelStatus) -> Result<()> {
        self.models.set_status(model_type, status)
    }

    // Integration assessments

    fn assessed(&mut self, profile_id: ProfileId, assessment: AssessmentKind) {
        self.emit(DomainEvent::ProfileAssessed {
            profile_id,
            assessment,
        });
    }

    pub fn voting_behavior(
        &mut self,
        profile_id: ProfileId,
        election: &Election,
    ) -> Result<VotingAssessment> {
        let result = assessments::voting_behavior(self.store.profile(profile_id)?, election);
        self.assessed(profile_id, AssessmentKind::Voting);
        Ok(result)
    }

    pub fn legal_compliance(
        &mut self,
        profile_id: ProfileId,
        law: LawType,
    ) -> Result<ComplianceAssessment> {
        let result = assessments::legal_compliance(self.store.profile(profile_id)?, law);
        self.assessed(profile_id, AssessmentKind::LegalCompliance);
        Ok(result)
    }

    pub fn security_threat_response(
        &mut self,
        profile_id: ProfileId,
        threat: &Threat,
    ) -> Result<ThreatResponse> {
        let result = assessments::security_threat_response(self.store.profile(profile_id)?, threat);
        self.assessed(profile_id, AssessmentKind::SecurityThreat);
        Ok(result)
    }

    pub fn lifecycle_decisions(&mut self, profile_id: ProfileId) -> Result<LifecycleAssessment> {
        let result = assessments::lifecycle_decisions(self.store.profile(profile_id)?);
        self.assessed(profile_id, AssessmentKind::Lifecycle);
        Ok(result)
    }

    pub fn technology_adoption(
        &mut self,
        profile_id: ProfileId,
        technology: &Technology,
    ) -> Result<AdoptionAssessment> {
        let result = assessments::technology_adoption(self.store.profile(profile_id)?, technology);
        self.assessed(profile_id, AssessmentKind::TechnologyAdoption);
        Ok(result)
    }

    pub fn entrepreneurship_potential(
        &mut self,
        profile_id: ProfileId,
    ) -> Result<EntrepreneurshipAssessment> {
        let result = assessments::entrepreneurship_potential(self.store.profile(profile_id)?);
        self.assessed(profile_id, AssessmentKind::Entrepreneurship);
        Ok(result)
    }

    // Analytics and simulation

    /// Snapshot of the current population. Without profiles there is
    /// nothing to analyze and the zero snapshot is returned.
    pub fn generate_analytics(&self) -> AnalyticsSnapshot {
        if self.store.profile_count() == 0 {
            warn!("Generating analytics over an empty population");
            return AnalyticsSnapshot::empty(self.clock.now());
        }
        let profiles: Vec<&PsychologicalProfile> = self.store.profiles().collect();
        let responses: Vec<&BehavioralResponse> = self.store.responses().collect();
        let incentives: Vec<&IncentiveStructure> = self.store.incentives().collect();
        let dynamics: Vec<&SocialDynamics> = self.store.all_dynamics().collect();
        let policy_responses: Vec<&PolicyPsychologyResponse> =
            self.store.all_policy_responses().collect();
        let models: Vec<&BehavioralEconomicsModel> = self.models.models().collect();

        let input = AnalyticsInput {
            profiles: &profiles,
            responses: &responses,
            incentives: &incentives,
            dynamics: &dynamics,
            policy_responses: &policy_responses,
            models: &models,
        };
        AnalyticsSnapshot::generate(&input, self.clock.now())
    }

    /// Advance the population `steps` days. Each step evolves every active
    /// profile in parallel, then recomputes groups and applies social
    /// influence once all profile updates are in.
    pub fn simulate_time_step(&mut self, steps: u32, seed: u64) -> Vec<StepSummary> {
        let mut summaries = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            self.steps += 1;
            let step = self.steps;
            self.clock.advance_days(1);
            let at = self.clock.now();

            let pending = self.store.pending_updates();
            let responses_integrated = pending.iter().map(|u| u.new_responses.len()).sum();
            let updated = simulation::evolve_all(&pending, &self.config.simulation, seed, step);
            let ids: Vec<ProfileId> = updated.iter().map(|p| p.id).collect();
            self.store.apply_updates(updated, at);

            let groups_updated = self.refresh_groups(at);

            for id in &ids {
                self.emit(DomainEvent::ProfileUpdated { profile_id: *id });
            }
            self.emit(DomainEvent::TimeStepCompleted {
                step,
                profiles_updated: ids.len(),
                groups_updated,
            });

            let active: Vec<&PsychologicalProfile> = self.store.active_profiles().collect();
            let summary = StepSummary {
                step,
                at,
                profiles_updated: ids.len(),
                responses_integrated,
                groups_updated,
                mean_social_trust: psycho_core::stats::mean(
                    &active
                        .iter()
                        .map(|p| p.social_psychology.social_trust)
                        .collect::<Vec<_>>(),
                ),
                mean_optimism: psycho_core::stats::mean(
                    &active
                        .iter()
                        .map(|p| p.emotional_profile.optimism_level)
                        .collect::<Vec<_>>(),
                ),
            };
            debug!(
                "Step {}: {} profiles, {} responses, {} groups",
                step, summary.profiles_updated, responses_integrated, groups_updated
            );
            summaries.push(summary);
        }
        summaries
    }

    /// Recompute every group over its active members, then pull member trust
    /// toward each group's mean. Groups are processed in id order.
    fn refresh_groups(&mut self, at: chrono::DateTime<chrono::Utc>) -> usize {
        let groups: Vec<(String, GroupType, Vec<ProfileId>)> = self
            .store
            .all_dynamics()
            .map(|d| (d.group_id.clone(), d.group_type, d.member_ids.clone()))
            .collect();
        let strength = self.config.simulation.social_influence_strength;

        for (group_id, group_type, member_ids) in &groups {
            let members: Vec<&PsychologicalProfile> = member_ids
                .iter()
                .filter_map(|id| self.store.profile(*id).ok())
                .filter(|p| p.active)
                .collect();
            let mut dynamics = self.aggregator.aggregate(group_id, *group_type, &members, at);
            let influenced = simulation::social_influence(&members, strength);
            // Full roster, including inactive members
            dynamics.member_ids = member_ids.clone();
            self.store.upsert_dynamics(dynamics);

            for (id, trust) in influenced {
                if let Err(e) = self
                    .store
                    .update_profile(id, at, |p| p.social_psychology.social_trust = trust)
                {
                    warn!("Social influence skipped for {}: {}", id, e);
                }
            }
        }

        for (group_id, group_type, _) in &groups {
            if let Ok(d) = self.store.dynamics(group_id) {
                let group_size = d.group_size;
                self.emit(DomainEvent::DynamicsUpdated {
                    group_id: group_id.clone(),
                    group_type: *group_type,
                    group_size,
                });
            }
        }
        groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use psycho_behavior::{IncentiveLever, IncentiveType, PolicyType};
    use psycho_core::{EntityKind, Error};

    fn engine() -> PsychologyEngine {
        PsychologyEngine::new(EngineConfig::default()).unwrap()
    }

    /// Log output for a test run; filter with RUST_LOG
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn populate(engine: &mut PsychologyEngine, n: usize) -> Vec<ProfileId> {
        let archetypes = [
            "entrepreneur",
            "conservative",
            "innovator",
            "traditionalist",
            "social_leader",
        ];
        (0..n)
            .map(|i| {
                engine
                    .create_profile(ProfileSpec::archetype(archetypes[i % archetypes.len()]))
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn test_create_profile_emits_event() {
        let mut engine = engine();
        let sink = Arc::new(RecordingSink::new());
        engine.subscribe(sink.clone());
        let ids = populate(&mut engine, 3);

        assert_eq!(engine.profiles().count(), 3);
        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.records()[0].event,
            DomainEvent::ProfileCreated { profile_id: ids[0] }
        );
        assert_eq!(engine.events(10).len(), 3);
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let mut engine = engine();
        let err = engine.create_profile(ProfileSpec::archetype("wizard")).unwrap_err();
        assert!(matches!(err, Error::UnknownArchetype(_)));
        assert_eq!(engine.event_count(), 0);
    }

    #[test]
    fn test_predict_response_records_history() {
        let mut engine = engine();
        let id = populate(&mut engine, 1)[0];
        let details = StimulusDetails {
            magnitude: Some(40.0),
            ..Default::default()
        };
        let response = engine
            .predict_response(id, StimulusType::Economic, "tax-cut", details)
            .unwrap();
        assert_eq!(response.profile_id, id);
        assert_eq!(engine.responses_for(id).unwrap().len(), 1);

        let missing = ProfileId(uuid::Uuid::from_u128(999));
        let err = engine
            .predict_response(
                missing,
                StimulusType::Economic,
                "tax-cut",
                StimulusDetails::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: EntityKind::Profile, .. }));
    }

    #[test]
    fn test_incentive_lifecycle() {
        let mut engine = engine();
        populate(&mut engine, 5);
        let spec = IncentiveSpec::new("green bonus", IncentiveType::Environmental)
            .with_component(IncentiveLever::PurposeAlignment, 70.0);
        let id = engine.create_incentive(spec).unwrap().id;

        let active = engine.set_incentive_status(id, IncentiveStatus::Active).unwrap();
        assert_eq!(active.status, IncentiveStatus::Active);
        assert!(engine.set_incentive_status(id, IncentiveStatus::Draft).is_err());

        let fit = engine.population_fit(id).unwrap();
        assert!((0.0..=100.0).contains(&fit.mean_fit));
        assert!(matches!(
            engine.incentive(IncentiveId(uuid::Uuid::from_u128(1))),
            Err(Error::NotFound { kind: EntityKind::Incentive, .. })
        ));
    }

    #[test]
    fn test_policy_analysis_skips_inactive() {
        init_tracing();
        let mut engine = engine();
        let ids = populate(&mut engine, 4);
        engine.deactivate_profile(ids[0]).unwrap();

        let details = PolicyDetails::new("Carbon tax", PolicyType::Environmental);
        let outcome = engine.analyze_policy("carbon-tax", details).unwrap();
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.is_complete());
        assert_eq!(engine.policy_responses("carbon-tax").unwrap().len(), 3);
    }

    #[test]
    fn test_social_dynamics_requires_known_members() {
        let mut engine = engine();
        let ids = populate(&mut engine, 4);
        let group = engine
            .update_social_dynamics("guild", GroupType::ProfessionalNetwork, &ids)
            .unwrap();
        assert_eq!(group.group_size, 4);
        assert_eq!(engine.dynamics("guild").unwrap().group_size, 4);

        let mut with_stranger = ids.clone();
        with_stranger.push(ProfileId(uuid::Uuid::from_u128(7)));
        assert!(engine
            .update_social_dynamics("guild", GroupType::ProfessionalNetwork, &with_stranger)
            .is_err());
    }

    #[test]
    fn test_model_by_name() {
        let mut engine = engine();
        let id = populate(&mut engine, 1)[0];
        let ctx = DecisionContext {
            outcome: Some(100.0),
            probability: Some(0.5),
            ..Default::default()
        };
        let by_type = engine.apply_model(ModelType::ProspectTheory, id, &ctx).unwrap();
        let by_name = engine.apply_model_named("Prospect-Theory", id, &ctx).unwrap();
        assert_eq!(by_type, by_name);
        assert!(matches!(
            engine.apply_model_named("astrology", id, &ctx),
            Err(Error::UnknownModel(_))
        ));
    }

    #[test]
    fn test_time_step_advances_clock() {
        init_tracing();
        let mut engine = engine();
        let ids = populate(&mut engine, 6);
        engine
            .update_social_dynamics("block", GroupType::Neighborhood, &ids[..3])
            .unwrap();
        let start = engine.clock().now();

        let summaries = engine.simulate_time_step(3, 11);
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[2].step, 3);
        assert!(summaries.iter().all(|s| s.profiles_updated == 6 && s.groups_updated == 1));
        assert_eq!((engine.clock().now() - start).num_days(), 3);
        for p in engine.profiles() {
            assert!(p.numeric_fields().iter().all(|v| (0.0..=100.0).contains(v)));
        }
    }

    #[test]
    fn test_assessment_emits_event() {
        let mut engine = engine();
        let id = populate(&mut engine, 1)[0];
        engine.entrepreneurship_potential(id).unwrap();
        let last = engine.events(1)[0];
        assert_eq!(
            last.event,
            DomainEvent::ProfileAssessed {
                profile_id: id,
                assessment: AssessmentKind::Entrepreneurship,
            }
        );
    }

    #[test]
    fn test_analytics_over_population() {
        let mut engine = engine();
        populate(&mut engine, 10);
        let snapshot = engine.generate_analytics();
        assert_eq!(snapshot.sample_size, 10);
        assert_eq!(snapshot.population.total_profiles, 10);
    }
}
