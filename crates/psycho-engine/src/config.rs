//! Engine configuration.

use chrono::{DateTime, Utc};
use psycho_behavior::ResponseConfig;
use psycho_core::{Error, Result};
use psycho_profile::GeneratorConfig;
use psycho_social::DynamicsConfig;
use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed of the engine's own generator (ids, response noise)
    pub seed: u64,

    /// Simulation start, in seconds since the Unix epoch
    pub epoch_secs: i64,

    /// Profile generation
    pub generator: GeneratorConfig,

    /// Stimulus response prediction
    pub response: ResponseConfig,

    /// Group dynamics aggregation
    pub dynamics: DynamicsConfig,

    /// Policy analysis
    pub policy: PolicyConfig,

    /// Time-step evolution
    pub simulation: SimulationConfig,

    /// Event history
    pub events: EventConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Profiles below this data quality are reported as failures
    pub min_data_quality: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Standard deviation of mood noise per step, in tenths of a point
    pub response_volatility: f64,

    /// Share of a recorded behavior change absorbed per step
    pub adaptation_speed: f64,

    /// Pull of group trust on member trust
    pub social_influence_strength: f64,

    /// Share of the gap to the creation baseline closed per step
    pub memory_decay_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Ring buffer capacity; oldest events are evicted first
    pub capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            // 2024-01-01T00:00:00Z
            epoch_secs: 1_704_067_200,
            generator: GeneratorConfig::default(),
            response: ResponseConfig::default(),
            dynamics: DynamicsConfig::default(),
            policy: PolicyConfig::default(),
            simulation: SimulationConfig::default(),
            events: EventConfig::default(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_data_quality: 20.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            response_volatility: 0.2,
            adaptation_speed: 0.1,
            social_influence_strength: 0.4,
            memory_decay_rate: 0.02,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

impl EngineConfig {
    /// Load configuration from file, with `PSYCHO_` environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("PSYCHO").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("PSYCHO").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.generator
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        let unit = [
            ("simulation.response_volatility", self.simulation.response_volatility),
            ("simulation.adaptation_speed", self.simulation.adaptation_speed),
            ("simulation.social_influence_strength", self.simulation.social_influence_strength),
            ("simulation.memory_decay_rate", self.simulation.memory_decay_rate),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        if !(0.0..=100.0).contains(&self.policy.min_data_quality) {
            return Err(Error::Config(format!(
                "policy.min_data_quality must be within [0, 100], got {}",
                self.policy.min_data_quality
            )));
        }
        if self.dynamics.max_leaders == 0 {
            return Err(Error::Config("dynamics.max_leaders must be at least 1".into()));
        }
        if self.events.capacity == 0 {
            return Err(Error::Config("events.capacity must be at least 1".into()));
        }
        if !self.response.bias_strength_multiplier.is_finite()
            || self.response.bias_strength_multiplier < 0.0
        {
            return Err(Error::Config(format!(
                "response.bias_strength_multiplier must be non-negative, got {}",
                self.response.bias_strength_multiplier
            )));
        }
        Ok(())
    }

    pub fn epoch(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch_secs, 0)
            .ok_or_else(|| Error::Config(format!("epoch_secs out of range: {}", self.epoch_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.events.capacity, 1000);
        assert_eq!(config.dynamics.max_leaders, 5);
        assert_eq!(config.policy.min_data_quality, 20.0);
        assert_eq!(config.epoch().unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.adaptation_speed = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EngineConfig::default();
        config.events.capacity = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EngineConfig::default();
        config.generator.personality_variation = 2.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"seed": 7, "simulation": {"adaptation_speed": 0.3}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.simulation.adaptation_speed, 0.3);
        assert_eq!(config.simulation.memory_decay_rate, 0.02);
        assert_eq!(config.events.capacity, 1000);
    }
}
