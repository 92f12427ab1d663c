//! Stimuli that agents react to.

use psycho_core::{Error, Result, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StimulusType {
    Policy,
    Economic,
    Social,
    Environmental,
    Cultural,
}

impl StimulusType {
    pub const ALL: [StimulusType; 5] = [
        StimulusType::Policy,
        StimulusType::Economic,
        StimulusType::Social,
        StimulusType::Environmental,
        StimulusType::Cultural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StimulusType::Policy => "policy",
            StimulusType::Economic => "economic",
            StimulusType::Social => "social",
            StimulusType::Environmental => "environmental",
            StimulusType::Cultural => "cultural",
        }
    }
}

impl fmt::Display for StimulusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StimulusType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StimulusType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Validation(format!("unknown stimulus type: {s}")))
    }
}

/// How an outcome is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    Gain,
    Loss,
}

/// Optional descriptors of a stimulus. Every absent field contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusDetails {
    pub description: Option<String>,
    /// Personal impact, -100 (harmful) to 100 (beneficial)
    pub magnitude: Option<f64>,
    /// Values the stimulus advances
    pub promoted_values: Vec<ValueKind>,
    /// Values the stimulus threatens
    pub opposed_values: Vec<ValueKind>,
    pub framing: Option<Frame>,
    /// How unfamiliar the stimulus is, 0–100
    pub novelty: Option<f64>,
    /// Fraction of peers already on board, 0–1
    pub peer_adoption: Option<f64>,
}

impl StimulusDetails {
    pub fn validate(&self) -> Result<()> {
        if let Some(m) = self.magnitude {
            if !m.is_finite() || !(-100.0..=100.0).contains(&m) {
                return Err(Error::Validation(format!("magnitude out of range: {m}")));
            }
        }
        if let Some(n) = self.novelty {
            if !n.is_finite() || !(0.0..=100.0).contains(&n) {
                return Err(Error::Validation(format!("novelty out of range: {n}")));
            }
        }
        if let Some(a) = self.peer_adoption {
            if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                return Err(Error::Validation(format!("peer_adoption out of range: {a}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub kind: StimulusType,
    pub id: String,
    pub details: StimulusDetails,
}

impl Stimulus {
    pub fn new(kind: StimulusType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            details: StimulusDetails::default(),
        }
    }

    pub fn with_details(mut self, details: StimulusDetails) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stimulus_type() {
        assert_eq!("Economic".parse::<StimulusType>().ok(), Some(StimulusType::Economic));
        assert!(matches!("weather".parse::<StimulusType>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_details_validation() {
        assert!(StimulusDetails::default().validate().is_ok());
        let bad = StimulusDetails {
            peer_adoption: Some(1.5),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let nan = StimulusDetails {
            magnitude: Some(f64::NAN),
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
