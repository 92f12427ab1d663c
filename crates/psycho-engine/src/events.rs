//! Domain events, the bounded event log and event sinks.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use psycho_behavior::assessments::AssessmentKind;
use psycho_behavior::{IncentiveStatus, ModelType, StimulusType};
use psycho_core::{IncentiveId, ProfileId, ResponseId};
use psycho_social::GroupType;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// State change emitted by the engine after it mutates the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ProfileCreated {
        profile_id: ProfileId,
    },
    ProfileUpdated {
        profile_id: ProfileId,
    },
    ProfileDeactivated {
        profile_id: ProfileId,
    },
    ProfileAssessed {
        profile_id: ProfileId,
        assessment: AssessmentKind,
    },
    ResponseRecorded {
        profile_id: ProfileId,
        response_id: ResponseId,
        stimulus: StimulusType,
    },
    IncentiveCreated {
        incentive_id: IncentiveId,
    },
    IncentiveStatusChanged {
        incentive_id: IncentiveId,
        from: IncentiveStatus,
        to: IncentiveStatus,
    },
    DynamicsUpdated {
        group_id: String,
        group_type: GroupType,
        group_size: usize,
    },
    PolicyResponsesRecorded {
        policy_id: String,
        responses: usize,
        failures: usize,
    },
    ModelApplied {
        model_type: ModelType,
        profile_id: ProfileId,
        value: f64,
    },
    TimeStepCompleted {
        step: u64,
        profiles_updated: usize,
        groups_updated: usize,
    },
}

/// Event stamped with its position in the engine history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub event: DomainEvent,
}

/// Ring buffer of recent events
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    entries: VecDeque<EventRecord>,
    next_sequence: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, event: DomainEvent, at: DateTime<Utc>) -> &EventRecord {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.next_sequence += 1;
        self.entries.push_back(EventRecord {
            sequence: self.next_sequence,
            at,
            event,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Up to `limit` most recent events, oldest first
    pub fn recent(&self, limit: usize) -> Vec<&EventRecord> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events ever pushed, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }
}

/// Subscriber notified synchronously of every engine event
pub trait EventSink: Send + Sync {
    fn handle(&self, record: &EventRecord);
}

/// Sink that keeps every event it sees; useful for persistence adapters in
/// tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<EventRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn handle(&self, record: &EventRecord) {
        self.records.lock().push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psycho_core::SimClock;
    use uuid::Uuid;

    fn created(n: u128) -> DomainEvent {
        DomainEvent::ProfileCreated {
            profile_id: ProfileId(Uuid::from_u128(n)),
        }
    }

    #[test]
    fn test_log_evicts_oldest() {
        let at = SimClock::default().now();
        let mut log = EventLog::new(3);
        for n in 0..5 {
            log.push(created(n), at);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.total_recorded(), 5);
        let seqs: Vec<u64> = log.recent(10).iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![3, 4, 5]);
        let last: Vec<u64> = log.recent(2).iter().map(|r| r.sequence).collect();
        assert_eq!(last, vec![4, 5]);
    }

    #[test]
    fn test_recording_sink() {
        let at = SimClock::default().now();
        let mut log = EventLog::new(10);
        let sink = RecordingSink::new();
        sink.handle(log.push(created(1), at));
        sink.handle(log.push(created(2), at));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[1].event, created(2));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_string(&created(1)).unwrap();
        assert!(json.starts_with(r#"{"type":"profile_created""#));
    }
}
