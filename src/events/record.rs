// Copyright (c) 2025 - Cowboy AI, Inc.
//! Serialized Event Records
//!
//! [`EventRecord`] is the plain mapping form of a [`DomainEvent`] and the only
//! shape in which events cross the event store boundary:
//!
//! ```json
//! {
//!   "aggregateId": "01934f4a-1000-7000-8000-000000001000",
//!   "eventName": "ColumnAdded",
//!   "timestamp": 1768824000000,
//!   "payload": { "columnId": "...", "columnName": "todo" }
//! }
//! ```
//!
//! `timestamp` is milliseconds since the Unix epoch. Decoding looks the
//! `eventName` up in [`EventPayload::EVENT_NAMES`] and fails with
//! [`StoreError::UnknownEventType`] for anything unregistered.

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::domain_event::DomainEvent;
use super::payload::EventPayload;
use crate::errors::{StoreError, StoreResult};

/// Lossless serialized form of a domain event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub aggregate_id: Uuid,
    pub event_name: String,
    pub timestamp: i64,
    pub payload: Map<String, Value>,
}

impl DomainEvent {
    /// Encode this event as a record
    pub fn to_record(&self) -> StoreResult<EventRecord> {
        Ok(EventRecord {
            aggregate_id: self.aggregate_id(),
            event_name: self.event_name().to_string(),
            timestamp: self.timestamp().timestamp_millis(),
            payload: self.payload().to_fields()?,
        })
    }

    /// Decode a record back into the exact variant it was written from
    pub fn from_record(record: EventRecord) -> StoreResult<Self> {
        let payload = EventPayload::from_fields(&record.event_name, record.payload)?;
        let timestamp = DateTime::from_timestamp_millis(record.timestamp).ok_or_else(|| {
            StoreError::Serialization(format!("timestamp out of range: {}", record.timestamp))
        })?;

        Ok(DomainEvent::at(record.aggregate_id, timestamp, payload))
    }
}

impl Serialize for DomainEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DomainEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = EventRecord::deserialize(deserializer)?;
        DomainEvent::from_record(record).map_err(serde::de::Error::custom)
    }
}
