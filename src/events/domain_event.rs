// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Event Envelope
//!
//! [`DomainEvent`] wraps an [`EventPayload`] with the id of the aggregate it
//! belongs to and the instant it was raised. Fields are private and only
//! exposed through accessors, so an event cannot change after construction.
//! Equality is structural.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use super::payload::EventPayload;

/// Immutable fact recorded against one aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    aggregate_id: Uuid,
    timestamp: DateTime<Utc>,
    payload: EventPayload,
}

impl DomainEvent {
    /// Create an event stamped with the current time
    pub fn new(aggregate_id: Uuid, payload: impl Into<EventPayload>) -> Self {
        Self::at(aggregate_id, Utc::now(), payload)
    }

    /// Create an event with an explicit timestamp
    ///
    /// Timestamps are kept at millisecond precision, the resolution of the
    /// serialized record, so an event equals itself after a round trip.
    pub fn at(
        aggregate_id: Uuid,
        timestamp: DateTime<Utc>,
        payload: impl Into<EventPayload>,
    ) -> Self {
        Self {
            aggregate_id,
            timestamp: timestamp.trunc_subsecs(3),
            payload: payload.into(),
        }
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    /// Variant tag, e.g. `"ColumnAdded"`
    pub fn event_name(&self) -> &'static str {
        self.payload.event_name()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}
