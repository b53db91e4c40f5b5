// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Streams
//!
//! An [`EventStream`] is the ordered, gap-free run of events committed for one
//! aggregate. Its version is the number of events it holds, which is also the
//! version an aggregate reaches after replaying it.

use uuid::Uuid;

use super::domain_event::DomainEvent;

/// Ordered events for one aggregate, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStream {
    aggregate_id: Uuid,
    events: Vec<DomainEvent>,
}

impl EventStream {
    pub fn new(aggregate_id: Uuid, events: Vec<DomainEvent>) -> Self {
        Self { aggregate_id, events }
    }

    /// Stream with no events (version 0)
    pub fn empty(aggregate_id: Uuid) -> Self {
        Self::new(aggregate_id, Vec::new())
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Version reached after replaying every event in the stream
    pub fn version(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<DomainEvent> {
        self.events
    }
}
