// Copyright (c) 2025 - Cowboy AI, Inc.
//! Publishing Event Store
//!
//! Decorator that forwards to an inner store and, after every successful
//! append, publishes the appended events on its [`EventBus`]. Failed appends
//! publish nothing.

use async_trait::async_trait;
use uuid::Uuid;

use super::EventStore;
use crate::errors::StoreResult;
use crate::event_bus::EventBus;
use crate::events::{DomainEvent, EventStream};

/// Event store that announces committed events
#[derive(Debug)]
pub struct PublishingEventStore<S> {
    inner: S,
    bus: EventBus,
}

impl<S: EventStore> PublishingEventStore<S> {
    pub fn new(inner: S, bus: EventBus) -> Self {
        Self { inner, bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: EventStore> EventStore for PublishingEventStore<S> {
    async fn load_stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream> {
        self.inner.load_stream(aggregate_id).await
    }

    async fn append_to_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<u64> {
        let version = self
            .inner
            .append_to_stream(aggregate_id, expected_version, events)
            .await?;
        self.bus.publish(events);
        Ok(version)
    }

    async fn current_version(&self, aggregate_id: Uuid) -> StoreResult<u64> {
        self.inner.current_version(aggregate_id).await
    }
}
