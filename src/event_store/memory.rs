// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Event Store
//!
//! Process-local store used by tests and the `memory` backend. Events are
//! encoded to [`EventRecord`](crate::events::EventRecord)s on append and
//! decoded on load, exactly as a durable store would.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{EventStore, StreamIndex};
use crate::errors::StoreResult;
use crate::events::{DomainEvent, EventStream};

/// In-memory event store
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    index: RwLock<StreamIndex>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of aggregates with at least one committed event
    pub async fn stream_count(&self) -> usize {
        self.index.read().await.stream_count()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load_stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream> {
        let stream = self.index.read().await.stream(aggregate_id)?;
        debug!(%aggregate_id, version = stream.version(), "Loaded stream");
        Ok(stream)
    }

    async fn append_to_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<u64> {
        let mut index = self.index.write().await;
        let records = index.prepare(aggregate_id, expected_version, events)?;
        let version = index.commit(aggregate_id, records);

        debug!(%aggregate_id, count = events.len(), version, "Appended events");
        Ok(version)
    }

    async fn current_version(&self, aggregate_id: Uuid) -> StoreResult<u64> {
        Ok(self.index.read().await.version(aggregate_id))
    }
}
