// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! This module defines the event storage interface and implementations for
//! persisting and retrieving kanban domain events.
//!
//! # Architecture
//!
//! ```text
//! Command → Aggregate → pending events → Repository → EventStore → Storage
//!                                                         ↓
//!                                                     EventBus
//! ```
//!
//! # Event Store Requirements
//!
//! 1. **Append-Only**: Events are never updated or deleted
//! 2. **Ordered**: Events keep their append order within a stream
//! 3. **Optimistic Concurrency**: Appends carry the version the writer loaded
//! 4. **Serialized**: Events are held as [`EventRecord`]s, never as live values
//!
//! # Implementations
//!
//! - [`InMemoryEventStore`] - process-local map of streams
//! - [`FileEventStore`] - append-only JSON-lines file with an in-memory index
//! - [`PublishingEventStore`] - decorator publishing committed events to an [`EventBus`](crate::event_bus::EventBus)
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_kanban::{Aggregate, Board, EventStore, InMemoryEventStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryEventStore::new();
//!
//!     let mut board = Board::create("Release", "Release checklist")?;
//!     board.add_column("todo")?;
//!
//!     let board_id = board.id()?;
//!     store
//!         .append_to_stream(board_id, board.version()?, board.pending_changes()?)
//!         .await?;
//!
//!     let stream = store.load_stream(board_id).await?;
//!     let board = Board::load(&stream)?;
//!     assert_eq!(board.version()?, 2);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, EventRecord, EventStream};

pub mod file;
pub mod memory;
pub mod publishing;

pub use file::FileEventStore;
pub use memory::InMemoryEventStore;
pub use publishing::PublishingEventStore;

/// Event Store trait for persisting and retrieving domain events
///
/// Implementations must ensure:
///
/// - **Atomicity**: an append writes all of its events or none
/// - **Isolation**: the version check and the write happen under one lock
/// - **Replay**: streams read back in append order
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Read every committed event of an aggregate, oldest first
    ///
    /// # Errors
    ///
    /// - `AggregateNotFound` if nothing was ever committed for `aggregate_id`
    /// - `UnknownEventType` / `Serialization` if a stored record cannot be decoded
    async fn load_stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream>;

    /// Append events to an aggregate's stream
    ///
    /// `expected_version` is the version the caller loaded (0 for a new
    /// aggregate). An empty `events` slice only performs the version check.
    ///
    /// # Returns
    ///
    /// The new version, `expected_version + events.len()`
    ///
    /// # Errors
    ///
    /// - `ConcurrentWrite` if the recorded version differs from `expected_version`
    /// - `StreamMismatch` if an event belongs to another aggregate
    /// - `Serialization` / `Io` if encoding or writing fails
    async fn append_to_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<u64>;

    /// Number of committed events for an aggregate, 0 if none
    async fn current_version(&self, aggregate_id: Uuid) -> StoreResult<u64>;
}

/// Shared stores are stores too, so `Arc<dyn EventStore>` can be decorated
#[async_trait]
impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    async fn load_stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream> {
        (**self).load_stream(aggregate_id).await
    }

    async fn append_to_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<u64> {
        (**self)
            .append_to_stream(aggregate_id, expected_version, events)
            .await
    }

    async fn current_version(&self, aggregate_id: Uuid) -> StoreResult<u64> {
        (**self).current_version(aggregate_id).await
    }
}

/// Committed records keyed by aggregate id
///
/// Shared bookkeeping for the concrete stores. Callers hold their own write
/// lock across [`StreamIndex::prepare`] and [`StreamIndex::commit`].
#[derive(Debug, Default)]
pub(crate) struct StreamIndex {
    streams: HashMap<Uuid, Vec<EventRecord>>,
}

impl StreamIndex {
    pub(crate) fn version(&self, aggregate_id: Uuid) -> u64 {
        self.streams
            .get(&aggregate_id)
            .map_or(0, |records| records.len() as u64)
    }

    pub(crate) fn stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream> {
        let records = self
            .streams
            .get(&aggregate_id)
            .ok_or(StoreError::AggregateNotFound(aggregate_id))?;

        let events = records
            .iter()
            .cloned()
            .map(DomainEvent::from_record)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(EventStream::new(aggregate_id, events))
    }

    /// Check the expected version and encode the events, without writing
    pub(crate) fn prepare(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<Vec<EventRecord>> {
        let actual = self.version(aggregate_id);
        if actual != expected_version {
            warn!(
                %aggregate_id,
                expected = expected_version,
                actual,
                "Optimistic concurrency conflict"
            );
            return Err(StoreError::ConcurrentWrite {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        if let Some(foreign) = events.iter().find(|e| e.aggregate_id() != aggregate_id) {
            return Err(StoreError::StreamMismatch {
                stream: aggregate_id,
                found: foreign.aggregate_id(),
            });
        }

        events.iter().map(DomainEvent::to_record).collect()
    }

    /// Append already-persisted records; returns the new version
    pub(crate) fn commit(&mut self, aggregate_id: Uuid, records: Vec<EventRecord>) -> u64 {
        if records.is_empty() {
            return self.version(aggregate_id);
        }
        let stream = self.streams.entry(aggregate_id).or_default();
        stream.extend(records);
        stream.len() as u64
    }

    /// Index a record read back from storage
    pub(crate) fn push(&mut self, record: EventRecord) {
        self.streams
            .entry(record.aggregate_id)
            .or_default()
            .push(record);
    }

    pub(crate) fn stream_count(&self) -> usize {
        self.streams.len()
    }
}
