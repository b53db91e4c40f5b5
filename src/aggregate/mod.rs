// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-Sourced Aggregates
//!
//! This module provides the aggregate root protocol shared by [`Board`] and
//! [`WorkItem`]:
//! - State is derived only by applying events
//! - Commands validate, raise exactly one event, apply it, and record it
//! - Loading replays the full stream through the same `apply` used live
//!
//! # Apply-and-Record
//!
//! ```text
//! command(params) → validate(state) → DomainEvent
//!                                         ↓
//!                               apply(event) → new state
//!                                         ↓
//!                               pending changes += event
//! ```
//!
//! Pending changes are cleared only when the repository commits them to an
//! event store, which also advances the aggregate's version.
//!
//! Discarding is a command too: it raises the kind's discard event, so a
//! discarded aggregate replays as discarded and any event after the discard
//! fails the replay with [`DomainError::Discarded`].
//!
//! # Replay
//!
//! ```rust,ignore
//! let stream = store.load_stream(board_id).await?;
//! let board = Board::load(&stream)?;
//! assert_eq!(board.version()?, stream.version());
//! ```
//!
//! # Dispatch
//!
//! `apply_event` routes on [`EventPayload`](crate::events::EventPayload) with
//! an exhaustive `match`. Variants owned by the other aggregate kind fail with
//! [`DomainError::UnrecognizedEvent`]; they are never silently ignored.

pub mod board;
pub mod work_item;

pub use board::{Board, Column};
pub use work_item::WorkItem;

use tracing::trace;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::events::{DomainEvent, EventPayload, EventStream};

/// Identity, version, lifecycle flag and pending changes of an aggregate
///
/// Every mutator is crate-private: only commands record changes and only a
/// successful commit clears them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRoot {
    id: Uuid,
    version: u64,
    discarded: bool,
    changes: Vec<DomainEvent>,
}

impl AggregateRoot {
    pub(crate) fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            discarded: false,
            changes: Vec::new(),
        }
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    pub(crate) fn ensure_active(&self) -> DomainResult<()> {
        if self.discarded {
            return Err(DomainError::Discarded(self.id));
        }
        Ok(())
    }

    /// Unchecked id, for building events and error messages
    pub(crate) fn raw_id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn committed_version(&self) -> u64 {
        self.version
    }

    /// Pending changes without the discard check, for committing a discard
    pub(crate) fn changes(&self) -> &[DomainEvent] {
        &self.changes
    }

    pub(crate) fn mark_discarded(&mut self) {
        self.discarded = true;
    }

    pub(crate) fn record(&mut self, event: DomainEvent) {
        self.changes.push(event);
    }

    pub(crate) fn mark_committed(&mut self, version: u64) {
        self.changes.clear();
        self.version = version;
    }
}

/// Capability set of an event-sourced aggregate
pub trait Aggregate: Sized {
    /// Aggregate kind, used in logs and error messages
    const KIND: &'static str;

    /// Empty state that replay starts from
    fn blank(id: Uuid) -> Self;

    fn root(&self) -> &AggregateRoot;

    fn root_mut(&mut self) -> &mut AggregateRoot;

    /// Route one event to its mutation routine
    ///
    /// Implementations must leave state untouched when they return an error.
    fn apply_event(&mut self, event: &DomainEvent) -> DomainResult<()>;

    /// Payload recorded by [`Aggregate::discard`]
    fn discarded_payload() -> EventPayload;

    /// Whether the aggregate has no obligations preventing discard
    fn can_discard(&self) -> bool {
        true
    }

    /// Apply an event without recording it
    ///
    /// Fails with [`DomainError::Discarded`] on a discarded aggregate.
    fn apply(&mut self, event: &DomainEvent) -> DomainResult<()> {
        self.root().ensure_active()?;
        self.apply_event(event)
    }

    /// Rebuild an aggregate by replaying its stream from version 0
    fn load(stream: &EventStream) -> DomainResult<Self> {
        let aggregate_id = stream.aggregate_id();
        let mut aggregate = Self::blank(aggregate_id);

        for event in stream.events() {
            if event.aggregate_id() != aggregate_id {
                return Err(DomainError::inconsistent(
                    event.event_name(),
                    format!(
                        "event for {} found in stream of {aggregate_id}",
                        event.aggregate_id()
                    ),
                ));
            }
            aggregate.apply(event)?;
        }

        aggregate.root_mut().version = stream.version();
        trace!(
            kind = Self::KIND,
            %aggregate_id,
            version = stream.version(),
            "Replayed aggregate"
        );
        Ok(aggregate)
    }

    fn id(&self) -> DomainResult<Uuid> {
        self.root().ensure_active()?;
        Ok(self.root().id)
    }

    /// Number of committed events
    fn version(&self) -> DomainResult<u64> {
        self.root().ensure_active()?;
        Ok(self.root().version)
    }

    /// Events raised since the last load or commit
    fn pending_changes(&self) -> DomainResult<&[DomainEvent]> {
        self.root().ensure_active()?;
        Ok(&self.root().changes)
    }

    fn is_discarded(&self) -> bool {
        self.root().is_discarded()
    }

    /// Mark the aggregate as no longer in use; irreversible
    ///
    /// Records the discard event, which the repository still commits.
    fn discard(&mut self) -> DomainResult<()> {
        self.root().ensure_active()?;
        if !self.can_discard() {
            return Err(DomainError::constraint(format!(
                "{} {} cannot be discarded",
                Self::KIND,
                self.root().id
            )));
        }
        raise(self, Self::discarded_payload())
    }
}

/// Apply a freshly raised event and record it as a pending change
pub(crate) fn raise<A: Aggregate>(
    aggregate: &mut A,
    payload: impl Into<EventPayload>,
) -> DomainResult<()> {
    let event = DomainEvent::new(aggregate.root().raw_id(), payload);
    aggregate.apply(&event)?;
    aggregate.root_mut().record(event);
    Ok(())
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::constraint(format!("{field} cannot be empty")));
    }
    Ok(())
}
