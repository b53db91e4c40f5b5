// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for kanban aggregates and event stores
//!
//! Errors are split by layer:
//! - [`DomainError`] - business rule violations and replay failures raised by aggregates
//! - [`StoreError`] - persistence and optimistic concurrency failures raised by event stores
//! - [`KanbanError`] - the union of both, returned by the repository and configuration layer

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by aggregates while handling commands or replaying events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Operation attempted on an aggregate that has been discarded
    #[error("Aggregate {0} has been discarded")]
    Discarded(Uuid),

    /// Business rule violation
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// Column still holds work items and cannot be removed
    #[error("Column {0} is not empty")]
    ColumnNotEmpty(Uuid),

    /// Referenced column or work item is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Event variant has no mutation routine on this aggregate kind
    #[error("{aggregate_kind} cannot apply {event_name} events")]
    UnrecognizedEvent {
        aggregate_kind: &'static str,
        event_name: &'static str,
    },

    /// Event is well-formed but contradicts the aggregate's current state
    #[error("Inconsistent {event_name} event: {reason}")]
    InconsistentEvent {
        event_name: &'static str,
        reason: String,
    },
}

impl DomainError {
    /// True for business-rule violations, including [`DomainError::ColumnNotEmpty`]
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_) | Self::ColumnNotEmpty(_))
    }

    pub(crate) fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }

    pub(crate) fn inconsistent(event_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InconsistentEvent {
            event_name,
            reason: reason.into(),
        }
    }
}

/// Errors raised by event store implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No committed events exist for the aggregate
    #[error("Aggregate {0} not found")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict
    #[error("Concurrent write on {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrentWrite {
        aggregate_id: Uuid,
        expected: u64,
        actual: u64,
    },

    /// Stored event name is not in the variant registry
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// Event belongs to a different aggregate than the target stream
    #[error("Event for aggregate {found} cannot be appended to stream {stream}")]
    StreamMismatch { stream: Uuid, found: Uuid },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// A failed append could not be rolled back; the store must be reopened
    #[error("Event store {0} is poisoned by a failed rollback")]
    Poisoned(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Top-level error for repository and configuration operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KanbanError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl KanbanError {
    /// Only optimistic concurrency conflicts are expected to succeed on reload-and-retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(StoreError::ConcurrentWrite { .. }))
    }
}

/// Result type for aggregate operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for repository operations
pub type KanbanResult<T> = Result<T, KanbanError>;
