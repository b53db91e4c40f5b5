// Copyright (c) 2025 - Cowboy AI, Inc.
//! Kanban Domain Events
//!
//! Events are immutable facts representing state changes that have occurred
//! on a `Board` or `WorkItem` aggregate.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: fields are private, only accessors are exposed
//! 2. **Events are past tense**: `ColumnAdded`, not `AddColumn`
//! 3. **Events are facts**: applying one never re-validates business rules
//! 4. **Records are the wire format**: events cross the store boundary only as [`EventRecord`]
//!
//! # Event Flow
//!
//! ```text
//! Command → Aggregate → DomainEvent → EventRecord → EventStore
//!   (intent)  (validate)   (fact)       (serialize)    (persist)
//! ```
//!
//! # Module Organization
//!
//! - [`payload`] - variant payloads and the event-name registry
//! - [`domain_event`] - the immutable event envelope
//! - [`record`] - serialized record form
//! - [`stream`] - per-aggregate ordered event streams

pub mod domain_event;
pub mod payload;
pub mod record;
pub mod stream;

pub use domain_event::DomainEvent;
pub use payload::{
    AttributeChanged, BoardAttributeChanged, BoardCreated, BoardDiscarded, ColumnAdded,
    ColumnInserted, ColumnRemoved, ColumnRenamed, EventPayload, WorkItemAdvanced,
    WorkItemCreated, WorkItemDiscarded, WorkItemRetired, WorkItemScheduled,
};
pub use record::EventRecord;
pub use stream::EventStream;
