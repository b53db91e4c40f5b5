// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced kanban boards for the Composable Information Machine
//!
//! Boards and work items are aggregates whose state is derived only from
//! immutable domain events. Commands validate, raise an event, apply it and
//! record it as a pending change; a [`Repository`] commits pending changes to
//! an [`EventStore`] with optimistic concurrency and replays streams back
//! into aggregates.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use cim_kanban::{Aggregate, Board, InMemoryEventStore, Repository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Repository::new(Arc::new(InMemoryEventStore::new()));
//!
//!     let mut board = Board::create("Platform", "Platform team board")?;
//!     board.add_column("todo")?;
//!     board.add_column("done")?;
//!
//!     let mut item = board.create_work_item(
//!         "Rotate certificates",
//!         "Rotate the ingress TLS certificates",
//!         NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
//!     )?;
//!     board.schedule_work_item(&mut item)?;
//!
//!     repository.save(&mut item).await?;
//!     repository.save(&mut board).await?;
//!
//!     let board: Board = repository.load(board.id()?).await?;
//!     assert_eq!(board.column_index_of(item.id()?)?, Some(0));
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod event_bus;
pub mod event_store;
pub mod events;
pub mod repository;
pub mod telemetry;

// Re-export commonly used types
pub use aggregate::{Aggregate, AggregateRoot, Board, Column, WorkItem};
pub use config::{open_store, KanbanConfig, KanbanStore, StoreBackend};
pub use errors::{
    DomainError, DomainResult, KanbanError, KanbanResult, StoreError, StoreResult,
};
pub use event_bus::{EventBus, EventHandler};
pub use event_store::{EventStore, FileEventStore, InMemoryEventStore, PublishingEventStore};
pub use events::{
    AttributeChanged, BoardAttributeChanged, BoardCreated, BoardDiscarded, ColumnAdded,
    ColumnInserted, ColumnRemoved, ColumnRenamed, DomainEvent, EventPayload, EventRecord,
    EventStream, WorkItemAdvanced, WorkItemCreated, WorkItemDiscarded, WorkItemRetired,
    WorkItemScheduled,
};
pub use repository::Repository;
