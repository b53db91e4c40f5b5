// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-kanban
//!
//! Provides deterministic event data for serialization and replay tests, plus
//! builders for boards and work items used across the integration suites.
//!
//! # Design Principles
//! - Event fixtures use fixed UUIDs and timestamps so records are reproducible
//! - Aggregate builders go through commands only, never through `apply`

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use cim_kanban::{
    AttributeChanged, Board, BoardCreated, ColumnAdded, DomainEvent, WorkItem, WorkItemAdvanced,
    WorkItemCreated, WorkItemScheduled,
};

// Fixed test UUIDs (UUID v7 format, but deterministic for testing)
pub const BOARD_ID: &str = "01934f4a-1000-7000-8000-000000001000";
pub const WORK_ITEM_ID: &str = "01934f4a-2000-7000-8000-000000002000";
pub const TODO_COLUMN_ID: &str = "01934f4a-3001-7000-8000-000000003001";
pub const DONE_COLUMN_ID: &str = "01934f4a-3002-7000-8000-000000003002";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";
pub const FIXED_TIMESTAMP_MILLIS: i64 = 1_768_824_000_000;

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("Invalid due date in test fixture")
}

/// Committed history of a board with `todo`/`done` columns and one item advanced to `done`
pub fn board_history() -> Vec<DomainEvent> {
    let board_id = parse_uuid(BOARD_ID);
    let at = fixed_timestamp();

    vec![
        DomainEvent::at(
            board_id,
            at,
            BoardCreated {
                name: "Platform".into(),
                description: "Platform team board".into(),
            },
        ),
        DomainEvent::at(
            board_id,
            at,
            ColumnAdded {
                column_id: parse_uuid(TODO_COLUMN_ID),
                column_name: "todo".into(),
            },
        ),
        DomainEvent::at(
            board_id,
            at,
            ColumnAdded {
                column_id: parse_uuid(DONE_COLUMN_ID),
                column_name: "done".into(),
            },
        ),
        DomainEvent::at(
            board_id,
            at,
            WorkItemScheduled {
                work_item_id: parse_uuid(WORK_ITEM_ID),
            },
        ),
        DomainEvent::at(
            board_id,
            at,
            WorkItemAdvanced {
                work_item_id: parse_uuid(WORK_ITEM_ID),
                source_column_index: 0,
            },
        ),
    ]
}

/// Committed history of a work item created and then renamed
pub fn work_item_history() -> Vec<DomainEvent> {
    let item_id = parse_uuid(WORK_ITEM_ID);
    let at = fixed_timestamp();

    vec![
        DomainEvent::at(
            item_id,
            at,
            WorkItemCreated {
                name: "Rotate certificates".into(),
                content: "Ingress TLS".into(),
                due_date: due_date(),
            },
        ),
        DomainEvent::at(
            item_id,
            at,
            AttributeChanged::Name("Rotate all certificates".into()),
        ),
    ]
}

/// New board with the given columns, all changes still pending
pub fn board_with_columns(names: &[&str]) -> (Board, Vec<Uuid>) {
    let mut board = Board::create("Platform", "Platform team board").expect("valid board");
    let column_ids = names
        .iter()
        .map(|name| board.add_column(*name).expect("unique column name"))
        .collect();
    (board, column_ids)
}

pub fn work_item(name: &str) -> WorkItem {
    WorkItem::create(name, "details", due_date()).expect("valid work item")
}

pub fn column_names(board: &Board) -> Vec<String> {
    board
        .columns()
        .expect("active board")
        .iter()
        .map(|column| column.name().to_string())
        .collect()
}
