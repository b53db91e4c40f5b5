// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Aggregate Replay
//!
//! Random command sequences are run against live aggregates. Whatever the
//! sequence, replaying the recorded events must rebuild the same state, and
//! rejected commands must leave no trace.

use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use cim_kanban::{Aggregate, Board, EventStream, WorkItem};

// ============================================================================
// Command Model
// ============================================================================

#[derive(Debug, Clone)]
enum BoardOp {
    AddColumn(u8),
    InsertBefore(usize, u8),
    InsertAfter(usize, u8),
    DeleteColumn(usize),
    RenameColumn(usize, u8),
    RenameBoard(String),
    Describe(String),
    Schedule,
    Advance(usize),
    Retire(usize),
}

#[derive(Debug, Clone)]
enum ItemOp {
    Rename(String),
    Rewrite(String),
    Reschedule(i32),
}

/// Run one command; returns whether it was accepted
fn run_board_op(board: &mut Board, items: &mut Vec<WorkItem>, op: &BoardOp) -> bool {
    match op {
        BoardOp::AddColumn(n) => board.add_column(format!("c{n}")).is_ok(),
        BoardOp::InsertBefore(k, n) => match column_at(board, *k) {
            Some(target) => board.insert_column_before(format!("c{n}"), target).is_ok(),
            None => false,
        },
        BoardOp::InsertAfter(k, n) => match column_at(board, *k) {
            Some(target) => board.insert_column_after(format!("c{n}"), target).is_ok(),
            None => false,
        },
        BoardOp::DeleteColumn(k) => match column_at(board, *k) {
            Some(target) => board.delete_column(target).is_ok(),
            None => false,
        },
        BoardOp::RenameColumn(k, n) => match column_at(board, *k) {
            Some(target) => board.rename_column(target, format!("c{n}")).is_ok(),
            None => false,
        },
        BoardOp::RenameBoard(name) => board.update_name(name.clone()).is_ok(),
        BoardOp::Describe(description) => board.update_description(description.clone()).is_ok(),
        BoardOp::Schedule => {
            let mut item = WorkItem::create("item", "content", due()).expect("valid item");
            let accepted = board.schedule_work_item(&mut item).is_ok();
            items.push(item);
            accepted
        }
        BoardOp::Advance(k) if !items.is_empty() => {
            let item = &items[k % items.len()];
            board.advance_work_item(item).is_ok()
        }
        BoardOp::Retire(k) if !items.is_empty() => {
            let item = &items[k % items.len()];
            board.retire_work_item(item).is_ok()
        }
        BoardOp::Advance(_) | BoardOp::Retire(_) => false,
    }
}

fn column_at(board: &Board, k: usize) -> Option<Uuid> {
    let columns = board.columns().ok()?;
    (!columns.is_empty()).then(|| columns[k % columns.len()].id())
}

fn run_item_op(item: &mut WorkItem, op: &ItemOp) -> bool {
    match op {
        ItemOp::Rename(name) => item.update_name(name.clone()).is_ok(),
        ItemOp::Rewrite(content) => item.update_content(content.clone()).is_ok(),
        ItemOp::Reschedule(days) => item
            .update_due_date(due() + chrono::Duration::days(i64::from(*days)))
            .is_ok(),
    }
}

fn due() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn pending_stream<A: Aggregate>(aggregate: &A) -> EventStream {
    EventStream::new(
        aggregate.id().unwrap(),
        aggregate.pending_changes().unwrap().to_vec(),
    )
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn board_op() -> impl Strategy<Value = BoardOp> {
    prop_oneof![
        (0u8..6).prop_map(BoardOp::AddColumn),
        (any::<usize>(), 0u8..6).prop_map(|(k, n)| BoardOp::InsertBefore(k, n)),
        (any::<usize>(), 0u8..6).prop_map(|(k, n)| BoardOp::InsertAfter(k, n)),
        any::<usize>().prop_map(BoardOp::DeleteColumn),
        (any::<usize>(), 0u8..6).prop_map(|(k, n)| BoardOp::RenameColumn(k, n)),
        "[ a-z]{0,8}".prop_map(BoardOp::RenameBoard),
        "[ a-z]{0,8}".prop_map(BoardOp::Describe),
        Just(BoardOp::Schedule),
        any::<usize>().prop_map(BoardOp::Advance),
        any::<usize>().prop_map(BoardOp::Retire),
    ]
}

fn item_op() -> impl Strategy<Value = ItemOp> {
    prop_oneof![
        "[ a-z]{0,8}".prop_map(ItemOp::Rename),
        "[ a-z]{0,8}".prop_map(ItemOp::Rewrite),
        (-400i32..400).prop_map(ItemOp::Reschedule),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Replay reproduces live board state
    ///
    /// Loading the recorded events yields the same name, description,
    /// columns and retired items, at a version equal to the number of events.
    #[test]
    fn prop_board_replay_equals_live(ops in prop::collection::vec(board_op(), 0..40)) {
        let mut board = Board::create("B", "d").unwrap();
        let mut items = Vec::new();
        for op in &ops {
            run_board_op(&mut board, &mut items, op);
        }

        let stream = pending_stream(&board);
        let replayed = Board::load(&stream).unwrap();

        prop_assert_eq!(replayed.name().unwrap(), board.name().unwrap());
        prop_assert_eq!(replayed.description().unwrap(), board.description().unwrap());
        prop_assert_eq!(replayed.columns().unwrap(), board.columns().unwrap());
        prop_assert_eq!(
            replayed.retired_work_item_ids().unwrap(),
            board.retired_work_item_ids().unwrap()
        );
        prop_assert_eq!(replayed.version().unwrap(), stream.version());
        prop_assert!(replayed.pending_changes().unwrap().is_empty());
    }

    /// Property: Rejected commands leave no trace
    ///
    /// A failing command changes neither state nor pending changes; an
    /// accepted one records exactly one event.
    #[test]
    fn prop_commands_record_at_most_one_event(ops in prop::collection::vec(board_op(), 0..40)) {
        let mut board = Board::create("B", "d").unwrap();
        let mut items = Vec::new();
        for op in &ops {
            let before = board.clone();
            let accepted = run_board_op(&mut board, &mut items, op);

            if accepted {
                prop_assert_eq!(
                    board.pending_changes().unwrap().len(),
                    before.pending_changes().unwrap().len() + 1
                );
            } else {
                prop_assert_eq!(&board, &before);
            }
        }
    }

    /// Property: A work item sits in at most one place
    ///
    /// Across all columns and the retired list, each item appears at most once.
    #[test]
    fn prop_work_items_are_never_duplicated(ops in prop::collection::vec(board_op(), 0..40)) {
        let mut board = Board::create("B", "d").unwrap();
        let mut items = Vec::new();
        for op in &ops {
            run_board_op(&mut board, &mut items, op);
        }

        for item in &items {
            let id = item.id().unwrap();
            let in_columns = board
                .columns()
                .unwrap()
                .iter()
                .filter(|column| column.contains(id))
                .count();
            let retired = board.retired_work_item_ids().unwrap().iter().filter(|r| **r == id).count();
            prop_assert!(in_columns + retired <= 1);
        }
    }

    /// Property: Replay reproduces live work item state
    #[test]
    fn prop_work_item_replay_equals_live(ops in prop::collection::vec(item_op(), 0..20)) {
        let mut item = WorkItem::create("n", "c", due()).unwrap();
        let mut accepted = 1;
        for op in &ops {
            if run_item_op(&mut item, op) {
                accepted += 1;
            }
        }

        let replayed = WorkItem::load(&pending_stream(&item)).unwrap();

        prop_assert_eq!(replayed.name().unwrap(), item.name().unwrap());
        prop_assert_eq!(replayed.content().unwrap(), item.content().unwrap());
        prop_assert_eq!(replayed.due_date().unwrap(), item.due_date().unwrap());
        prop_assert_eq!(replayed.version().unwrap(), accepted);
    }
}
