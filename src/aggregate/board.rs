// Copyright (c) 2025 - Cowboy AI, Inc.
//! Board Aggregate
//!
//! A board owns an ordered list of columns (the workflow order) and tracks
//! which column each scheduled work item currently sits in.
//!
//! # Work Item Lifecycle
//!
//! ```text
//! Unscheduled → Column[0] → Column[1] → … → Column[n-1] → Retired
//! ```
//!
//! Items move strictly forward one column per `advance_work_item`, arrive at
//! the end of the destination column, and are retired only from the last
//! column. Retired ids are never removed.
//!
//! # Business Rules
//! - Column names are unique within a board (case-sensitive), also on rename
//! - Only empty columns can be deleted
//! - Scheduling requires at least one column
//! - An item is in at most one column at a time
//! - A retired item cannot be scheduled again on the same board

use chrono::NaiveDate;
use uuid::Uuid;

use super::{raise, require_non_empty, Aggregate, AggregateRoot, WorkItem};
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    BoardAttributeChanged, BoardCreated, BoardDiscarded, ColumnAdded, ColumnInserted,
    ColumnRemoved, ColumnRenamed, DomainEvent, EventPayload, WorkItemAdvanced, WorkItemRetired,
    WorkItemScheduled,
};

/// A column of the board and the work items queued in it, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    id: Uuid,
    name: String,
    work_item_ids: Vec<Uuid>,
}

impl Column {
    fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            work_item_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn work_item_ids(&self) -> &[Uuid] {
        &self.work_item_ids
    }

    pub fn is_empty(&self) -> bool {
        self.work_item_ids.is_empty()
    }

    pub fn contains(&self, work_item_id: Uuid) -> bool {
        self.work_item_ids.contains(&work_item_id)
    }

    fn position_of(&self, work_item_id: Uuid) -> Option<usize> {
        self.work_item_ids.iter().position(|id| *id == work_item_id)
    }
}

/// Kanban board aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    root: AggregateRoot,
    name: String,
    description: String,
    columns: Vec<Column>,
    retired_work_item_ids: Vec<Uuid>,
}

impl Board {
    /// Create a new board with a single pending `BoardCreated` event
    pub fn create(name: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();
        require_non_empty("board name", &name)?;
        require_non_empty("board description", &description)?;

        let mut board = Self::blank(Uuid::now_v7());
        raise(&mut board, BoardCreated { name, description })?;
        Ok(board)
    }

    pub fn name(&self) -> DomainResult<&str> {
        self.root.ensure_active()?;
        Ok(&self.name)
    }

    pub fn description(&self) -> DomainResult<&str> {
        self.root.ensure_active()?;
        Ok(&self.description)
    }

    /// Columns in workflow order
    pub fn columns(&self) -> DomainResult<&[Column]> {
        self.root.ensure_active()?;
        Ok(&self.columns)
    }

    pub fn column(&self, column_id: Uuid) -> DomainResult<&Column> {
        self.root.ensure_active()?;
        let index = self.find_column_index(column_id)?;
        Ok(&self.columns[index])
    }

    pub fn retired_work_item_ids(&self) -> DomainResult<&[Uuid]> {
        self.root.ensure_active()?;
        Ok(&self.retired_work_item_ids)
    }

    /// Index of the column currently holding the work item, if any
    pub fn column_index_of(&self, work_item_id: Uuid) -> DomainResult<Option<usize>> {
        self.root.ensure_active()?;
        Ok(self.locate(work_item_id))
    }

    /// Create a work item that belongs to this board
    ///
    /// The item is not scheduled; it only remembers the board in memory.
    pub fn create_work_item(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
        due_date: NaiveDate,
    ) -> DomainResult<WorkItem> {
        self.root.ensure_active()?;
        let mut item = WorkItem::create(name, content, due_date)?;
        item.assign_board(self.root.raw_id());
        Ok(item)
    }

    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.root.ensure_active()?;
        let name = name.into();
        require_non_empty("board name", &name)?;

        raise(self, BoardAttributeChanged::Name(name))
    }

    pub fn update_description(&mut self, description: impl Into<String>) -> DomainResult<()> {
        self.root.ensure_active()?;
        let description = description.into();
        require_non_empty("board description", &description)?;

        raise(self, BoardAttributeChanged::Description(description))
    }

    /// Append a column to the end of the board, returning its id
    pub fn add_column(&mut self, name: impl Into<String>) -> DomainResult<Uuid> {
        self.root.ensure_active()?;
        let column_name = self.validate_column_name(name.into())?;
        let column_id = Uuid::now_v7();

        raise(self, ColumnAdded { column_id, column_name })?;
        Ok(column_id)
    }

    /// Insert a column immediately before `target_column_id`
    pub fn insert_column_before(
        &mut self,
        name: impl Into<String>,
        target_column_id: Uuid,
    ) -> DomainResult<Uuid> {
        self.insert_column(name.into(), target_column_id, 0)
    }

    /// Insert a column immediately after `target_column_id`
    pub fn insert_column_after(
        &mut self,
        name: impl Into<String>,
        target_column_id: Uuid,
    ) -> DomainResult<Uuid> {
        self.insert_column(name.into(), target_column_id, 1)
    }

    /// Give a column a new name, unique on this board
    pub fn rename_column(&mut self, column_id: Uuid, name: impl Into<String>) -> DomainResult<()> {
        self.root.ensure_active()?;
        self.find_column_index(column_id)?;
        let column_name = self.validate_column_name(name.into())?;

        raise(self, ColumnRenamed { column_id, column_name })
    }

    /// Remove an empty column
    pub fn delete_column(&mut self, column_id: Uuid) -> DomainResult<()> {
        self.root.ensure_active()?;
        let index = self.find_column_index(column_id)?;
        if !self.columns[index].is_empty() {
            return Err(DomainError::ColumnNotEmpty(column_id));
        }

        raise(self, ColumnRemoved { column_id })
    }

    /// Put a work item into the first column
    ///
    /// On success the item remembers this board as its (in-memory) owner.
    pub fn schedule_work_item(&mut self, item: &mut WorkItem) -> DomainResult<()> {
        self.root.ensure_active()?;
        let work_item_id = item.id()?;
        let board_id = self.root.raw_id();

        if self.columns.is_empty() {
            return Err(DomainError::constraint(format!(
                "board {board_id} has no columns"
            )));
        }
        if self.locate(work_item_id).is_some() {
            return Err(DomainError::constraint(format!(
                "work item {work_item_id} is already scheduled"
            )));
        }
        if self.retired_work_item_ids.contains(&work_item_id) {
            return Err(DomainError::constraint(format!(
                "work item {work_item_id} has been retired from board {board_id}"
            )));
        }
        if let Some(owner) = item.board_id()? {
            if owner != board_id {
                return Err(DomainError::constraint(format!(
                    "work item {work_item_id} belongs to board {owner}"
                )));
            }
        }

        raise(self, WorkItemScheduled { work_item_id })?;
        item.assign_board(board_id);
        Ok(())
    }

    /// Move a work item from its column to the end of the next one
    pub fn advance_work_item(&mut self, item: &WorkItem) -> DomainResult<()> {
        self.root.ensure_active()?;
        let work_item_id = item.id()?;

        let source_column_index = self.locate(work_item_id).ok_or_else(|| {
            DomainError::NotFound(format!(
                "work item {work_item_id} is not scheduled on board {}",
                self.root.raw_id()
            ))
        })?;
        if source_column_index + 1 == self.columns.len() {
            return Err(DomainError::constraint(format!(
                "work item {work_item_id} is already in the last column"
            )));
        }

        raise(
            self,
            WorkItemAdvanced {
                work_item_id,
                source_column_index,
            },
        )
    }

    /// Take a work item out of the last column and mark it retired
    pub fn retire_work_item(&mut self, item: &WorkItem) -> DomainResult<()> {
        self.root.ensure_active()?;
        let work_item_id = item.id()?;

        let in_last_column = self
            .columns
            .last()
            .is_some_and(|column| column.contains(work_item_id));
        if !in_last_column {
            return Err(DomainError::constraint(format!(
                "work item {work_item_id} is not in the last column"
            )));
        }

        raise(self, WorkItemRetired { work_item_id })
    }

    fn insert_column(
        &mut self,
        name: String,
        target_column_id: Uuid,
        offset: usize,
    ) -> DomainResult<Uuid> {
        self.root.ensure_active()?;
        let index = self.find_column_index(target_column_id)? + offset;
        let column_name = self.validate_column_name(name)?;
        let column_id = Uuid::now_v7();

        raise(
            self,
            ColumnInserted {
                column_id,
                column_name,
                index,
            },
        )?;
        Ok(column_id)
    }

    fn validate_column_name(&self, name: String) -> DomainResult<String> {
        require_non_empty("column name", &name)?;
        if self.columns.iter().any(|column| column.name == name) {
            return Err(DomainError::constraint(format!(
                "column name '{name}' already exists"
            )));
        }
        Ok(name)
    }

    fn find_column_index(&self, column_id: Uuid) -> DomainResult<usize> {
        self.columns
            .iter()
            .position(|column| column.id == column_id)
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "column {column_id} is not on board {}",
                    self.root.raw_id()
                ))
            })
    }

    fn locate(&self, work_item_id: Uuid) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.contains(work_item_id))
    }
}

impl Aggregate for Board {
    const KIND: &'static str = "Board";

    fn blank(id: Uuid) -> Self {
        Self {
            root: AggregateRoot::new(id),
            name: String::new(),
            description: String::new(),
            columns: Vec::new(),
            retired_work_item_ids: Vec::new(),
        }
    }

    fn discarded_payload() -> EventPayload {
        BoardDiscarded {}.into()
    }

    fn root(&self) -> &AggregateRoot {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot {
        &mut self.root
    }

    fn apply_event(&mut self, event: &DomainEvent) -> DomainResult<()> {
        let event_name = event.event_name();

        match event.payload() {
            EventPayload::BoardCreated(e) => {
                self.name = e.name.clone();
                self.description = e.description.clone();
            }

            EventPayload::BoardAttributeChanged(BoardAttributeChanged::Name(name)) => {
                self.name = name.clone();
            }

            EventPayload::BoardAttributeChanged(BoardAttributeChanged::Description(description)) => {
                self.description = description.clone();
            }

            EventPayload::ColumnAdded(e) => {
                self.columns
                    .push(Column::new(e.column_id, e.column_name.clone()));
            }

            EventPayload::ColumnInserted(e) => {
                if e.index > self.columns.len() {
                    return Err(DomainError::inconsistent(
                        event_name,
                        format!("index {} beyond {} columns", e.index, self.columns.len()),
                    ));
                }
                self.columns
                    .insert(e.index, Column::new(e.column_id, e.column_name.clone()));
            }

            EventPayload::ColumnRemoved(e) => {
                let index = self
                    .columns
                    .iter()
                    .position(|column| column.id == e.column_id)
                    .ok_or_else(|| {
                        DomainError::inconsistent(
                            event_name,
                            format!("column {} does not exist", e.column_id),
                        )
                    })?;
                self.columns.remove(index);
            }

            EventPayload::ColumnRenamed(e) => {
                let column = self
                    .columns
                    .iter_mut()
                    .find(|column| column.id == e.column_id)
                    .ok_or_else(|| {
                        DomainError::inconsistent(
                            event_name,
                            format!("column {} does not exist", e.column_id),
                        )
                    })?;
                column.name = e.column_name.clone();
            }

            EventPayload::WorkItemScheduled(e) => {
                let first = self.columns.first_mut().ok_or_else(|| {
                    DomainError::inconsistent(event_name, "board has no columns")
                })?;
                first.work_item_ids.push(e.work_item_id);
            }

            EventPayload::WorkItemAdvanced(e) => {
                let source = e.source_column_index;
                let destination = source
                    .checked_add(1)
                    .filter(|next| *next < self.columns.len())
                    .ok_or_else(|| {
                        DomainError::inconsistent(
                            event_name,
                            format!("no column after index {source}"),
                        )
                    })?;
                let position = self.columns[source]
                    .position_of(e.work_item_id)
                    .ok_or_else(|| {
                        DomainError::inconsistent(
                            event_name,
                            format!("work item {} not in column {source}", e.work_item_id),
                        )
                    })?;
                self.columns[source].work_item_ids.remove(position);
                self.columns[destination].work_item_ids.push(e.work_item_id);
            }

            EventPayload::WorkItemRetired(e) => {
                let last = self.columns.last_mut().ok_or_else(|| {
                    DomainError::inconsistent(event_name, "board has no columns")
                })?;
                let position = last.position_of(e.work_item_id).ok_or_else(|| {
                    DomainError::inconsistent(
                        event_name,
                        format!("work item {} not in last column", e.work_item_id),
                    )
                })?;
                last.work_item_ids.remove(position);
                self.retired_work_item_ids.push(e.work_item_id);
            }

            EventPayload::BoardDiscarded(_) => self.root.mark_discarded(),

            EventPayload::WorkItemCreated(_)
            | EventPayload::AttributeChanged(_)
            | EventPayload::WorkItemDiscarded(_) => {
                return Err(DomainError::UnrecognizedEvent {
                    aggregate_kind: Self::KIND,
                    event_name,
                });
            }
        }

        Ok(())
    }
}
