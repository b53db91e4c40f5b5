// Copyright (c) 2025 - Cowboy AI, Inc.
//! Work Item Aggregate
//!
//! A unit of work with a name, free-form content and a due date. Every
//! attribute change is recorded as a single `AttributeChanged` event carrying
//! the attribute name and its new value.
//!
//! The owning board is tracked in memory only. It is set when a board creates
//! or schedules the item and is not rebuilt on replay.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{raise, require_non_empty, Aggregate, AggregateRoot};
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    AttributeChanged, DomainEvent, EventPayload, WorkItemCreated, WorkItemDiscarded,
};

/// Work item aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    root: AggregateRoot,
    name: String,
    content: String,
    due_date: NaiveDate,
    board_id: Option<Uuid>,
}

impl WorkItem {
    /// Create a new work item with a single pending `WorkItemCreated` event
    pub fn create(
        name: impl Into<String>,
        content: impl Into<String>,
        due_date: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        let content = content.into();
        require_non_empty("work item name", &name)?;
        require_non_empty("work item content", &content)?;

        let mut item = Self::blank(Uuid::now_v7());
        raise(
            &mut item,
            WorkItemCreated {
                name,
                content,
                due_date,
            },
        )?;
        Ok(item)
    }

    pub fn name(&self) -> DomainResult<&str> {
        self.root.ensure_active()?;
        Ok(&self.name)
    }

    pub fn content(&self) -> DomainResult<&str> {
        self.root.ensure_active()?;
        Ok(&self.content)
    }

    pub fn due_date(&self) -> DomainResult<NaiveDate> {
        self.root.ensure_active()?;
        Ok(self.due_date)
    }

    /// Board this item was created on or scheduled to, if known in memory
    pub fn board_id(&self) -> DomainResult<Option<Uuid>> {
        self.root.ensure_active()?;
        Ok(self.board_id)
    }

    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.root.ensure_active()?;
        let name = name.into();
        require_non_empty("work item name", &name)?;
        raise(self, AttributeChanged::Name(name))
    }

    pub fn update_content(&mut self, content: impl Into<String>) -> DomainResult<()> {
        self.root.ensure_active()?;
        let content = content.into();
        require_non_empty("work item content", &content)?;
        raise(self, AttributeChanged::Content(content))
    }

    /// Change the due date; any calendar date is accepted, including past ones
    pub fn update_due_date(&mut self, due_date: NaiveDate) -> DomainResult<()> {
        self.root.ensure_active()?;
        raise(self, AttributeChanged::DueDate(due_date))
    }

    pub(crate) fn assign_board(&mut self, board_id: Uuid) {
        self.board_id = Some(board_id);
    }
}

impl Aggregate for WorkItem {
    const KIND: &'static str = "WorkItem";

    fn blank(id: Uuid) -> Self {
        Self {
            root: AggregateRoot::new(id),
            name: String::new(),
            content: String::new(),
            due_date: NaiveDate::default(),
            board_id: None,
        }
    }

    fn discarded_payload() -> EventPayload {
        WorkItemDiscarded {}.into()
    }

    fn root(&self) -> &AggregateRoot {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot {
        &mut self.root
    }

    fn apply_event(&mut self, event: &DomainEvent) -> DomainResult<()> {
        match event.payload() {
            EventPayload::WorkItemCreated(e) => {
                self.name = e.name.clone();
                self.content = e.content.clone();
                self.due_date = e.due_date;
            }

            EventPayload::AttributeChanged(change) => match change {
                AttributeChanged::Name(name) => self.name = name.clone(),
                AttributeChanged::Content(content) => self.content = content.clone(),
                AttributeChanged::DueDate(due_date) => self.due_date = *due_date,
            },

            EventPayload::WorkItemDiscarded(_) => self.root.mark_discarded(),

            EventPayload::BoardCreated(_)
            | EventPayload::BoardAttributeChanged(_)
            | EventPayload::ColumnAdded(_)
            | EventPayload::ColumnInserted(_)
            | EventPayload::ColumnRenamed(_)
            | EventPayload::ColumnRemoved(_)
            | EventPayload::WorkItemScheduled(_)
            | EventPayload::WorkItemAdvanced(_)
            | EventPayload::WorkItemRetired(_)
            | EventPayload::BoardDiscarded(_) => {
                return Err(DomainError::UnrecognizedEvent {
                    aggregate_kind: Self::KIND,
                    event_name: event.event_name(),
                });
            }
        }

        Ok(())
    }
}
