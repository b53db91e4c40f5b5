// Copyright (c) 2025 - Cowboy AI, Inc.
//! Kanban Event Payloads
//!
//! Every state transition of a `Board` or `WorkItem` is one of the variants
//! of [`EventPayload`]. Payloads are past tense, carry only the data needed to
//! replay the transition, and serialize with camelCase keys.
//!
//! The variant name doubles as the `eventName` tag of the serialized record,
//! and [`EventPayload::EVENT_NAMES`] is the registry consulted when a record is
//! decoded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

/// Payload of a kanban domain event
///
/// The aggregate routes on this enum with an exhaustive `match`, so adding a
/// variant without a mutation routine is a compile error rather than silent drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Board was created
    BoardCreated(BoardCreated),

    /// Board name or description was reassigned
    BoardAttributeChanged(BoardAttributeChanged),

    /// Column was appended to the end of the board
    ColumnAdded(ColumnAdded),

    /// Column was inserted at a position
    ColumnInserted(ColumnInserted),

    /// Column was given a new name
    ColumnRenamed(ColumnRenamed),

    /// Empty column was removed
    ColumnRemoved(ColumnRemoved),

    /// Work item entered the first column
    WorkItemScheduled(WorkItemScheduled),

    /// Work item moved one column forward
    WorkItemAdvanced(WorkItemAdvanced),

    /// Work item left the last column for good
    WorkItemRetired(WorkItemRetired),

    BoardDiscarded(BoardDiscarded),

    /// Work item was created
    WorkItemCreated(WorkItemCreated),

    /// Single work item attribute was reassigned
    AttributeChanged(AttributeChanged),

    WorkItemDiscarded(WorkItemDiscarded),
}

/// Board was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCreated {
    pub name: String,
    pub description: String,
}

/// Column was appended to the end of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAdded {
    pub column_id: Uuid,
    pub column_name: String,
}

/// Column was inserted so that it ends up at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInserted {
    pub column_id: Uuid,
    pub column_name: String,
    pub index: usize,
}

/// Board attribute was reassigned
///
/// Serialized like [`AttributeChanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "attributeName",
    content = "attributeValue",
    rename_all = "camelCase"
)]
pub enum BoardAttributeChanged {
    Name(String),
    Description(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRenamed {
    pub column_id: Uuid,
    pub column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRemoved {
    pub column_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemScheduled {
    pub work_item_id: Uuid,
}

/// Work item moved from column `source_column_index` to the next one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemAdvanced {
    pub work_item_id: Uuid,
    pub source_column_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRetired {
    pub work_item_id: Uuid,
}

/// Work item was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemCreated {
    pub name: String,
    pub content: String,
    pub due_date: NaiveDate,
}

/// Work item attribute was reassigned
///
/// Serialized as `{"attributeName": "...", "attributeValue": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "attributeName",
    content = "attributeValue",
    rename_all = "camelCase"
)]
pub enum AttributeChanged {
    Name(String),
    Content(String),
    DueDate(NaiveDate),
}

impl AttributeChanged {
    /// Serialized attribute name
    pub fn attribute_name(&self) -> &'static str {
        match self {
            AttributeChanged::Name(_) => "name",
            AttributeChanged::Content(_) => "content",
            AttributeChanged::DueDate(_) => "dueDate",
        }
    }
}

/// Board was discarded; nothing may follow it in the stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDiscarded {}

/// Work item was discarded; nothing may follow it in the stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemDiscarded {}

impl EventPayload {
    /// Encode the payload as a field map
    pub fn to_fields(&self) -> StoreResult<Map<String, Value>> {
        match self.encode()? {
            Value::Object(fields) => Ok(fields),
            other => Err(StoreError::Serialization(format!(
                "{} payload is not a map: {other}",
                self.event_name()
            ))),
        }
    }

    /// Rebuild the variant named `event_name` from its field map
    ///
    /// Fails with [`StoreError::UnknownEventType`] when the name is not registered.
    pub fn from_fields(event_name: &str, fields: Map<String, Value>) -> StoreResult<Self> {
        Self::decode(event_name, Value::Object(fields))
    }
}

/// Generates the name registry, the codec and the `From` conversions from a
/// single variant list. A variant left out of the list fails the exhaustive
/// matches below.
macro_rules! event_registry {
    ($($variant:ident),* $(,)?) => {
        impl EventPayload {
            /// Registry of every known event name
            pub const EVENT_NAMES: &'static [&'static str] = &[$(stringify!($variant)),*];

            /// Variant tag used as `eventName` in serialized records
            pub fn event_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)*
                }
            }

            fn encode(&self) -> serde_json::Result<Value> {
                match self {
                    $(Self::$variant(event) => serde_json::to_value(event),)*
                }
            }

            fn decode(event_name: &str, value: Value) -> StoreResult<Self> {
                match event_name {
                    $(stringify!($variant) => Ok(Self::$variant(serde_json::from_value(value)?)),)*
                    unknown => Err(StoreError::UnknownEventType(unknown.to_string())),
                }
            }
        }

        $(
            impl From<$variant> for EventPayload {
                fn from(event: $variant) -> Self {
                    EventPayload::$variant(event)
                }
            }
        )*
    };
}

event_registry!(
    BoardCreated,
    BoardAttributeChanged,
    ColumnAdded,
    ColumnInserted,
    ColumnRenamed,
    ColumnRemoved,
    WorkItemScheduled,
    WorkItemAdvanced,
    WorkItemRetired,
    BoardDiscarded,
    WorkItemCreated,
    AttributeChanged,
    WorkItemDiscarded,
);
