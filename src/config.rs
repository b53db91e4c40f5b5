// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime Configuration
//!
//! Selects the event store backend and tunes the event bus and command retry
//! policy. Values come from the environment:
//!
//! | Variable                       | Default  | Meaning                                  |
//! |--------------------------------|----------|------------------------------------------|
//! | `KANBAN_STORE`                 | `memory` | `memory` or `file`                       |
//! | `KANBAN_STORE_PATH`            | -        | event file, required when `file`         |
//! | `KANBAN_EVENT_BUS_CAPACITY`    | `1024`   | events buffered per bus subscriber       |
//! | `KANBAN_MAX_COMMAND_ATTEMPTS`  | `3`      | attempts per command on write conflicts  |

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{KanbanError, KanbanResult};
use crate::event_bus::{self, EventBus};
use crate::event_store::{EventStore, FileEventStore, InMemoryEventStore, PublishingEventStore};
use crate::repository::{self, Repository};

/// Store wired by [`open_store`]: the configured backend behind a publisher
pub type KanbanStore = PublishingEventStore<Arc<dyn EventStore>>;

/// Event store backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File { path: PathBuf },
}

/// Kanban runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    pub store: StoreBackend,
    pub event_bus_capacity: usize,
    pub max_command_attempts: u32,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            event_bus_capacity: event_bus::DEFAULT_CAPACITY,
            max_command_attempts: repository::DEFAULT_MAX_COMMAND_ATTEMPTS,
        }
    }
}

impl KanbanConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> KanbanResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> KanbanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store = match lookup("KANBAN_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreBackend::Memory,
            Some("file") => {
                let path = lookup("KANBAN_STORE_PATH")
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| {
                        KanbanError::Configuration(
                            "KANBAN_STORE_PATH must be set when KANBAN_STORE=file".to_string(),
                        )
                    })?;
                StoreBackend::File { path: path.into() }
            }
            Some(other) => {
                return Err(KanbanError::Configuration(format!(
                    "KANBAN_STORE must be 'memory' or 'file', got '{other}'"
                )));
            }
        };

        let event_bus_capacity =
            parse_positive(&lookup, "KANBAN_EVENT_BUS_CAPACITY", defaults.event_bus_capacity)?;
        let max_command_attempts = parse_positive(
            &lookup,
            "KANBAN_MAX_COMMAND_ATTEMPTS",
            defaults.max_command_attempts,
        )?;

        Ok(Self {
            store,
            event_bus_capacity,
            max_command_attempts,
        })
    }

    /// Repository over `store` using this configuration's retry policy
    pub fn repository<S: EventStore + ?Sized>(&self, store: Arc<S>) -> Repository<S> {
        Repository::new(store).with_max_command_attempts(self.max_command_attempts)
    }
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> KanbanResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(KanbanError::Configuration(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}

/// Build the configured event store, publishing committed events on a fresh bus
pub async fn open_store(config: &KanbanConfig) -> KanbanResult<Arc<KanbanStore>> {
    let inner: Arc<dyn EventStore> = match &config.store {
        StoreBackend::Memory => Arc::new(InMemoryEventStore::new()),
        StoreBackend::File { path } => Arc::new(FileEventStore::open(path.clone()).await?),
    };
    info!(backend = ?config.store, "Event store ready");

    let bus = EventBus::new(config.event_bus_capacity);
    Ok(Arc::new(PublishingEventStore::new(inner, bus)))
}
