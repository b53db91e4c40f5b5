// Copyright (c) 2025 - Cowboy AI, Inc.
//! Aggregate Repository
//!
//! Loads aggregates from an [`EventStore`] and commits their pending changes
//! back with optimistic concurrency.
//!
//! # Transaction Semantics
//!
//! [`Repository::execute`] runs one command as a transaction:
//! 1. Load the event stream
//! 2. Replay it into the aggregate
//! 3. Run the command (validate, raise, apply)
//! 4. Append pending changes with the loaded version as `expected_version`
//!
//! If step 4 loses a race (`ConcurrentWrite`), the whole transaction is
//! retried from step 1 up to `max_command_attempts` times. Any other failure
//! ends the transaction.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::errors::{DomainResult, KanbanResult};
use crate::event_store::EventStore;

/// Default attempts for [`Repository::execute`]
pub const DEFAULT_MAX_COMMAND_ATTEMPTS: u32 = 3;

/// Loads and saves event-sourced aggregates
pub struct Repository<S: ?Sized> {
    store: Arc<S>,
    max_command_attempts: u32,
}

impl<S: ?Sized> Clone for Repository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_command_attempts: self.max_command_attempts,
        }
    }
}

impl<S: EventStore + ?Sized> Repository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_command_attempts: DEFAULT_MAX_COMMAND_ATTEMPTS,
        }
    }

    /// Total attempts `execute` makes before giving up on conflicts (minimum 1)
    pub fn with_max_command_attempts(mut self, attempts: u32) -> Self {
        self.max_command_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Replay an aggregate from its full stream
    pub async fn load<A: Aggregate>(&self, aggregate_id: Uuid) -> KanbanResult<A> {
        let stream = self.store.load_stream(aggregate_id).await?;
        let aggregate = A::load(&stream)?;
        debug!(kind = A::KIND, %aggregate_id, version = stream.version(), "Loaded aggregate");
        Ok(aggregate)
    }

    /// Commit pending changes and advance the aggregate's version
    ///
    /// On failure the aggregate keeps its pending changes and version. A
    /// discarded aggregate can still be saved so its discard event is committed.
    pub async fn save<A: Aggregate>(&self, aggregate: &mut A) -> KanbanResult<u64> {
        let root = aggregate.root();
        let aggregate_id = root.raw_id();
        let expected_version = root.committed_version();
        let changes = root.changes();

        let version = self
            .store
            .append_to_stream(aggregate_id, expected_version, changes)
            .await?;

        debug!(
            kind = A::KIND,
            %aggregate_id,
            committed = changes.len(),
            version,
            "Saved aggregate"
        );
        aggregate.root_mut().mark_committed(version);
        Ok(version)
    }

    /// Load, run `command`, and save; retried on concurrency conflicts
    ///
    /// Returns the committed aggregate together with the command's output.
    pub async fn execute<A, T, F>(&self, aggregate_id: Uuid, mut command: F) -> KanbanResult<(A, T)>
    where
        A: Aggregate,
        F: FnMut(&mut A) -> DomainResult<T>,
    {
        let mut attempt = 1;
        loop {
            let mut aggregate: A = self.load(aggregate_id).await?;
            let output = command(&mut aggregate)?;

            match self.save(&mut aggregate).await {
                Ok(_) => return Ok((aggregate, output)),
                Err(e) if e.is_retryable() && attempt < self.max_command_attempts => {
                    warn!(
                        kind = A::KIND,
                        %aggregate_id,
                        attempt,
                        "Retrying command after concurrent write: {}",
                        e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
