// Copyright (c) 2025 - Cowboy AI, Inc.
//! Committed Event Bus
//!
//! In-process fan-out of events that an event store has committed. Each bus
//! belongs to one store instance (see
//! [`PublishingEventStore`](crate::event_store::PublishingEventStore)); there
//! is no process-global bus.
//!
//! The bus is a bounded `tokio::sync::broadcast` channel. Subscribers that
//! fall more than `capacity` events behind skip the oldest events and are
//! told how many they missed.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Audit;
//!
//! #[async_trait]
//! impl EventHandler for Audit {
//!     fn name(&self) -> &str { "audit" }
//!
//!     fn accepts(&self, event: &DomainEvent) -> bool {
//!         event.event_name() == "WorkItemRetired"
//!     }
//!
//!     async fn handle(&self, event: DomainEvent) -> KanbanResult<()> {
//!         println!("retired on {}", event.aggregate_id());
//!         Ok(())
//!     }
//! }
//!
//! let bus = EventBus::new(256);
//! bus.run_handler(Arc::new(Audit));
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::errors::KanbanResult;
use crate::events::DomainEvent;

/// Default number of events buffered per subscriber
pub const DEFAULT_CAPACITY: usize = 1024;

/// Trait for handlers of committed events
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Whether this handler wants the event; defaults to every event
    fn accepts(&self, _event: &DomainEvent) -> bool {
        true
    }

    /// Handle one committed event
    async fn handle(&self, event: DomainEvent) -> KanbanResult<()>;
}

/// Broadcast channel of committed events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish committed events in order
    ///
    /// Returns the number of subscribers that were live at the time.
    /// Publishing with no subscribers drops the events.
    pub fn publish(&self, events: &[DomainEvent]) -> usize {
        let receivers = self.sender.receiver_count();
        if receivers == 0 {
            return 0;
        }
        for event in events {
            if self.sender.send(event.clone()).is_err() {
                return 0;
            }
        }
        debug!(count = events.len(), receivers, "Published committed events");
        receivers
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Run a handler on its own task until the bus is dropped
    ///
    /// The subscription is taken before this returns, so events published
    /// afterwards are never missed. Handler errors are logged and do not
    /// stop the task.
    pub fn run_handler<H>(&self, handler: Arc<H>) -> JoinHandle<()>
    where
        H: EventHandler + 'static,
    {
        let mut receiver = self.subscribe();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if !handler.accepts(&event) {
                            continue;
                        }
                        let event_name = event.event_name();
                        let aggregate_id = event.aggregate_id();
                        if let Err(e) = handler.handle(event).await {
                            error!(
                                handler = handler.name(),
                                event_name,
                                %aggregate_id,
                                "Handler error: {}",
                                e
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(handler = handler.name(), skipped, "Handler lagged behind event bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!(handler = handler.name(), "Event bus closed, handler stopped");
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
