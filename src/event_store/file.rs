// Copyright (c) 2025 - Cowboy AI, Inc.
//! File-Backed Event Store
//!
//! Persists every committed event as one [`EventRecord`] per line (JSON
//! lines) in an append-only file. The file is read once on [`FileEventStore::open`]
//! to rebuild the in-memory index; afterwards reads are served from the index
//! and appends go to both.
//!
//! A record counts as written once its terminating newline is on disk. A
//! failed append cuts the file back to its previous length; if even that
//! fails the store refuses further appends until it is reopened. On open, an
//! unterminated trailing line left by a torn write is dropped.
//!
//! ```text
//! {"aggregateId":"…","eventName":"BoardCreated","timestamp":1768824000000,"payload":{…}}
//! {"aggregateId":"…","eventName":"ColumnAdded","timestamp":1768824000001,"payload":{…}}
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{EventStore, StreamIndex};
use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, EventRecord, EventStream};

/// Append-only JSON-lines event store
#[derive(Debug)]
pub struct FileEventStore {
    path: PathBuf,
    index: RwLock<StreamIndex>,
    poisoned: AtomicBool,
}

impl FileEventStore {
    /// Open an existing event file or prepare a new one
    ///
    /// Missing parent directories are created. Blank lines are skipped and an
    /// unterminated last line is truncated away.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Serialization` if a
    /// complete line is not a valid record.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut index = StreamIndex::default();
        let mut records = 0usize;

        if fs::try_exists(&path).await? {
            let bytes = fs::read(&path).await?;
            let complete = bytes.iter().rposition(|b| *b == b'\n').map_or(0, |end| end + 1);
            if complete < bytes.len() {
                warn!(
                    path = %path.display(),
                    bytes = bytes.len() - complete,
                    "Dropping unterminated trailing record"
                );
                let file = OpenOptions::new().write(true).open(&path).await?;
                truncate_to(&file, complete as u64).await?;
            }

            let content = std::str::from_utf8(&bytes[..complete]).map_err(|e| {
                StoreError::Serialization(format!("{}: {e}", path.display()))
            })?;
            for (number, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record: EventRecord = serde_json::from_str(line).map_err(|e| {
                    StoreError::Serialization(format!(
                        "{}:{}: {e}",
                        path.display(),
                        number + 1
                    ))
                })?;
                index.push(record);
                records += 1;
            }
        } else if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        info!(
            path = %path.display(),
            records,
            streams = index.stream_count(),
            "Opened file event store"
        );

        Ok(Self {
            path,
            index: RwLock::new(index),
            poisoned: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.poisoned.load(Ordering::Acquire) {
            return Err(StoreError::Poisoned(self.path.display().to_string()));
        }
        Ok(())
    }

    /// Append all lines or none of them
    async fn write_lines(&self, records: &[EventRecord]) -> StoreResult<()> {
        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let length = file.metadata().await?.len();

        if let Err(e) = write_and_sync(&mut file, buffer.as_bytes()).await {
            self.roll_back(&file, length).await?;
            return Err(e.into());
        }
        Ok(())
    }

    async fn roll_back(&self, file: &File, length: u64) -> StoreResult<()> {
        if let Err(e) = truncate_to(file, length).await {
            self.poisoned.store(true, Ordering::Release);
            error!(path = %self.path.display(), length, "Rollback of failed append failed: {}", e);
            return Err(StoreError::Poisoned(self.path.display().to_string()));
        }
        warn!(path = %self.path.display(), length, "Rolled back failed append");
        Ok(())
    }
}

async fn write_and_sync(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_data().await
}

async fn truncate_to(file: &File, length: u64) -> io::Result<()> {
    file.set_len(length).await?;
    file.sync_data().await
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn load_stream(&self, aggregate_id: Uuid) -> StoreResult<EventStream> {
        let stream = self.index.read().await.stream(aggregate_id)?;
        debug!(%aggregate_id, version = stream.version(), "Loaded stream");
        Ok(stream)
    }

    async fn append_to_stream(
        &self,
        aggregate_id: Uuid,
        expected_version: u64,
        events: &[DomainEvent],
    ) -> StoreResult<u64> {
        let mut index = self.index.write().await;
        self.ensure_writable()?;
        let records = index.prepare(aggregate_id, expected_version, events)?;

        if !records.is_empty() {
            self.write_lines(&records).await?;
        }
        let version = index.commit(aggregate_id, records);

        debug!(%aggregate_id, count = events.len(), version, "Appended events");
        Ok(version)
    }

    async fn current_version(&self, aggregate_id: Uuid) -> StoreResult<u64> {
        Ok(self.index.read().await.version(aggregate_id))
    }
}
