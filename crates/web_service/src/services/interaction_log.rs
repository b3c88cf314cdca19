//! Bounded JSON-array log of relay interactions.
//!
//! Writers are serialized behind an async mutex so concurrent relay requests
//! cannot lose each other's entries in the read-append-write cycle. The file
//! is replaced through a sibling temp file and a rename.

use std::path::{Path, PathBuf};

use jarvis_core::LogEntry;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize log entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct InteractionLog {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl InteractionLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Entries in insertion order, oldest first.
    async fn load(&self) -> Result<Vec<LogEntry>, LogError> {
        match fs::read(&self.path).await {
            Ok(content) if content.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(content) => match serde_json::from_slice::<Vec<LogEntry>>(&content) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Interaction log is unreadable, starting a fresh one"
                    );
                    Ok(Vec::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn persist(&self, entries: &[LogEntry]) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let replaced = match fs::write(&tmp, json).await {
            Ok(()) => fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = replaced {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }
        Ok(())
    }

    /// Append one entry, dropping the oldest ones beyond capacity.
    pub async fn append(&self, entry: LogEntry) -> Result<(), LogError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        entries.push(entry);
        if entries.len() > self.capacity {
            let overflow = entries.len() - self.capacity;
            entries.drain(..overflow);
        }
        self.persist(&entries).await?;

        tracing::debug!(
            path = %self.path.display(),
            count = entries.len(),
            "Interaction log updated"
        );
        Ok(())
    }

    /// Entries newest first.
    pub async fn recent(&self) -> Result<Vec<LogEntry>, LogError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.reverse();
        Ok(entries)
    }
}
