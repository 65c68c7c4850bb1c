//! # Record Store
//!
//! Owns the CSV file that collects every submission. The store has exactly one
//! job at runtime: append rows without ever corrupting the file.
//!
//! ## Guarantees
//!
//! - The header row is written once, when the file is first created.
//!   Restarting against an existing file (empty or not) never adds another.
//! - Appends are serialized by a single lock owned by the store. Each row is
//!   encoded up front and written with one `write_all` while the lock is held,
//!   so concurrent requests can never interleave bytes inside a row.
//! - The file is only ever opened in append mode. A failed append is reported
//!   to the caller; nothing is dropped silently.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let store = Arc::new(RecordStore::new("data.csv"));
//! store.ensure_initialized()?;
//!
//! // From an async handler
//! store.append_blocking(record).await?;
//! ```

use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::csv::encode_row;
use super::record::{SubmissionRecord, HEADER};

/// Failure while writing to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be created, opened, or written.
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking append task died before reporting back.
    #[error("append task interrupted: {0}")]
    Interrupted(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Append-only CSV store for submission records.
///
/// Constructed once at process start and shared (via `Arc`) with every
/// request handler.
#[derive(Debug)]
pub struct RecordStore {
    /// Location of the CSV file
    path: PathBuf,
    /// Call `sync_data` after each append
    sync_writes: bool,
    /// Held for the duration of one encode-and-write; the only contention point
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a store for `path`. Nothing touches the disk until
    /// [`ensure_initialized`](Self::ensure_initialized) or [`append`](Self::append).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Toggle flushing each row to stable storage before `append` returns.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it does not exist yet.
    ///
    /// Existence alone decides: an existing file is left untouched even when
    /// it is empty. Safe to call on every start.
    ///
    /// # Returns
    /// - `Ok(true)`: The file was created and the header written
    /// - `Ok(false)`: The file already existed
    /// - `Err(StoreError::Io)`: Creation or the header write failed
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        self.initialize_with(|file| self.write_row(file, &encode_row(&HEADER)))
    }

    /// Create the file and hand it to `write_header`. If the header cannot be
    /// written, the new file is removed again so the next start retries from
    /// scratch instead of treating a headerless file as initialized.
    fn initialize_with<F>(&self, write_header: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut File) -> Result<(), StoreError>,
    {
        let _guard = self.lock();

        // create_new makes the existence check and the creation one atomic step
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("Record store {} already exists", self.path.display());
                return Ok(false);
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if let Err(e) = write_header(&mut file) {
            drop(file);
            if let Err(remove_err) = fs::remove_file(&self.path) {
                warn!(
                    "Could not remove {} after failed header write: {}",
                    self.path.display(),
                    remove_err
                );
            }
            return Err(e);
        }

        info!(
            "📄 Created {} with headers: {}",
            self.path.display(),
            HEADER.join(", ")
        );
        Ok(true)
    }

    /// Append one record as a single CSV row.
    ///
    /// Blocks while another append is in progress. The file must already
    /// exist: a store file removed while the server runs is reported as an
    /// I/O failure instead of being recreated without its header.
    pub fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        // Encoding happens outside the lock
        let row = encode_row(&record.fields());

        let _guard = self.lock();
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        self.write_row(&mut file, &row)
    }

    /// Run [`append`](Self::append) on the blocking thread pool.
    ///
    /// The spawned task owns the record, so the write completes even if the
    /// awaiting future is dropped (e.g., the client hung up mid-request).
    pub async fn append_blocking(
        self: &Arc<Self>,
        record: SubmissionRecord,
    ) -> Result<(), StoreError> {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(|e| StoreError::Interrupted(e.to_string()))?
    }

    fn write_row(&self, file: &mut File, row: &str) -> Result<(), StoreError> {
        file.write_all(row.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;
        if self.sync_writes {
            file.sync_data().map_err(|e| StoreError::io(&self.path, e))?;
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A panic while holding the lock leaves no partial state behind the
        // guard itself, so a poisoned lock is still usable
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
