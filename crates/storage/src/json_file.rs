//! History documents stored as pretty-printed JSON files.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use toeic_core::model::{HistoryDocument, StoredItem};
use tracing::{debug, error, info, warn};

use crate::repository::{HistoryStore, StorageError};

/// File-backed [`HistoryStore`].
///
/// Saves go through a sibling temp file renamed over the target, so a crash
/// mid-write leaves the previous document intact. There is no locking;
/// concurrent processes writing the same file race and the last rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore<I> {
    path: PathBuf,
    _items: PhantomData<fn() -> I>,
}

impl<I> JsonFileStore<I> {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _items: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable document is copied before it is replaced.
    #[must_use]
    pub fn corrupt_backup_path(&self) -> PathBuf {
        sibling(&self.path, ".corrupt")
    }

    async fn back_up(&self, bytes: &[u8]) {
        let backup = self.corrupt_backup_path();
        match fs::write(&backup, bytes).await {
            Ok(()) => warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                "history file is corrupt or in an older format (for example one with \
                 total_correct/total_questions keys); moved it to the backup file and \
                 started an empty history"
            ),
            Err(err) => warn!(
                backup = %backup.display(),
                error = %err,
                "could not back up corrupt history file"
            ),
        }
    }

    /// An existing document that cannot be read must survive the save.
    async fn ensure_replaceable(&self) -> Result<(), StorageError> {
        match fs::read(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl<I: StoredItem> HistoryStore<I> for JsonFileStore<I> {
    async fn load(&self) -> HistoryDocument<I> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return HistoryDocument::default();
            }
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    error = %err,
                    "history file unreadable; it will not be overwritten"
                );
                return HistoryDocument::default();
            }
        };

        match serde_json::from_slice::<HistoryDocument<I>>(&bytes) {
            Ok(mut document) => {
                if document.reconcile() {
                    warn!(path = %self.path.display(), "history totals did not match sessions; recounted");
                }
                document
            }
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "history file did not decode");
                self.back_up(&bytes).await;
                HistoryDocument::default()
            }
        }
    }

    async fn save(&self, document: &HistoryDocument<I>) -> Result<(), StorageError> {
        self.ensure_replaceable().await?;
        let json = serde_json::to_vec_pretty(document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = sibling(&self.path, ".tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        info!(
            path = %self.path.display(),
            sessions = document.sessions().len(),
            "history saved"
        );
        Ok(())
    }
}
