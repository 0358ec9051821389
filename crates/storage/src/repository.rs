use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use toeic_core::model::{HistoryDocument, StoredItem};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("history file {} exists but cannot be read; not overwriting it", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Load/save contract for one exercise kind's history document.
///
/// Loading never fails: a missing or unreadable document yields the empty
/// default so a practice session can always start.
#[async_trait]
pub trait HistoryStore<I: StoredItem>: Send + Sync {
    /// Read the stored document, or the empty default.
    async fn load(&self) -> HistoryDocument<I>;

    /// Replace the stored document wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be serialized or written,
    /// or if an existing document cannot be read and would be lost.
    async fn save(&self, document: &HistoryDocument<I>) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone)]
pub struct InMemoryHistory<I> {
    document: Arc<Mutex<HistoryDocument<I>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: bool,
}

impl<I: StoredItem> Default for InMemoryHistory<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: StoredItem> InMemoryHistory<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(HistoryDocument::default())
    }

    /// Start from an existing document.
    #[must_use]
    pub fn seeded(document: HistoryDocument<I>) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            saves: Arc::new(AtomicUsize::new(0)),
            fail_saves: false,
        }
    }

    /// A store whose `save` always fails, for exercising error paths.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::new()
        }
    }

    /// Copy of the currently stored document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn snapshot(&self) -> Result<HistoryDocument<I>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I: StoredItem> HistoryStore<I> for InMemoryHistory<I> {
    async fn load(&self) -> HistoryDocument<I> {
        self.snapshot().unwrap_or_default()
    }

    async fn save(&self, document: &HistoryDocument<I>) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Connection("store is read-only".into()));
        }
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toeic_core::model::{AnswerChoice, QuestionRecord, SessionRecord, Tally};
    use toeic_core::time::fixed_now;

    fn one_question_session() -> SessionRecord<QuestionRecord> {
        let mut session = SessionRecord::new(fixed_now(), None, None);
        session.record(QuestionRecord {
            topic: "Office issues".into(),
            sentence: "s".into(),
            user_answer: AnswerChoice::A,
            correct_answer: AnswerChoice::A,
            is_correct: true,
            placeholder: false,
        });
        session
    }

    #[tokio::test]
    async fn round_trips_document() {
        let store = InMemoryHistory::new();
        let mut doc = store.load().await;
        assert!(doc.is_empty());

        doc.append(one_question_session());
        store.save(&doc).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.totals(), Tally::new(1, 1));
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn failing_store_reports_error_and_keeps_old_document() {
        let store = InMemoryHistory::<QuestionRecord>::failing();
        let mut doc = HistoryDocument::default();
        doc.append(one_question_session());
        assert!(store.save(&doc).await.is_err());
        assert!(store.load().await.is_empty());
        assert_eq!(store.save_count(), 0);
    }
}
