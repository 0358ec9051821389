use serde::{Deserialize, Serialize};

use crate::model::records::{ItemRecord, Tally};
use crate::model::session::SessionRecord;

/// All past sessions of one exercise kind plus running totals.
///
/// Invariant: `total_score` and `total_attempted` equal the sums over
/// `sessions`. [`HistoryDocument::append`] keeps it; documents read from disk
/// are repaired with [`HistoryDocument::reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument<I> {
    #[serde(default = "Vec::new")]
    sessions: Vec<SessionRecord<I>>,
    #[serde(default)]
    total_score: u32,
    #[serde(default)]
    total_attempted: u32,
}

impl<I> Default for HistoryDocument<I> {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            total_score: 0,
            total_attempted: 0,
        }
    }
}

impl<I> HistoryDocument<I> {
    #[must_use]
    pub fn sessions(&self) -> &[SessionRecord<I>] {
        &self.sessions
    }

    #[must_use]
    pub fn totals(&self) -> Tally {
        Tally::new(self.total_score, self.total_attempted)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<I: ItemRecord> HistoryDocument<I> {
    /// Append a finished session and fold its counters into the totals.
    pub fn append(&mut self, session: SessionRecord<I>) {
        let tally = session.tally();
        self.total_score = self.total_score.saturating_add(tally.score);
        self.total_attempted = self.total_attempted.saturating_add(tally.attempted);
        self.sessions.push(session);
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sum: Tally = self.sessions.iter().map(SessionRecord::tally).sum();
        sum == self.totals()
    }

    /// Recount every session from its items, then the totals from the sessions.
    ///
    /// Returns `true` when anything had to be corrected.
    pub fn reconcile(&mut self) -> bool {
        let mut changed = false;
        for session in &mut self.sessions {
            changed |= session.recount();
        }
        let sum: Tally = self.sessions.iter().map(SessionRecord::tally).sum();
        if sum != self.totals() {
            self.total_score = sum.score;
            self.total_attempted = sum.attempted;
            changed = true;
        }
        changed
    }
}
