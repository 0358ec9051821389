use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::records::{ItemRecord, Tally};

/// One practice run as stored in the history document.
///
/// `score` and `attempted` always equal the sum of the items' tallies; they
/// are kept alongside the items so the file is readable on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord<I> {
    started_at: DateTime<Utc>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
    items: Vec<I>,
    score: u32,
    attempted: u32,
    #[serde(default)]
    ended_early: bool,
}

impl<I: ItemRecord> SessionRecord<I> {
    /// Start an empty session. `None` for topic or subtype means "random".
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, topic: Option<String>, subtype: Option<String>) -> Self {
        Self {
            started_at,
            topic,
            subtype,
            items: Vec::new(),
            score: 0,
            attempted: 0,
            ended_early: false,
        }
    }

    /// Append a scored item and add its tally to the counters.
    pub fn record(&mut self, item: I) {
        let tally = item.tally();
        self.score = self.score.saturating_add(tally.score);
        self.attempted = self.attempted.saturating_add(tally.attempted);
        self.items.push(item);
    }

    pub fn mark_ended_early(&mut self) {
        self.ended_early = true;
    }

    /// Recompute the counters from the stored items.
    ///
    /// Returns `true` when the stored counters were out of date.
    pub fn recount(&mut self) -> bool {
        let tally: Tally = self.items.iter().map(ItemRecord::tally).sum();
        let changed = tally != self.tally();
        self.score = tally.score;
        self.attempted = tally.attempted;
        changed
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        Tally::new(self.score, self.attempted)
    }
}

impl<I> SessionRecord<I> {
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    #[must_use]
    pub fn ended_early(&self) -> bool {
        self.ended_early
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerChoice, QuestionRecord};
    use crate::time::fixed_now;

    fn question(is_correct: bool) -> QuestionRecord {
        QuestionRecord {
            topic: "Schedules".into(),
            sentence: "s".into(),
            user_answer: AnswerChoice::A,
            correct_answer: if is_correct { AnswerChoice::A } else { AnswerChoice::C },
            is_correct,
            placeholder: false,
        }
    }

    #[test]
    fn record_accumulates_counters() {
        let mut session = SessionRecord::new(fixed_now(), Some("Schedules".into()), None);
        session.record(question(true));
        session.record(question(false));
        assert_eq!(session.tally(), Tally::new(1, 2));
        assert_eq!(session.items().len(), 2);
        assert!(!session.recount());
    }

    #[test]
    fn recount_repairs_stale_counters() {
        let mut session: SessionRecord<QuestionRecord> =
            serde_json::from_value(serde_json::json!({
                "started_at": "2023-11-14T22:13:20Z",
                "items": [question(true)],
                "score": 7,
                "attempted": 9
            }))
            .unwrap();
        assert!(session.recount());
        assert_eq!(session.tally(), Tally::new(1, 1));
        assert_eq!(session.topic(), None);
    }
}
