//! Scored items as they are stored in the history document.

mod reading;
mod writing;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use reading::{
    AnsweredBlank, AnsweredQuestion, CompletionPassageRecord, QuestionRecord, ReadingPassageRecord,
};
pub use writing::{EmailResponseRecord, EssayRecord, PictureSentenceRecord};

/// A `(score, attempted)` pair.
///
/// For multiple-choice kinds `score` counts correct answers; for writing kinds
/// it sums overall rubric bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub score: u32,
    pub attempted: u32,
}

impl Tally {
    #[must_use]
    pub fn new(score: u32, attempted: u32) -> Self {
        Self { score, attempted }
    }

    /// A single answer, scored 1 when correct.
    #[must_use]
    pub fn answer(is_correct: bool) -> Self {
        Self::new(u32::from(is_correct), 1)
    }

    pub fn add(&mut self, other: Tally) {
        self.score = self.score.saturating_add(other.score);
        self.attempted = self.attempted.saturating_add(other.attempted);
    }

    /// Percentage of correct answers, `None` when nothing was attempted.
    #[must_use]
    pub fn accuracy_percent(self) -> Option<f64> {
        self.average().map(|ratio| ratio * 100.0)
    }

    /// Mean score per attempt, `None` when nothing was attempted.
    #[must_use]
    pub fn average(self) -> Option<f64> {
        (self.attempted > 0).then(|| f64::from(self.score) / f64::from(self.attempted))
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Self {
        iter.fold(Tally::default(), |mut acc, t| {
            acc.add(t);
            acc
        })
    }
}

/// A labelled slice of an item's tally, used for per-topic statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub dimension: &'static str,
    pub label: String,
    pub tally: Tally,
}

impl Facet {
    #[must_use]
    pub fn new(dimension: &'static str, label: impl Into<String>, tally: Tally) -> Self {
        Self {
            dimension,
            label: label.into(),
            tally,
        }
    }
}

/// Behaviour shared by every stored item kind.
pub trait ItemRecord {
    /// Contribution of this item to the session counters.
    fn tally(&self) -> Tally;

    /// Statistics slices this item contributes to.
    fn facets(&self) -> Vec<Facet>;

    /// Whether any part of the item came from placeholder content.
    fn is_placeholder(&self) -> bool;
}

/// Item types that can live in a history document.
pub trait StoredItem:
    ItemRecord + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
}

impl<T> StoredItem for T where
    T: ItemRecord + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_ratios() {
        let t = Tally::new(3, 4);
        assert_eq!(t.accuracy_percent(), Some(75.0));
        assert_eq!(Tally::default().average(), None);
    }

    #[test]
    fn tallies_sum() {
        let total: Tally = [Tally::answer(true), Tally::answer(false), Tally::new(4, 1)]
            .into_iter()
            .sum();
        assert_eq!(total, Tally::new(5, 3));
    }
}
