//! Aggregated statistics over one kind's history document.

use chrono::{DateTime, Utc};
use toeic_core::model::{ExerciseKind, HistoryDocument, ItemRecord, ScoreScale, Tally};

/// Number of sessions listed under "recent".
pub const RECENT_SESSIONS: usize = 5;

/// Tallies grouped by one facet dimension, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub dimension: &'static str,
    pub rows: Vec<(String, Tally)>,
}

impl Breakdown {
    fn add(&mut self, label: &str, tally: Tally) {
        match self.rows.iter_mut().find(|(l, _)| l == label) {
            Some((_, total)) => total.add(tally),
            None => self.rows.push((label.to_string(), tally)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSession {
    /// 1-based position in the history document.
    pub number: usize,
    pub started_at: DateTime<Utc>,
    pub topic: Option<String>,
    pub subtype: Option<String>,
    pub items: usize,
    pub tally: Tally,
    pub ended_early: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeStats {
    pub kind: ExerciseKind,
    pub sessions: usize,
    pub items: usize,
    pub totals: Tally,
    /// Items that contain placeholder content.
    pub placeholder_items: usize,
    pub breakdowns: Vec<Breakdown>,
    /// Newest first.
    pub recent: Vec<RecentSession>,
}

impl PracticeStats {
    #[must_use]
    pub fn scale(&self) -> ScoreScale {
        self.kind.scale()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions == 0
    }
}

/// Summarize every session of `history`.
#[must_use]
pub fn compute<I: ItemRecord>(kind: ExerciseKind, history: &HistoryDocument<I>) -> PracticeStats {
    let mut breakdowns: Vec<Breakdown> = Vec::new();
    let mut items = 0;
    let mut placeholder_items = 0;

    for session in history.sessions() {
        for item in session.items() {
            items += 1;
            if item.is_placeholder() {
                placeholder_items += 1;
            }
            for facet in item.facets() {
                let index = match breakdowns.iter().position(|b| b.dimension == facet.dimension) {
                    Some(index) => index,
                    None => {
                        breakdowns.push(Breakdown {
                            dimension: facet.dimension,
                            rows: Vec::new(),
                        });
                        breakdowns.len() - 1
                    }
                };
                breakdowns[index].add(&facet.label, facet.tally);
            }
        }
    }

    let recent = history
        .sessions()
        .iter()
        .enumerate()
        .rev()
        .take(RECENT_SESSIONS)
        .map(|(i, session)| RecentSession {
            number: i + 1,
            started_at: session.started_at(),
            topic: session.topic().map(str::to_string),
            subtype: session.subtype().map(str::to_string),
            items: session.items().len(),
            tally: session.tally(),
            ended_early: session.ended_early(),
        })
        .collect();

    PracticeStats {
        kind,
        sessions: history.sessions().len(),
        items,
        totals: history.totals(),
        placeholder_items,
        breakdowns,
        recent,
    }
}
