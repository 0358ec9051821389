use toeic_core::model::{HistoryDocument, SessionRecord, Tally};
use tracing::{info, warn};

use storage::HistoryStore;

use super::plan::{SessionLength, SessionPlan};
use crate::error::SessionError;
use crate::exercises::{Exercise, ItemOutcome, PracticeContext, SkipReason};
use crate::format::{self, rule};
use crate::input::{confirm, pause};

/// What a finished session produced.
#[derive(Debug)]
pub struct SessionOutcome {
    pub tally: Tally,
    /// Items stored in the session record.
    pub recorded: usize,
    pub skipped: usize,
    pub ended_early: bool,
    /// Result of writing the history document. A failure is reported but
    /// does not undo the session.
    pub persisted: Result<(), SessionError>,
}

impl SessionOutcome {
    #[must_use]
    pub fn saved(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Drives one exercise through a whole session: loop, tally, persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRunner<E> {
    exercise: E,
}

impl<E: Exercise> SessionRunner<E> {
    #[must_use]
    pub fn new(exercise: E) -> Self {
        Self { exercise }
    }

    /// Run items until the plan is exhausted or the user stops, then append
    /// the session to `history` and save it through `store`.
    pub async fn run(
        &self,
        ctx: &mut PracticeContext,
        history: &mut HistoryDocument<E::Record>,
        store: &dyn HistoryStore<E::Record>,
        plan: &SessionPlan,
    ) -> SessionOutcome {
        let kind = self.exercise.kind();
        let noun = kind.item_noun();
        let mut session = SessionRecord::new(
            ctx.clock().now(),
            plan.topic.clone(),
            plan.subtype.clone(),
        );
        let mut skipped = 0;
        info!(kind = %kind, length = ?plan.length, "session started");

        let mut index = 0u32;
        loop {
            index += 1;
            match plan.length {
                SessionLength::Fixed(total) if index > total => break,
                SessionLength::Fixed(total) => {
                    ctx.say(&format!("\nGenerating {noun} {index}/{total}..."));
                }
                SessionLength::OpenEnded => ctx.say(&format!("\nGenerating {noun}...")),
            }

            let pick = plan.pick(kind, ctx.rng());
            let completed = match self.exercise.run_item(ctx, &pick).await {
                ItemOutcome::Completed(item) => {
                    session.record(item);
                    true
                }
                ItemOutcome::Quit(partial) => {
                    if let Some(item) = partial {
                        session.record(item);
                    }
                    session.mark_ended_early();
                    ctx.say("\nSession ended early.");
                    break;
                }
                ItemOutcome::Skipped(reason) => {
                    skipped += 1;
                    warn!(kind = %kind, ?reason, topic = %pick.topic, "item skipped");
                    match reason {
                        SkipReason::Generation => {
                            ctx.say(&format!("Failed to generate {noun}. Skipping..."));
                        }
                        SkipReason::Evaluation => {
                            ctx.say("Failed to evaluate your response. Skipping...");
                        }
                        SkipReason::EmptySubmission => {}
                    }
                    false
                }
            };

            match plan.length {
                SessionLength::Fixed(total) => {
                    if completed && index < total {
                        let prompt = format!("\nPress Enter for the next {noun}...");
                        if !pause(ctx.console(), &prompt).await {
                            session.mark_ended_early();
                            break;
                        }
                    }
                }
                SessionLength::OpenEnded => {
                    let prompt = format!("\nWould you like to practice another {noun}? (y/n): ");
                    if !confirm(ctx.console(), &prompt).await {
                        break;
                    }
                }
            }
        }

        let tally = session.tally();
        let recorded = session.items().len();
        let ended_early = session.ended_early();
        history.append(session);

        let persisted = store.save(history).await.map_err(SessionError::from);
        match &persisted {
            Ok(()) => ctx.say("\nYour progress has been saved."),
            Err(err) => {
                warn!(kind = %kind, error = %err, "could not save history");
                ctx.say(&format!("\nWarning: could not save your progress: {err}"));
            }
        }

        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("Session Summary: {}", format::tally(kind.scale(), tally)));
        if skipped > 0 {
            ctx.say(&format!("Skipped: {skipped}"));
        }
        ctx.say(&rule());
        info!(
            kind = %kind,
            score = tally.score,
            attempted = tally.attempted,
            skipped,
            ended_early,
            "session finished"
        );

        SessionOutcome {
            tally,
            recorded,
            skipped,
            ended_early,
            persisted,
        }
    }
}
