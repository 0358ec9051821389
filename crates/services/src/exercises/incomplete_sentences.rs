use async_trait::async_trait;
use toeic_core::model::{ExerciseKind, QuestionRecord, SentenceQuestion};

use super::{Exercise, ItemOutcome, PracticeContext, SkipReason, TopicPick, show_options};
use crate::format::rule;
use crate::input::{ChoiceInput, ask_choice};
use crate::prompts;

/// Part 5: one sentence, one blank, four options.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncompleteSentences;

#[async_trait]
impl Exercise for IncompleteSentences {
    type Record = QuestionRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::IncompleteSentences
    }

    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<QuestionRecord> {
        let prompt = prompts::incomplete_sentence(&pick.topic);
        let Some(parsed) = ctx
            .request("question", &prompt, SentenceQuestion::placeholder)
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let placeholder = parsed.is_fallback();
        let question = parsed.into_inner();

        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("Topic: {}\n", pick.topic));
        ctx.say(&question.sentence);
        ctx.say("\nOptions:");
        show_options(ctx, &question.options);
        ctx.say(&rule());

        let answer = match ask_choice(ctx.console(), "\nYour answer (A/B/C/D or 'q' to quit): ").await
        {
            ChoiceInput::Answer(answer) => answer,
            ChoiceInput::Quit => return ItemOutcome::Quit(None),
        };

        let record = QuestionRecord::answered(&pick.topic, &question, answer, placeholder);
        let verdict = if record.is_correct {
            "Correct!"
        } else {
            "Incorrect!"
        };
        ctx.say(&format!(
            "\n{verdict} The correct answer is {}.",
            question.correct_answer
        ));
        if !question.explanation.is_empty() {
            ctx.say(&format!("\nExplanation: {}", question.explanation));
        }
        ItemOutcome::Completed(record)
    }
}
