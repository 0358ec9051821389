use async_trait::async_trait;
use toeic_core::model::{
    AnswerChoice, AnsweredBlank, BlankQuestion, CompletionPassage, CompletionPassageRecord,
    ExerciseKind, Options,
};

use super::{
    Exercise, ItemOutcome, PassageQuestion, PracticeContext, SkipReason, TopicPick,
    answer_passage,
};
use crate::format::rule;
use crate::prompts;

/// Part 6: a short passage with three blanks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCompletion;

impl PassageQuestion for BlankQuestion {
    fn heading(&self) -> String {
        format!("Question {}:", self.blank_number)
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn correct_answer(&self) -> AnswerChoice {
        self.correct_answer
    }

    fn explanation(&self) -> &str {
        &self.explanation
    }
}

#[async_trait]
impl Exercise for TextCompletion {
    type Record = CompletionPassageRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::TextCompletion
    }

    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<CompletionPassageRecord> {
        let passage_type = pick.subtype_or("Notice");
        let prompt = prompts::text_completion(&pick.topic, passage_type);
        let Some(parsed) = ctx
            .request("passage", &prompt, CompletionPassage::placeholder)
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let placeholder = parsed.is_fallback();
        let passage = parsed.into_inner();

        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("Topic: {} | Type: {passage_type}\n", pick.topic));
        ctx.say(&format!("Title: {}\n", passage.passage_title));
        ctx.say(&passage.passage_text);
        ctx.say(&format!("\n{}", rule()));

        let (answered, quit) = answer_passage(ctx, &passage.questions).await;
        let record = CompletionPassageRecord {
            topic: pick.topic.clone(),
            passage_type: passage_type.to_string(),
            passage_title: passage.passage_title.clone(),
            answers: answered
                .into_iter()
                .map(|(question, answer)| AnsweredBlank::new(question, answer))
                .collect(),
            placeholder,
        };

        if quit {
            ItemOutcome::Quit((!record.answers.is_empty()).then_some(record))
        } else {
            ItemOutcome::Completed(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::exercises::test_support::context;
    use crate::model_client::ScriptedModel;
    use toeic_core::model::{ItemRecord, Tally};

    fn reply() -> String {
        serde_json::json!({
            "passage_title": "New Parking Policy",
            "passage_text": "Starting Monday, ___ employees must ___ a permit ___ parking.",
            "questions": [
                {"blank_number": 1, "options": ["all", "every", "each", "any"], "correct_answer": "A", "explanation": "Plural noun."},
                {"blank_number": 2, "options": ["display", "displays", "displayed", "displaying"], "correct_answer": "A", "explanation": "Base form after must."},
                {"blank_number": 3, "options": ["before", "during", "for", "while"], "correct_answer": "C", "explanation": "Purpose."}
            ],
            "passage_type": "Memo",
            "topic": "Notices"
        })
        .to_string()
    }

    #[tokio::test]
    async fn scores_every_blank() {
        let (mut ctx, transcript) = context(
            ScriptedModel::new().reply(reply()),
            ScriptedConsole::new(["a", "b", "c"]),
        );
        let pick = TopicPick::new("Notices", Some("Memo".into()));
        let ItemOutcome::Completed(record) = TextCompletion.run_item(&mut ctx, &pick).await else {
            panic!("expected a completed passage");
        };
        assert_eq!(record.tally(), Tally::new(2, 3));
        assert_eq!(record.passage_type, "Memo");
        assert!(transcript.contains("Topic: Notices | Type: Memo"));
    }

    #[tokio::test]
    async fn quitting_midway_keeps_answered_blanks() {
        let (mut ctx, _) = context(
            ScriptedModel::new().reply(reply()),
            ScriptedConsole::new(["a", "q"]),
        );
        let pick = TopicPick::new("Notices", Some("Memo".into()));
        let ItemOutcome::Quit(Some(record)) = TextCompletion.run_item(&mut ctx, &pick).await else {
            panic!("expected a partial passage");
        };
        assert_eq!(record.answers.len(), 1);
        assert_eq!(record.tally(), Tally::new(1, 1));
    }

    #[tokio::test]
    async fn quitting_at_first_blank_keeps_nothing() {
        let (mut ctx, _) = context(
            ScriptedModel::new().reply(reply()),
            ScriptedConsole::new(["q"]),
        );
        let pick = TopicPick::new("Notices", None);
        assert_eq!(
            TextCompletion.run_item(&mut ctx, &pick).await,
            ItemOutcome::Quit(None)
        );
    }
}
