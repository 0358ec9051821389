use async_trait::async_trait;
use rand::Rng;
use toeic_core::model::catalog::{DOUBLE_PASSAGE, SINGLE_PASSAGE};
use toeic_core::model::{
    AnswerChoice, AnsweredQuestion, ComprehensionQuestion, ExerciseKind, Options, ReadingPassage,
    ReadingPassageRecord,
};

use super::{
    Exercise, ItemOutcome, PassageQuestion, PracticeContext, SkipReason, TopicPick,
    answer_passage,
};
use crate::format::rule;
use crate::prompts;

/// Part 7: single or double passages with comprehension questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadingComprehension;

impl PassageQuestion for ComprehensionQuestion {
    fn heading(&self) -> String {
        if self.question_type.is_empty() {
            format!("Question {}: {}", self.question_number, self.question_text)
        } else {
            format!(
                "Question {} ({}): {}",
                self.question_number, self.question_type, self.question_text
            )
        }
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

/// Five questions for a double passage, two to four for a single one.
pub fn question_count(passage_type: &str, rng: &mut impl Rng) -> usize {
    if passage_type == DOUBLE_PASSAGE {
        5
    } else {
        rng.random_range(2..=4)
    }
}

#[async_trait]
impl Exercise for ReadingComprehension {
    type Record = ReadingPassageRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::ReadingComprehension
    }

    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<ReadingPassageRecord> {
        let passage_type = pick.subtype_or(SINGLE_PASSAGE);
        let count = question_count(passage_type, ctx.rng());
        let prompt = prompts::reading_comprehension(&pick.topic, passage_type, count);
        let Some(parsed) = ctx
            .request("passage", &prompt, || {
                ReadingPassage::placeholder(passage_type, count)
            })
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let placeholder = parsed.is_fallback();
        let passage = parsed.into_inner();

        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("Topic: {} | Type: {passage_type}\n", pick.topic));
        ctx.say(&format!("Title: {}\n", passage.passage_title));
        let parts = passage.passage_text.parts();
        if parts.len() == 1 {
            ctx.say(parts[0]);
        } else {
            for (i, part) in parts.iter().enumerate() {
                ctx.say(&format!("Passage {}:\n{part}\n", i + 1));
            }
        }
        ctx.say(&format!("\n{}", rule()));

        let (answered, quit) = answer_passage(ctx, &passage.questions).await;
        let record = ReadingPassageRecord {
            topic: pick.topic.clone(),
            passage_type: passage_type.to_string(),
            passage_title: passage.passage_title.clone(),
            answers: answered
                .into_iter()
                .map(|(question, answer)| AnsweredQuestion::new(question, answer))
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
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use toeic_core::model::{ItemRecord, Tally};

    #[test]
    fn single_passages_get_two_to_four_questions() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let n = question_count(SINGLE_PASSAGE, &mut rng);
            assert!((2..=4).contains(&n));
        }
        assert_eq!(question_count(DOUBLE_PASSAGE, &mut rng), 5);
    }

    #[tokio::test]
    async fn double_passage_is_shown_in_parts() {
        let reply = serde_json::json!({
            "passage_title": "Conference Registration",
            "passage_text": ["First e-mail text.", "Reply text."],
            "questions": [
                {"question_number": 1, "question_text": "Why was the e-mail sent?", "question_type": "Main idea",
                 "options": ["a", "b", "c", "d"], "correct_answer": "B", "explanation": "Stated."},
                {"question_number": 2, "question_text": "What is implied?", "question_type": "Inference",
                 "options": ["a", "b", "c", "d"], "correct_answer": "D", "explanation": "Implied."}
            ]
        });
        let (mut ctx, transcript) = context(
            ScriptedModel::new().reply(reply.to_string()),
            ScriptedConsole::new(["b", "a"]),
        );
        let pick = TopicPick::new("E-mails and letters", Some(DOUBLE_PASSAGE.into()));
        let ItemOutcome::Completed(record) = ReadingComprehension.run_item(&mut ctx, &pick).await
        else {
            panic!("expected a completed passage");
        };
        assert_eq!(record.tally(), Tally::new(1, 2));
        assert!(transcript.contains("Passage 2:\nReply text."));
        assert!(transcript.contains("Question 2 (Inference): What is implied?"));
    }

    #[tokio::test]
    async fn fallback_passage_has_requested_question_count() {
        let (mut ctx, _) = context(
            ScriptedModel::new().reply("{}"),
            ScriptedConsole::new(["a", "a", "a", "a", "a"]),
        );
        let pick = TopicPick::new("Forms", Some(DOUBLE_PASSAGE.into()));
        let ItemOutcome::Completed(record) = ReadingComprehension.run_item(&mut ctx, &pick).await
        else {
            panic!("expected a completed passage");
        };
        assert!(record.placeholder);
        assert_eq!(record.tally(), Tally::new(5, 5));
    }
}
