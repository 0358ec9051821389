use std::time::Duration;

use async_trait::async_trait;
use toeic_core::model::catalog::ESSAY_TYPES;
use toeic_core::model::{EssayEvaluation, EssayPrompt, EssayRecord, ExerciseKind};

use super::{Exercise, ItemOutcome, PracticeContext, SkipReason, TopicPick};
use crate::format::rule;
use crate::input::{Ending, collect_text};
use crate::prompts;

pub const ESSAY_TIME_LIMIT: Duration = Duration::from_secs(30 * 60);

/// Writing Q8: a timed opinion essay.
#[derive(Debug, Clone, Copy)]
pub struct OpinionEssay {
    time_limit: Duration,
}

impl Default for OpinionEssay {
    fn default() -> Self {
        Self {
            time_limit: ESSAY_TIME_LIMIT,
        }
    }
}

impl OpinionEssay {
    #[must_use]
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

fn show_prompt(ctx: &mut PracticeContext, pick_topic: &str, essay_type: &str, prompt: &EssayPrompt) {
    ctx.say(&format!("\n{}", rule()));
    ctx.say(&format!("Topic: {pick_topic} | Essay type: {essay_type}"));
    ctx.say(&rule());
    ctx.say(&prompt.essay_prompt);
    if !prompt.key_points.is_empty() {
        ctx.say("\nKey points to consider:");
        for point in &prompt.key_points {
            ctx.say(&format!("- {point}"));
        }
    }
    if !prompt.suggested_structure.is_empty() {
        ctx.say(&format!("\nSuggested structure:\n{}", prompt.suggested_structure));
    }
    ctx.say(&format!("\n{}", rule()));
}

fn show_evaluation(ctx: &mut PracticeContext, evaluation: &EssayEvaluation) {
    ctx.say(&format!("\n{}", rule()));
    ctx.say("Essay Evaluation");
    ctx.say(&rule());
    for ((label, score), (_, feedback)) in evaluation
        .scores
        .criteria()
        .into_iter()
        .zip(evaluation.feedback())
    {
        ctx.say(&format!("{label}: {score}"));
        ctx.say(&format!("{feedback}\n"));
    }
    ctx.say(&rule());
    ctx.say(&format!("Overall Score: {}", evaluation.scores.overall_score));
    ctx.say(&evaluation.overall_feedback);
    ctx.say(&format!("\n{}", rule()));
    ctx.say("Suggested Improved Essay:");
    ctx.say(&evaluation.improved_essay);
    ctx.say(&format!("\n{}", rule()));
}

#[async_trait]
impl Exercise for OpinionEssay {
    type Record = EssayRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::OpinionEssay
    }

    async fn run_item(&self, ctx: &mut PracticeContext, pick: &TopicPick) -> ItemOutcome<EssayRecord> {
        let topic = pick.topic.as_str();
        let essay_type = pick.subtype_or(ESSAY_TYPES[0]);
        let Some(prompt) = ctx
            .request(
                "essay prompt",
                &prompts::essay_prompt(topic, essay_type),
                || EssayPrompt::placeholder(topic, essay_type),
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let mut placeholder = prompt.is_fallback();
        let prompt = prompt.into_inner();
        show_prompt(ctx, topic, essay_type, &prompt);

        let minutes = self.time_limit.as_secs().div_ceil(60);
        ctx.say("\nWrite your essay. Press Enter twice when finished.");
        ctx.say(&format!(
            "You have {minutes} minutes. Aim for about 300 words. Type 'q' alone to give up."
        ));
        let submission = collect_text(ctx.console(), self.time_limit).await;
        match submission.ending {
            Ending::Quit => return ItemOutcome::Quit(None),
            Ending::Closed if submission.text.is_empty() => return ItemOutcome::Quit(None),
            _ if submission.text.is_empty() => {
                ctx.say("No essay provided. Skipping evaluation.");
                return ItemOutcome::Skipped(SkipReason::EmptySubmission);
            }
            _ => {}
        }
        let word_count = submission.word_count();
        ctx.say(&format!("\nWord count: {word_count}"));

        ctx.say("\nEvaluating your essay...");
        let Some(evaluation) = ctx
            .request(
                "evaluation",
                &prompts::essay_evaluation(&submission.text, &prompt),
                EssayEvaluation::placeholder,
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Evaluation);
        };
        placeholder |= evaluation.is_fallback();
        let evaluation = evaluation.into_inner();
        show_evaluation(ctx, &evaluation);

        let record = EssayRecord {
            topic: topic.to_string(),
            essay_type: essay_type.to_string(),
            prompt: prompt.essay_prompt,
            user_essay: submission.text,
            word_count,
            scores: evaluation.scores,
            feedback: evaluation.overall_feedback,
            timed_out: submission.ending == Ending::TimedOut,
            placeholder,
        };
        if submission.ending == Ending::Closed {
            ItemOutcome::Quit(Some(record))
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

    const PROMPT: &str = r#"{"essay_prompt":"Some people prefer to work from home. Do you agree?","topic":"Work issues","essay_type":"Agree or disagree with a statement","key_points":["Productivity"],"suggested_structure":"Intro, body, conclusion.","sample_essay":"..."}"#;

    #[tokio::test]
    async fn timed_out_essay_is_still_evaluated() {
        let model = ScriptedModel::new().reply(PROMPT).reply("garbled");
        let console = ScriptedConsole::new(["I agree because commuting wastes time."]).then_timeout();
        let (mut ctx, transcript) = context(model, console);
        let pick = TopicPick::new("Work issues", Some("Agree or disagree with a statement".into()));
        let essay = OpinionEssay::with_time_limit(Duration::from_secs(1800));
        let ItemOutcome::Completed(record) = essay.run_item(&mut ctx, &pick).await else {
            panic!("expected an evaluated essay");
        };
        assert!(record.timed_out);
        assert!(record.placeholder);
        assert_eq!(record.word_count, 6);
        assert_eq!(record.tally(), Tally::new(3, 1));
        assert!(transcript.contains("Time's up!"));
        assert!(transcript.contains("Key points to consider:\n- Productivity"));
    }

    #[tokio::test]
    async fn failed_prompt_generation_skips() {
        let (mut ctx, _) = context(ScriptedModel::new().failure(), ScriptedConsole::default());
        let pick = TopicPick::new("Work issues", None);
        assert_eq!(
            OpinionEssay::default().run_item(&mut ctx, &pick).await,
            ItemOutcome::Skipped(SkipReason::Generation)
        );
    }
}
