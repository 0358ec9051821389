use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use toeic_core::model::{
    EmailEvaluation, EmailResponseRecord, EmailScenario, EmailTask, ExerciseKind,
};

use super::{Exercise, ItemOutcome, PracticeContext, SkipReason, TopicPick};
use crate::format::rule;
use crate::input::{Ending, collect_text};
use crate::prompts;

pub const EMAIL_TIME_LIMIT: Duration = Duration::from_secs(10 * 60);

/// Writing Q6-7: reply to an e-mail under a time limit.
#[derive(Debug, Clone, Copy)]
pub struct EmailResponse {
    time_limit: Duration,
}

impl Default for EmailResponse {
    fn default() -> Self {
        Self {
            time_limit: EMAIL_TIME_LIMIT,
        }
    }
}

impl EmailResponse {
    #[must_use]
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

/// One to three distinct task families, each with a random count.
pub fn draw_tasks(rng: &mut impl Rng) -> Vec<String> {
    let how_many = rng.random_range(1..=3);
    let families: Vec<EmailTask> = EmailTask::ALL
        .choose_multiple(rng, how_many)
        .copied()
        .collect();
    families
        .into_iter()
        .map(|task| {
            let count = rng.random_range(1..=task.max_count());
            task.instruction(count)
        })
        .collect()
}

fn show_scenario(ctx: &mut PracticeContext, scenario: &EmailScenario, tasks: &[String]) {
    ctx.say(&format!("\n{}", rule()));
    ctx.say(&format!(
        "From: {} ({})",
        scenario.sender_name, scenario.sender_position
    ));
    ctx.say(&format!(
        "To: {} ({})",
        scenario.recipient_name, scenario.recipient_position
    ));
    ctx.say(&format!("Subject: {}", scenario.email_subject));
    ctx.say(&rule());
    ctx.say(&scenario.email_body);
    ctx.say(&format!("\n{}", rule()));
    ctx.say("Tasks:");
    for task in tasks {
        ctx.say(&format!("- {task}"));
    }
    ctx.say(&format!("\n{}", rule()));
}

fn show_evaluation(ctx: &mut PracticeContext, evaluation: &EmailEvaluation) {
    ctx.say(&format!("\n{}", rule()));
    ctx.say("Response Evaluation");
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
    ctx.say("Suggested Improved Response:");
    ctx.say(&evaluation.improved_response);
    ctx.say(&format!("\n{}", rule()));
}

#[async_trait]
impl Exercise for EmailResponse {
    type Record = EmailResponseRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::EmailResponse
    }

    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<EmailResponseRecord> {
        let context = pick.topic.as_str();
        let tasks = draw_tasks(ctx.rng());
        let Some(scenario) = ctx
            .request(
                "email scenario",
                &prompts::email_scenario(context, &tasks),
                || EmailScenario::placeholder(context, &tasks),
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let mut placeholder = scenario.is_fallback();
        let scenario = scenario.into_inner();
        show_scenario(ctx, &scenario, &tasks);

        let minutes = self.time_limit.as_secs().div_ceil(60);
        ctx.say("\nWrite your response to the email. Press Enter twice when finished.");
        ctx.say(&format!(
            "You have {minutes} minutes to complete your response. Type 'q' alone to end the session."
        ));
        let submission = collect_text(ctx.console(), self.time_limit).await;
        match submission.ending {
            Ending::Quit => return ItemOutcome::Quit(None),
            Ending::Closed if submission.text.is_empty() => return ItemOutcome::Quit(None),
            _ if submission.text.is_empty() => {
                ctx.say("No response provided. Skipping evaluation.");
                return ItemOutcome::Skipped(SkipReason::EmptySubmission);
            }
            _ => {}
        }

        ctx.say("\nEvaluating your response...");
        let Some(evaluation) = ctx
            .request(
                "evaluation",
                &prompts::email_evaluation(&submission.text, &scenario, &tasks),
                EmailEvaluation::placeholder,
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Evaluation);
        };
        placeholder |= evaluation.is_fallback();
        let evaluation = evaluation.into_inner();
        show_evaluation(ctx, &evaluation);

        let record = EmailResponseRecord {
            context: context.to_string(),
            email_subject: scenario.email_subject,
            tasks,
            user_response: submission.text,
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
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use toeic_core::model::{ItemRecord, Tally};

    const SCENARIO: &str = r#"{"email_subject":"Team lunch","sender_name":"Dana Park","sender_position":"Office Manager","recipient_name":"Alex","recipient_position":"Analyst","email_body":"We are planning a team lunch next week.","context":"Schedules","tasks":[],"key_points":[],"sample_response":""}"#;
    const EVAL: &str = r#"{"task_completion_score":4,"organization_score":4,"sentence_variety_score":3,"grammar_score":5,"vocabulary_score":4,"overall_score":4,"overall_feedback":"Clear reply.","improved_response":"Dear Dana, ..."}"#;

    #[test]
    fn drawn_tasks_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let tasks = draw_tasks(&mut rng);
            assert!((1..=3).contains(&tasks.len()));
            let mut unique = tasks.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), tasks.len());
            assert!(tasks.iter().all(|t| t.ends_with('.')));
            assert!(!tasks.iter().any(|t| t.contains("FOUR")));
        }
    }

    #[tokio::test]
    async fn timed_response_is_evaluated() {
        let model = ScriptedModel::new().reply(SCENARIO).reply(EVAL);
        let console = ScriptedConsole::new(["Dear Dana,", "I can join on Tuesday.", ""]);
        let (mut ctx, transcript) = context(model, console);
        let pick = TopicPick::new("Schedules", None);
        let ItemOutcome::Completed(record) = EmailResponse::default().run_item(&mut ctx, &pick).await
        else {
            panic!("expected an evaluated response");
        };
        assert_eq!(record.tally(), Tally::new(4, 1));
        assert_eq!(record.user_response, "Dear Dana,\nI can join on Tuesday.");
        assert!(!record.timed_out);
        assert!(transcript.contains("Subject: Team lunch"));
        assert!(transcript.contains("Sentence variety: 3/5"));
        assert!(transcript.contains("You have 10 minutes"));
    }

    #[tokio::test]
    async fn timeout_submits_partial_response() {
        let model = ScriptedModel::new().reply(SCENARIO).reply(EVAL);
        let console = ScriptedConsole::new(["Dear Dana,"]).then_timeout();
        let (mut ctx, _) = context(model, console);
        let pick = TopicPick::new("Schedules", None);
        let ItemOutcome::Completed(record) = EmailResponse::default().run_item(&mut ctx, &pick).await
        else {
            panic!("expected an evaluated response");
        };
        assert!(record.timed_out);
        assert_eq!(record.user_response, "Dear Dana,");
    }

    #[tokio::test]
    async fn lone_q_ends_session_without_record() {
        let model = ScriptedModel::new().reply(SCENARIO).reply(EVAL);
        let (mut ctx, _) = context(model, ScriptedConsole::new(["q"]));
        let pick = TopicPick::new("Schedules", None);
        assert_eq!(
            EmailResponse::default().run_item(&mut ctx, &pick).await,
            ItemOutcome::Quit(None)
        );
    }
}
