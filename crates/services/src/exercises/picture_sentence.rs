use async_trait::async_trait;
use rand::seq::IndexedRandom;
use toeic_core::model::catalog::{SCENES, WORD_TYPES};
use toeic_core::model::{
    ExerciseKind, PictureSentenceRecord, SceneDescription, SentenceEvaluation, WordPair,
};

use super::{Exercise, ItemOutcome, PracticeContext, SkipReason, TopicPick};
use crate::console::ConsoleInput;
use crate::format::{rule, thin_rule};
use crate::prompts;

/// Writing Q1-5: one sentence about a scene using two given words.
#[derive(Debug, Clone, Copy, Default)]
pub struct PictureSentence;

fn show_evaluation(ctx: &mut PracticeContext, evaluation: &SentenceEvaluation) {
    ctx.say(&format!("\n{}", thin_rule()));
    ctx.say("Evaluation:");
    ctx.say(&format!("Grammar: {}", evaluation.grammar_score));
    ctx.say(&format!("Word Usage: {}", evaluation.word_usage_score));
    ctx.say(&format!("Relevance: {}", evaluation.relevance_score));
    ctx.say(&format!("Overall: {}", evaluation.overall_score));
    ctx.say(&format!("\nFeedback:\n{}", evaluation.feedback));
    ctx.say(&format!("\nImproved Sentence:\n{}", evaluation.improved_sentence));
    if !evaluation.explanation.is_empty() {
        ctx.say(&format!("\nExplanation:\n{}", evaluation.explanation));
    }
    ctx.say(&thin_rule());
}

#[async_trait]
impl Exercise for PictureSentence {
    type Record = PictureSentenceRecord;

    fn kind(&self) -> ExerciseKind {
        ExerciseKind::PictureSentence
    }

    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<PictureSentenceRecord> {
        let scene_type = pick.topic.as_str();
        let Some(scene) = ctx
            .request(
                "scene description",
                &prompts::scene_description(scene_type),
                || SceneDescription::placeholder(scene_type),
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        let mut placeholder = scene.is_fallback();
        let scene = scene.into_inner();

        let image_path = ctx.save_scene_image(&scene, scene_type).await;

        let (first_type, second_type, word_scene) = {
            let rng = ctx.rng();
            let types: Vec<&str> = WORD_TYPES.choose_multiple(rng, 2).copied().collect();
            let word_scene = SCENES.choose(rng).copied().unwrap_or(scene_type);
            match types.as_slice() {
                [a, b] => (*a, *b, word_scene),
                _ => ("Noun", "Verb", word_scene),
            }
        };
        let Some(words) = ctx
            .request(
                "word pair",
                &prompts::word_pair(first_type, second_type, word_scene),
                || WordPair::placeholder(first_type, second_type),
            )
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Generation);
        };
        placeholder |= words.is_fallback();
        let words = words.into_inner();

        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("Scene Type: {scene_type}\n"));
        ctx.say(&format!("Title: {}\n", scene.scene_title));
        ctx.say("Scene Description:");
        ctx.say(&scene.scene_description);
        if let Some(path) = &image_path {
            ctx.say(&format!("\nTo view the image, open the file at: {}", path.display()));
        }
        ctx.say(&format!("\n{}", rule()));
        ctx.say(&format!("\nWord 1: {} ({})", words.word1, words.word1_type));
        ctx.say(&format!("Word 2: {} ({})", words.word2, words.word2_type));
        ctx.say("\nWrite a sentence about the scene using BOTH words.");

        let sentence = match ctx.console().read_line("\nYour sentence: ").await {
            ConsoleInput::Line(line) => line.trim().to_string(),
            ConsoleInput::TimedOut | ConsoleInput::Closed => return ItemOutcome::Quit(None),
        };
        if sentence.eq_ignore_ascii_case("q") {
            return ItemOutcome::Quit(None);
        }
        if sentence.is_empty() {
            ctx.say("No sentence provided. Skipping evaluation.");
            return ItemOutcome::Skipped(SkipReason::EmptySubmission);
        }

        ctx.say("\nEvaluating your sentence...");
        let prompt = prompts::sentence_evaluation(
            &sentence,
            &words.word1,
            &words.word2,
            &scene.scene_description,
        );
        let Some(evaluation) = ctx
            .request("evaluation", &prompt, || {
                SentenceEvaluation::placeholder(&sentence)
            })
            .await
        else {
            return ItemOutcome::Skipped(SkipReason::Evaluation);
        };
        placeholder |= evaluation.is_fallback();
        let evaluation = evaluation.into_inner();
        show_evaluation(ctx, &evaluation);

        ItemOutcome::Completed(PictureSentenceRecord {
            scene_type: scene_type.to_string(),
            scene_title: scene.scene_title,
            word1: words.word1,
            word1_type: words.word1_type,
            word2: words.word2,
            word2_type: words.word2_type,
            user_sentence: sentence,
            grammar_score: evaluation.grammar_score,
            word_usage_score: evaluation.word_usage_score,
            relevance_score: evaluation.relevance_score,
            overall_score: evaluation.overall_score,
            improved_sentence: evaluation.improved_sentence,
            image_path: image_path.map(|p| p.display().to_string()),
            placeholder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::exercises::test_support::context;
    use crate::model_client::ScriptedModel;
    use toeic_core::model::{ItemRecord, Tally};

    const SCENE: &str = r#"{"scene_title":"Morning at the park","scene_description":"A woman jogs past a bench.","scene_type":"Park","suggested_sentence":"A woman is jogging."}"#;
    const WORDS: &str = r#"{"word1":"bench","word1_type":"Noun","word2":"past","word2_type":"Preposition","example_usage":"She ran past the bench."}"#;
    const EVAL: &str = r#"{"grammar_score":5,"word_usage_score":4,"relevance_score":5,"overall_score":4,"feedback":"Nice.","improved_sentence":"A woman jogs past an empty bench.","explanation":"Adds detail."}"#;

    #[tokio::test]
    async fn evaluated_sentence_is_recorded() {
        let model = ScriptedModel::new().reply(SCENE).reply(WORDS).reply(EVAL);
        let (mut ctx, transcript) = context(
            model,
            ScriptedConsole::new(["A woman jogs past a bench."]),
        );
        let pick = TopicPick::new("Park", None);
        let ItemOutcome::Completed(record) = PictureSentence.run_item(&mut ctx, &pick).await else {
            panic!("expected an evaluated sentence");
        };
        assert_eq!(record.tally(), Tally::new(4, 1));
        assert_eq!(record.word1, "bench");
        assert!(record.image_path.is_none());
        assert!(!record.placeholder);
        assert!(transcript.contains("Word Usage: 4/5"));
    }

    #[tokio::test]
    async fn empty_sentence_is_skipped_without_evaluation() {
        let model = ScriptedModel::new().reply(SCENE).reply(WORDS).reply(EVAL);
        let (mut ctx, _) = context(model, ScriptedConsole::new(["   "]));
        let pick = TopicPick::new("Park", None);
        assert_eq!(
            PictureSentence.run_item(&mut ctx, &pick).await,
            ItemOutcome::Skipped(SkipReason::EmptySubmission)
        );
    }

    #[tokio::test]
    async fn failed_evaluation_skips_item() {
        let model = ScriptedModel::new().reply(SCENE).reply(WORDS).failure();
        let (mut ctx, _) = context(model, ScriptedConsole::new(["A sentence."]));
        let pick = TopicPick::new("Park", None);
        assert_eq!(
            PictureSentence.run_item(&mut ctx, &pick).await,
            ItemOutcome::Skipped(SkipReason::Evaluation)
        );
    }

    #[tokio::test]
    async fn image_is_saved_when_directory_configured() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new()
            .reply(SCENE)
            .reply(WORDS)
            .reply(EVAL)
            .with_image(vec![0x89, b'P', b'N', b'G']);
        let (ctx, _) = context(model, ScriptedConsole::new(["A woman jogs past a bench."]));
        let mut ctx = ctx.with_images_dir(dir.path());
        assert_eq!(ctx.images_dir(), Some(dir.path()));
        let pick = TopicPick::new("Train station", None);
        let ItemOutcome::Completed(record) = PictureSentence.run_item(&mut ctx, &pick).await else {
            panic!("expected an evaluated sentence");
        };
        let path = record.image_path.expect("image path recorded");
        assert!(path.ends_with("20231114_221320_train_station.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn image_failure_continues_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new().reply(SCENE).reply(WORDS).reply(EVAL);
        let (ctx, transcript) = context(model, ScriptedConsole::new(["A sentence."]));
        let mut ctx = ctx.with_images_dir(dir.path());
        let pick = TopicPick::new("Park", None);
        let outcome = PictureSentence.run_item(&mut ctx, &pick).await;
        assert!(matches!(outcome, ItemOutcome::Completed(ref r) if r.image_path.is_none()));
        assert!(transcript.contains("Continuing without image..."));
    }
}
