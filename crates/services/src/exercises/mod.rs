//! The six exercise kinds behind one [`Exercise`] trait.
//!
//! An exercise generates, presents, collects and scores exactly one item per
//! call. Looping, counting and persistence belong to the session runner.

mod email_response;
mod incomplete_sentences;
mod opinion_essay;
mod picture_sentence;
mod reading_comprehension;
mod text_completion;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use tokio::fs;
use toeic_core::model::{AnswerChoice, ExerciseKind, Options, SceneDescription, StoredItem};
use toeic_core::{Clock, Parsed, Reply, parse_reply};
use tracing::warn;

use crate::console::Console;
use crate::input::{ChoiceInput, ask_choice};
use crate::model_client::ChatModel;
use crate::prompts;

pub use email_response::EmailResponse;
pub use incomplete_sentences::IncompleteSentences;
pub use opinion_essay::OpinionEssay;
pub use picture_sentence::PictureSentence;
pub use reading_comprehension::ReadingComprehension;
pub use text_completion::TextCompletion;

pub const PLACEHOLDER_NOTICE: &str =
    "Warning: the model's reply could not be parsed. Showing placeholder content instead.";

/// Topic and subtype resolved for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPick {
    pub topic: String,
    pub subtype: Option<String>,
}

impl TopicPick {
    #[must_use]
    pub fn new(topic: impl Into<String>, subtype: Option<String>) -> Self {
        Self {
            topic: topic.into(),
            subtype,
        }
    }

    /// The subtype, or `fallback` when none was drawn.
    #[must_use]
    pub fn subtype_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.subtype.as_deref().unwrap_or(fallback)
    }
}

/// Why an item produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Generation,
    Evaluation,
    EmptySubmission,
}

/// Result of one exercise step.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<R> {
    Completed(R),
    /// The user ended the session; a partially answered item may be kept.
    Quit(Option<R>),
    Skipped(SkipReason),
}

/// One exercise kind: its catalogs, reply schemas and rubric.
#[async_trait]
pub trait Exercise: Send + Sync {
    type Record: StoredItem;

    fn kind(&self) -> ExerciseKind;

    /// Generate, present, collect and score one item.
    async fn run_item(
        &self,
        ctx: &mut PracticeContext,
        pick: &TopicPick,
    ) -> ItemOutcome<Self::Record>;
}

/// Everything an exercise touches besides the history store.
pub struct PracticeContext {
    model: Arc<dyn ChatModel>,
    console: Box<dyn Console>,
    clock: Clock,
    rng: StdRng,
    images_dir: Option<PathBuf>,
}

impl PracticeContext {
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        console: Box<dyn Console>,
        clock: Clock,
        rng: StdRng,
    ) -> Self {
        Self {
            model,
            console,
            clock,
            rng,
            images_dir: None,
        }
    }

    /// Save generated scene images under `dir`.
    #[must_use]
    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    pub fn console(&mut self) -> &mut dyn Console {
        self.console.as_mut()
    }

    pub fn say(&mut self, text: &str) {
        self.console.say(text);
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn images_dir(&self) -> Option<&Path> {
        self.images_dir.as_deref()
    }

    /// Ask the model for `what` and decode the reply.
    ///
    /// Returns `None` when the request itself fails. A reply that does not
    /// decode yields the placeholder, announced on the console.
    pub async fn request<T, F>(&mut self, what: &str, prompt: &str, placeholder: F) -> Option<Parsed<T>>
    where
        T: Reply + Send,
        F: FnOnce() -> T + Send,
    {
        match self.model.complete(prompt).await {
            Ok(raw) => {
                let parsed = parse_reply(&raw, placeholder);
                if parsed.is_fallback() {
                    warn!(what, "using placeholder content");
                    self.say(PLACEHOLDER_NOTICE);
                }
                Some(parsed)
            }
            Err(err) => {
                warn!(what, error = %err, "model request failed");
                self.say(&format!("Error generating {what}: {err}"));
                None
            }
        }
    }

    /// Generate and store a picture of `scene`; failures only print a notice.
    pub async fn save_scene_image(
        &mut self,
        scene: &SceneDescription,
        scene_type: &str,
    ) -> Option<PathBuf> {
        let dir = self.images_dir.clone()?;
        self.say("Generating an image for this scene... This may take a moment.");
        let bytes = match self.model.generate_image(&prompts::scene_image(scene)).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "image generation failed");
                self.say(&format!("Error generating image: {err}"));
                self.say("Continuing without image...");
                return None;
            }
        };
        let file_name = format!(
            "{}_{}.png",
            self.clock.file_stamp(),
            scene_type.to_lowercase().replace(' ', "_")
        );
        let path = dir.join(file_name);
        let written = match fs::create_dir_all(&dir).await {
            Ok(()) => fs::write(&path, bytes).await,
            Err(err) => Err(err),
        };
        match written {
            Ok(()) => {
                self.say(&format!("Image saved to {}", path.display()));
                Some(path)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not save image");
                self.say("Continuing without image...");
                None
            }
        }
    }
}

/// Print the four options of a multiple-choice item.
pub(crate) fn show_options(ctx: &mut PracticeContext, options: &Options) {
    for (letter, option) in AnswerChoice::ALL.iter().zip(options) {
        ctx.say(&format!("{letter}. {option}"));
    }
}

/// A question inside a passage.
pub(crate) trait PassageQuestion: Sync {
    fn heading(&self) -> String;
    fn options(&self) -> &Options;
    fn correct_answer(&self) -> AnswerChoice;
    fn explanation(&self) -> &str;
}

/// Ask every question of a passage in order, giving feedback after each.
///
/// Returns the answered questions and whether the user quit midway.
pub(crate) async fn answer_passage<'q, Q: PassageQuestion>(
    ctx: &mut PracticeContext,
    questions: &'q [Q],
) -> (Vec<(&'q Q, AnswerChoice)>, bool) {
    let mut answered = Vec::with_capacity(questions.len());
    for question in questions {
        ctx.say(&format!("\n{}", question.heading()));
        ctx.say("Options:");
        show_options(ctx, question.options());

        let answer = match ask_choice(ctx.console(), "\nYour answer (A/B/C/D or 'q' to quit): ").await
        {
            ChoiceInput::Answer(answer) => answer,
            ChoiceInput::Quit => return (answered, true),
        };
        let correct = question.correct_answer();
        let verdict = if answer == correct {
            "Correct!"
        } else {
            "Incorrect!"
        };
        ctx.say(&format!("\n{verdict} The correct answer is {correct}."));
        if !question.explanation().is_empty() {
            ctx.say(&format!("\nExplanation: {}", question.explanation()));
        }
        answered.push((question, answer));
    }
    (answered, false)
}
