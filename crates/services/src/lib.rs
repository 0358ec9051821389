#![forbid(unsafe_code)]

pub mod console;
pub mod error;
pub mod exercises;
pub mod format;
pub mod input;
pub mod model_client;
pub mod prompts;
pub mod sessions;
pub mod stats;

pub use toeic_core::Clock;

pub use console::{Console, ConsoleInput, ScriptedConsole, Transcript};
pub use error::{ConfigError, ModelError, SessionError};
pub use exercises::{
    EmailResponse, Exercise, IncompleteSentences, ItemOutcome, OpinionEssay, PictureSentence,
    PracticeContext, ReadingComprehension, SkipReason, TextCompletion, TopicPick,
};
pub use model_client::{ChatModel, ModelConfig, OpenAiClient, ScriptedModel};
pub use sessions::{SessionLength, SessionOutcome, SessionPlan, SessionRunner};
pub use stats::{Breakdown, PracticeStats, RecentSession};
