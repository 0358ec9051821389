pub mod catalog;
mod choice;
pub mod generated;
mod history;
mod records;
mod session;

pub use catalog::{EmailTask, ExerciseKind, LengthRule, ScoreScale, UnknownKindError};
pub use choice::{AnswerChoice, ChoiceError};
pub use generated::{
    BlankQuestion, CompletionPassage, ComprehensionQuestion, EmailEvaluation, EmailScenario,
    EmailScores, EssayEvaluation, EssayPrompt, EssayScores, Options, PassageText, ReadingPassage,
    RubricScore, SceneDescription, SentenceEvaluation, SentenceQuestion, WordPair,
};
pub use history::HistoryDocument;
pub use records::{
    AnsweredBlank, AnsweredQuestion, CompletionPassageRecord, EmailResponseRecord, EssayRecord,
    Facet, ItemRecord, PictureSentenceRecord, QuestionRecord, ReadingPassageRecord, StoredItem,
    Tally,
};
pub use session::SessionRecord;
