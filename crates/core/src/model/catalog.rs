use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── EXERCISE KIND ────────────────────────────────────────────────────────────
//

/// The six TOEIC practice formats supported by the workbench.
///
/// Each kind owns its topic catalog, optional subtype catalog, history file and
/// scoring scale. Everything else in the session pipeline is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    /// Reading Part 5: one sentence with a blank and four options.
    IncompleteSentences,
    /// Reading Part 6: a short passage with three blanks.
    TextCompletion,
    /// Reading Part 7: single or double passages with comprehension questions.
    ReadingComprehension,
    /// Writing questions 1-5: describe a scene using two given words.
    PictureSentence,
    /// Writing questions 6-7: answer an e-mail under a time limit.
    EmailResponse,
    /// Writing question 8: opinion essay under a time limit.
    OpinionEssay,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown exercise kind: {0}")]
pub struct UnknownKindError(pub String);

/// How session and history tallies should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreScale {
    /// Score counts correct answers; attempted counts answered questions.
    Accuracy,
    /// Score sums rubric bands; attempted counts evaluated pieces.
    Rubric { max: u8 },
}

/// Allowed session lengths for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// The user picks a count within `min..=max`; an empty answer means `default`.
    Range { min: u32, max: u32, default: u32 },
    /// The user is asked after every item whether to continue.
    OpenEnded,
    /// Exactly one item per session.
    Single,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 6] = [
        ExerciseKind::IncompleteSentences,
        ExerciseKind::TextCompletion,
        ExerciseKind::ReadingComprehension,
        ExerciseKind::PictureSentence,
        ExerciseKind::EmailResponse,
        ExerciseKind::OpinionEssay,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            ExerciseKind::IncompleteSentences => "part5",
            ExerciseKind::TextCompletion => "part6",
            ExerciseKind::ReadingComprehension => "part7",
            ExerciseKind::PictureSentence => "writing1-5",
            ExerciseKind::EmailResponse => "writing6-7",
            ExerciseKind::OpinionEssay => "writing8",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ExerciseKind::IncompleteSentences => "TOEIC Part 5 - Incomplete Sentences",
            ExerciseKind::TextCompletion => "TOEIC Part 6 - Text Completion",
            ExerciseKind::ReadingComprehension => "TOEIC Part 7 - Reading Comprehension",
            ExerciseKind::PictureSentence => "TOEIC Writing - Sentence Based on a Picture (Q1-5)",
            ExerciseKind::EmailResponse => "TOEIC Writing - Email Response (Q6-7)",
            ExerciseKind::OpinionEssay => "TOEIC Writing - Opinion Essay (Q8)",
        }
    }

    #[must_use]
    pub fn history_file_name(self) -> &'static str {
        match self {
            ExerciseKind::IncompleteSentences => "part5_history.json",
            ExerciseKind::TextCompletion => "part6_history.json",
            ExerciseKind::ReadingComprehension => "part7_history.json",
            ExerciseKind::PictureSentence => "part1_5_history.json",
            ExerciseKind::EmailResponse => "part6_7_history.json",
            ExerciseKind::OpinionEssay => "part8_history.json",
        }
    }

    /// Singular noun for one generated item, used in progress messages.
    #[must_use]
    pub fn item_noun(self) -> &'static str {
        match self {
            ExerciseKind::IncompleteSentences => "question",
            ExerciseKind::TextCompletion | ExerciseKind::ReadingComprehension => "passage",
            ExerciseKind::PictureSentence => "exercise",
            ExerciseKind::EmailResponse => "email",
            ExerciseKind::OpinionEssay => "essay",
        }
    }

    /// Label of the topic catalog as shown in menus.
    #[must_use]
    pub fn topic_label(self) -> &'static str {
        match self {
            ExerciseKind::PictureSentence => "Scene type",
            ExerciseKind::EmailResponse => "Email context",
            _ => "Topic",
        }
    }

    #[must_use]
    pub fn topics(self) -> &'static [&'static str] {
        match self {
            ExerciseKind::IncompleteSentences => INCOMPLETE_SENTENCE_TOPICS,
            ExerciseKind::TextCompletion => TEXT_COMPLETION_TOPICS,
            ExerciseKind::ReadingComprehension => READING_TOPICS,
            ExerciseKind::PictureSentence => SCENES,
            ExerciseKind::EmailResponse => EMAIL_CONTEXTS,
            ExerciseKind::OpinionEssay => ESSAY_TOPICS,
        }
    }

    /// Secondary catalog drawn per item (passage type, essay type).
    ///
    /// Empty when the kind has no subtype.
    #[must_use]
    pub fn subtypes(self) -> &'static [&'static str] {
        match self {
            ExerciseKind::TextCompletion => TEXT_COMPLETION_PASSAGE_TYPES,
            ExerciseKind::ReadingComprehension => READING_PASSAGE_TYPES,
            ExerciseKind::OpinionEssay => ESSAY_TYPES,
            _ => &[],
        }
    }

    /// Menu label for the subtype when the user may choose it up front.
    #[must_use]
    pub fn selectable_subtype(self) -> Option<&'static str> {
        match self {
            ExerciseKind::ReadingComprehension => Some("Passage type"),
            ExerciseKind::OpinionEssay => Some("Essay type"),
            _ => None,
        }
    }

    #[must_use]
    pub fn scale(self) -> ScoreScale {
        match self {
            ExerciseKind::IncompleteSentences
            | ExerciseKind::TextCompletion
            | ExerciseKind::ReadingComprehension => ScoreScale::Accuracy,
            ExerciseKind::PictureSentence
            | ExerciseKind::EmailResponse
            | ExerciseKind::OpinionEssay => ScoreScale::Rubric { max: 5 },
        }
    }

    #[must_use]
    pub fn length_rule(self) -> LengthRule {
        match self {
            ExerciseKind::IncompleteSentences => LengthRule::Range {
                min: 1,
                max: 20,
                default: 5,
            },
            ExerciseKind::TextCompletion => LengthRule::Range {
                min: 1,
                max: 10,
                default: 2,
            },
            ExerciseKind::ReadingComprehension => LengthRule::Range {
                min: 1,
                max: 5,
                default: 2,
            },
            ExerciseKind::PictureSentence => LengthRule::Range {
                min: 1,
                max: 10,
                default: 5,
            },
            ExerciseKind::EmailResponse => LengthRule::OpenEnded,
            ExerciseKind::OpinionEssay => LengthRule::Single,
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ExerciseKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

//
// ─── CATALOGS ─────────────────────────────────────────────────────────────────
//

pub const INCOMPLETE_SENTENCE_TOPICS: &[&str] = &[
    "Office issues",
    "Financial issues",
    "Sales and marketing",
    "Business transactions",
    "Transportation",
    "Tourism",
    "Entertainment and dining out",
    "Schedules",
];

pub const TEXT_COMPLETION_TOPICS: &[&str] = &[
    "Letters and memos",
    "Advertisements",
    "Instructions",
    "Articles",
    "E-mails",
    "Notices",
];

pub const TEXT_COMPLETION_PASSAGE_TYPES: &[&str] = &[
    "Business letter",
    "Email correspondence",
    "Advertisement",
    "Notice",
    "Article",
    "Instructions",
    "Memo",
];

pub const READING_TOPICS: &[&str] = &[
    "E-mails and letters",
    "Memos",
    "Advertisements",
    "Notices",
    "Articles and reports",
    "Forms",
    "Charts and tables",
    "Graphs and schedules",
];

pub const SINGLE_PASSAGE: &str = "Single passage";
pub const DOUBLE_PASSAGE: &str = "Double passage";

pub const READING_PASSAGE_TYPES: &[&str] = &[SINGLE_PASSAGE, DOUBLE_PASSAGE];

pub const READING_QUESTION_TYPES: &[&str] = &["Main idea", "Detail", "Inference", "Vocabulary"];

pub const SCENES: &[&str] = &[
    "Store",
    "Park",
    "Office",
    "Bank",
    "Restaurant",
    "Airport",
    "Library",
    "School",
    "Hospital",
    "Train station",
];

pub const WORD_TYPES: &[&str] = &[
    "Noun",
    "Preposition",
    "Verb",
    "Coordinating conjunction",
    "Adjective",
    "Subordinating conjunction",
    "Adverb",
];

pub const EMAIL_CONTEXTS: &[&str] = &[
    "Office issues",
    "Job ads and applications",
    "Ads for products and services",
    "Orders and shipments",
    "Schedules",
    "Appointments",
];

/// Task families an e-mail reply may be asked to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTask {
    AskQuestions,
    RequestInformation,
    MakeSuggestions,
    ProvideInformation,
    ExplainProblems,
}

impl EmailTask {
    pub const ALL: [EmailTask; 5] = [
        EmailTask::AskQuestions,
        EmailTask::RequestInformation,
        EmailTask::MakeSuggestions,
        EmailTask::ProvideInformation,
        EmailTask::ExplainProblems,
    ];

    /// Largest count a single task instruction may ask for.
    #[must_use]
    pub fn max_count(self) -> u32 {
        match self {
            EmailTask::AskQuestions | EmailTask::ProvideInformation => 3,
            EmailTask::RequestInformation
            | EmailTask::MakeSuggestions
            | EmailTask::ExplainProblems => 2,
        }
    }

    /// Renders the task as an instruction, e.g. `Ask TWO questions.`
    #[must_use]
    pub fn instruction(self, count: u32) -> String {
        let n = number_word(count).to_uppercase();
        let s = if count > 1 { "s" } else { "" };
        match self {
            EmailTask::AskQuestions => format!("Ask {n} question{s}."),
            EmailTask::RequestInformation => format!("Make {n} request{s} for information."),
            EmailTask::MakeSuggestions => format!("Make {n} suggestion{s}."),
            EmailTask::ProvideInformation => format!("Give {n} piece{s} of information."),
            EmailTask::ExplainProblems => format!("Explain {n} problem{s}."),
        }
    }
}

pub const ESSAY_TOPICS: &[&str] = &[
    "Work issues",
    "Travel and transportation choices",
    "Friendships and family",
    "Shopping practices",
    "Leisure time activities",
    "Education and learning",
    "Technology and society",
    "Health and wellness",
    "Environment and sustainability",
    "Cultural experiences",
];

pub const ESSAY_TYPES: &[&str] = &[
    "Express a general opinion",
    "Agree or disagree with a statement",
    "Discuss the advantages and disadvantages",
    "Explain your preference",
    "Explain the importance",
];

/// Instruction sentence matching an essay type; unknown types get a generic one.
#[must_use]
pub fn essay_instruction(essay_type: &str) -> &'static str {
    match essay_type {
        "Express a general opinion" => {
            "Express your opinion on this topic and support it with specific reasons and examples."
        }
        "Agree or disagree with a statement" => {
            "State whether you agree or disagree with this statement and support your position with specific reasons and examples."
        }
        "Discuss the advantages and disadvantages" => {
            "Discuss the advantages and disadvantages of this topic, providing specific examples to support your points."
        }
        "Explain your preference" => {
            "Explain your preference regarding this topic and support it with specific reasons and examples."
        }
        "Explain the importance" => {
            "Explain why this topic is important and support your explanation with specific reasons and examples."
        }
        _ => {
            "Write a well-organized essay with a clear thesis statement, supporting paragraphs, and a conclusion."
        }
    }
}

/// Spells out small counts; larger ones fall back to digits.
#[must_use]
pub fn number_word(n: u32) -> String {
    match n {
        1 => "one".into(),
        2 => "two".into(),
        3 => "three".into(),
        4 => "four".into(),
        5 => "five".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip_through_from_str() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.slug().parse::<ExerciseKind>(), Ok(kind));
        }
        assert!("part9".parse::<ExerciseKind>().is_err());
        assert_eq!(" PART5 ".parse::<ExerciseKind>(), Ok(ExerciseKind::IncompleteSentences));
    }

    #[test]
    fn history_files_are_distinct() {
        let mut names: Vec<_> = ExerciseKind::ALL.iter().map(|k| k.history_file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ExerciseKind::ALL.len());
    }

    #[test]
    fn email_task_instruction_pluralizes() {
        assert_eq!(EmailTask::AskQuestions.instruction(1), "Ask ONE question.");
        assert_eq!(
            EmailTask::ProvideInformation.instruction(3),
            "Give THREE pieces of information."
        );
        assert_eq!(
            EmailTask::RequestInformation.instruction(2),
            "Make TWO requests for information."
        );
    }

    #[test]
    fn essay_instruction_has_generic_fallback() {
        assert!(essay_instruction("Explain the importance").starts_with("Explain why"));
        assert!(essay_instruction("Something else").starts_with("Write a well-organized"));
    }
}
