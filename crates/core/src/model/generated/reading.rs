use serde::{Deserialize, Serialize};

use super::{Options, placeholder_options};
use crate::model::catalog::{DOUBLE_PASSAGE, READING_QUESTION_TYPES};
use crate::model::choice::AnswerChoice;
use crate::reply::{Reply, ReplyError};

const PLACEHOLDER_EXPLANATION: &str = "Please try again.";
const PLACEHOLDER_PASSAGE: &str = "Could not parse the passage properly. Please try again.";

//
// ─── INCOMPLETE SENTENCES ─────────────────────────────────────────────────────
//

/// One sentence with a `___` blank and four candidate fillers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceQuestion {
    pub sentence: String,
    pub options: Options,
    pub correct_answer: AnswerChoice,
    #[serde(default)]
    pub explanation: String,
}

impl SentenceQuestion {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            sentence: "Could not parse the question properly.".to_string(),
            options: placeholder_options(),
            correct_answer: AnswerChoice::A,
            explanation: PLACEHOLDER_EXPLANATION.to_string(),
        }
    }
}

impl Reply for SentenceQuestion {}

//
// ─── TEXT COMPLETION ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankQuestion {
    #[serde(default)]
    pub blank_number: u32,
    pub options: Options,
    pub correct_answer: AnswerChoice,
    #[serde(default)]
    pub explanation: String,
}

/// A short passage with numbered blanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionPassage {
    pub passage_title: String,
    pub passage_text: String,
    pub questions: Vec<BlankQuestion>,
}

impl CompletionPassage {
    #[must_use]
    pub fn placeholder() -> Self {
        let questions = (1..=3)
            .map(|blank_number| BlankQuestion {
                blank_number,
                options: placeholder_options(),
                correct_answer: AnswerChoice::A,
                explanation: PLACEHOLDER_EXPLANATION.to_string(),
            })
            .collect();
        Self {
            passage_title: "Sample Passage".to_string(),
            passage_text: PLACEHOLDER_PASSAGE.to_string(),
            questions,
        }
    }
}

impl Reply for CompletionPassage {
    fn validate(&self) -> Result<(), ReplyError> {
        if self.questions.is_empty() {
            return Err(ReplyError::Invalid("passage has no questions".into()));
        }
        Ok(())
    }
}

//
// ─── READING COMPREHENSION ────────────────────────────────────────────────────
//

/// Passage body: one text, or several for multi-passage sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassageText {
    Single(String),
    Multiple(Vec<String>),
}

impl PassageText {
    #[must_use]
    pub fn parts(&self) -> Vec<&str> {
        match self {
            PassageText::Single(text) => vec![text.as_str()],
            PassageText::Multiple(texts) => texts.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensionQuestion {
    #[serde(default)]
    pub question_number: u32,
    pub question_text: String,
    #[serde(default)]
    pub question_type: String,
    pub options: Options,
    pub correct_answer: AnswerChoice,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPassage {
    pub passage_title: String,
    pub passage_text: PassageText,
    pub questions: Vec<ComprehensionQuestion>,
}

impl ReadingPassage {
    /// Stand-in passage with `question_count` questions.
    ///
    /// Question types cycle through the catalog so statistics stay stable.
    #[must_use]
    pub fn placeholder(passage_type: &str, question_count: usize) -> Self {
        let passage_text = if passage_type == DOUBLE_PASSAGE {
            PassageText::Multiple(vec![PLACEHOLDER_PASSAGE.to_string()])
        } else {
            PassageText::Single(PLACEHOLDER_PASSAGE.to_string())
        };
        let questions = (0..question_count.max(1))
            .map(|i| {
                let number = u32::try_from(i + 1).unwrap_or(u32::MAX);
                ComprehensionQuestion {
                    question_number: number,
                    question_text: format!("Question {number}"),
                    question_type: READING_QUESTION_TYPES[i % READING_QUESTION_TYPES.len()]
                        .to_string(),
                    options: placeholder_options(),
                    correct_answer: AnswerChoice::A,
                    explanation: PLACEHOLDER_EXPLANATION.to_string(),
                }
            })
            .collect();
        Self {
            passage_title: "Sample Passage".to_string(),
            passage_text,
            questions,
        }
    }
}

impl Reply for ReadingPassage {
    fn validate(&self) -> Result<(), ReplyError> {
        if self.questions.is_empty() {
            return Err(ReplyError::Invalid("passage has no questions".into()));
        }
        if self.passage_text.parts().is_empty() {
            return Err(ReplyError::Invalid("passage has no text".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_text_accepts_string_or_array() {
        let single: PassageText = serde_json::from_str("\"one\"").unwrap();
        assert_eq!(single.parts(), vec!["one"]);
        let double: PassageText = serde_json::from_str("[\"one\", \"two\"]").unwrap();
        assert_eq!(double.parts(), vec!["one", "two"]);
    }

    #[test]
    fn sentence_question_requires_exactly_four_options() {
        let three = r#"{"sentence":"s ___","options":["a","b","c"],"correct_answer":"A"}"#;
        assert!(serde_json::from_str::<SentenceQuestion>(three).is_err());
        let four = r#"{"sentence":"s ___","options":["a","b","c","d"],"correct_answer":"c"}"#;
        let parsed: SentenceQuestion = serde_json::from_str(four).unwrap();
        assert_eq!(parsed.correct_answer, AnswerChoice::C);
        assert!(parsed.explanation.is_empty());
    }

    #[test]
    fn reading_placeholder_matches_requested_shape() {
        let double = ReadingPassage::placeholder(DOUBLE_PASSAGE, 5);
        assert_eq!(double.questions.len(), 5);
        assert!(matches!(double.passage_text, PassageText::Multiple(_)));
        assert!(double.questions.iter().all(|q| q.correct_answer == AnswerChoice::A));
        assert_eq!(double.questions[4].question_type, "Main idea");
    }

    #[test]
    fn completion_passage_without_questions_is_invalid() {
        let mut passage = CompletionPassage::placeholder();
        passage.questions.clear();
        assert!(passage.validate().is_err());
    }
}
