use std::ops::Not;

use serde::{Deserialize, Serialize};

use super::{Facet, ItemRecord, Tally};
use crate::model::choice::AnswerChoice;
use crate::model::generated::{BlankQuestion, ComprehensionQuestion, SentenceQuestion};

/// One answered incomplete-sentence question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub topic: String,
    pub sentence: String,
    pub user_answer: AnswerChoice,
    pub correct_answer: AnswerChoice,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl QuestionRecord {
    #[must_use]
    pub fn answered(
        topic: &str,
        question: &SentenceQuestion,
        user_answer: AnswerChoice,
        placeholder: bool,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            sentence: question.sentence.clone(),
            user_answer,
            correct_answer: question.correct_answer,
            is_correct: user_answer == question.correct_answer,
            placeholder,
        }
    }
}

impl ItemRecord for QuestionRecord {
    fn tally(&self) -> Tally {
        Tally::answer(self.is_correct)
    }

    fn facets(&self) -> Vec<Facet> {
        vec![Facet::new("Topic", &self.topic, self.tally())]
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredBlank {
    pub blank_number: u32,
    pub user_answer: AnswerChoice,
    pub correct_answer: AnswerChoice,
    pub is_correct: bool,
}

impl AnsweredBlank {
    #[must_use]
    pub fn new(question: &BlankQuestion, user_answer: AnswerChoice) -> Self {
        Self {
            blank_number: question.blank_number,
            user_answer,
            correct_answer: question.correct_answer,
            is_correct: user_answer == question.correct_answer,
        }
    }
}

/// A text-completion passage with the blanks the user answered.
///
/// A passage abandoned midway keeps only the answered blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPassageRecord {
    pub topic: String,
    pub passage_type: String,
    pub passage_title: String,
    pub answers: Vec<AnsweredBlank>,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl ItemRecord for CompletionPassageRecord {
    fn tally(&self) -> Tally {
        self.answers.iter().map(|a| Tally::answer(a.is_correct)).sum()
    }

    fn facets(&self) -> Vec<Facet> {
        let tally = self.tally();
        vec![
            Facet::new("Topic", &self.topic, tally),
            Facet::new("Passage type", &self.passage_type, tally),
        ]
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_number: u32,
    pub question_text: String,
    pub question_type: String,
    pub user_answer: AnswerChoice,
    pub correct_answer: AnswerChoice,
    pub is_correct: bool,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn new(question: &ComprehensionQuestion, user_answer: AnswerChoice) -> Self {
        Self {
            question_number: question.question_number,
            question_text: question.question_text.clone(),
            question_type: question.question_type.clone(),
            user_answer,
            correct_answer: question.correct_answer,
            is_correct: user_answer == question.correct_answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPassageRecord {
    pub topic: String,
    pub passage_type: String,
    pub passage_title: String,
    pub answers: Vec<AnsweredQuestion>,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl ItemRecord for ReadingPassageRecord {
    fn tally(&self) -> Tally {
        self.answers.iter().map(|a| Tally::answer(a.is_correct)).sum()
    }

    fn facets(&self) -> Vec<Facet> {
        let tally = self.tally();
        let mut facets = vec![
            Facet::new("Topic", &self.topic, tally),
            Facet::new("Passage type", &self.passage_type, tally),
        ];
        facets.extend(self.answers.iter().map(|a| {
            let label = if a.question_type.is_empty() {
                "Unknown"
            } else {
                a.question_type.as_str()
            };
            Facet::new("Question type", label, Tally::answer(a.is_correct))
        }));
        facets
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
