//! Typed shapes of the JSON objects the model is asked to return.
//!
//! Every shape has a `placeholder` constructor producing the fixed stand-in
//! used when a reply cannot be decoded. Placeholder multiple-choice items
//! always key `A` as correct, placeholder rubric scores are always 3.

mod reading;
mod writing;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reading::{
    BlankQuestion, CompletionPassage, ComprehensionQuestion, PassageText, ReadingPassage,
    SentenceQuestion,
};
pub use writing::{
    EmailEvaluation, EmailScenario, EmailScores, EssayEvaluation, EssayPrompt, EssayScores,
    SceneDescription, SentenceEvaluation, WordPair,
};

/// The four option texts of a multiple-choice item, in `A..D` order.
pub type Options = [String; 4];

pub(crate) fn placeholder_options() -> Options {
    [
        "Option A".to_string(),
        "Option B".to_string(),
        "Option C".to_string(),
        "Option D".to_string(),
    ]
}

/// A rubric band between 1 and 5.
///
/// Replies occasionally carry fractional or out-of-range numbers; those are
/// rounded and clamped. Non-numeric values fail decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct RubricScore(u8);

#[derive(Debug, Error, Clone, PartialEq)]
#[error("rubric score is not a finite number: {0}")]
pub struct RubricScoreError(pub f64);

impl RubricScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const PLACEHOLDER: RubricScore = RubricScore(3);

    /// Clamp `value` into the rubric range.
    #[must_use]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for RubricScore {
    type Error = RubricScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(RubricScoreError(value));
        }
        let rounded = value
            .round()
            .clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(rounded as u8))
    }
}

impl From<RubricScore> for u8 {
    fn from(value: RubricScore) -> Self {
        value.0
    }
}

impl fmt::Display for RubricScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rubric_score_rounds_and_clamps() {
        assert_eq!(RubricScore::try_from(3.6).unwrap().get(), 4);
        assert_eq!(RubricScore::try_from(0.0).unwrap().get(), 1);
        assert_eq!(RubricScore::try_from(9.0).unwrap().get(), 5);
        assert!(RubricScore::try_from(f64::NAN).is_err());
    }

    #[test]
    fn rubric_score_decodes_integers_and_rejects_strings() {
        let score: RubricScore = serde_json::from_str("4").unwrap();
        assert_eq!(score.get(), 4);
        assert!(serde_json::from_str::<RubricScore>("\"four\"").is_err());
        assert_eq!(serde_json::to_string(&score).unwrap(), "4");
    }
}
