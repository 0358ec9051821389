use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four answer letters of a multiple-choice item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChoiceError {
    #[error("not an answer letter: {0:?}")]
    NotALetter(String),
}

impl AnswerChoice {
    pub const ALL: [AnswerChoice; 4] = [
        AnswerChoice::A,
        AnswerChoice::B,
        AnswerChoice::C,
        AnswerChoice::D,
    ];

    /// Position of the option this letter selects.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            AnswerChoice::A => 0,
            AnswerChoice::B => 1,
            AnswerChoice::C => 2,
            AnswerChoice::D => 3,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            AnswerChoice::A => 'A',
            AnswerChoice::B => 'B',
            AnswerChoice::C => 'C',
            AnswerChoice::D => 'D',
        }
    }

    /// Lenient parse used for model replies: accepts `"b"`, `"B."` or `"B)"`.
    ///
    /// # Errors
    ///
    /// Returns `ChoiceError::NotALetter` when nothing recognisable remains.
    pub fn from_reply(raw: &str) -> Result<Self, ChoiceError> {
        let cleaned = raw.trim().trim_end_matches(['.', ')']).trim();
        cleaned.parse()
    }
}

impl FromStr for AnswerChoice {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerChoice::A),
            "B" => Ok(AnswerChoice::B),
            "C" => Ok(AnswerChoice::C),
            "D" => Ok(AnswerChoice::D),
            _ => Err(ChoiceError::NotALetter(s.to_string())),
        }
    }
}

impl TryFrom<String> for AnswerChoice {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AnswerChoice::from_reply(&value)
    }
}

impl From<AnswerChoice> for String {
    fn from(value: AnswerChoice) -> Self {
        value.letter().to_string()
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_accepts_single_letters_only() {
        assert_eq!("c".parse::<AnswerChoice>(), Ok(AnswerChoice::C));
        assert!("E".parse::<AnswerChoice>().is_err());
        assert!("AB".parse::<AnswerChoice>().is_err());
        assert!("C.".parse::<AnswerChoice>().is_err());
    }

    #[test]
    fn reply_parse_tolerates_punctuation() {
        assert_eq!(AnswerChoice::from_reply("B."), Ok(AnswerChoice::B));
        assert_eq!(AnswerChoice::from_reply(" d) "), Ok(AnswerChoice::D));
    }

    #[test]
    fn serializes_as_letter() {
        let json = serde_json::to_string(&AnswerChoice::D).unwrap();
        assert_eq!(json, "\"D\"");
        let back: AnswerChoice = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(back, AnswerChoice::A);
        assert!(serde_json::from_str::<AnswerChoice>("\"Z\"").is_err());
    }
}
