use std::ops::Not;

use serde::{Deserialize, Serialize};

use super::{Facet, ItemRecord, Tally};
use crate::model::generated::{EmailScores, EssayScores, RubricScore};

fn rubric_tally(score: RubricScore) -> Tally {
    Tally::new(u32::from(score.get()), 1)
}

/// A sentence written about a scene using two required words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureSentenceRecord {
    pub scene_type: String,
    pub scene_title: String,
    pub word1: String,
    pub word1_type: String,
    pub word2: String,
    pub word2_type: String,
    pub user_sentence: String,
    pub grammar_score: RubricScore,
    pub word_usage_score: RubricScore,
    pub relevance_score: RubricScore,
    pub overall_score: RubricScore,
    pub improved_sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl ItemRecord for PictureSentenceRecord {
    fn tally(&self) -> Tally {
        rubric_tally(self.overall_score)
    }

    fn facets(&self) -> Vec<Facet> {
        let usage = rubric_tally(self.word_usage_score);
        vec![
            Facet::new("Scene type", &self.scene_type, self.tally()),
            Facet::new("Word type", &self.word1_type, usage),
            Facet::new("Word type", &self.word2_type, usage),
        ]
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A timed e-mail reply with its rubric scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResponseRecord {
    pub context: String,
    pub email_subject: String,
    pub tasks: Vec<String>,
    pub user_response: String,
    pub scores: EmailScores,
    pub feedback: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl ItemRecord for EmailResponseRecord {
    fn tally(&self) -> Tally {
        rubric_tally(self.scores.overall_score)
    }

    fn facets(&self) -> Vec<Facet> {
        let mut facets = vec![Facet::new("Email context", &self.context, self.tally())];
        facets.extend(
            self.scores
                .criteria()
                .into_iter()
                .map(|(name, score)| Facet::new("Criterion", name, rubric_tally(score))),
        );
        facets
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A timed opinion essay with its rubric scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayRecord {
    pub topic: String,
    pub essay_type: String,
    pub prompt: String,
    pub user_essay: String,
    pub word_count: usize,
    pub scores: EssayScores,
    pub feedback: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub placeholder: bool,
}

impl ItemRecord for EssayRecord {
    fn tally(&self) -> Tally {
        rubric_tally(self.scores.overall_score)
    }

    fn facets(&self) -> Vec<Facet> {
        let tally = self.tally();
        let mut facets = vec![
            Facet::new("Topic", &self.topic, tally),
            Facet::new("Essay type", &self.essay_type, tally),
        ];
        facets.extend(
            self.scores
                .criteria()
                .into_iter()
                .map(|(name, score)| Facet::new("Criterion", name, rubric_tally(score))),
        );
        facets
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_sentence_word_usage_counts_for_both_words() {
        let record = PictureSentenceRecord {
            scene_type: "Park".into(),
            scene_title: "A park".into(),
            word1: "bench".into(),
            word1_type: "Noun".into(),
            word2: "under".into(),
            word2_type: "Preposition".into(),
            user_sentence: "A man sits on a bench under a tree.".into(),
            grammar_score: RubricScore::clamped(5),
            word_usage_score: RubricScore::clamped(4),
            relevance_score: RubricScore::clamped(5),
            overall_score: RubricScore::clamped(5),
            improved_sentence: String::new(),
            image_path: None,
            placeholder: false,
        };
        assert_eq!(record.tally(), Tally::new(5, 1));
        let facets = record.facets();
        assert_eq!(facets[1].tally, Tally::new(4, 1));
        assert_eq!(facets[2].label, "Preposition");
    }
}
