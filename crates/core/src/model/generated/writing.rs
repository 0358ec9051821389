use serde::{Deserialize, Serialize};

use super::RubricScore;
use crate::model::catalog::essay_instruction;
use crate::reply::Reply;

//
// ─── PICTURE SENTENCE ─────────────────────────────────────────────────────────
//

/// Textual stand-in for the photograph the learner writes about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub scene_title: String,
    pub scene_description: String,
    #[serde(default)]
    pub suggested_sentence: String,
}

impl SceneDescription {
    #[must_use]
    pub fn placeholder(scene: &str) -> Self {
        Self {
            scene_title: format!("Scene at a {scene}"),
            scene_description: "Could not generate a proper scene description. Please try again."
                .to_string(),
            suggested_sentence: "This is an example sentence about the scene.".to_string(),
        }
    }
}

impl Reply for SceneDescription {}

/// The two words the learner's sentence has to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub word1: String,
    pub word1_type: String,
    pub word2: String,
    pub word2_type: String,
    #[serde(default)]
    pub example_usage: String,
}

impl WordPair {
    /// Picks stock words matching the requested word types where possible.
    #[must_use]
    pub fn placeholder(first_type: &str, second_type: &str) -> Self {
        let word1 = match first_type {
            "Noun" => "customer",
            "Adjective" => "happy",
            _ => "quickly",
        };
        let word2 = match second_type {
            "Verb" => "purchase",
            "Preposition" => "in",
            _ => "store",
        };
        Self {
            word1: word1.to_string(),
            word1_type: first_type.to_string(),
            word2: word2.to_string(),
            word2_type: second_type.to_string(),
            example_usage: "The customer made a purchase in the store.".to_string(),
        }
    }
}

impl Reply for WordPair {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceEvaluation {
    pub grammar_score: RubricScore,
    pub word_usage_score: RubricScore,
    pub relevance_score: RubricScore,
    pub overall_score: RubricScore,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub improved_sentence: String,
    #[serde(default)]
    pub explanation: String,
}

impl SentenceEvaluation {
    #[must_use]
    pub fn placeholder(sentence: &str) -> Self {
        Self {
            grammar_score: RubricScore::PLACEHOLDER,
            word_usage_score: RubricScore::PLACEHOLDER,
            relevance_score: RubricScore::PLACEHOLDER,
            overall_score: RubricScore::PLACEHOLDER,
            feedback: "Unable to provide detailed feedback. Please try again.".to_string(),
            improved_sentence: sentence.to_string(),
            explanation: "Unable to provide an explanation. Please try again.".to_string(),
        }
    }
}

impl Reply for SentenceEvaluation {}

//
// ─── EMAIL RESPONSE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailScenario {
    pub email_subject: String,
    pub sender_name: String,
    #[serde(default)]
    pub sender_position: String,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_position: String,
    pub email_body: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub sample_response: String,
}

impl EmailScenario {
    #[must_use]
    pub fn placeholder(context: &str, tasks: &[String]) -> Self {
        Self {
            email_subject: format!("Regarding {context}"),
            sender_name: "John Smith".to_string(),
            sender_position: "Manager".to_string(),
            recipient_name: "Test Taker".to_string(),
            recipient_position: "Employee".to_string(),
            email_body: format!(
                "This is a fallback email about {context}. Please respond addressing the following tasks: {}",
                tasks.join(", ")
            ),
            key_points: vec![
                "Be professional".to_string(),
                "Address all tasks".to_string(),
                "Use correct grammar".to_string(),
                "Be concise".to_string(),
            ],
            sample_response: "This is a sample response that would address all the required tasks."
                .to_string(),
        }
    }
}

impl Reply for EmailScenario {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailScores {
    pub task_completion_score: RubricScore,
    pub organization_score: RubricScore,
    pub sentence_variety_score: RubricScore,
    pub grammar_score: RubricScore,
    pub vocabulary_score: RubricScore,
    pub overall_score: RubricScore,
}

impl EmailScores {
    /// Per-criterion scores, excluding the overall band.
    #[must_use]
    pub fn criteria(&self) -> [(&'static str, RubricScore); 5] {
        [
            ("Task completion", self.task_completion_score),
            ("Organization", self.organization_score),
            ("Sentence variety", self.sentence_variety_score),
            ("Grammar", self.grammar_score),
            ("Vocabulary", self.vocabulary_score),
        ]
    }

    fn placeholder() -> Self {
        Self {
            task_completion_score: RubricScore::PLACEHOLDER,
            organization_score: RubricScore::PLACEHOLDER,
            sentence_variety_score: RubricScore::PLACEHOLDER,
            grammar_score: RubricScore::PLACEHOLDER,
            vocabulary_score: RubricScore::PLACEHOLDER,
            overall_score: RubricScore::PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEvaluation {
    #[serde(flatten)]
    pub scores: EmailScores,
    #[serde(default)]
    pub task_completion_feedback: String,
    #[serde(default)]
    pub organization_feedback: String,
    #[serde(default)]
    pub sentence_variety_feedback: String,
    #[serde(default)]
    pub grammar_feedback: String,
    #[serde(default)]
    pub vocabulary_feedback: String,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub improved_response: String,
}

impl EmailEvaluation {
    #[must_use]
    pub fn placeholder() -> Self {
        let unable = |area: &str| {
            format!("Unable to provide detailed feedback on {area}. Please try again.")
        };
        Self {
            scores: EmailScores::placeholder(),
            task_completion_feedback: unable("task completion"),
            organization_feedback: unable("organization"),
            sentence_variety_feedback: unable("sentence variety"),
            grammar_feedback: unable("grammar"),
            vocabulary_feedback: unable("vocabulary"),
            overall_feedback: "Unable to provide detailed overall feedback. Please try again."
                .to_string(),
            improved_response: "Unable to provide an improved response. Please try again."
                .to_string(),
        }
    }

    /// Criterion feedback paired with its label, in display order.
    #[must_use]
    pub fn feedback(&self) -> [(&'static str, &str); 5] {
        [
            ("Task completion", self.task_completion_feedback.as_str()),
            ("Organization", self.organization_feedback.as_str()),
            ("Sentence variety", self.sentence_variety_feedback.as_str()),
            ("Grammar", self.grammar_feedback.as_str()),
            ("Vocabulary", self.vocabulary_feedback.as_str()),
        ]
    }
}

impl Reply for EmailEvaluation {}

//
// ─── OPINION ESSAY ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayPrompt {
    pub essay_prompt: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub suggested_structure: String,
    #[serde(default)]
    pub sample_essay: String,
}

impl EssayPrompt {
    #[must_use]
    pub fn placeholder(topic: &str, essay_type: &str) -> Self {
        Self {
            essay_prompt: format!(
                "Write an essay about {topic}. {}",
                essay_instruction(essay_type)
            ),
            key_points: vec![
                "Be clear and concise".to_string(),
                "Use specific examples".to_string(),
                "Organize your ideas logically".to_string(),
                "Use appropriate grammar and vocabulary".to_string(),
            ],
            suggested_structure: "Introduction with thesis statement, 2-3 body paragraphs with supporting ideas, conclusion that restates your opinion.".to_string(),
            sample_essay: format!(
                "This is a sample essay about {topic}. It would normally be about 300 words long and demonstrate good organization, grammar, and vocabulary."
            ),
        }
    }
}

impl Reply for EssayPrompt {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayScores {
    pub organization_score: RubricScore,
    pub development_score: RubricScore,
    pub coherence_score: RubricScore,
    pub grammar_score: RubricScore,
    pub vocabulary_score: RubricScore,
    pub overall_score: RubricScore,
}

impl EssayScores {
    #[must_use]
    pub fn criteria(&self) -> [(&'static str, RubricScore); 5] {
        [
            ("Organization", self.organization_score),
            ("Development", self.development_score),
            ("Coherence", self.coherence_score),
            ("Grammar", self.grammar_score),
            ("Vocabulary", self.vocabulary_score),
        ]
    }

    fn placeholder() -> Self {
        Self {
            organization_score: RubricScore::PLACEHOLDER,
            development_score: RubricScore::PLACEHOLDER,
            coherence_score: RubricScore::PLACEHOLDER,
            grammar_score: RubricScore::PLACEHOLDER,
            vocabulary_score: RubricScore::PLACEHOLDER,
            overall_score: RubricScore::PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayEvaluation {
    #[serde(flatten)]
    pub scores: EssayScores,
    #[serde(default)]
    pub organization_feedback: String,
    #[serde(default)]
    pub development_feedback: String,
    #[serde(default)]
    pub coherence_feedback: String,
    #[serde(default)]
    pub grammar_feedback: String,
    #[serde(default)]
    pub vocabulary_feedback: String,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub improved_essay: String,
}

impl EssayEvaluation {
    #[must_use]
    pub fn placeholder() -> Self {
        let unable = |area: &str| {
            format!("Unable to provide detailed feedback on {area}. Please try again.")
        };
        Self {
            scores: EssayScores::placeholder(),
            organization_feedback: unable("organization"),
            development_feedback: unable("development"),
            coherence_feedback: unable("coherence"),
            grammar_feedback: unable("grammar"),
            vocabulary_feedback: unable("vocabulary"),
            overall_feedback: "Unable to provide detailed overall feedback. Please try again."
                .to_string(),
            improved_essay: "Unable to provide an improved essay. Please try again.".to_string(),
        }
    }

    #[must_use]
    pub fn feedback(&self) -> [(&'static str, &str); 5] {
        [
            ("Organization", self.organization_feedback.as_str()),
            ("Development", self.development_feedback.as_str()),
            ("Coherence", self.coherence_feedback.as_str()),
            ("Grammar", self.grammar_feedback.as_str()),
            ("Vocabulary", self.vocabulary_feedback.as_str()),
        ]
    }
}

impl Reply for EssayEvaluation {}
