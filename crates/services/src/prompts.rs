//! Prompt templates sent to the model.
//!
//! Builders are pure: the same inputs always give the same text. Random
//! topic, subtype and task selection happens in the caller.

use toeic_core::model::catalog::DOUBLE_PASSAGE;
use toeic_core::model::{EmailScenario, EssayPrompt, SceneDescription};

const JSON_ONLY: &str = "Reply with the JSON object only, without any surrounding text.";
const LEVEL: &str =
    "The difficulty should suit TOEIC test takers (intermediate to advanced English).";
const SKILLS: &str = "Test one of these skills:\n\
- Vocabulary (similar words with different meanings, phrasal verbs)\n\
- Word forms (noun, pronoun, verb, adjective, adverb, infinitive, gerund)\n\
- Grammar (subject, verb, object, complement, preposition, adjective)";

fn fields(list: &[&str]) -> String {
    let mut out = String::from("Format the response as a JSON object with these fields:");
    for field in list {
        out.push_str("\n- ");
        out.push_str(field);
    }
    out
}

//
// ─── READING ──────────────────────────────────────────────────────────────────
//

#[must_use]
pub fn incomplete_sentence(topic: &str) -> String {
    format!(
        "Generate a TOEIC Part 5 practice question (Incomplete Sentences) on the topic of {topic}.\n\n\
         Write a single sentence with one blank and four options (A, B, C, D) to fill it. \
         Exactly one option is correct. Explain why the correct answer is right and the others are wrong.\n\n\
         {}\n\n{SKILLS}\n\n{LEVEL}\n{JSON_ONLY}",
        fields(&[
            "sentence: The incomplete sentence with the blank written as \"___\"",
            "options: An array of exactly 4 options in A, B, C, D order",
            "correct_answer: The letter of the correct option (A, B, C, or D)",
            "explanation: A detailed explanation of the correct answer",
            "topic: The topic of the question",
        ])
    )
}

#[must_use]
pub fn text_completion(topic: &str, passage_type: &str) -> String {
    format!(
        "Generate a TOEIC Part 6 practice passage (Text Completion) on the topic of {topic} \
         in the format of a {passage_type}.\n\n\
         The passage is a short text (4-6 sentences) with THREE blanks written as \"___\". \
         Each blank has four options (A, B, C, D) and exactly one correct option. \
         Explain every correct answer.\n\n\
         {}\n\n{SKILLS}\n- Words in context (the word that fits the surrounding text)\n\n{LEVEL}\n{JSON_ONLY}",
        fields(&[
            "passage_title: A title for the passage",
            "passage_text: The full text with THREE blanks written as \"___\"",
            "questions: An array of 3 objects, each with blank_number (1, 2 or 3), \
             options (exactly 4, in A-D order), correct_answer (A, B, C, or D) and explanation",
            "passage_type: The type of passage",
            "topic: The topic of the passage",
        ])
    )
}

#[must_use]
pub fn reading_comprehension(topic: &str, passage_type: &str, question_count: usize) -> String {
    let (shape, text_field) = if passage_type == DOUBLE_PASSAGE {
        (
            "Create two related passages that complement each other.",
            "passage_text: An array of two passages",
        )
    } else {
        (
            "Create a single comprehensive passage.",
            "passage_text: The full text of the passage",
        )
    };
    let questions_field = format!(
        "questions: An array of {question_count} objects, each with question_number, \
         question_text, question_type (Main idea, Detail, Inference, or Vocabulary), \
         options (exactly 4, in A-D order), correct_answer (A, B, C, or D) and explanation"
    );
    format!(
        "Generate a TOEIC Part 7 practice {passage_type} on the topic of {topic}.\n\n\
         {shape} The text should be 300-500 words in total.\n\
         Include {question_count} reading comprehension questions with four options (A, B, C, D) each, \
         mixing main idea, detail, inference and vocabulary questions. \
         Exactly one option is correct per question; explain each answer.\n\n\
         {}\n\n{LEVEL}\n{JSON_ONLY}",
        fields(&[
            "passage_title: A title for the passage or passages",
            text_field,
            &questions_field,
            "passage_type: Single passage or Double passage",
            "topic: The topic of the passage",
        ])
    )
}

//
// ─── PICTURE SENTENCE ─────────────────────────────────────────────────────────
//

#[must_use]
pub fn scene_description(scene: &str) -> String {
    format!(
        "Describe a scene in a {scene} for a TOEIC Writing practice exercise in which the \
         student writes one sentence about a photograph.\n\
         Make it vivid, with people, objects and actions that would be visible in the photograph.\n\n\
         {}\n{JSON_ONLY}",
        fields(&[
            "scene_title: A brief title for the scene",
            "scene_description: What the photograph shows (150-200 words)",
            &format!("scene_type: The type of scene (e.g., {scene})"),
            "suggested_sentence: An example of a good sentence about the scene",
        ])
    )
}

#[must_use]
pub fn word_pair(first_type: &str, second_type: &str, scene: &str) -> String {
    format!(
        "Generate two words for a TOEIC Writing exercise in which the student writes a sentence \
         about a picture.\n\
         The first word is a {first_type} and the second word is a {second_type}. \
         Both are common English words that could describe a scene in a {scene}. \
         Use the singular form for nouns and the base form for verbs.\n\n\
         {}\n{JSON_ONLY}",
        fields(&[
            "word1: The first word",
            &format!("word1_type: The type of the first word ({first_type})"),
            "word2: The second word",
            &format!("word2_type: The type of the second word ({second_type})"),
            "example_usage: A short example sentence using both words",
        ])
    )
}

#[must_use]
pub fn sentence_evaluation(
    sentence: &str,
    word1: &str,
    word2: &str,
    scene_description: &str,
) -> String {
    format!(
        "Evaluate this sentence written for a TOEIC Writing picture exercise.\n\n\
         Sentence: \"{sentence}\"\n\
         Required words: \"{word1}\" and \"{word2}\"\n\
         Scene:\n{scene_description}\n\n\
         Judge grammar and structure, correct use of both words, relevance to the scene \
         and overall clarity. Suggest improvements and give an improved sentence.\n\n\
         {}\n{JSON_ONLY}",
        fields(&[
            "grammar_score: 1-5",
            "word_usage_score: 1-5 for correct use of the required words",
            "relevance_score: 1-5 for relevance to the scene",
            "overall_score: 1-5",
            "feedback: Specific feedback on the sentence",
            "improved_sentence: An improved version of the sentence",
            "explanation: Why the improvements help",
        ])
    )
}

/// Image-generation prompt for a described scene.
#[must_use]
pub fn scene_image(scene: &SceneDescription) -> String {
    let excerpt: String = scene.scene_description.chars().take(200).collect();
    format!(
        "A realistic photograph of {}. The scene shows {excerpt}...",
        scene.scene_title
    )
}

//
// ─── EMAIL RESPONSE ───────────────────────────────────────────────────────────
//

#[must_use]
pub fn email_scenario(context: &str, tasks: &[String]) -> String {
    let task_list = tasks.join(" ");
    format!(
        "Generate a realistic e-mail for a TOEIC Writing test (Questions 6-7) about: {context}.\n\n\
         The test taker's reply must complete these tasks: {task_list}\n\n\
         {}\n{JSON_ONLY}",
        fields(&[
            "email_subject: A clear subject line",
            "sender_name: The sender's name",
            "sender_position: The sender's position or role",
            "recipient_name: The recipient's name (the test taker)",
            "recipient_position: The recipient's position or role",
            "email_body: The full e-mail text (150-200 words)",
            &format!("context: The context of the e-mail ({context})"),
            "tasks: An array with the tasks listed above",
            "key_points: 3-5 points a good reply should address",
            "sample_response: A sample good reply that completes every task",
        ])
    )
}

#[must_use]
pub fn email_evaluation(response: &str, scenario: &EmailScenario, tasks: &[String]) -> String {
    format!(
        "Evaluate this e-mail reply written for a TOEIC Writing test (Questions 6-7).\n\n\
         Original subject: {}\n\
         Original e-mail:\n{}\n\n\
         Required tasks: {}\n\n\
         Student reply:\n{response}\n\n\
         Judge task completion (every task addressed), organization (structure, coherence, \
         connecting words), sentence variety, grammar and vocabulary. Give specific feedback \
         for each area and an overall assessment.\n\n\
         {}\n{JSON_ONLY}",
        scenario.email_subject,
        scenario.email_body,
        tasks.join(" "),
        fields(&[
            "task_completion_score: 1-5",
            "organization_score: 1-5",
            "sentence_variety_score: 1-5",
            "grammar_score: 1-5",
            "vocabulary_score: 1-5",
            "overall_score: 1-5",
            "task_completion_feedback",
            "organization_feedback",
            "sentence_variety_feedback",
            "grammar_feedback",
            "vocabulary_feedback",
            "overall_feedback: General feedback and suggestions",
            "improved_response: A suggested improved reply",
        ])
    )
}

//
// ─── OPINION ESSAY ────────────────────────────────────────────────────────────
//

#[must_use]
pub fn essay_prompt(topic: &str, essay_type: &str) -> String {
    format!(
        "Generate a realistic essay prompt for a TOEIC Writing test (Question 8).\n\
         Topic: {topic}\nEssay type: {essay_type}\n\n\
         {}\n{JSON_ONLY}",
        fields(&[
            "essay_prompt: The full prompt text (50-100 words)",
            &format!("topic: {topic}"),
            &format!("essay_type: {essay_type}"),
            "key_points: 3-5 points a good essay should address",
            "suggested_structure: A brief outline of a good essay",
            "sample_essay: A sample good essay (about 300 words)",
        ])
    )
}

#[must_use]
pub fn essay_evaluation(essay: &str, prompt: &EssayPrompt) -> String {
    format!(
        "Evaluate this essay written for a TOEIC Writing test (Question 8).\n\n\
         Essay prompt: {}\n\n\
         Student essay:\n{essay}\n\n\
         Judge organization (thesis, logical structure, conclusion), development (specific \
         details and examples), coherence and cohesion (transitions, flow), grammar and \
         vocabulary. Give specific feedback for each area and an overall assessment.\n\n\
         {}\n{JSON_ONLY}",
        prompt.essay_prompt,
        fields(&[
            "organization_score: 1-5",
            "development_score: 1-5",
            "coherence_score: 1-5",
            "grammar_score: 1-5",
            "vocabulary_score: 1-5",
            "overall_score: 1-5",
            "organization_feedback",
            "development_feedback",
            "coherence_feedback",
            "grammar_feedback",
            "vocabulary_feedback",
            "overall_feedback: General feedback and suggestions",
            "improved_essay: A suggested improved version",
        ])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use toeic_core::model::catalog::SINGLE_PASSAGE;

    #[test]
    fn builders_are_deterministic_and_mention_inputs() {
        let a = incomplete_sentence("Tourism");
        assert_eq!(a, incomplete_sentence("Tourism"));
        assert!(a.contains("topic of Tourism"));
        assert!(a.contains("correct_answer"));
    }

    #[test]
    fn reading_prompt_depends_on_passage_type() {
        let double = reading_comprehension("Memos", DOUBLE_PASSAGE, 5);
        assert!(double.contains("An array of two passages"));
        assert!(double.contains("An array of 5 objects"));
        let single = reading_comprehension("Memos", SINGLE_PASSAGE, 3);
        assert!(single.contains("The full text of the passage"));
    }

    #[test]
    fn scene_image_truncates_long_descriptions() {
        let scene = SceneDescription {
            scene_title: "Busy cafe".into(),
            scene_description: "x".repeat(500),
            suggested_sentence: String::new(),
        };
        let prompt = scene_image(&scene);
        assert!(prompt.starts_with("A realistic photograph of Busy cafe."));
        assert_eq!(prompt.matches('x').count(), 200);
    }

    #[test]
    fn email_prompt_lists_tasks() {
        let tasks = vec!["Ask TWO questions.".to_string(), "Explain ONE problem.".to_string()];
        let prompt = email_scenario("Schedules", &tasks);
        assert!(prompt.contains("Ask TWO questions. Explain ONE problem."));
    }
}
