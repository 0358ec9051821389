use rand::Rng;
use rand::seq::IndexedRandom;

use toeic_core::model::{ExerciseKind, LengthRule};

use crate::exercises::TopicPick;

/// How many items a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLength {
    Fixed(u32),
    /// Ask "another?" after every item.
    OpenEnded,
}

impl SessionLength {
    /// Length implied by a kind's rule when the user is not asked.
    #[must_use]
    pub fn default_for(rule: LengthRule) -> Self {
        match rule {
            LengthRule::Range { default, .. } => SessionLength::Fixed(default),
            LengthRule::OpenEnded => SessionLength::OpenEnded,
            LengthRule::Single => SessionLength::Fixed(1),
        }
    }
}

/// What the user asked for. `None` topic or subtype means a fresh random
/// draw for every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub topic: Option<String>,
    pub subtype: Option<String>,
    pub length: SessionLength,
}

impl SessionPlan {
    #[must_use]
    pub fn new(length: SessionLength) -> Self {
        Self {
            topic: None,
            subtype: None,
            length,
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Resolve the topic and subtype for the next item.
    pub fn pick(&self, kind: ExerciseKind, rng: &mut impl Rng) -> TopicPick {
        let topic = match &self.topic {
            Some(topic) => topic.clone(),
            None => kind
                .topics()
                .choose(rng)
                .map_or_else(String::new, |t| (*t).to_string()),
        };
        let subtype = self.subtype.clone().or_else(|| {
            kind.subtypes()
                .choose(rng)
                .map(|s| (*s).to_string())
        });
        TopicPick { topic, subtype }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_picks_come_from_the_catalog() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = SessionPlan::new(SessionLength::Fixed(3));
        for kind in ExerciseKind::ALL {
            let pick = plan.pick(kind, &mut rng);
            assert!(kind.topics().contains(&pick.topic.as_str()));
            match &pick.subtype {
                Some(subtype) => assert!(kind.subtypes().contains(&subtype.as_str())),
                None => assert!(kind.subtypes().is_empty()),
            }
        }
    }

    #[test]
    fn chosen_topic_and_subtype_are_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = SessionPlan::new(SessionLength::Fixed(1))
            .with_topic("Memos")
            .with_subtype("Double passage");
        let pick = plan.pick(ExerciseKind::ReadingComprehension, &mut rng);
        assert_eq!(pick, TopicPick::new("Memos", Some("Double passage".into())));
    }

    #[test]
    fn default_lengths_follow_rules() {
        assert_eq!(
            SessionLength::default_for(ExerciseKind::IncompleteSentences.length_rule()),
            SessionLength::Fixed(5)
        );
        assert_eq!(
            SessionLength::default_for(ExerciseKind::OpinionEssay.length_rule()),
            SessionLength::Fixed(1)
        );
        assert_eq!(
            SessionLength::default_for(ExerciseKind::EmailResponse.length_rule()),
            SessionLength::OpenEnded
        );
    }
}
