use services::PracticeStats;
use services::format::{rule, tally, thin_rule};

/// Render statistics as console lines.
pub fn render(stats: &PracticeStats) -> Vec<String> {
    let mut lines = vec![
        format!("\n{}", rule()),
        format!("{} - Statistics", stats.kind.title()),
        rule(),
    ];
    if stats.is_empty() {
        lines.push("No practice history found. Complete a session first!".to_string());
        lines.push(rule());
        return lines;
    }

    lines.push(format!("Total sessions: {}", stats.sessions));
    lines.push(format!("Total {}s: {}", stats.kind.item_noun(), stats.items));
    lines.push(format!("Overall: {}", tally(stats.scale(), stats.totals)));
    if stats.placeholder_items > 0 {
        lines.push(format!(
            "Items with placeholder content: {}",
            stats.placeholder_items
        ));
    }

    for breakdown in &stats.breakdowns {
        lines.push(format!("\nPerformance by {}:", breakdown.dimension.to_lowercase()));
        lines.push(thin_rule());
        for (label, row) in &breakdown.rows {
            lines.push(format!("{label}: {}", tally(stats.scale(), *row)));
        }
    }

    lines.push("\nRecent sessions:".to_string());
    lines.push(thin_rule());
    for session in &stats.recent {
        let mut line = format!(
            "Session {} ({}): {}",
            session.number,
            session.started_at.format("%Y-%m-%d %H:%M"),
            tally(stats.scale(), session.tally)
        );
        if let Some(topic) = &session.topic {
            line.push_str(&format!(" | {topic}"));
        }
        if let Some(subtype) = &session.subtype {
            line.push_str(&format!(" | {subtype}"));
        }
        if session.ended_early {
            line.push_str(" | ended early");
        }
        lines.push(line);
    }
    lines.push(rule());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::stats::compute;
    use toeic_core::model::{
        AnswerChoice, ExerciseKind, HistoryDocument, QuestionRecord, SessionRecord,
    };
    use toeic_core::time::fixed_now;

    #[test]
    fn empty_history_says_so() {
        let stats = compute(
            ExerciseKind::IncompleteSentences,
            &HistoryDocument::<QuestionRecord>::default(),
        );
        let lines = render(&stats);
        assert!(lines.iter().any(|l| l.starts_with("No practice history found")));
    }

    #[test]
    fn history_is_summarized() {
        let mut session = SessionRecord::new(fixed_now(), Some("Hiring".into()), None);
        session.record(QuestionRecord {
            topic: "Hiring".into(),
            sentence: "s".into(),
            user_answer: AnswerChoice::C,
            correct_answer: AnswerChoice::C,
            is_correct: true,
            placeholder: false,
        });
        session.mark_ended_early();
        let mut history = HistoryDocument::default();
        history.append(session);

        let lines = render(&compute(ExerciseKind::IncompleteSentences, &history));
        assert!(lines.contains(&"Overall: 1/1 correct (100.0%)".to_string()));
        assert!(lines.contains(&"Hiring: 1/1 correct (100.0%)".to_string()));
        assert!(lines.contains(
            &"Session 1 (2023-11-14 22:13): 1/1 correct (100.0%) | Hiring | ended early"
                .to_string()
        ));
    }
}
