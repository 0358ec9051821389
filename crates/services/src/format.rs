use toeic_core::model::{ScoreScale, Tally};

const RULE_WIDTH: usize = 80;

/// The 80-column `=` separator used around every block of output.
#[must_use]
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Half-width `-` separator for sub-blocks.
#[must_use]
pub fn thin_rule() -> String {
    "-".repeat(RULE_WIDTH / 2)
}

/// One-line tally, e.g. `7/10 correct (70.0%)` or `4.00/5 average over 3`.
#[must_use]
pub fn tally(scale: ScoreScale, tally: Tally) -> String {
    match scale {
        ScoreScale::Accuracy => match tally.accuracy_percent() {
            Some(pct) => format!("{}/{} correct ({pct:.1}%)", tally.score, tally.attempted),
            None => "0/0 correct".to_string(),
        },
        ScoreScale::Rubric { max } => match tally.average() {
            Some(avg) => format!("{avg:.2}/{max} average over {}", tally.attempted),
            None => "no pieces evaluated".to_string(),
        },
    }
}
