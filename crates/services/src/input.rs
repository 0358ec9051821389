//! Validated input helpers built on [`Console`].
//!
//! Every helper loops on invalid input and never advances state for it. End
//! of input is reported to the caller rather than treated as an answer.

use std::ops::RangeInclusive;
use std::time::Duration;

use tokio::time::Instant;
use toeic_core::model::AnswerChoice;

use crate::console::{Console, ConsoleInput};

pub const INVALID_CHOICE: &str = "Invalid input. Please enter A, B, C, D, or Q.";

/// A multiple-choice answer or the early-termination token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceInput {
    Answer(AnswerChoice),
    Quit,
}

/// Ask for `A`-`D` or `Q`; end of input counts as `Q`.
pub async fn ask_choice(console: &mut dyn Console, prompt: &str) -> ChoiceInput {
    loop {
        let line = match console.read_line(prompt).await {
            ConsoleInput::Line(line) => line,
            ConsoleInput::TimedOut | ConsoleInput::Closed => return ChoiceInput::Quit,
        };
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            return ChoiceInput::Quit;
        }
        match trimmed.parse::<AnswerChoice>() {
            Ok(choice) => return ChoiceInput::Answer(choice),
            Err(_) => console.say(INVALID_CHOICE),
        }
    }
}

/// Ask for a whole number in `range`; an empty line selects `default`.
///
/// Returns `None` at end of input.
pub async fn ask_number(
    console: &mut dyn Console,
    prompt: &str,
    range: RangeInclusive<u32>,
    default: Option<u32>,
) -> Option<u32> {
    loop {
        let line = match console.read_line(prompt).await {
            ConsoleInput::Line(line) => line,
            ConsoleInput::TimedOut | ConsoleInput::Closed => return None,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(default) = default {
                return Some(default);
            }
        }
        match trimmed.parse::<u32>() {
            Ok(n) if range.contains(&n) => return Some(n),
            Ok(_) => console.say(&format!(
                "Please enter a number between {} and {}.",
                range.start(),
                range.end()
            )),
            Err(_) => console.say("Please enter a valid number."),
        }
    }
}

/// Ask for a menu entry `1..=count`; returns the 1-based selection.
pub async fn ask_menu(console: &mut dyn Console, prompt: &str, count: usize) -> Option<usize> {
    loop {
        let line = match console.read_line(prompt).await {
            ConsoleInput::Line(line) => line,
            ConsoleInput::TimedOut | ConsoleInput::Closed => return None,
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Some(n),
            _ => console.say(&format!(
                "Invalid choice. Please enter a number between 1 and {count}."
            )),
        }
    }
}

/// Yes/no question; end of input answers "no".
pub async fn confirm(console: &mut dyn Console, prompt: &str) -> bool {
    loop {
        let line = match console.read_line(prompt).await {
            ConsoleInput::Line(line) => line,
            ConsoleInput::TimedOut | ConsoleInput::Closed => return false,
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => console.say("Please enter y or n."),
        }
    }
}

/// Wait for Enter. Returns `false` at end of input.
pub async fn pause(console: &mut dyn Console, prompt: &str) -> bool {
    matches!(console.read_line(prompt).await, ConsoleInput::Line(_))
}

//
// ─── TIMED FREE TEXT ──────────────────────────────────────────────────────────
//

/// How free-text collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// An empty line after some content.
    Finished,
    /// The time limit ran out; whatever was typed is submitted.
    TimedOut,
    /// A lone `q` before any content.
    Quit,
    /// End of input.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub ending: Ending,
}

impl Submission {
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Minutes(u64),
    TenSeconds(u64),
}

/// Decides when to print the remaining time.
///
/// In the last minute it speaks once per 10-second bucket, before that once
/// per whole minute. The first observation is silent.
#[derive(Debug, Default)]
pub struct Countdown {
    last: Option<Bucket>,
}

impl Countdown {
    pub fn announce(&mut self, remaining: Duration) -> Option<String> {
        let secs = remaining.as_secs();
        let (bucket, message) = if secs <= 60 {
            (
                Bucket::TenSeconds(secs / 10),
                format!("Remaining time: {secs} seconds"),
            )
        } else {
            let minutes = secs.div_ceil(60);
            (
                Bucket::Minutes(minutes),
                format!("Remaining time: {minutes} minutes"),
            )
        };
        let previous = self.last.replace(bucket);
        match previous {
            Some(prev) if prev != bucket => Some(message),
            _ => None,
        }
    }
}

/// Collect multi-line text until an empty line after content, the time
/// limit, or end of input.
pub async fn collect_text(console: &mut dyn Console, limit: Duration) -> Submission {
    let deadline = Instant::now() + limit;
    let mut countdown = Countdown::default();
    let mut lines: Vec<String> = Vec::new();

    let ending = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if let Some(message) = countdown.announce(remaining) {
            console.say(&message);
        }
        match console.read_line_until(deadline).await {
            ConsoleInput::Line(line) => {
                let has_content = lines.iter().any(|l| !l.trim().is_empty());
                if line.trim().is_empty() {
                    if has_content {
                        break Ending::Finished;
                    }
                    continue;
                }
                if !has_content && line.trim().eq_ignore_ascii_case("q") {
                    break Ending::Quit;
                }
                lines.push(line);
            }
            ConsoleInput::TimedOut => {
                console.say("Time's up! Your response has been submitted.");
                break Ending::TimedOut;
            }
            ConsoleInput::Closed => break Ending::Closed,
        }
    };

    Submission {
        text: lines.join("\n").trim().to_string(),
        ending,
    }
}
