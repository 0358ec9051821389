//! Interactive menus shown before and between sessions.

use services::format::rule;
use services::input::{ask_menu, ask_number};
use services::{Console, SessionLength, SessionPlan};
use toeic_core::model::{ExerciseKind, LengthRule};

/// What to do with the selected exercise kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindAction {
    Start,
    Stats,
    Back,
}

/// Pick an exercise kind, or `None` to exit.
pub async fn choose_kind(console: &mut dyn Console) -> Option<ExerciseKind> {
    console.say(&format!("\n{}", rule()));
    console.say("TOEIC Practice");
    console.say(&rule());
    for (i, kind) in ExerciseKind::ALL.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, kind.title()));
    }
    let exit = ExerciseKind::ALL.len() + 1;
    console.say(&format!("{exit}. Exit"));
    let choice = ask_menu(console, &format!("\nEnter your choice (1-{exit}): "), exit).await?;
    ExerciseKind::ALL.get(choice - 1).copied()
}

/// The per-kind menu. End of input counts as going back.
pub async fn kind_action(console: &mut dyn Console, kind: ExerciseKind) -> KindAction {
    console.say(&format!("\n{}", rule()));
    console.say(kind.title());
    console.say(&rule());
    console.say("1. Start a practice session");
    console.say("2. View statistics");
    console.say("3. Exit");
    match ask_menu(console, "\nEnter your choice (1-3): ", 3).await {
        Some(1) => KindAction::Start,
        Some(2) => KindAction::Stats,
        _ => KindAction::Back,
    }
}

/// Ask for length, topic and subtype. `None` at end of input.
pub async fn plan_session(console: &mut dyn Console, kind: ExerciseKind) -> Option<SessionPlan> {
    let noun = kind.item_noun();
    let length = match kind.length_rule() {
        LengthRule::Range { min, max, default } => {
            let prompt =
                format!("\nHow many {noun}s would you like to practice? ({min}-{max}, default {default}): ");
            SessionLength::Fixed(ask_number(console, &prompt, min..=max, Some(default)).await?)
        }
        rule => SessionLength::default_for(rule),
    };

    let mut plan = SessionPlan::new(length);
    plan.topic = choose_from(console, kind.topic_label(), kind.topics()).await?;
    if let Some(label) = kind.selectable_subtype() {
        plan.subtype = choose_from(console, label, kind.subtypes()).await?;
    }
    Some(plan)
}

/// Numbered list with a trailing "Random" entry. `Some(None)` means random.
async fn choose_from(
    console: &mut dyn Console,
    label: &str,
    entries: &[&str],
) -> Option<Option<String>> {
    console.say(&format!("\nAvailable {}s:", label.to_lowercase()));
    for (i, entry) in entries.iter().enumerate() {
        console.say(&format!("{}. {entry}", i + 1));
    }
    let random = entries.len() + 1;
    console.say(&format!("{random}. Random"));
    let choice = ask_menu(
        console,
        &format!("\nSelect a {} (1-{random}): ", label.to_lowercase()),
        random,
    )
    .await?;
    Some(entries.get(choice - 1).map(|entry| (*entry).to_string()))
}
