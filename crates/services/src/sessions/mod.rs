mod plan;
mod runner;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionLength, SessionPlan};
pub use runner::{SessionOutcome, SessionRunner};
