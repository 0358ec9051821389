#![forbid(unsafe_code)]

pub mod model;
pub mod reply;
pub mod time;

pub use reply::{Parsed, Reply, ReplyError, parse_reply};
pub use time::Clock;
