//! Decoding of model replies into typed content.
//!
//! Decoding never fails from the caller's point of view: a reply that does not
//! match the expected shape is replaced by the caller-supplied placeholder and
//! tagged [`Parsed::Fallback`].

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReplyError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("reply decoded but is unusable: {0}")]
    Invalid(String),
}

/// A JSON shape the model can be asked to produce.
pub trait Reply: DeserializeOwned {
    /// Checks that cannot be expressed in the serde shape itself.
    ///
    /// # Errors
    ///
    /// Returns `ReplyError::Invalid` describing the first violated rule.
    fn validate(&self) -> Result<(), ReplyError> {
        Ok(())
    }
}

/// Outcome of decoding a reply: genuine content or the placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> Parsed<T> {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Parsed::Fallback(_))
    }

    #[must_use]
    pub fn get(&self) -> &T {
        match self {
            Parsed::Parsed(value) | Parsed::Fallback(value) => value,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Parsed::Parsed(value) | Parsed::Fallback(value) => value,
        }
    }
}

/// Decode `raw` strictly, unwrapping a Markdown code fence first.
///
/// # Errors
///
/// Returns `ReplyError::Json` on a shape mismatch and `ReplyError::Invalid`
/// when [`Reply::validate`] rejects the value.
pub fn decode<T: Reply>(raw: &str) -> Result<T, ReplyError> {
    let value: T = serde_json::from_str(strip_code_fence(raw))?;
    value.validate()?;
    Ok(value)
}

/// Decode `raw`, substituting `placeholder()` when decoding fails.
pub fn parse_reply<T: Reply>(raw: &str, placeholder: impl FnOnce() -> T) -> Parsed<T> {
    match decode(raw) {
        Ok(value) => Parsed::Parsed(value),
        Err(err) => {
            tracing::warn!(error = %err, "model reply did not match the expected shape");
            Parsed::Fallback(placeholder())
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the first newline.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
