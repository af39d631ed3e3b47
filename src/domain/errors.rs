use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity tag attached to every user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Validation errors raised by ledger operations.
///
/// Every variant is recovered locally: the operation is a no-op and the
/// error is reported back to the caller for display.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum TradeError {
    #[error("Order quantity must be at least one share")]
    InvalidQuantity,

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Insufficient funds: at most {max_affordable} shares affordable")]
    InsufficientFunds { max_affordable: u64 },

    #[error("No shares of {0} are currently held")]
    NoSuchHolding(String),

    #[error("Sell quantity exceeds held shares ({held} held)")]
    InsufficientShares { held: u32 },

    #[error("Unknown or already resolved confirmation token")]
    UnknownToken,
}

impl TradeError {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Errors raised by the day clock.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    #[error("No news batch exists for the current day")]
    EmptyNewsBatch,
}

impl ClockError {
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }
}

/// Errors from the external text-generation collaborator.
///
/// `AnnotationUnavailable` is transient: a failed annotation degrades to
/// "no annotation for this article" and never aborts a day-advance.
#[derive(Debug, Error, Clone)]
pub enum NewsError {
    #[error("News generation failed: {0}")]
    GenerationFailed(String),

    #[error("Annotation unavailable: {0}")]
    AnnotationUnavailable(String),
}
