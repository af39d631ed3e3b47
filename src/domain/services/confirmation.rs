//! Two-phase trade confirmation
//!
//! A trade is first *requested*, which parks the intent under a token;
//! the presentation layer then either confirms or cancels it. The ledger
//! only ever executes confirmed intents.

use crate::domain::errors::TradeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A buy or sell the user has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TradeIntent {
    Buy { instrument: String, quantity: u32 },
    Sell { instrument: String, quantity: u32 },
}

impl TradeIntent {
    pub fn instrument(&self) -> &str {
        match self {
            TradeIntent::Buy { instrument, .. } | TradeIntent::Sell { instrument, .. } => {
                instrument
            }
        }
    }
}

/// Opaque handle to a pending confirmation.
pub type ConfirmationToken = u64;

/// Registry of pending intents. Tokens are single-use: both confirm and
/// cancel consume them. Pending intents live only in memory; they are not
/// part of the persisted snapshot.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationRegistry {
    next_token: ConfirmationToken,
    pending: HashMap<ConfirmationToken, TradeIntent>,
}

impl ConfirmationRegistry {
    pub fn request(&mut self, intent: TradeIntent) -> ConfirmationToken {
        self.next_token += 1;
        self.pending.insert(self.next_token, intent);
        self.next_token
    }

    /// Take the intent for execution. Fails on unknown or already
    /// resolved tokens.
    pub fn confirm(&mut self, token: ConfirmationToken) -> Result<TradeIntent, TradeError> {
        self.pending.remove(&token).ok_or(TradeError::UnknownToken)
    }

    /// Discard a pending intent.
    pub fn cancel(&mut self, token: ConfirmationToken) -> Result<TradeIntent, TradeError> {
        self.pending.remove(&token).ok_or(TradeError::UnknownToken)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
