//! Database Models
//!
//! Row types for the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One stored session snapshot, as persisted.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub account: String,
    /// JSON-serialized [`SessionSnapshot`](crate::application::services::session::SessionSnapshot).
    pub snapshot: String,
    pub updated_at: DateTime<Utc>,
}
