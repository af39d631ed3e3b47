//! Session Repository
//!
//! Data access layer for session snapshots.

use super::models::SessionRecord;
use super::{DatabaseError, DbPool};
use crate::application::services::session::SessionSnapshot;
use chrono::Utc;
use tracing::{debug, error};

/// Session snapshot repository
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Save (upsert) the snapshot for an account.
    pub async fn save(
        &self,
        account: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), DatabaseError> {
        let payload = serde_json::to_string(snapshot)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sessions (account, snapshot, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(account) DO UPDATE SET
                snapshot = excluded.snapshot,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(account)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to save session for {}: {}", account, e);
            DatabaseError::QueryError(format!("Failed to save session: {}", e))
        })?;

        debug!("Saved session snapshot for {}", account);
        Ok(())
    }

    /// Load the snapshot for an account, if one was ever saved.
    pub async fn load(&self, account: &str) -> Result<Option<SessionSnapshot>, DatabaseError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT account, snapshot, updated_at FROM sessions WHERE account = ?1",
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load session for {}: {}", account, e);
            DatabaseError::QueryError(format!("Failed to load session: {}", e))
        })?;

        match record {
            Some(record) => {
                let snapshot = serde_json::from_str(&record.snapshot)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
                debug!(
                    "Loaded session snapshot for {} (saved {})",
                    account, record.updated_at
                );
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Remove an account's snapshot.
    pub async fn delete(&self, account: &str) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sessions WHERE account = ?1")
            .bind(account)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("Failed to delete session: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog::MarketCatalog;
    use crate::domain::entities::clock::SimulationClock;
    use crate::domain::entities::portfolio::Portfolio;
    use crate::persistence::init_database;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn snapshot() -> SessionSnapshot {
        let mut rng = StdRng::seed_from_u64(5);
        SessionSnapshot {
            catalog: MarketCatalog::seeded(&mut rng),
            portfolio: Portfolio::default(),
            clock: SimulationClock::default(),
            daily_news: None,
            previous_news: None,
            annotations: BTreeMap::new(),
            sector_impacts: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = SessionRepository::new(pool);

        repo.save("classroom-1", &snapshot()).await.unwrap();
        let loaded = repo.load("classroom-1").await.unwrap().unwrap();

        assert_eq!(loaded.clock.day(), 1);
        assert_eq!(loaded.portfolio.cash(), 10_000_000);
        assert_eq!(loaded.catalog.len(), 20);
    }

    #[tokio::test]
    async fn test_load_missing_account() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = SessionRepository::new(pool);

        assert!(repo.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = SessionRepository::new(pool);

        repo.save("classroom-1", &snapshot()).await.unwrap();

        let mut newer = snapshot();
        newer.clock.advance();
        repo.save("classroom-1", &newer).await.unwrap();

        let loaded = repo.load("classroom-1").await.unwrap().unwrap();
        assert_eq!(loaded.clock.day(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_snapshot() {
        let pool = init_database("sqlite::memory:").await.unwrap();
        let repo = SessionRepository::new(pool);

        repo.save("classroom-1", &snapshot()).await.unwrap();
        repo.delete("classroom-1").await.unwrap();

        assert!(repo.load("classroom-1").await.unwrap().is_none());
    }
}
