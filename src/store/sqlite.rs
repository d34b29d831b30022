use sqlx::sqlite::SqlitePool;

use super::{CatalogStore, Error};
use crate::models::{q, Entry};

/// Catalog store backed by the `states` table.
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert or overwrite entries by name in a single transaction. Either
    /// every row is written or none is. Names match case-insensitively and
    /// the stored name takes the spelling of the last write.
    pub async fn upsert_all(&self, entries: &[Entry]) -> Result<(), Error> {
        let mut tx = self.db.begin().await?;
        for e in entries {
            sqlx::query(&q.upsert_state.query)
                .bind(&e.name)
                .bind(&e.code)
                .bind(e.frequency as i64)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, Error> {
        let (n,): (i64,) = sqlx::query_as(&q.count_states.query)
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}

impl CatalogStore for SqliteStore {
    async fn fetch_all(&self) -> Result<Vec<Entry>, Error> {
        let entries: Vec<Entry> = sqlx::query_as(&q.get_states.query)
            .fetch_all(&self.db)
            .await?;
        Ok(entries)
    }

    async fn increment_popularity(&self, name: &str) -> Result<(), Error> {
        let res = sqlx::query(&q.increment_frequency.query)
            .bind(name)
            .execute(&self.db)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound(name.to_string()));
        }
        Ok(())
    }
}
