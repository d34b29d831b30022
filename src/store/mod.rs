mod sqlite;

#[cfg(test)]
pub mod memory;

pub use sqlite::SqliteStore;

use std::future::Future;

use crate::models::Entry;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("entry not found: {0}")]
    NotFound(String),
}

/// Durable catalog that backs the prefix index.
pub trait CatalogStore: Send + Sync + 'static {
    /// Fetch every catalog entry. Called once at startup to build the index.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Entry>, Error>> + Send;

    /// Persist a +1 to the named entry's frequency.
    fn increment_popularity(&self, name: &str)
        -> impl Future<Output = Result<(), Error>> + Send;
}
