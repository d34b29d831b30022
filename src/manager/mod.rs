use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};

use crate::{
    autocomplete::{rank, PrefixIndex},
    models::{Entry, Health},
    store::{self, CatalogStore},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("store error: {0}")]
    Store(#[from] store::Error),
}

/// Manager coordinates autocomplete queries: it owns the prefix index and
/// a handle to the catalog store that persists popularity.
pub struct Manager<S> {
    index: RwLock<PrefixIndex>,
    store: Arc<S>,
    store_failures: Arc<AtomicU64>,
}

impl<S: CatalogStore> Manager<S> {
    pub fn new(index: PrefixIndex, store: Arc<S>) -> Self {
        Self {
            index: RwLock::new(index),
            store,
            store_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build the index from the full catalog in the store. Duplicate names
    /// resolve to the last one fetched.
    pub async fn load(store: Arc<S>) -> Result<Self, Error> {
        let entries = store.fetch_all().await?;
        let n = entries.len();

        let index = PrefixIndex::from_entries(entries);
        if index.is_empty() {
            log::warn!("catalog is empty, every query will miss. Run `install` or `import`");
        } else {
            log::info!("loaded {} entries ({} unique) into index", n, index.len());
        }

        Ok(Self::new(index, store))
    }

    /// Run an autocomplete query for a raw prefix.
    ///
    /// Every match counts as a use: each returned entry has its frequency
    /// bumped in the index right away and in the store in the background.
    /// The returned list is ranked and carries frequencies as they were
    /// before this query's own increments. Store failures are logged and
    /// counted, never returned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn query(&self, prefix: &str) -> Vec<Entry> {
        let results = {
            let mut idx = self.index.write().unwrap_or_else(PoisonError::into_inner);

            let mut results = idx.search(prefix);
            if results.is_empty() {
                log::debug!("no matches for prefix '{}'", prefix);
                return results;
            }
            rank(&mut results);

            for e in &results {
                if idx.increment(&e.name).is_none() {
                    log::error!(
                        "index inconsistency: '{}' matched but was not found on increment",
                        e.name
                    );
                }
            }
            results
        };

        log::debug!("prefix '{}' matched {} entries", prefix, results.len());
        self.persist(results.iter().map(|e| e.name.clone()).collect());

        results
    }

    /// Send the increments to the store without waiting for them.
    fn persist(&self, names: Vec<String>) {
        let store = self.store.clone();
        let failures = self.store_failures.clone();

        tokio::spawn(async move {
            for name in names {
                if let Err(e) = store.increment_popularity(&name).await {
                    failures.fetch_add(1, Ordering::Relaxed);
                    log::error!("error updating frequency for '{}': {}", name, e);
                }
            }
        });
    }

    /// Current in-memory state of a single entry.
    pub fn get(&self, name: &str) -> Option<Entry> {
        let idx = self.index.read().unwrap_or_else(PoisonError::into_inner);
        idx.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.index.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of store updates that have failed since startup.
    pub fn store_failures(&self) -> u64 {
        self.store_failures.load(Ordering::Relaxed)
    }

    pub fn health(&self) -> Health {
        Health {
            entries: self.len(),
            store_failures: self.store_failures(),
        }
    }
}
