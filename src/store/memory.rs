use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use super::{CatalogStore, Error};
use crate::models::Entry;

/// In-memory catalog store for tests. Can be switched into a failing mode
/// where every update errors like an unreachable database.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
    fail: AtomicBool,
}

impl MemoryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn frequency(&self, name: &str) -> Option<u64> {
        let entries = self.entries.lock().unwrap();
        entries.iter().find(|e| e.name == name).map(|e| e.frequency)
    }
}

impl CatalogStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Entry>, Error> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn increment_popularity(&self, name: &str) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Db(sqlx::Error::PoolTimedOut));
        }

        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().rev().find(|e| e.name == name) {
            Some(e) => {
                e.frequency += 1;
                Ok(())
            }
            None => Err(Error::NotFound(name.to_string())),
        }
    }
}
