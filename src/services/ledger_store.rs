use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};
use tokio::sync::Mutex;
use crate::errors::{AppResult, LedgerResult};
use crate::models::Ledger;
use super::json_file::{read_json_or_default, write_json_atomic};

/// Backing storage for the ledgers of registered users.
pub trait LedgerStore: Send + Sync {
    fn load(&self, owner: &str) -> AppResult<Ledger>;
    fn save(&self, owner: &str, ledger: &Ledger) -> AppResult<()>;
}

/// One pretty-printed JSON file per user: `<data_dir>/atividades_data_<owner>.json`.
pub struct JsonFileLedgerStore {
    data_dir: PathBuf,
}

impl JsonFileLedgerStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn path_for(&self, owner: &str) -> PathBuf {
        self.data_dir.join(format!("atividades_data_{}.json", owner))
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self, owner: &str) -> AppResult<Ledger> {
        let path = self.path_for(owner);
        let ledger: Ledger = read_json_or_default(&path).map_err(|e| {
            tracing::error!("Failed to load ledger {}: {}", path.display(), e);
            e
        })?;
        tracing::debug!("Loaded {} activities for {}", ledger.len(), owner);
        Ok(ledger)
    }

    fn save(&self, owner: &str, ledger: &Ledger) -> AppResult<()> {
        let path = self.path_for(owner);
        write_json_atomic(&path, ledger).map_err(|e| {
            tracing::error!("Failed to save ledger {}: {}", path.display(), e);
            e
        })?;
        tracing::debug!("Saved {} activities for {}", ledger.len(), owner);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLedgerStore {
    ledgers: StdMutex<HashMap<String, Ledger>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self, owner: &str) -> AppResult<Ledger> {
        let ledgers = self.ledgers.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(ledgers.get(owner).cloned().unwrap_or_default())
    }

    fn save(&self, owner: &str, ledger: &Ledger) -> AppResult<()> {
        let mut ledgers = self.ledgers.lock().unwrap_or_else(PoisonError::into_inner);
        ledgers.insert(owner.to_string(), ledger.clone());
        Ok(())
    }
}

/// Runs ledger read-modify-write cycles against a [`LedgerStore`], one at a
/// time per owner.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    locks: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    fn owner_lock(&self, owner: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(owner.to_string()).or_default().clone()
    }

    // Drops the owner's entry once no other request holds or waits on it.
    fn release_owner_lock(&self, owner: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(owner);
        }
    }

    #[cfg(test)]
    fn tracked_owners(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn read(&self, owner: &str) -> AppResult<Ledger> {
        self.store.load(owner)
    }

    /// Loads the owner's ledger, applies `op` and saves the result.
    /// Nothing is written when `op` fails.
    pub async fn update<T, F>(&self, owner: &str, op: F) -> AppResult<(Ledger, T)>
    where
        F: FnOnce(&mut Ledger) -> LedgerResult<T>,
    {
        let lock = self.owner_lock(owner);
        let result = {
            let _guard = lock.lock().await;
            self.store.load(owner).and_then(|mut ledger| {
                let value = op(&mut ledger)?;
                self.store.save(owner, &ledger)?;
                Ok((ledger, value))
            })
        };
        self.release_owner_lock(owner, lock);
        result
    }
}
