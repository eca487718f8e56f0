use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::{InMemoryStore, Storage};
use crate::{database::ValueType, error::StoreResult};

/// Cloneable handle to one [`InMemoryStore`] behind a single coarse lock.
///
/// Each call takes the lock for its whole duration, so operations from
/// different threads are linearised. Use [`SharedStore::with`] to run a
/// multi-step sequence atomically.
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<InMemoryStore>>,
}

impl SharedStore {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut InMemoryStore) -> R,
    ) -> R {
        f(&mut self.inner.lock())
    }

    /// Takes the lock and hands out the guard.
    pub fn lock(&self) -> MutexGuard<'_, InMemoryStore> {
        self.inner.lock()
    }
}

impl From<InMemoryStore> for SharedStore {
    fn from(store: InMemoryStore) -> Self {
        Self::new(store)
    }
}

impl Storage for SharedStore {
    fn exists(
        &self,
        key: &str,
    ) -> bool {
        self.lock().exists(key)
    }

    fn del(
        &mut self,
        key: &str,
    ) -> bool {
        self.lock().del(key)
    }

    fn rename(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<()> {
        self.lock().rename(from, to)
    }

    fn renamenx(
        &mut self,
        from: &str,
        to: &str,
    ) -> StoreResult<bool> {
        self.lock().renamenx(from, to)
    }

    fn type_of(
        &self,
        key: &str,
    ) -> Option<ValueType> {
        self.lock().type_of(key)
    }

    fn dbsize(&self) -> usize {
        self.lock().dbsize()
    }

    fn flushdb(&mut self) {
        self.lock().flushdb();
    }
}
