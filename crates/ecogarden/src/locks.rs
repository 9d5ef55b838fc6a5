//! Per-key async mutexes.
//!
//! Used for weather single-flight (one remote call per city key) and for
//! serializing reconciliations of the same advice. Entries are dropped as
//! soon as no task holds or waits on them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A map of lazily created async mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    inner: Mutex<HashMap<K, Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Tasks holding or waiting on `mutex`.
    users: usize,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    ///
    /// Cancel-safe: dropping the returned future while it is parked still
    /// releases the entry.
    pub async fn lock(&self, key: K) -> KeyedLockGuard<'_, K> {
        let registration = self.register(key);
        let guard = registration.mutex.clone().lock_owned().await;

        KeyedLockGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    fn register(&self, key: K) -> Registration<'_, K> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = map.entry(key.clone()).or_default();
        slot.users += 1;

        Registration {
            locks: self,
            key,
            mutex: slot.mutex.clone(),
        }
    }

    fn release(&self, key: &K) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = map.get_mut(key) {
            slot.users -= 1;
            if slot.users == 0 {
                map.remove(key);
            }
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts one holder or waiter of a key until dropped.
struct Registration<'a, K>
where
    K: Eq + Hash + Clone,
{
    locks: &'a KeyedLocks<K>,
    key: K,
    mutex: Arc<AsyncMutex<()>>,
}

impl<K> Drop for Registration<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// Exclusive access to one key. Released on drop.
pub struct KeyedLockGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    // Fields drop in order: the mutex is unlocked before the entry can go.
    _guard: OwnedMutexGuard<()>,
    _registration: Registration<'a, K>,
}
