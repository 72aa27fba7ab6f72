//! Per-key album locks
//!
//! Album lookup-or-create must not interleave for the same (name, artist)
//! key, otherwise two concurrent imports could both miss the lookup and
//! both create the album. Different keys proceed in parallel.

use hearth_core::AlbumKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

#[derive(Debug, Default)]
pub struct AlbumKeyLocks {
    locks: Mutex<HashMap<AlbumKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl AlbumKeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `key`
    pub async fn lock(&self, key: &AlbumKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(AlbumKeyLocks::new());
        let key = AlbumKey::new("Abbey Road", "The Beatles");

        let guard = locks.lock(&key).await;

        let locks_clone = Arc::clone(&locks);
        let key_clone = key.clone();
        let waiter = tokio::spawn(async move {
            let _guard = locks_clone.lock(&key_clone).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = AlbumKeyLocks::new();
        let _a = locks.lock(&AlbumKey::new("Abbey Road", "The Beatles")).await;
        let _b = locks.lock(&AlbumKey::new("abbey road", "The Beatles")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_keys_are_pruned() {
        let locks = AlbumKeyLocks::new();
        drop(locks.lock(&AlbumKey::new("A", "X")).await);
        drop(locks.lock(&AlbumKey::new("B", "Y")).await);
        assert_eq!(locks.len(), 1);
    }
}
