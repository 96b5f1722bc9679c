//! Exclusion scopes and bounded waits.
//!
//! [`KeyedLocks`] hands out one async mutex per key (a staff id or a leave
//! request id), so operations on the same key are serialized while
//! operations on different keys run concurrently. [`with_timeout`] bounds
//! every wait on a collaborator.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{LedgerError, LedgerResult};

/// Idle entries are pruned once the table grows past this many keys.
const PRUNE_THRESHOLD: usize = 1024;

/// A table of per-key async mutexes.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    ///
    /// The scope lasts until the returned guard is dropped.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if locks.len() > PRUNE_THRESHOLD {
                // Only the table holds idle entries, and new holders need the table lock.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs `future`, failing with [`LedgerError::Timeout`] if it does not
/// finish within `timeout`.
///
/// The future is dropped on expiry and never retried here.
pub async fn with_timeout<F: Future>(
    operation: &str,
    timeout: Duration,
    future: F,
) -> LedgerResult<F::Output> {
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| LedgerError::Timeout {
            operation: operation.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.acquire("S1").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("S1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _first = locks.acquire("S1").await;

        let second = with_timeout("acquire", Duration::from_millis(100), locks.acquire("S2")).await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_holders_never_overlap() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..16 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("S1").await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_timeout_reports_operation() {
        let result = with_timeout(
            "get_leave",
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;

        match result {
            Err(LedgerError::Timeout {
                operation,
                timeout_ms,
            }) => {
                assert_eq!(operation, "get_leave");
                assert_eq!(timeout_ms, 10);
            }
            other => panic!("Expected Timeout error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_passes_through_output() {
        let result = with_timeout("noop", Duration::from_secs(1), async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
