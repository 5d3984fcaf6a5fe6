//! Per-account mutual exclusion for checkouts inside one process.
//!
//! Two tasks checking out the same account at once would both miss the
//! existing-request lookup and both create a request. Holding the account's
//! lock across the whole checkout makes the second task see the first one's
//! request instead. Processes are not coordinated.
//!
//! The table only holds weak references, so an account's entry disappears
//! once no task holds or waits for its lock.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};
use tokio::sync::{Mutex, OwnedMutexGuard};

type AccountKey = (String, String);

/// Lock table keyed by `(system name, account name)`.
#[derive(Debug, Clone, Default)]
pub struct CheckoutGuard {
    locks: Arc<Mutex<HashMap<AccountKey, Weak<Mutex<()>>>>>,
}

impl CheckoutGuard {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `account_name` on `system_name`.
    pub async fn lock(&self, system_name: &str, account_name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, entry| entry.strong_count() > 0);

            let key = (system_name.to_string(), account_name.to_string());
            if let Some(live) = locks.get(&key).and_then(Weak::upgrade) {
                live
            } else {
                let fresh = Arc::new(Mutex::new(()));
                locks.insert(key, Arc::downgrade(&fresh));
                fresh
            }
        };
        lock.lock_owned().await
    }
}
