use std::sync::{Arc, Mutex, MutexGuard};

use crate::ledger::LendingLedger;

/// cloneable handle giving several threads serialized access to one ledger
///
/// Each closure passed to [`SharedLedger::with`] runs under the lock, so a
/// whole operation (checks, transfers and record updates) executes without
/// interleaving. A poisoned lock is recovered: ledger operations only write
/// records after their fallible steps, so a panic mid-call leaves them intact.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<LendingLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: LendingLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut LendingLedger) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn lock(&self) -> MutexGuard<'_, LendingLedger> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl From<LendingLedger> for SharedLedger {
    fn from(ledger: LendingLedger) -> Self {
        Self::new(ledger)
    }
}
