//! Concurrent per-sender counter

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Message counts keyed by sender.
pub type TallyMap = HashMap<String, u64>;

/// Counter shared by every fetch task of a run.
///
/// Each [`increment`](Self::increment) is a single read-modify-write
/// under one lock, so concurrent callers never lose updates.
#[derive(Debug, Default)]
pub struct SenderTally {
    counts: Mutex<TallyMap>,
}

impl SenderTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one message for `address`, returning the count before it.
    pub fn increment(&self, address: &str) -> u64 {
        let mut counts = self.lock();
        let count = counts.entry(address.to_string()).or_insert(0);
        let previous = *count;
        *count += 1;
        drop(counts);

        debug!("{}: {}", address, previous + 1);
        previous
    }

    /// Copy of the current counts.
    #[must_use]
    pub fn snapshot(&self) -> TallyMap {
        self.lock().clone()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lock().values().sum()
    }

    /// Number of distinct senders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the guard cannot leave a half-applied
    // increment behind, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, TallyMap> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
