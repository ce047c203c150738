//! The destructor guard set.
//!
//! Process-wide map from an object's storage address to a "native
//! teardown already happened" flag. Destruction can be triggered from
//! arbitrary call sites on arbitrary threads, so the check-and-set must be
//! atomic per key; the map is sharded so distinct addresses do not
//! contend.

use dashmap::DashMap;

/// Concurrent address-to-flag map guarding native teardown.
#[derive(Debug, Default)]
pub struct DestructorGuards {
    inner: DashMap<usize, bool>,
}

impl DestructorGuards {
    /// Creates an empty guard set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims teardown for an address.
    ///
    /// Returns true for exactly one caller per lifecycle: that caller must
    /// run the native destructor. Every other caller (including the same
    /// thread re-entering through a base-class step) sees false and must
    /// skip it. The entry guard holds the shard lock, so two threads can
    /// never both observe "not yet torn down".
    pub fn begin_teardown(&self, address: usize) -> bool {
        let mut flag = self.inner.entry(address).or_insert(false);
        if *flag {
            false
        } else {
            *flag = true;
            true
        }
    }

    /// Sets the flag without claiming: the construction path uses this to
    /// make the pretend teardown chain a no-op.
    pub fn lock(&self, address: usize) {
        self.inner.insert(address, true);
    }

    /// Returns true if teardown has already happened for this address.
    #[must_use]
    pub fn is_locked(&self, address: usize) -> bool {
        self.inner.get(&address).is_some_and(|flag| *flag)
    }

    /// Removes the entry once the full outer destruction sequence for this
    /// address is complete and the storage can only be reused through a
    /// fresh construction.
    pub fn release(&self, address: usize) {
        self.inner.remove(&address);
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
