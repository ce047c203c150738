//! Address discovery: the external per-platform address table.

use bindforge_model::BindingId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// A raw address inside the target binary's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeAddress(pub usize);

impl fmt::Display for NativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The external address table: binding identifier to native address.
///
/// Populated per platform by the host before any wrapper runs; the
/// generator never writes it.
pub trait AddressTable: Send + Sync {
    /// Looks up the address registered for a binding identifier.
    fn lookup(&self, id: BindingId) -> Option<NativeAddress>;
}

/// Map-backed address table with runtime registration.
#[derive(Debug, Default)]
pub struct StaticAddressTable {
    inner: RwLock<HashMap<BindingId, NativeAddress>>,
}

impl StaticAddressTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an address for a binding identifier, replacing any
    /// previous entry.
    pub fn register(&self, id: BindingId, address: NativeAddress) {
        self.inner.write().insert(id, address);
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl AddressTable for StaticAddressTable {
    fn lookup(&self, id: BindingId) -> Option<NativeAddress> {
        self.inner.read().get(&id).copied()
    }
}
