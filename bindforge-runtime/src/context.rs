//! The process-scoped bind context.
//!
//! Bundles the four external collaborators and the destructor guard set
//! into one explicit, injectable value. Tests build local contexts from
//! stubs; a host process installs one context at startup for the
//! generated wrappers to reach through [`context`].

use crate::address::{AddressTable, NativeAddress, StaticAddressTable};
use crate::adjust::{IdentityAdjust, ThunkAdjust};
use crate::error::RuntimeError;
use crate::guards::DestructorGuards;
use crate::symbol::{NullResolver, SymbolResolver};
use crate::trampoline::{AbstractSignature, CodePtr, DirectTrampoline, Trampoline};
use bindforge_model::{BindingId, CallingConvention};
use std::ffi::c_void;
use std::sync::{Arc, OnceLock};

/// Process-scoped bundle of collaborators for generated wrappers.
pub struct BindContext {
    addresses: Arc<dyn AddressTable>,
    trampoline: Arc<dyn Trampoline>,
    adjuster: Arc<dyn ThunkAdjust>,
    symbols: Arc<dyn SymbolResolver>,
    guards: DestructorGuards,
}

impl BindContext {
    /// Starts building a context.
    #[must_use]
    pub fn builder() -> BindContextBuilder {
        BindContextBuilder::new()
    }

    /// The address table collaborator.
    #[must_use]
    pub fn addresses(&self) -> &dyn AddressTable {
        self.addresses.as_ref()
    }

    /// The destructor guard set.
    #[must_use]
    pub fn guards(&self) -> &DestructorGuards {
        &self.guards
    }

    /// Adjusts a receiver for a virtual call.
    #[must_use]
    pub fn adjust(&self, receiver: *mut c_void, class: &str, member: BindingId) -> *mut c_void {
        self.adjuster.adjust(receiver, class, member)
    }

    /// Resolves a mangled symbol against the host image.
    #[must_use]
    pub fn resolve_symbol(&self, symbol: &str) -> Option<NativeAddress> {
        self.symbols.resolve(symbol)
    }

    /// Looks up a binding's address and turns it into a callable.
    ///
    /// # Errors
    /// Returns `RuntimeError` if the address table has no entry or the
    /// trampoline rejects the convention or signature.
    pub fn create_callable(
        &self,
        id: BindingId,
        convention: CallingConvention,
        signature: &AbstractSignature,
    ) -> Result<CodePtr, RuntimeError> {
        let address = self
            .addresses
            .lookup(id)
            .ok_or(RuntimeError::AddressMissing { id })?;
        tracing::debug!(%id, %address, ?convention, "resolved binding address");
        Ok(self
            .trampoline
            .create_callable(address, convention, signature)?)
    }
}

/// Builder for [`BindContext`]. Every collaborator has a neutral default
/// so tests can override only what they observe.
pub struct BindContextBuilder {
    addresses: Arc<dyn AddressTable>,
    trampoline: Arc<dyn Trampoline>,
    adjuster: Arc<dyn ThunkAdjust>,
    symbols: Arc<dyn SymbolResolver>,
}

impl BindContextBuilder {
    fn new() -> Self {
        Self {
            addresses: Arc::new(StaticAddressTable::new()),
            trampoline: Arc::new(DirectTrampoline),
            adjuster: Arc::new(IdentityAdjust),
            symbols: Arc::new(NullResolver),
        }
    }

    /// Sets the address table collaborator.
    #[must_use]
    pub fn addresses(mut self, addresses: Arc<dyn AddressTable>) -> Self {
        self.addresses = addresses;
        self
    }

    /// Sets the trampoline collaborator.
    #[must_use]
    pub fn trampoline(mut self, trampoline: Arc<dyn Trampoline>) -> Self {
        self.trampoline = trampoline;
        self
    }

    /// Sets the this-pointer adjustment collaborator.
    #[must_use]
    pub fn adjuster(mut self, adjuster: Arc<dyn ThunkAdjust>) -> Self {
        self.adjuster = adjuster;
        self
    }

    /// Sets the dynamic symbol resolver.
    #[must_use]
    pub fn symbols(mut self, symbols: Arc<dyn SymbolResolver>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> BindContext {
        BindContext {
            addresses: self.addresses,
            trampoline: self.trampoline,
            adjuster: self.adjuster,
            symbols: self.symbols,
            guards: DestructorGuards::new(),
        }
    }
}

impl Default for BindContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

static CONTEXT: OnceLock<BindContext> = OnceLock::new();

/// Installs the process-wide context. Call once at startup, before any
/// generated wrapper runs.
///
/// # Errors
/// Returns the context back if one is already installed.
pub fn install(context: BindContext) -> Result<(), BindContext> {
    CONTEXT.set(context)
}

/// The installed context, if any.
#[must_use]
pub fn try_context() -> Option<&'static BindContext> {
    CONTEXT.get()
}

/// The installed context.
///
/// # Panics
/// Panics if [`install`] has not run; a wrapper invoked before the host
/// wired up its collaborators cannot do anything meaningful.
#[must_use]
pub fn context() -> &'static BindContext {
    CONTEXT
        .get()
        .unwrap_or_else(|| panic!("{}", RuntimeError::ContextMissing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let context = BindContext::builder().build();
        assert!(context.addresses().lookup(BindingId(1)).is_none());
        assert!(context.resolve_symbol("_ZN4vane6Widget4tickEv").is_none());
        assert!(context.guards().is_empty());
    }

    #[test]
    fn test_create_callable_missing_address() {
        let context = BindContext::builder().build();
        let signature = AbstractSignature::function(&[], crate::trampoline::AbiType::Void);
        let err = context
            .create_callable(BindingId(9), CallingConvention::Default, &signature)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::AddressMissing { id } if id == BindingId(9)));
    }

    #[test]
    fn test_create_callable_through_table() {
        let table = Arc::new(StaticAddressTable::new());
        table.register(BindingId(9), NativeAddress(0x5000));
        let context = BindContext::builder().addresses(table).build();
        let signature = AbstractSignature::function(&[], crate::trampoline::AbiType::Void);
        let code = context
            .create_callable(BindingId(9), CallingConvention::Default, &signature)
            .expect("address registered");
        assert_eq!(code.as_ptr() as usize, 0x5000);
    }

    #[test]
    fn test_adjust_defaults_to_identity() {
        let context = BindContext::builder().build();
        let receiver = 0x2000 as *mut c_void;
        assert_eq!(
            context.adjust(receiver, "vane::Widget", BindingId(1)),
            receiver
        );
    }
}
