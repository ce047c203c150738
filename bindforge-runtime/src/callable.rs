//! Per-binding resolve-once cache.
//!
//! Every generated non-symbol wrapper owns one static [`BoundFn`]. The
//! first invocation resolves address table plus trampoline; racing
//! callers converge on whichever callable landed first and the result is
//! cached for the remainder of the process.

use crate::context::BindContext;
use crate::error::RuntimeError;
use crate::trampoline::{AbstractSignature, CodePtr};
use bindforge_model::{BindingId, CallingConvention};
use std::sync::OnceLock;

/// A lazily resolved native function, keyed by binding identifier.
#[derive(Debug)]
pub struct BoundFn {
    id: BindingId,
    convention: CallingConvention,
    slot: OnceLock<CodePtr>,
}

impl BoundFn {
    /// Creates an unresolved binding cell. `const` so generated wrappers
    /// can hold one in a `static`.
    #[must_use]
    pub const fn new(id: BindingId, convention: CallingConvention) -> Self {
        Self {
            id,
            convention,
            slot: OnceLock::new(),
        }
    }

    /// The binding identifier.
    #[must_use]
    pub const fn id(&self) -> BindingId {
        self.id
    }

    /// The calling convention metadata.
    #[must_use]
    pub const fn convention(&self) -> CallingConvention {
        self.convention
    }

    /// Resolves the callable, caching on first success.
    ///
    /// # Errors
    /// Returns `RuntimeError` if the address is missing or the trampoline
    /// rejects the convention or signature. Failures are not cached: they
    /// indicate a version mismatch that the caller treats as fatal anyway.
    pub fn try_resolve(
        &self,
        context: &BindContext,
        signature: &AbstractSignature,
    ) -> Result<CodePtr, RuntimeError> {
        if let Some(&code) = self.slot.get() {
            return Ok(code);
        }
        let code = context.create_callable(self.id, self.convention, signature)?;
        // First writer wins; concurrent resolvers all observe the stored
        // value, never a partially initialized one.
        Ok(*self.slot.get_or_init(|| code))
    }

    /// Resolves the callable, caching on first success.
    ///
    /// # Panics
    /// Panics on resolution failure: a missing address or rejected
    /// convention means the running binary does not match the binding
    /// data, which no retry can fix.
    #[must_use]
    pub fn resolve(&self, context: &BindContext, signature: &AbstractSignature) -> CodePtr {
        match self.try_resolve(context, signature) {
            Ok(code) => code,
            Err(error) => panic!("failed to bind {}: {error}", self.id),
        }
    }
}
