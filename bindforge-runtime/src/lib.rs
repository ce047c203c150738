//! # Bindforge Runtime
//!
//! Runtime support surface targeted by bindforge-generated wrappers.
//!
//! This crate provides:
//! - Collaborator traits for address tables, trampolines, this-pointer
//!   adjustment, and dynamic symbol lookup
//! - The per-binding resolve-once callable cache (`BoundFn`)
//! - The concurrent destructor guard set
//! - The constructor/destructor lifecycle operations
//! - The injectable process-scoped `BindContext`

pub mod address;
pub mod adjust;
pub mod callable;
pub mod context;
pub mod error;
pub mod guards;
pub mod lifecycle;
pub mod symbol;
pub mod trampoline;

// Generated units import everything through this crate.
pub use bindforge_model::{BindingId, CallingConvention};

pub use address::{AddressTable, NativeAddress, StaticAddressTable};
pub use adjust::{IdentityAdjust, ThunkAdjust};
pub use callable::BoundFn;
pub use context::{BindContext, BindContextBuilder, context, install, try_context};
pub use error::{RuntimeError, TrampolineError};
pub use guards::DestructorGuards;
pub use lifecycle::{finish_teardown, run_constructor, run_destructor};
pub use symbol::{NullResolver, SymbolResolver};
#[cfg(unix)]
pub use symbol::SelfImageResolver;
pub use trampoline::{AbiType, AbstractSignature, CodePtr, DirectTrampoline, Trampoline};
