//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```
//! use bindforge::prelude::*;
//! ```

// Model types
pub use bindforge_model::{
    BindingId, BindingModel, CallingConvention, ClassDescription, Member, MemberDescription,
    MemberKind, ModelError, Param, Platform, TypeDescriptor, TypeExpr, validate_model,
};

// Codegen types
pub use bindforge_codegen::{
    BindingStrategy, CodegenError, Diagnostic, GeneratedUnit, Generator, MangledSymbol, classify,
    generate, generate_from_json, mangle,
};

// Runtime types
pub use bindforge_runtime::{
    AbiType, AbstractSignature, AddressTable, BindContext, BindContextBuilder, BoundFn, CodePtr,
    DestructorGuards, NativeAddress, RuntimeError, StaticAddressTable, SymbolResolver,
    ThunkAdjust, Trampoline,
};
