//! # Bindforge
//!
//! Binding generator for calling into pre-compiled native binaries.
//!
//! Given a declarative description of a native class's members, bindforge
//! emits wrapper functions that reproduce the binary's calling
//! conventions, virtual-dispatch adjustment, and object-lifetime
//! semantics, discovering addresses through an external per-platform
//! address table or by dynamic symbol lookup.
//!
//! ## Quick Start
//!
//! ```
//! use bindforge::prelude::*;
//!
//! let model = BindingModel::from_json(r#"{
//!     "classes": [{
//!         "name": "vane::MenuLayer",
//!         "members": [{
//!             "form": "bound",
//!             "class": "vane::MenuLayer",
//!             "name": "init",
//!             "params": [{"type": "vane::Node*"}],
//!             "ret": "bool",
//!             "id": 1
//!         }]
//!     }]
//! }"#).unwrap();
//!
//! let unit = bindforge::codegen::generate(&model, Platform::Mac).unwrap();
//! assert!(unit.source.contains("pub unsafe fn init"));
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Class/member model, type descriptors, validation
//! - [`codegen`] - Mangler, classifier, strategy emitters, driver
//! - [`runtime`] - Support surface targeted by the generated wrappers

pub mod prelude;

/// Class/member model, type descriptors, platforms, validation.
pub mod model {
    pub use bindforge_model::*;
}

/// Code generation: mangler, classifier, emitters, driver.
pub mod codegen {
    pub use bindforge_codegen::*;
}

/// Runtime support surface for generated wrappers.
pub mod runtime {
    pub use bindforge_runtime::*;
}
