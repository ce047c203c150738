//! # Bindforge Model
//!
//! Class and member model for the bindforge binding generator.
//!
//! This crate provides:
//! - Structured type descriptors parsed once from textual spellings
//! - Member, class, and binding-set descriptions
//! - Platform and calling-convention metadata
//! - Model validation and a JSON loader

pub mod error;
pub mod member;
pub mod platform;
pub mod types;
pub mod validation;

pub use error::ModelError;
pub use member::{
    BindingId, BindingModel, ClassDescription, Member, MemberDescription, MemberKind,
    OutOfLineMember, Param,
};
pub use platform::{CallingConvention, Platform};
pub use types::{Primitive, TypeDescriptor, TypeExpr};
pub use validation::validate_model;
