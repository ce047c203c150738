//! # Bindforge Codegen
//!
//! Wrapper code generation from bindforge class models.
//!
//! This crate provides:
//! - Itanium-style symbol mangling with substitution compression
//! - Strategy classification per member and platform
//! - Strategy emitters for member, static, virtual, structor, and
//!   dynamic-symbol wrappers
//! - The generator driver producing one compilation unit per run

pub mod classify;
pub mod emit;
pub mod error;
pub mod generator;
pub mod mangle;

pub use classify::{BindingStrategy, classify, convention_for};
pub use error::CodegenError;
pub use generator::{Diagnostic, GeneratedUnit, Generator, MemberFailure};
pub use mangle::{MangledSymbol, SubstitutionTable, mangle};

use bindforge_model::{BindingModel, Platform, validate_model};

/// Generates the bindings unit for a model on one platform.
///
/// # Errors
/// Returns `CodegenError` if the model fails validation. Per-member
/// problems do not error here; they are reported on the returned unit.
pub fn generate(model: &BindingModel, platform: Platform) -> Result<GeneratedUnit, CodegenError> {
    validate_model(model)?;
    Ok(Generator::new(model, platform).generate())
}

/// Generates the bindings unit from a JSON model.
///
/// # Errors
/// Returns `CodegenError` if parsing or validation fails.
pub fn generate_from_json(json: &str, platform: Platform) -> Result<GeneratedUnit, CodegenError> {
    let model = BindingModel::from_json(json)?;
    generate(&model, platform)
}
