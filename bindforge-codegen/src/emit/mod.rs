//! Strategy emitters.
//!
//! One module per strategy family. Each emitter produces one
//! self-contained wrapper definition as text, written against the
//! `bindforge_runtime` surface imported by the unit preamble.

pub mod call;
pub mod structor;
pub mod symbol;

pub use call::CallEmitter;
pub use structor::StructorEmitter;
pub use symbol::SymbolEmitter;

use bindforge_model::{MemberDescription, Param, Primitive, TypeDescriptor, TypeExpr};

/// Declared or synthesized parameter name.
pub(crate) fn param_name(param: &Param, index: usize) -> String {
    param
        .name
        .clone()
        .unwrap_or_else(|| format!("arg{index}"))
}

/// `name: Type, name: Type` for the wrapper signature.
pub(crate) fn parameter_list(member: &MemberDescription) -> String {
    member
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            format!("{}: {}", param_name(param, index), param.ty.expr().rust_spelling())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `name, name` for forwarding.
pub(crate) fn argument_list(member: &MemberDescription) -> String {
    member
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| param_name(param, index))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Type, Type` for the function-pointer type.
pub(crate) fn parameter_types(member: &MemberDescription) -> String {
    member
        .params
        .iter()
        .map(|param| param.ty.expr().rust_spelling())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `AbiType::…, AbiType::…` for the abstract signature literal.
pub(crate) fn abi_parameter_list(member: &MemberDescription) -> String {
    member
        .params
        .iter()
        .map(|param| abi_name(param.ty.expr()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ABI class of a type expression, as emitted source.
pub(crate) fn abi_name(expr: &TypeExpr) -> &'static str {
    match expr {
        TypeExpr::Primitive(Primitive::Int) => "AbiType::Int",
        TypeExpr::Primitive(Primitive::Float) => "AbiType::Float",
        TypeExpr::Primitive(Primitive::Bool) => "AbiType::Bool",
        TypeExpr::Primitive(Primitive::Char) => "AbiType::Char",
        TypeExpr::Primitive(Primitive::Void) | TypeExpr::Malformed(_) => "AbiType::Void",
        TypeExpr::Pointer(_) | TypeExpr::Reference(_) => "AbiType::Pointer",
        TypeExpr::Const(inner) => abi_name(inner),
        TypeExpr::Named(_) => "AbiType::Aggregate",
    }
}

/// ` -> Type` or nothing for void.
pub(crate) fn return_annotation(ret: &TypeDescriptor) -> String {
    if ret.is_void() {
        String::new()
    } else {
        format!(" -> {}", ret.expr().rust_spelling())
    }
}

/// Receiver pointer spelling for the function-pointer type.
pub(crate) fn receiver_ptr(member: &MemberDescription) -> String {
    if member.is_const {
        format!("*const {}", member.class)
    } else {
        format!("*mut {}", member.class)
    }
}

/// `&self` or `&mut self` for the wrapper signature.
pub(crate) fn receiver_param(member: &MemberDescription) -> &'static str {
    if member.is_const { "&self" } else { "&mut self" }
}

/// Cast from the receiver reference to the receiver pointer.
pub(crate) fn receiver_cast(member: &MemberDescription) -> String {
    format!("self as {}", receiver_ptr(member))
}

/// `, ` when the member has parameters, empty otherwise. Splices the
/// receiver in front of the forwarded arguments.
pub(crate) fn comma_if_params(member: &MemberDescription) -> &'static str {
    if member.params.is_empty() { "" } else { ", " }
}
