//! Dynamic-symbol call wrappers.
//!
//! Instead of the address table, the wrapper computes the member's
//! mangled symbol and resolves it against the already-loaded host image
//! on every call. Lookup failure is fatal; a missing export means the
//! binding data does not match the binary.

use super::{
    argument_list, comma_if_params, parameter_list, parameter_types, receiver_cast,
    receiver_param, receiver_ptr, return_annotation,
};
use crate::mangle::{MangledSymbol, mangle};
use bindforge_model::MemberDescription;

/// Emitter for the symbol-lookup strategy.
pub struct SymbolEmitter<'a> {
    member: &'a MemberDescription,
}

impl<'a> SymbolEmitter<'a> {
    /// Creates an emitter for one member.
    #[must_use]
    pub fn new(member: &'a MemberDescription) -> Self {
        Self { member }
    }

    /// Mangles the member's symbol.
    #[must_use]
    pub fn mangled(&self) -> MangledSymbol {
        let m = self.member;
        mangle(&m.qualified_name(), m.params.iter().map(|param| &param.ty))
    }

    /// Emits the wrapper. Statics drop the receiver; everything else
    /// (virtuals included) goes through the plain member form, since the
    /// host image exports the already-devirtualized implementation.
    #[must_use]
    pub fn emit(&self) -> String {
        let m = self.member;
        let symbol = self.mangled().symbol;
        let mut output = String::new();
        output.push_str(&format!("impl {} {{\n", m.class));

        if m.is_static {
            output.push_str(&format!(
                "    pub unsafe fn {}({}){} {{\n",
                m.name,
                parameter_list(m),
                return_annotation(&m.ret)
            ));
            output.push_str(&format!(
                "        type Func = unsafe extern \"C\" fn({}){};\n",
                parameter_types(m),
                return_annotation(&m.ret)
            ));
        } else {
            let separator = if m.params.is_empty() { "" } else { ", " };
            output.push_str(&format!(
                "    pub unsafe fn {}({}{}{}){} {{\n",
                m.name,
                receiver_param(m),
                separator,
                parameter_list(m),
                return_annotation(&m.ret)
            ));
            output.push_str(&format!(
                "        type Func = unsafe extern \"C\" fn({}{}{}){};\n",
                receiver_ptr(m),
                comma_if_params(m),
                parameter_types(m),
                return_annotation(&m.ret)
            ));
        }

        output.push_str(&format!(
            "        let address = context()\n            .resolve_symbol(\"{symbol}\")\n            .unwrap_or_else(|| panic!(\"symbol '{symbol}' not found in host image\"));\n"
        ));
        output.push_str(
            "        let func: Func = unsafe { core::mem::transmute(address.0 as *const ()) };\n",
        );
        if m.is_static {
            output.push_str(&format!(
                "        unsafe {{ func({}) }}\n",
                argument_list(m)
            ));
        } else {
            output.push_str(&format!(
                "        unsafe {{ func({}{}{}) }}\n",
                receiver_cast(m),
                comma_if_params(m),
                argument_list(m)
            ));
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindforge_model::{BindingId, MemberKind, Param, TypeDescriptor};

    fn member() -> MemberDescription {
        MemberDescription {
            class: "vane::MenuLayer".to_string(),
            name: "init".to_string(),
            params: vec![Param::new("vane::Node*", Some("parent"))],
            ret: TypeDescriptor::new("bool"),
            kind: MemberKind::Normal,
            is_static: false,
            is_virtual: false,
            is_const: false,
            id: BindingId(2041),
            platforms: Vec::new(),
            convention: None,
        }
    }

    #[test]
    fn test_symbol_wrapper_resolves_mangled_name() {
        let m = member();
        let text = SymbolEmitter::new(&m).emit();
        assert!(text.contains(".resolve_symbol(\"_ZN4vane9MenuLayer4initEPNS_4NodeE\")"));
        assert!(text.contains("not found in host image"));
        assert!(text.contains("unsafe { func(self as *mut vane::MenuLayer, parent) }"));
    }

    #[test]
    fn test_symbol_wrapper_static_form() {
        let mut m = member();
        m.name = "create".to_string();
        m.is_static = true;
        let text = SymbolEmitter::new(&m).emit();
        assert!(text.contains("pub unsafe fn create(parent: *mut vane::Node) -> bool {"));
        assert!(text.contains("type Func = unsafe extern \"C\" fn(*mut vane::Node) -> bool;"));
        assert!(text.contains("unsafe { func(parent) }"));
        assert!(!text.contains("self"));
    }

    #[test]
    fn test_symbol_wrapper_zero_parameters_encodes_void() {
        let mut m = member();
        m.name = "tick".to_string();
        m.params = Vec::new();
        m.ret = TypeDescriptor::void();
        let text = SymbolEmitter::new(&m).emit();
        assert!(text.contains(".resolve_symbol(\"_ZN4vane9MenuLayer4tickEv\")"));
    }
}
