//! Constructor and destructor lifecycle wrappers.
//!
//! Both delegate the state machine to `bindforge_runtime::lifecycle`;
//! the emitted wrapper contributes the typed native invocation and the
//! class's cutoff/teardown hooks, which the surrounding bindings crate
//! supplies.

use super::{
    abi_parameter_list, argument_list, comma_if_params, parameter_list, parameter_types,
    return_annotation,
};
use bindforge_model::{CallingConvention, MemberDescription};

/// Emitter for constructor and destructor bindings.
pub struct StructorEmitter<'a> {
    member: &'a MemberDescription,
    convention: CallingConvention,
}

impl<'a> StructorEmitter<'a> {
    /// Creates an emitter for one structor.
    #[must_use]
    pub fn new(member: &'a MemberDescription, convention: CallingConvention) -> Self {
        Self { member, convention }
    }

    /// Constructor wrapper: cutoff layout, guarded pretend-teardown, then
    /// the native constructor on the raw storage.
    #[must_use]
    pub fn emit_constructor(&self) -> String {
        let m = self.member;
        let mut output = String::new();
        output.push_str(&format!("impl {} {{\n", m.class));
        let separator = if m.params.is_empty() { "" } else { ", " };
        output.push_str(&format!(
            "    pub unsafe fn construct(this: *mut {}{}{}) {{\n",
            m.class,
            separator,
            parameter_list(m)
        ));
        self.push_bound_static(&mut output);
        self.push_func_type(&mut output);
        self.push_signature(&mut output);
        output.push_str("        unsafe {\n");
        output.push_str("            run_constructor(\n");
        output.push_str("                context(),\n");
        output.push_str("                &BOUND,\n");
        output.push_str("                &signature,\n");
        output.push_str("                this as *mut c_void,\n");
        output.push_str(&format!(
            "                |raw| {}::cutoff_layout(raw.cast()),\n",
            m.class
        ));
        output.push_str(&format!(
            "                |raw| {}::teardown_chain(raw.cast()),\n",
            m.class
        ));
        output.push_str("                |code| {\n");
        output.push_str("                    let func: Func = core::mem::transmute(code.as_ptr());\n");
        output.push_str(&format!(
            "                    func(this{}{});\n",
            comma_if_params(m),
            argument_list(m)
        ));
        output.push_str("                },\n");
        output.push_str("            );\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    /// Destructor wrapper: exactly one claim runs the native destructor,
    /// then the storage returns to the cutoff layout.
    #[must_use]
    pub fn emit_destructor(&self) -> String {
        let m = self.member;
        let mut output = String::new();
        output.push_str(&format!("impl {} {{\n", m.class));
        output.push_str(&format!(
            "    pub unsafe fn destroy(this: *mut {}) {{\n",
            m.class
        ));
        self.push_bound_static(&mut output);
        self.push_func_type(&mut output);
        self.push_signature(&mut output);
        output.push_str("        unsafe {\n");
        output.push_str("            run_destructor(\n");
        output.push_str("                context(),\n");
        output.push_str("                &BOUND,\n");
        output.push_str("                &signature,\n");
        output.push_str("                this as *mut c_void,\n");
        output.push_str(&format!(
            "                |raw| {}::cutoff_layout(raw.cast()),\n",
            m.class
        ));
        output.push_str("                |code| {\n");
        output.push_str("                    let func: Func = core::mem::transmute(code.as_ptr());\n");
        output.push_str("                    func(this);\n");
        output.push_str("                },\n");
        output.push_str("            );\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn push_bound_static(&self, output: &mut String) {
        output.push_str(&format!(
            "        static BOUND: BoundFn = BoundFn::new(BindingId({}), CallingConvention::{});\n",
            self.member.id,
            self.convention.variant_name()
        ));
    }

    fn push_func_type(&self, output: &mut String) {
        let m = self.member;
        output.push_str(&format!(
            "        type Func = unsafe extern \"C\" fn(*mut {}{}{}){};\n",
            m.class,
            comma_if_params(m),
            parameter_types(m),
            return_annotation(&m.ret)
        ));
    }

    fn push_signature(&self, output: &mut String) {
        output.push_str(&format!(
            "        let signature = AbstractSignature::method(&[{}], AbiType::Void);\n",
            abi_parameter_list(self.member)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindforge_model::{BindingId, MemberKind, Param, TypeDescriptor};

    fn structor(kind: MemberKind, params: Vec<Param>) -> MemberDescription {
        MemberDescription {
            class: "vane::MenuLayer".to_string(),
            name: "MenuLayer".to_string(),
            params,
            ret: TypeDescriptor::void(),
            kind,
            is_static: false,
            is_virtual: false,
            is_const: false,
            id: BindingId(2044),
            platforms: Vec::new(),
            convention: None,
        }
    }

    #[test]
    fn test_constructor_shape() {
        let m = structor(
            MemberKind::Constructor,
            vec![Param::new("vane::Node*", Some("parent"))],
        );
        let text = StructorEmitter::new(&m, CallingConvention::Thiscall).emit_constructor();
        assert!(text.contains(
            "pub unsafe fn construct(this: *mut vane::MenuLayer, parent: *mut vane::Node) {"
        ));
        assert!(text.contains("run_constructor("));
        assert!(text.contains("|raw| vane::MenuLayer::cutoff_layout(raw.cast()),"));
        assert!(text.contains("|raw| vane::MenuLayer::teardown_chain(raw.cast()),"));
        assert!(text.contains("func(this, parent);"));
        assert!(text.contains(
            "static BOUND: BoundFn = BoundFn::new(BindingId(2044), CallingConvention::Thiscall);"
        ));
    }

    #[test]
    fn test_destructor_shape() {
        let m = structor(MemberKind::Destructor, Vec::new());
        let text = StructorEmitter::new(&m, CallingConvention::Thiscall).emit_destructor();
        assert!(text.contains("pub unsafe fn destroy(this: *mut vane::MenuLayer) {"));
        assert!(text.contains("run_destructor("));
        assert!(text.contains("|raw| vane::MenuLayer::cutoff_layout(raw.cast()),"));
        // The teardown chain never reappears on the destructor side.
        assert!(!text.contains("teardown_chain"));
        assert!(text.contains("func(this);"));
        assert!(text.contains("type Func = unsafe extern \"C\" fn(*mut vane::MenuLayer);"));
    }
}
