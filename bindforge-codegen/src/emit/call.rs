//! Member, static, and virtual call wrappers.
//!
//! All three share the resolve-and-cache protocol: a `static BOUND`
//! cell keyed by the member's binding identifier, resolved through the
//! installed context on first use.

use super::{
    abi_parameter_list, argument_list, comma_if_params, parameter_list, parameter_types,
    receiver_cast, receiver_param, receiver_ptr, return_annotation,
};
use bindforge_model::{CallingConvention, MemberDescription};

/// Emitter for the non-structor address-table strategies.
pub struct CallEmitter<'a> {
    member: &'a MemberDescription,
    convention: CallingConvention,
}

impl<'a> CallEmitter<'a> {
    /// Creates an emitter for one member.
    #[must_use]
    pub fn new(member: &'a MemberDescription, convention: CallingConvention) -> Self {
        Self { member, convention }
    }

    /// Member call: receiver prepended to the forwarded arguments.
    #[must_use]
    pub fn emit_member(&self) -> String {
        let m = self.member;
        let mut output = String::new();
        self.open_wrapper(&mut output);
        self.push_bound_static(&mut output);
        self.push_func_type(&mut output, true);
        self.push_signature(&mut output, "method");
        self.push_resolve(&mut output);
        output.push_str(&format!(
            "        unsafe {{ func({}{}{}) }}\n",
            receiver_cast(m),
            comma_if_params(m),
            argument_list(m)
        ));
        self.close_wrapper(&mut output);
        output
    }

    /// Static call: forwarded arguments only.
    #[must_use]
    pub fn emit_static(&self) -> String {
        let m = self.member;
        let mut output = String::new();
        output.push_str(&format!("impl {} {{\n", m.class));
        output.push_str(&format!(
            "    pub unsafe fn {}({}){} {{\n",
            m.name,
            parameter_list(m),
            return_annotation(&m.ret)
        ));
        self.push_bound_static(&mut output);
        self.push_func_type(&mut output, false);
        self.push_signature(&mut output, "function");
        self.push_resolve(&mut output);
        output.push_str(&format!("        unsafe {{ func({}) }}\n", argument_list(m)));
        self.close_wrapper(&mut output);
        output
    }

    /// Virtual call: the receiver goes through the this-pointer
    /// adjustment collaborator before the native call.
    #[must_use]
    pub fn emit_virtual(&self) -> String {
        let m = self.member;
        let mut output = String::new();
        self.open_wrapper(&mut output);
        self.push_bound_static(&mut output);
        self.push_func_type(&mut output, true);
        self.push_signature(&mut output, "method");
        output.push_str(&format!(
            "        let this = context()\n            .adjust({} as *mut c_void, \"{}\", BindingId({}))\n            as {};\n",
            receiver_cast(m),
            m.class,
            m.id,
            receiver_ptr(m)
        ));
        self.push_resolve(&mut output);
        output.push_str(&format!(
            "        unsafe {{ func(this{}{}) }}\n",
            comma_if_params(m),
            argument_list(m)
        ));
        self.close_wrapper(&mut output);
        output
    }

    fn open_wrapper(&self, output: &mut String) {
        let m = self.member;
        output.push_str(&format!("impl {} {{\n", m.class));
        let separator = if m.params.is_empty() { "" } else { ", " };
        output.push_str(&format!(
            "    pub unsafe fn {}({}{}{}){} {{\n",
            m.name,
            receiver_param(m),
            separator,
            parameter_list(m),
            return_annotation(&m.ret)
        ));
    }

    fn close_wrapper(&self, output: &mut String) {
        output.push_str("    }\n");
        output.push_str("}\n\n");
    }

    fn push_bound_static(&self, output: &mut String) {
        output.push_str(&format!(
            "        static BOUND: BoundFn = BoundFn::new(BindingId({}), CallingConvention::{});\n",
            self.member.id,
            self.convention.variant_name()
        ));
    }

    fn push_func_type(&self, output: &mut String, with_receiver: bool) {
        let m = self.member;
        let params = if with_receiver {
            format!(
                "{}{}{}",
                receiver_ptr(m),
                comma_if_params(m),
                parameter_types(m)
            )
        } else {
            parameter_types(m)
        };
        output.push_str(&format!(
            "        type Func = unsafe extern \"C\" fn({params}){};\n",
            return_annotation(&m.ret)
        ));
    }

    fn push_signature(&self, output: &mut String, constructor: &str) {
        let m = self.member;
        output.push_str(&format!(
            "        let signature = AbstractSignature::{constructor}(&[{}], {});\n",
            abi_parameter_list(m),
            super::abi_name(m.ret.expr())
        ));
    }

    fn push_resolve(&self, output: &mut String) {
        output.push_str(
            "        let func: Func = unsafe { core::mem::transmute(BOUND.resolve(context(), &signature).as_ptr()) };\n",
        );
    }
}
