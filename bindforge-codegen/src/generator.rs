//! Generator driver.
//!
//! Walks the model in class-then-member order, classifies every bindable
//! member, delegates to the matching strategy emitter, and concatenates
//! the results into one compilation unit. Per-member problems are
//! collected, never silently dropped.

use crate::classify::{BindingStrategy, classify, convention_for};
use crate::emit::{CallEmitter, StructorEmitter, SymbolEmitter};
use crate::error::CodegenError;
use bindforge_model::{
    BindingModel, CallingConvention, ClassDescription, Member, MemberDescription, MemberKind,
    OutOfLineMember, Platform, TypeExpr,
};
use std::fmt;

/// Fixed preamble of every generated unit.
const PREAMBLE: &str = r#"//! Bindings unit generated by bindforge. Do not edit.
//!
//! The surrounding bindings crate declares the classes named here and
//! supplies each class's `cutoff_layout` and `teardown_chain` hooks; its
//! root teardown hook calls `bindforge_runtime::finish_teardown` once an
//! outer destruction sequence completes.
#![allow(non_snake_case, unused_imports, clippy::missing_safety_doc)]

use bindforge_runtime::{
    AbiType, AbstractSignature, BindingId, BoundFn, CallingConvention, context,
    run_constructor, run_destructor,
};
use core::ffi::c_void;

"#;

/// A non-fatal condition attached to one member's type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Owning class name.
    pub class: String,
    /// Member name.
    pub member: String,
    /// The offending type spelling, verbatim from the model.
    pub type_text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed type '{}' in {}::{}",
            self.type_text, self.class, self.member
        )
    }
}

/// A member whose generation failed. The rest of the run is unaffected.
#[derive(Debug)]
pub struct MemberFailure {
    /// Owning class name.
    pub class: String,
    /// Member name.
    pub member: String,
    /// What went wrong.
    pub error: CodegenError,
}

/// Result of one generation run.
#[derive(Debug, Default)]
pub struct GeneratedUnit {
    /// The full compilation unit.
    pub source: String,
    /// Non-fatal diagnostics, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Members that failed generation, in emission order.
    pub failures: Vec<MemberFailure>,
}

/// Driver over a binding model for one platform.
pub struct Generator<'a> {
    model: &'a BindingModel,
    platform: Platform,
}

impl<'a> Generator<'a> {
    /// Creates a generator.
    #[must_use]
    pub fn new(model: &'a BindingModel, platform: Platform) -> Self {
        Self { model, platform }
    }

    /// Generates the compilation unit.
    #[must_use]
    pub fn generate(&self) -> GeneratedUnit {
        let mut unit = GeneratedUnit {
            source: PREAMBLE.to_string(),
            ..GeneratedUnit::default()
        };

        for class in &self.model.classes {
            for member in &class.members {
                match member {
                    Member::Inline { source } => {
                        // Only the platforms whose binary does not export
                        // the engine implementation need these bodies.
                        if matches!(self.platform, Platform::Mac | Platform::Ios)
                            && class.is_engine_class
                        {
                            unit.source.push_str(source);
                            unit.source.push('\n');
                        }
                    }
                    Member::OutOfLine(definition) => {
                        if self.skip_engine_class(class) {
                            continue;
                        }
                        unit.source.push_str(&emit_out_of_line(definition));
                    }
                    Member::Bound(description) => {
                        if !description.applies_to(self.platform) {
                            continue;
                        }
                        if self.skip_engine_class(class) {
                            continue;
                        }
                        self.collect_malformed(description, &mut unit.diagnostics);
                        match self.emit_bound(description) {
                            Ok(text) => unit.source.push_str(&text),
                            Err(error) => {
                                tracing::warn!(
                                    class = %class.name,
                                    member = %description.name,
                                    %error,
                                    "skipping member after generation error"
                                );
                                unit.failures.push(MemberFailure {
                                    class: class.name.clone(),
                                    member: description.name.clone(),
                                    error,
                                });
                            }
                        }
                    }
                }
            }
        }

        unit
    }

    /// Engine-class definitions come from the binary itself on Windows.
    fn skip_engine_class(&self, class: &ClassDescription) -> bool {
        self.platform == Platform::Windows && class.is_engine_class
    }

    fn collect_malformed(&self, member: &MemberDescription, diagnostics: &mut Vec<Diagnostic>) {
        for param in &member.params {
            if param.ty.expr().is_malformed() {
                let diagnostic = Diagnostic {
                    class: member.class.clone(),
                    member: member.name.clone(),
                    type_text: param.ty.spelling().to_string(),
                };
                tracing::warn!(%diagnostic, "mangling malformed type as void placeholder");
                diagnostics.push(diagnostic);
            }
        }
        if member.ret.expr().is_malformed() {
            diagnostics.push(Diagnostic {
                class: member.class.clone(),
                member: member.name.clone(),
                type_text: member.ret.spelling().to_string(),
            });
        }
    }

    fn emit_bound(&self, member: &MemberDescription) -> Result<String, CodegenError> {
        let strategy = classify(member, self.platform);

        if strategy == BindingStrategy::DynamicSymbolCall {
            return Ok(SymbolEmitter::new(member).emit());
        }

        let convention = convention_for(member, self.platform)?;
        check_signature_shape(member, convention)?;

        Ok(match strategy {
            BindingStrategy::MemberCall => CallEmitter::new(member, convention).emit_member(),
            BindingStrategy::StaticCall => CallEmitter::new(member, convention).emit_static(),
            BindingStrategy::VirtualCall => CallEmitter::new(member, convention).emit_virtual(),
            BindingStrategy::ConstructorBind => {
                StructorEmitter::new(member, convention).emit_constructor()
            }
            BindingStrategy::DestructorBind => {
                StructorEmitter::new(member, convention).emit_destructor()
            }
            BindingStrategy::DynamicSymbolCall => unreachable!("handled above"),
        })
    }
}

/// The nonstandard register conventions cannot return aggregates by
/// value; reject that shape per member instead of emitting a wrapper the
/// trampoline would refuse at runtime.
fn check_signature_shape(
    member: &MemberDescription,
    convention: CallingConvention,
) -> Result<(), CodegenError> {
    let nonstandard = matches!(
        convention,
        CallingConvention::Optcall | CallingConvention::Membercall
    );
    if nonstandard && returns_aggregate(member.ret.expr()) {
        return Err(CodegenError::UnsupportedSignature {
            message: format!(
                "{} returns '{}' by value, which {convention} cannot express",
                member.qualified_name(),
                member.ret.spelling()
            ),
        });
    }
    Ok(())
}

fn returns_aggregate(expr: &TypeExpr) -> bool {
    match expr {
        TypeExpr::Named(_) => true,
        TypeExpr::Const(inner) => returns_aggregate(inner),
        _ => false,
    }
}

fn emit_out_of_line(definition: &OutOfLineMember) -> String {
    let mut output = String::new();
    output.push_str(&format!("impl {} {{\n", definition.class));

    let params = definition
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let name = param
                .name
                .clone()
                .unwrap_or_else(|| format!("arg{index}"));
            format!("{}: {}", name, param.ty.expr().rust_spelling())
        })
        .collect::<Vec<_>>()
        .join(", ");

    match definition.kind {
        MemberKind::Constructor => {
            let separator = if definition.params.is_empty() { "" } else { ", " };
            output.push_str(&format!(
                "    pub unsafe fn construct(this: *mut {}{}{}) {}\n",
                definition.class, separator, params, definition.body
            ));
        }
        MemberKind::Destructor => {
            output.push_str(&format!(
                "    pub unsafe fn destroy(this: *mut {}) {}\n",
                definition.class, definition.body
            ));
        }
        MemberKind::Normal => {
            let receiver = if definition.is_const { "&self" } else { "&mut self" };
            let separator = if definition.params.is_empty() { "" } else { ", " };
            let ret = if definition.ret.is_void() {
                String::new()
            } else {
                format!(" -> {}", definition.ret.expr().rust_spelling())
            };
            output.push_str(&format!(
                "    pub unsafe fn {}({}{}{}){} {}\n",
                definition.name, receiver, separator, params, ret, definition.body
            ));
        }
    }

    output.push_str("}\n\n");
    output
}
