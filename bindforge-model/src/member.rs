//! Class and member descriptions consumed by the generator.
//!
//! The external parser produces this model; we only consume it. The JSON
//! shape mirrors the struct layout one to one so a model can also be
//! written by hand for tests and examples.

use crate::error::ModelError;
use crate::platform::{CallingConvention, Platform};
use crate::types::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier keying a member into the external address table.
///
/// Unique across the whole binding set, assigned by the external model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct BindingId(pub u32);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a bindable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Ordinary member function.
    #[default]
    Normal,
    /// Constructor.
    Constructor,
    /// Destructor.
    Destructor,
}

/// One parameter of a member signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Declared parameter name, if the model recorded one.
    #[serde(default)]
    pub name: Option<String>,
}

impl Param {
    /// Creates a parameter from a type spelling and optional name.
    #[must_use]
    pub fn new(ty: impl Into<TypeDescriptor>, name: Option<&str>) -> Self {
        Self {
            ty: ty.into(),
            name: name.map(str::to_string),
        }
    }
}

/// A member of a native class that needs a generated binding.
///
/// Immutable once produced by the external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescription {
    /// Qualified owning-class name.
    pub class: String,
    /// Member name (the unqualified class name for structors).
    pub name: String,
    /// Ordered parameter list.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type.
    #[serde(default = "TypeDescriptor::void")]
    pub ret: TypeDescriptor,
    /// Member kind.
    #[serde(default)]
    pub kind: MemberKind,
    /// Static member (no receiver).
    #[serde(default)]
    pub is_static: bool,
    /// Virtual member (dispatched through the foreign vtable).
    #[serde(default)]
    pub is_virtual: bool,
    /// Const member (const receiver).
    #[serde(default)]
    pub is_const: bool,
    /// Stable identifier into the external address table.
    pub id: BindingId,
    /// Platforms this member binds on. Empty means every platform.
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Explicit calling-convention override from the model.
    #[serde(default)]
    pub convention: Option<CallingConvention>,
}

impl MemberDescription {
    /// Returns true if the member is bindable on the given platform.
    #[must_use]
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    /// `Class::member` qualified name, for diagnostics and mangling.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.class, self.name)
    }

    /// Returns true for constructors and destructors.
    #[must_use]
    pub fn is_structor(&self) -> bool {
        matches!(self.kind, MemberKind::Constructor | MemberKind::Destructor)
    }
}

/// A member whose body is supplied by the model as literal source.
///
/// Out-of-line definitions are declared members with a hand-written body;
/// the generator wraps the declared signature around the body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfLineMember {
    /// Qualified owning-class name.
    pub class: String,
    /// Member name.
    pub name: String,
    /// Ordered parameter list.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type (ignored for structors).
    #[serde(default = "TypeDescriptor::void")]
    pub ret: TypeDescriptor,
    /// Member kind.
    #[serde(default)]
    pub kind: MemberKind,
    /// Const member.
    #[serde(default)]
    pub is_const: bool,
    /// Literal body text, braces included.
    pub body: String,
}

/// One field of a class description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Member {
    /// A member that needs a generated wrapper.
    Bound(MemberDescription),
    /// Literal source emitted verbatim on platforms whose binary does not
    /// export the engine implementation.
    Inline {
        /// The source text, emitted as-is.
        source: String,
    },
    /// A declared member with a hand-written body.
    OutOfLine(OutOfLineMember),
}

/// One native class and its ordered members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescription {
    /// Qualified class name.
    pub name: String,
    /// True for classes owned by the engine runtime rather than the target
    /// binary itself. Drives per-platform emission skips.
    #[serde(default)]
    pub is_engine_class: bool,
    /// Ordered members.
    #[serde(default)]
    pub members: Vec<Member>,
}

/// The full binding set: an ordered list of classes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BindingModel {
    /// Classes in model order. Output preserves this order.
    pub classes: Vec<ClassDescription>,
}

impl BindingModel {
    /// Loads a model from a JSON string.
    ///
    /// # Errors
    /// Returns `ModelError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a model from a JSON file.
    ///
    /// # Errors
    /// Returns `ModelError` if reading or parsing fails.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Iterates all bound members across all classes, in model order.
    pub fn bound_members(&self) -> impl Iterator<Item = (&ClassDescription, &MemberDescription)> {
        self.classes.iter().flat_map(|class| {
            class.members.iter().filter_map(move |member| match member {
                Member::Bound(description) => Some((class, description)),
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_member() -> MemberDescription {
        MemberDescription {
            class: "vane::MenuLayer".to_string(),
            name: "init".to_string(),
            params: vec![Param::new("vane::Node*", Some("parent"))],
            ret: TypeDescriptor::new("bool"),
            kind: MemberKind::Normal,
            is_static: false,
            is_virtual: true,
            is_const: false,
            id: BindingId(2041),
            platforms: Vec::new(),
            convention: None,
        }
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(sample_member().qualified_name(), "vane::MenuLayer::init");
    }

    #[test]
    fn test_applies_to_empty_means_all() {
        let member = sample_member();
        for platform in Platform::ALL {
            assert!(member.applies_to(platform));
        }
    }

    #[test]
    fn test_applies_to_restricted() {
        let mut member = sample_member();
        member.platforms = vec![Platform::Windows, Platform::Mac];
        assert!(member.applies_to(Platform::Windows));
        assert!(!member.applies_to(Platform::Android));
    }

    #[test]
    fn test_model_from_json() {
        let json = r#"{
            "classes": [
                {
                    "name": "vane::MenuLayer",
                    "is_engine_class": false,
                    "members": [
                        {
                            "form": "bound",
                            "class": "vane::MenuLayer",
                            "name": "init",
                            "params": [{"type": "vane::Node*", "name": "parent"}],
                            "ret": "bool",
                            "is_virtual": true,
                            "id": 2041
                        },
                        {
                            "form": "inline",
                            "source": "fn helper() {}"
                        }
                    ]
                }
            ]
        }"#;

        let model = BindingModel::from_json(json).expect("model should parse");
        assert_eq!(model.classes.len(), 1);
        assert_eq!(model.bound_members().count(), 1);
        let (class, member) = model.bound_members().next().unwrap();
        assert_eq!(class.name, "vane::MenuLayer");
        assert_eq!(member.id, BindingId(2041));
        assert!(member.is_virtual);
        assert_eq!(member.params[0].ty.spelling(), "vane::Node*");
    }

    #[test]
    fn test_structor_detection() {
        let mut member = sample_member();
        assert!(!member.is_structor());
        member.kind = MemberKind::Destructor;
        assert!(member.is_structor());
    }
}
