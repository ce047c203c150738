//! Model validation.
//!
//! Checks the structural invariants the generator relies on. Malformed
//! type descriptors are deliberately not validation errors: the generator
//! handles them per member with a placeholder and a diagnostic, so one bad
//! spelling never rejects a whole model.

use crate::error::ModelError;
use crate::member::{BindingModel, Member, MemberKind};
use std::collections::HashMap;

/// Validates a binding model.
///
/// # Errors
/// Returns `ModelError` on empty names, duplicate binding identifiers,
/// owning-class mismatches, or impossible structor shapes.
pub fn validate_model(model: &BindingModel) -> Result<(), ModelError> {
    let mut seen_ids: HashMap<u32, String> = HashMap::new();

    for class in &model.classes {
        if class.name.is_empty() {
            return Err(ModelError::EmptyName {
                kind: "class".to_string(),
                class: String::new(),
            });
        }

        for member in &class.members {
            let Member::Bound(description) = member else {
                continue;
            };

            if description.name.is_empty() {
                return Err(ModelError::EmptyName {
                    kind: "member".to_string(),
                    class: class.name.clone(),
                });
            }

            if description.class != class.name {
                return Err(ModelError::ClassMismatch {
                    class: class.name.clone(),
                    member: description.name.clone(),
                    declared: description.class.clone(),
                });
            }

            validate_structor(description, &class.name)?;

            let qualified = description.qualified_name();
            if let Some(first) = seen_ids.insert(description.id.0, qualified.clone()) {
                return Err(ModelError::DuplicateBindingId {
                    id: description.id.0,
                    first,
                    second: qualified,
                });
            }
        }
    }

    Ok(())
}

fn validate_structor(
    description: &crate::member::MemberDescription,
    class: &str,
) -> Result<(), ModelError> {
    let invalid = |message: &str| ModelError::InvalidStructor {
        class: class.to_string(),
        member: description.name.clone(),
        message: message.to_string(),
    };

    match description.kind {
        MemberKind::Normal => Ok(()),
        MemberKind::Constructor => {
            if description.is_static {
                return Err(invalid("constructors cannot be static"));
            }
            if !description.ret.is_void() {
                return Err(invalid("constructors cannot declare a return type"));
            }
            Ok(())
        }
        MemberKind::Destructor => {
            if description.is_static {
                return Err(invalid("destructors cannot be static"));
            }
            if !description.params.is_empty() {
                return Err(invalid("destructors take no parameters"));
            }
            if !description.ret.is_void() {
                return Err(invalid("destructors cannot declare a return type"));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{BindingId, ClassDescription, MemberDescription, Param};
    use crate::types::TypeDescriptor;

    fn member(class: &str, name: &str, id: u32) -> MemberDescription {
        MemberDescription {
            class: class.to_string(),
            name: name.to_string(),
            params: Vec::new(),
            ret: TypeDescriptor::void(),
            kind: MemberKind::Normal,
            is_static: false,
            is_virtual: false,
            is_const: false,
            id: BindingId(id),
            platforms: Vec::new(),
            convention: None,
        }
    }

    fn model_of(members: Vec<MemberDescription>) -> BindingModel {
        BindingModel {
            classes: vec![ClassDescription {
                name: "vane::Widget".to_string(),
                is_engine_class: false,
                members: members.into_iter().map(Member::Bound).collect(),
            }],
        }
    }

    #[test]
    fn test_valid_model() {
        let model = model_of(vec![
            member("vane::Widget", "tick", 1),
            member("vane::Widget", "poke", 2),
        ]);
        assert!(validate_model(&model).is_ok());
    }

    #[test]
    fn test_duplicate_binding_id() {
        let model = model_of(vec![
            member("vane::Widget", "tick", 7),
            member("vane::Widget", "poke", 7),
        ]);
        let err = validate_model(&model).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateBindingId { id: 7, .. }));
    }

    #[test]
    fn test_class_mismatch() {
        let model = model_of(vec![member("vane::Other", "tick", 1)]);
        let err = validate_model(&model).unwrap_err();
        assert!(matches!(err, ModelError::ClassMismatch { .. }));
    }

    #[test]
    fn test_destructor_with_params_rejected() {
        let mut bad = member("vane::Widget", "~Widget", 3);
        bad.kind = MemberKind::Destructor;
        bad.params = vec![Param::new("int", None)];
        let err = validate_model(&model_of(vec![bad])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidStructor { .. }));
    }

    #[test]
    fn test_constructor_with_return_rejected() {
        let mut bad = member("vane::Widget", "Widget", 4);
        bad.kind = MemberKind::Constructor;
        bad.ret = TypeDescriptor::new("int");
        let err = validate_model(&model_of(vec![bad])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidStructor { .. }));
    }
}
