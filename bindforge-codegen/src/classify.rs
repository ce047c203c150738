//! Strategy selection for bindable members.

use crate::error::CodegenError;
use bindforge_model::{CallingConvention, MemberDescription, MemberKind, Platform};

/// The generation strategy applied to one member. Recomputed per member;
/// no independent lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingStrategy {
    /// Resolve by mangled symbol against the host image.
    DynamicSymbolCall,
    /// Constructor lifecycle wrapper.
    ConstructorBind,
    /// Destructor lifecycle wrapper.
    DestructorBind,
    /// Plain call, no receiver.
    StaticCall,
    /// Receiver-adjusted virtual call.
    VirtualCall,
    /// Receiver-first member call.
    MemberCall,
}

/// Picks the strategy for a member on a platform. Total over all valid
/// inputs; first matching rule wins.
///
/// Structors keep their lifecycle strategies even on the symbol-lookup
/// platform: symbol lookup only replaces address discovery, not
/// object-lifetime handling. Restricting the symbol path to non-structor
/// kinds is a deliberate limitation carried over from the binding data.
#[must_use]
pub fn classify(member: &MemberDescription, platform: Platform) -> BindingStrategy {
    if platform.uses_symbol_lookup() && !member.is_structor() {
        return BindingStrategy::DynamicSymbolCall;
    }
    match member.kind {
        MemberKind::Constructor => BindingStrategy::ConstructorBind,
        MemberKind::Destructor => BindingStrategy::DestructorBind,
        MemberKind::Normal if member.is_static => BindingStrategy::StaticCall,
        MemberKind::Normal if member.is_virtual => BindingStrategy::VirtualCall,
        MemberKind::Normal => BindingStrategy::MemberCall,
    }
}

/// Decides the calling convention for a member on a platform.
///
/// Model overrides win when the platform can express them; otherwise
/// Windows members are `thiscall` (statics `cdecl`) and every other
/// platform uses its default C convention.
///
/// # Errors
/// Returns `CodegenError::UnsupportedConvention` if the model requests a
/// convention the platform cannot express.
pub fn convention_for(
    member: &MemberDescription,
    platform: Platform,
) -> Result<CallingConvention, CodegenError> {
    if let Some(convention) = member.convention {
        if !convention.supported_on(platform) {
            return Err(CodegenError::UnsupportedConvention {
                convention,
                platform,
            });
        }
        return Ok(convention);
    }
    Ok(match platform {
        Platform::Windows if member.is_static => CallingConvention::Cdecl,
        Platform::Windows => CallingConvention::Thiscall,
        _ => CallingConvention::Default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindforge_model::{BindingId, TypeDescriptor};

    fn member(kind: MemberKind, is_static: bool, is_virtual: bool) -> MemberDescription {
        MemberDescription {
            class: "vane::Widget".to_string(),
            name: "probe".to_string(),
            params: Vec::new(),
            ret: TypeDescriptor::void(),
            kind,
            is_static,
            is_virtual,
            is_const: false,
            id: BindingId(1),
            platforms: Vec::new(),
            convention: None,
        }
    }

    #[test]
    fn test_decision_table() {
        let cases = [
            (MemberKind::Normal, false, false, Platform::Windows, BindingStrategy::MemberCall),
            (MemberKind::Normal, false, true, Platform::Windows, BindingStrategy::VirtualCall),
            (MemberKind::Normal, true, false, Platform::Windows, BindingStrategy::StaticCall),
            (MemberKind::Constructor, false, false, Platform::Mac, BindingStrategy::ConstructorBind),
            (MemberKind::Destructor, false, false, Platform::Mac, BindingStrategy::DestructorBind),
            (MemberKind::Normal, false, false, Platform::Android, BindingStrategy::DynamicSymbolCall),
            (MemberKind::Normal, true, false, Platform::Android, BindingStrategy::DynamicSymbolCall),
        ];
        for (kind, is_static, is_virtual, platform, expected) in cases {
            assert_eq!(classify(&member(kind, is_static, is_virtual), platform), expected);
        }
    }

    #[test]
    fn test_static_wins_over_virtual() {
        // A static flagged virtual in the model is nonsensical; the table
        // still picks exactly one strategy.
        let m = member(MemberKind::Normal, true, true);
        assert_eq!(classify(&m, Platform::Windows), BindingStrategy::StaticCall);
    }

    #[test]
    fn test_structors_ignore_symbol_lookup_platform() {
        let ctor = member(MemberKind::Constructor, false, false);
        let dtor = member(MemberKind::Destructor, false, false);
        assert_eq!(
            classify(&ctor, Platform::Android),
            BindingStrategy::ConstructorBind
        );
        assert_eq!(
            classify(&dtor, Platform::Android),
            BindingStrategy::DestructorBind
        );
    }

    #[test]
    fn test_virtual_destructor_uses_destructor_strategy() {
        let mut dtor = member(MemberKind::Destructor, false, false);
        dtor.is_virtual = true;
        assert_eq!(
            classify(&dtor, Platform::Windows),
            BindingStrategy::DestructorBind
        );
    }

    #[test]
    fn test_classify_is_total() {
        for kind in [
            MemberKind::Normal,
            MemberKind::Constructor,
            MemberKind::Destructor,
        ] {
            for is_static in [false, true] {
                for is_virtual in [false, true] {
                    for platform in Platform::ALL {
                        // Every combination selects exactly one strategy
                        // without panicking.
                        let _ = classify(&member(kind, is_static, is_virtual), platform);
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_conventions() {
        let m = member(MemberKind::Normal, false, false);
        assert_eq!(
            convention_for(&m, Platform::Windows).unwrap(),
            CallingConvention::Thiscall
        );
        assert_eq!(
            convention_for(&m, Platform::Mac).unwrap(),
            CallingConvention::Default
        );

        let s = member(MemberKind::Normal, true, false);
        assert_eq!(
            convention_for(&s, Platform::Windows).unwrap(),
            CallingConvention::Cdecl
        );
    }

    #[test]
    fn test_override_rejected_off_platform() {
        let mut m = member(MemberKind::Normal, false, false);
        m.convention = Some(CallingConvention::Optcall);
        assert_eq!(
            convention_for(&m, Platform::Windows).unwrap(),
            CallingConvention::Optcall
        );
        let err = convention_for(&m, Platform::Mac).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedConvention {
                convention: CallingConvention::Optcall,
                platform: Platform::Mac
            }
        ));
    }
}
