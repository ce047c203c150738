//! The trampoline collaborator: raw address plus convention metadata in,
//! callable code pointer out.

use crate::address::NativeAddress;
use crate::error::TrampolineError;
use bindforge_model::CallingConvention;

/// A callable code pointer produced by the trampoline.
///
/// Generated wrappers transmute this to their concrete function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePtr(*const ());

// A code pointer is an address into immutable executable memory; sharing
// it across threads is the whole point of the resolve-once cache.
unsafe impl Send for CodePtr {}
unsafe impl Sync for CodePtr {}

impl CodePtr {
    /// Wraps a raw code pointer.
    #[must_use]
    pub const fn new(ptr: *const ()) -> Self {
        Self(ptr)
    }

    /// Reinterprets a native address as directly callable code.
    #[must_use]
    pub const fn from_address(address: NativeAddress) -> Self {
        Self(address.0 as *const ())
    }

    /// The raw pointer.
    #[must_use]
    pub const fn as_ptr(self) -> *const () {
        self.0
    }
}

/// ABI classification of one value in an abstract signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiType {
    /// No value.
    Void,
    /// Signed integer register class.
    Int,
    /// Floating-point register class.
    Float,
    /// Boolean (integer register class, single byte).
    Bool,
    /// Narrow character.
    Char,
    /// Pointer or reference.
    Pointer,
    /// By-value aggregate (memory class).
    Aggregate,
}

/// Calling-convention-independent description of a function signature,
/// enough for the trampoline to lay out registers and stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractSignature {
    /// True when the first physical argument is a receiver pointer.
    pub has_receiver: bool,
    /// Parameter classes in declaration order, receiver excluded.
    pub params: Vec<AbiType>,
    /// Return class.
    pub ret: AbiType,
}

impl AbstractSignature {
    /// Signature of a free or static function.
    #[must_use]
    pub fn function(params: &[AbiType], ret: AbiType) -> Self {
        Self {
            has_receiver: false,
            params: params.to_vec(),
            ret,
        }
    }

    /// Signature of a member function (receiver prepended at call time).
    #[must_use]
    pub fn method(params: &[AbiType], ret: AbiType) -> Self {
        Self {
            has_receiver: true,
            params: params.to_vec(),
            ret,
        }
    }
}

/// The external hook-creation primitive.
///
/// Turns (address, convention metadata, abstract signature) into a
/// callable. Implementations live outside this crate; the bundled
/// [`DirectTrampoline`] covers platforms whose default C convention needs
/// no translation.
pub trait Trampoline: Send + Sync {
    /// Creates a callable for the given address.
    ///
    /// # Errors
    /// Returns `TrampolineError` if the convention or signature shape is
    /// unsupported on this platform.
    fn create_callable(
        &self,
        address: NativeAddress,
        convention: CallingConvention,
        signature: &AbstractSignature,
    ) -> Result<CodePtr, TrampolineError>;
}

/// Pass-through trampoline for platforms where the target convention is
/// the platform C convention and the address is directly callable.
#[derive(Debug, Default)]
pub struct DirectTrampoline;

impl Trampoline for DirectTrampoline {
    fn create_callable(
        &self,
        address: NativeAddress,
        convention: CallingConvention,
        _signature: &AbstractSignature,
    ) -> Result<CodePtr, TrampolineError> {
        match convention {
            CallingConvention::Default | CallingConvention::Cdecl => {
                Ok(CodePtr::from_address(address))
            }
            other => Err(TrampolineError::UnsupportedConvention { convention: other }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_trampoline_default_convention() {
        let trampoline = DirectTrampoline;
        let signature = AbstractSignature::function(&[AbiType::Int], AbiType::Void);
        let code = trampoline
            .create_callable(NativeAddress(0x4000), CallingConvention::Default, &signature)
            .expect("default convention is direct");
        assert_eq!(code.as_ptr() as usize, 0x4000);
    }

    #[test]
    fn test_direct_trampoline_rejects_thiscall() {
        let trampoline = DirectTrampoline;
        let signature = AbstractSignature::method(&[], AbiType::Void);
        let err = trampoline
            .create_callable(
                NativeAddress(0x4000),
                CallingConvention::Thiscall,
                &signature,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            TrampolineError::UnsupportedConvention {
                convention: CallingConvention::Thiscall
            }
        ));
    }
}
