//! Receiver adjustment for virtual dispatch.
//!
//! The generated class may place a base sub-object at a different byte
//! offset than the original compiled layout, so a virtual call through
//! that base must shift the receiver by the offset the original compiler
//! would have applied. The offsets come from external metadata; this
//! crate only defines the seam.

use bindforge_model::BindingId;
use std::ffi::c_void;

/// The external this-pointer adjustment collaborator.
pub trait ThunkAdjust: Send + Sync {
    /// Adjusts a receiver for a virtual call through the given member of
    /// the given class.
    fn adjust(&self, receiver: *mut c_void, class: &str, member: BindingId) -> *mut c_void;
}

/// No-op adjuster for layouts that already match.
#[derive(Debug, Default)]
pub struct IdentityAdjust;

impl ThunkAdjust for IdentityAdjust {
    fn adjust(&self, receiver: *mut c_void, _class: &str, _member: BindingId) -> *mut c_void {
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_adjust() {
        let adjuster = IdentityAdjust;
        let receiver = 0x1000 as *mut c_void;
        assert_eq!(
            adjuster.adjust(receiver, "vane::MenuLayer", BindingId(1)),
            receiver
        );
    }

    #[test]
    fn test_offset_adjuster_through_trait_object() {
        struct FixedOffset(usize);
        impl ThunkAdjust for FixedOffset {
            fn adjust(
                &self,
                receiver: *mut c_void,
                _class: &str,
                _member: BindingId,
            ) -> *mut c_void {
                (receiver as usize + self.0) as *mut c_void
            }
        }

        let adjuster: Box<dyn ThunkAdjust> = Box::new(FixedOffset(8));
        let adjusted = adjuster.adjust(0x1000 as *mut c_void, "vane::MenuLayer", BindingId(1));
        assert_eq!(adjusted as usize, 0x1008);
    }
}
