//! Constructor/destructor lifecycle for natively owned objects.
//!
//! The generated language's own structor chains would run in addition to
//! the native binary's, double-initializing or double-freeing shared
//! state. These operations make exactly the native implementation run,
//! once, using the guard set to neutralize the generated chain.
//!
//! Per-address states: `Raw` (cutoff storage, no guard entry),
//! `NativeConstructed` (no guard entry), `NativeTornDown` (guard entry
//! set, cleared by [`finish_teardown`] when the outer destruction
//! sequence completes).

use crate::callable::BoundFn;
use crate::context::BindContext;
use crate::trampoline::{AbstractSignature, CodePtr};
use std::ffi::c_void;

/// Runs a generated constructor: `Raw` → `NativeConstructed`.
///
/// Steps, in order:
/// 1. `cutoff` materializes the raw storage layout the native constructor
///    expects as its starting state; no field initializers run.
/// 2. The guard is set so the next step sees "already torn down".
/// 3. `generated_teardown` discharges the compiler-mandated destruction
///    obligations of the placeholder state; every native-destructor step
///    in that chain is a no-op under the guard.
/// 4. The guard entry is dropped again, the way the root of a real
///    teardown chain would drop it; the object is about to be live.
/// 5. The native constructor is resolved (once per binding) and invoked
///    through `invoke_native`.
///
/// # Safety
/// `this` must point to storage of the final object's size and alignment,
/// and the callbacks must uphold what they model: `cutoff` must leave the
/// storage in the layout the native code expects, and `invoke_native`
/// must call the code pointer with the receiver and the original
/// constructor arguments.
pub unsafe fn run_constructor(
    context: &BindContext,
    bound: &BoundFn,
    signature: &AbstractSignature,
    this: *mut c_void,
    cutoff: impl FnOnce(*mut c_void),
    generated_teardown: impl FnOnce(*mut c_void),
    invoke_native: impl FnOnce(CodePtr),
) {
    let address = this as usize;
    cutoff(this);
    context.guards().lock(address);
    generated_teardown(this);
    context.guards().release(address);
    let code = bound.resolve(context, signature);
    invoke_native(code);
}

/// Runs a generated destructor step: `NativeConstructed` → `NativeTornDown`.
///
/// Exactly one caller per lifecycle claims the teardown and invokes the
/// native destructor; every later or concurrent caller returns false
/// immediately. After the native destructor ran, `cutoff` re-establishes
/// the raw layout so destructor code further up the generated chain
/// operates on inert, well-defined memory. The guard entry stays set
/// until [`finish_teardown`].
///
/// # Safety
/// `this` must point to a live, natively constructed object, and
/// `invoke_native` must call the code pointer with the receiver.
pub unsafe fn run_destructor(
    context: &BindContext,
    bound: &BoundFn,
    signature: &AbstractSignature,
    this: *mut c_void,
    cutoff: impl FnOnce(*mut c_void),
    invoke_native: impl FnOnce(CodePtr),
) -> bool {
    let address = this as usize;
    if !context.guards().begin_teardown(address) {
        return false;
    }
    let code = bound.resolve(context, signature);
    invoke_native(code);
    cutoff(this);
    true
}

/// Ends a teardown: removes the guard entry once the outermost generated
/// destructor for this address has completed. The storage can only come
/// back through a fresh [`run_constructor`].
pub fn finish_teardown(context: &BindContext, this: *mut c_void) {
    context.guards().release(this as usize);
}
