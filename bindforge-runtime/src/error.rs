//! Error types for the runtime support surface.

use bindforge_model::{BindingId, CallingConvention};
use thiserror::Error;

/// Error type for trampoline creation.
#[derive(Debug, Error)]
pub enum TrampolineError {
    /// The convention cannot be expressed on this platform.
    #[error("calling convention {convention} is not supported by this trampoline")]
    UnsupportedConvention {
        /// The rejected convention.
        convention: CallingConvention,
    },

    /// The signature shape cannot be expressed.
    #[error("unsupported signature shape: {message}")]
    UnsupportedSignature {
        /// What the trampoline could not express.
        message: String,
    },
}

/// Error type for runtime binding resolution.
///
/// Every variant is terminal for the call that hit it: a missing address
/// or symbol means the running binary does not match the binding data
/// (typically a version mismatch), which cannot self-heal mid-process.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The address table has no entry for a binding identifier.
    #[error("no address registered for binding {id}; binding data does not match this binary")]
    AddressMissing {
        /// The unresolved identifier.
        id: BindingId,
    },

    /// Dynamic symbol lookup failed.
    #[error("symbol '{symbol}' not found in the host image")]
    SymbolMissing {
        /// The mangled symbol that was looked up.
        symbol: String,
    },

    /// Trampoline creation failed.
    #[error("trampoline error: {0}")]
    Trampoline(#[from] TrampolineError),

    /// No process-wide context has been installed.
    #[error("no bind context installed; call bindforge_runtime::install first")]
    ContextMissing,
}
