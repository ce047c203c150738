//! Error types for code generation.

use bindforge_model::{CallingConvention, ModelError, Platform};
use thiserror::Error;

/// Error type for code generation operations.
///
/// Per-member errors never abort a run; the driver records them against
/// the member and keeps going.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Model loading or validation error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The member requests a convention the platform cannot express.
    #[error("calling convention {convention} is not available on {platform}")]
    UnsupportedConvention {
        /// The requested convention.
        convention: CallingConvention,
        /// Target platform.
        platform: Platform,
    },

    /// The signature shape cannot be expressed with the chosen convention.
    #[error("unsupported signature shape: {message}")]
    UnsupportedSignature {
        /// What cannot be expressed.
        message: String,
    },
}
