//! Error types for model loading and validation.

use thiserror::Error;

/// Error type for model loading and validation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A class or member name is empty.
    #[error("empty {kind} name in class '{class}'")]
    EmptyName {
        /// What was unnamed (class, member, parameter).
        kind: String,
        /// Owning class name, or empty for the class itself.
        class: String,
    },

    /// Two bindable members share the same stable identifier.
    #[error("duplicate binding id {id}: '{first}' and '{second}'")]
    DuplicateBindingId {
        /// The shared identifier.
        id: u32,
        /// Qualified name of the first member.
        first: String,
        /// Qualified name of the second member.
        second: String,
    },

    /// A member's recorded owning class does not match the class that holds it.
    #[error("member '{member}' records owning class '{declared}' but belongs to '{class}'")]
    ClassMismatch {
        /// Class that holds the member.
        class: String,
        /// Member name.
        member: String,
        /// Owning class recorded on the member.
        declared: String,
    },

    /// A structor declaration carries an impossible shape.
    #[error("invalid structor '{member}' in class '{class}': {message}")]
    InvalidStructor {
        /// Owning class name.
        class: String,
        /// Member name.
        member: String,
        /// What is wrong with it.
        message: String,
    },
}
