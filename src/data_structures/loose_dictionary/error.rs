//! Error types for the Loose Dictionary.
//!
//! Every variant is an expected, recoverable outcome of a mutation. Callers
//! decide what to do next (for example, ask the user for another key).

/// Errors that can occur in Loose Dictionary operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LooseDictionaryError {
    /// Error when an empty key is provided.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// Error when adding a key that is already registered.
    #[error("Key '{key}' already exists")]
    KeyExists {
        /// The key that already exists.
        key: String,
    },

    /// Error when the key to modify, rename or remove is not registered.
    #[error("Key '{key}' not found")]
    KeyNotFound {
        /// The key that was not found.
        key: String,
    },

    /// Error when a rename target is already registered.
    #[error("Cannot rename to '{key}': key already exists")]
    TargetExists {
        /// The rename target that already exists.
        key: String,
    },

    /// Error when a key exceeds the configured maximum length.
    #[error("Key '{key}' exceeds maximum length of {max_len} characters")]
    KeyTooLong {
        /// The key that was too long.
        key: String,
        /// The maximum allowed length.
        max_len: usize,
    },
}
