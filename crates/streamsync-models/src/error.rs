//! Error types for the `streamsync-models` crate.
//!
//! All fallible constructors and parsers in this crate return variants of
//! [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A stream address could not be parsed as an absolute URL.
    #[error("invalid stream address \"{value}\": {reason}")]
    InvalidStreamAddress {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A viewer identity was not a non-negative integer.
    #[error("invalid fid \"{value}\": {reason}")]
    InvalidFid {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A chat message was empty or whitespace only.
    #[error("chat message must not be empty")]
    EmptyMessage,

    /// A host event payload did not match the expected shape.
    #[error("malformed {event} payload: {reason}")]
    MalformedEvent {
        /// The event name the payload was received under.
        event: String,
        /// Human-readable explanation.
        reason: String,
    },
}
