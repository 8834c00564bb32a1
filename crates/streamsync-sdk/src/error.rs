//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It wraps underlying transport and serialization
//! errors into a unified enum.

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad URL, bad seed).
    #[error("configuration error: {0}")]
    Config(String),

    /// The host reported a failure for a request.
    #[error("host error: {0}")]
    Host(String),

    /// NATS transport error.
    #[error("NATS error: {0}")]
    Nats(String),

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<async_nats::ConnectError> for SdkError {
    fn from(e: async_nats::ConnectError) -> Self {
        SdkError::Nats(e.to_string())
    }
}

impl From<async_nats::PublishError> for SdkError {
    fn from(e: async_nats::PublishError) -> Self {
        SdkError::Nats(e.to_string())
    }
}

impl From<async_nats::SubscribeError> for SdkError {
    fn from(e: async_nats::SubscribeError) -> Self {
        SdkError::Nats(e.to_string())
    }
}

impl From<async_nats::RequestError> for SdkError {
    fn from(e: async_nats::RequestError) -> Self {
        SdkError::Nats(e.to_string())
    }
}
