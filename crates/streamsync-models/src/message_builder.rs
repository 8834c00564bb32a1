//! # Chat Message Builder
//!
//! Fluent builder for [`ChatMessage`](crate::ChatMessage) values. The builder
//! is the checked path: it refuses text that is empty once trimmed, and
//! derives the moderator flag from the author's fid and the stream address
//! exactly once.
//!
//! ```rust
//! use streamsync_models::{Fid, MessageBuilder, StreamAddress};
//!
//! let stream = StreamAddress::parse("https://live.example.com/watch?caster_fid=123").ok();
//! let msg = MessageBuilder::chat("hello")
//!     .author("User 123")
//!     .moderator_of(Some(Fid::new(123)), stream.as_ref())
//!     .build()
//!     .unwrap();
//! assert!(msg.is_moderator);
//! ```

use crate::chat::{new_message_id, ChatMessage};
use crate::error::ModelError;
use crate::identity::Fid;
use crate::stream::StreamAddress;

/// Fallback author label for viewers without an identity.
pub const GUEST_AUTHOR: &str = "Guest";

/// Entry point for fluent message construction.
pub struct MessageBuilder;

impl MessageBuilder {
    /// Start building a chat message with the given text.
    pub fn chat(text: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::new(text)
    }
}

/// Builder for [`ChatMessage`].
///
/// Created via [`MessageBuilder::chat`].
pub struct ChatMessageBuilder {
    text: String,
    author: Option<String>,
    is_moderator: bool,
}

impl ChatMessageBuilder {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
            is_moderator: false,
        }
    }

    /// Set the author label. Defaults to [`GUEST_AUTHOR`].
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Derive the moderator flag from the author's fid and the stream.
    ///
    /// A missing stream (e.g. one that failed to parse) never grants
    /// moderator rights.
    pub fn moderator_of(mut self, author: Option<Fid>, stream: Option<&StreamAddress>) -> Self {
        self.is_moderator = stream.is_some_and(|s| s.is_caster(author));
        self
    }

    /// Finish the message.
    ///
    /// Fails with [`ModelError::EmptyMessage`] if the text is empty after
    /// trimming. The stored text is not trimmed.
    pub fn build(self) -> Result<ChatMessage, ModelError> {
        if self.text.trim().is_empty() {
            return Err(ModelError::EmptyMessage);
        }
        Ok(ChatMessage {
            id: new_message_id(),
            author: self.author.unwrap_or_else(|| GUEST_AUTHOR.to_string()),
            message: self.text,
            is_moderator: self.is_moderator,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
