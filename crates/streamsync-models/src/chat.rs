//! Chat message payload.
//!
//! A [`ChatMessage`] is what travels on the chat broadcast channel. It is
//! created once by the author's frame and never modified afterwards: the
//! moderator flag in particular is fixed at creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message identifier (UUID v7, ordered by creation time).
    pub id: String,
    /// Display label of the author.
    pub author: String,
    /// Message text, as typed.
    pub message: String,
    /// Whether the author was the stream's caster when the message was created.
    pub is_moderator: bool,
}

impl ChatMessage {
    /// Create a message with a freshly generated id.
    ///
    /// Callers are expected to have validated `message`; see
    /// [`ChatMessageBuilder`](crate::ChatMessageBuilder) for the checked path.
    pub fn new(author: impl Into<String>, message: impl Into<String>, is_moderator: bool) -> Self {
        Self {
            id: new_message_id(),
            author: author.into(),
            message: message.into(),
            is_moderator,
        }
    }
}

/// Generate a message id that sorts by creation time.
pub fn new_message_id() -> String {
    Uuid::now_v7().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = ChatMessage::new("Guest", "hi", false);
        let b = ChatMessage::new("Guest", "hi", false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn ids_order_by_creation() {
        let a = new_message_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_message_id();
        assert!(a < b, "{a} should sort before {b}");
    }

    #[test]
    fn wire_shape_uses_is_moderator() {
        let msg = ChatMessage {
            id: "1".into(),
            author: "User 123".into(),
            message: "hello".into(),
            is_moderator: true,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "author": "User 123",
                "message": "hello",
                "isModerator": true
            })
        );
    }

    #[test]
    fn decodes_foreign_ids() {
        // Other clients may still send millisecond-timestamp ids.
        let msg: ChatMessage = serde_json::from_value(serde_json::json!({
            "id": "1718000000000",
            "author": "Guest",
            "message": "yo",
            "isModerator": false
        }))
        .unwrap();
        assert_eq!(msg.id, "1718000000000");
        assert!(!msg.is_moderator);
    }
}
