//! Chat synchronizer.
//!
//! [`ChatSynchronizer`] turns raw input into outgoing [`ChatMessage`]s for
//! one viewer. [`ChatLog`] is the ordered message log kept in frame state.
//!
//! Transports echo a frame's own broadcasts back to it, so the log remembers
//! the ids it submitted while subscribed and drops the first inbound copy of
//! each. At most [`MAX_AWAITING_ECHO`] ids are remembered; the oldest is
//! forgotten first.

use std::collections::VecDeque;

use streamsync_models::{ChatMessage, MessageBuilder, StreamAddress, Viewer};
use tracing::debug;

use crate::moderation::author_label;

/// Own message ids remembered while waiting for their echo.
pub const MAX_AWAITING_ECHO: usize = 256;

/// Builds outgoing messages on behalf of one viewer.
#[derive(Debug, Clone)]
pub struct ChatSynchronizer {
    viewer: Viewer,
    stream: Option<StreamAddress>,
}

impl ChatSynchronizer {
    /// Synchronizer for `viewer` watching `stream_url`.
    pub fn new(viewer: Viewer, stream_url: &str) -> Self {
        let stream = match StreamAddress::parse(stream_url) {
            Ok(stream) => Some(stream),
            Err(e) => {
                debug!(error = %e, "stream address does not parse; moderation disabled");
                None
            }
        };
        Self { viewer, stream }
    }

    /// Build the message for `text`, or `None` if it is blank.
    pub fn compose(&self, text: &str) -> Option<ChatMessage> {
        MessageBuilder::chat(text)
            .author(author_label(self.viewer.fid))
            .moderator_of(self.viewer.fid, self.stream.as_ref())
            .build()
            .ok()
    }
}

/// Outcome of recording a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The message was appended.
    Appended,
    /// The message was our own broadcast coming back and was dropped.
    EchoDropped,
}

/// Ordered chat log. Messages are never reordered or evicted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    awaiting_echo: VecDeque<String>,
}

impl ChatLog {
    /// Messages in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no message has been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record a message this frame sent.
    ///
    /// `expect_echo` is false when the frame is not subscribed to the chat
    /// channel, in which case no copy will ever come back.
    pub fn record_sent(&mut self, message: ChatMessage, expect_echo: bool) -> Recorded {
        if expect_echo {
            if self.awaiting_echo.len() == MAX_AWAITING_ECHO {
                self.awaiting_echo.pop_front();
            }
            self.awaiting_echo.push_back(message.id.clone());
        }
        self.messages.push(message);
        Recorded::Appended
    }

    /// Record a message delivered by the host.
    pub fn record_received(&mut self, message: ChatMessage) -> Recorded {
        if let Some(pos) = self.awaiting_echo.iter().position(|id| *id == message.id) {
            self.awaiting_echo.remove(pos);
            debug!(id = %message.id, "dropping echo of own message");
            return Recorded::EchoDropped;
        }
        self.messages.push(message);
        Recorded::Appended
    }
}
