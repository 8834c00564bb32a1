//! Plain-text rendering of a frame.

use std::fmt;

use streamsync_models::{SafeAreaInsets, Viewer};

use crate::constants::PROJECT_TITLE;
use crate::moderation::{is_moderator, stream_host};
use crate::state::{FrameState, LoadPhase};

const MODERATOR_MARK: &str = "⭐";

/// One rendered chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Author label.
    pub author: String,
    /// Message text.
    pub message: String,
    /// Whether the author moderates the stream.
    pub is_moderator: bool,
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.author, self.message)?;
        if self.is_moderator {
            write!(f, " {MODERATOR_MARK}")?;
        }
        Ok(())
    }
}

/// The loaded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    /// Title line.
    pub title: String,
    /// Host shown under "Watching:", or the raw address.
    pub stream_host: String,
    /// Address of the embedded stream.
    pub stream_url: String,
    /// Whether the viewer moderates the stream.
    pub viewer_is_moderator: bool,
    /// Chat lines in log order.
    pub lines: Vec<ChatLine>,
    /// Padding requested by the host.
    pub padding: SafeAreaInsets,
    /// Outcome of the add-frame prompt, if one was shown.
    pub add_frame_status: Option<String>,
}

/// What a frame shows.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameView {
    /// Still bootstrapping.
    Loading,
    /// No session context was available.
    Unavailable,
    /// Loaded.
    Ready(ReadyView),
}

impl FrameView {
    /// Render `state` for `viewer` watching `stream_url`.
    pub fn from_state(state: &FrameState, stream_url: &str, viewer: Viewer) -> Self {
        match state.phase {
            LoadPhase::Loading => Self::Loading,
            LoadPhase::Unavailable => Self::Unavailable,
            LoadPhase::Ready => Self::Ready(ReadyView {
                title: PROJECT_TITLE.to_string(),
                stream_host: stream_host(stream_url),
                stream_url: stream_url.to_string(),
                viewer_is_moderator: is_moderator(viewer.fid, stream_url),
                lines: state
                    .chat
                    .messages()
                    .iter()
                    .map(|m| ChatLine {
                        author: m.author.clone(),
                        message: m.message.clone(),
                        is_moderator: m.is_moderator,
                    })
                    .collect(),
                padding: state
                    .context
                    .as_ref()
                    .map(streamsync_models::SessionContext::insets)
                    .unwrap_or_default(),
                add_frame_status: state.add_frame_result.clone(),
            }),
        }
    }
}

impl fmt::Display for FrameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading..."),
            Self::Unavailable => write!(f, "Open this frame in a Farcaster client to watch."),
            Self::Ready(view) => {
                writeln!(f, "{}", view.title)?;
                writeln!(f, "Live Stream")?;
                writeln!(f, "Watching: {}", view.stream_host)?;
                if view.viewer_is_moderator {
                    writeln!(f, "Live Chat (Moderator)")?;
                } else {
                    writeln!(f, "Live Chat")?;
                }
                for line in &view.lines {
                    writeln!(f, "{line}")?;
                }
                if let Some(status) = &view.add_frame_status {
                    writeln!(f, "{status}")?;
                }
                Ok(())
            }
        }
    }
}
