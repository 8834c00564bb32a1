//! Project-wide names.

/// App id; scopes host subjects.
pub const PROJECT_ID: &str = "streamsync-frame";
/// Title shown at the top of the frame.
pub const PROJECT_TITLE: &str = "StreamSync Frame";
/// One-line description of the frame.
pub const PROJECT_DESCRIPTION: &str = "Live streaming with Farcaster chat rooms";
/// Launch parameter carrying the stream address.
pub const STREAM_URL_PARAM: &str = "stream_url";
/// Broadcast channel chat messages travel on.
pub const CHAT_MESSAGE_EVENT: &str = "streamsync-chat-message";
