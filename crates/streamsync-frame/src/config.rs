//! Frame configuration.
//!
//! Built from environment variables at startup; the binary then applies its
//! command-line overrides on top.

use std::time::Duration;

use crate::constants::CHAT_MESSAGE_EVENT;

/// Stream shown when none is configured.
pub const DEFAULT_STREAM_URL: &str = "https://stream.example.com/watch";

const DEFAULT_CONTEXT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONTEXT_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Settings for one mounted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Address of the live stream; may carry a `caster_fid` parameter.
    pub stream_url: String,
    /// Broadcast channel used for chat.
    pub chat_event: String,
    /// Upper bound on a single context request.
    pub context_timeout: Duration,
    /// Context requests made before giving up. Always at least 1.
    pub context_attempts: u32,
    /// Pause between failed context requests.
    pub retry_backoff: Duration,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            chat_event: CHAT_MESSAGE_EVENT.to_string(),
            context_timeout: Duration::from_millis(DEFAULT_CONTEXT_TIMEOUT_MS),
            context_attempts: DEFAULT_CONTEXT_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl FrameConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                        | Default                            |
    /// |---------------------------------|------------------------------------|
    /// | `STREAMSYNC_STREAM_URL`         | `https://stream.example.com/watch` |
    /// | `STREAMSYNC_CONTEXT_TIMEOUT_MS` | `5000`                             |
    /// | `STREAMSYNC_CONTEXT_ATTEMPTS`   | `3` (minimum 1)                    |
    /// | `STREAMSYNC_RETRY_BACKOFF_MS`   | `250`                              |
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_millis)
        };

        Self {
            stream_url: lookup("STREAMSYNC_STREAM_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.stream_url),
            chat_event: defaults.chat_event,
            context_timeout: millis("STREAMSYNC_CONTEXT_TIMEOUT_MS", defaults.context_timeout),
            context_attempts: lookup("STREAMSYNC_CONTEXT_ATTEMPTS")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(defaults.context_attempts)
                .max(1),
            retry_backoff: millis("STREAMSYNC_RETRY_BACKOFF_MS", defaults.retry_backoff),
        }
    }

    /// Replace the stream address.
    #[must_use]
    pub fn with_stream_url(mut self, stream_url: impl Into<String>) -> Self {
        self.stream_url = stream_url.into();
        self
    }
}
