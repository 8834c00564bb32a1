//! Moderator and author-label rules.
//!
//! Everything here is pure and total: malformed input degrades to "no
//! moderator rights" or the raw value, never a panic.

use streamsync_models::{Fid, StreamAddress, GUEST_AUTHOR};

/// Identities up to this many characters are shown in full.
const MAX_IDENTITY_LEN: usize = 12;
const HEAD_LEN: usize = 6;
const TAIL_LEN: usize = 4;

/// Returns true if `viewer` is the caster named by `stream_url`.
///
/// False when the viewer is unknown, the address names no caster, or the
/// address does not parse.
pub fn is_moderator(viewer: Option<Fid>, stream_url: &str) -> bool {
    StreamAddress::parse(stream_url).is_ok_and(|stream| stream.is_caster(viewer))
}

/// Author label for messages sent by `viewer`.
pub fn author_label(viewer: Option<Fid>) -> String {
    match viewer {
        Some(fid) => format!("User {}", truncate_identity(&fid.to_string())),
        None => GUEST_AUTHOR.to_string(),
    }
}

/// Shorten a long identity to `abcdef...wxyz`.
pub fn truncate_identity(identity: &str) -> String {
    let chars: Vec<char> = identity.chars().collect();
    if chars.len() <= MAX_IDENTITY_LEN {
        return identity.to_string();
    }
    let head: String = chars[..HEAD_LEN].iter().collect();
    let tail: String = chars[chars.len() - TAIL_LEN..].iter().collect();
    format!("{head}...{tail}")
}

/// Hostname to display for a stream; the raw address if it does not parse.
pub fn stream_host(stream_url: &str) -> String {
    match StreamAddress::parse(stream_url) {
        Ok(stream) if !stream.hostname().is_empty() => stream.hostname().to_string(),
        _ => stream_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = "https://live.example.com/watch?caster_fid=123";

    #[test]
    fn caster_is_moderator() {
        assert!(is_moderator(Some(Fid::new(123)), STREAM));
    }

    #[test]
    fn other_viewers_are_not() {
        assert!(!is_moderator(Some(Fid::new(124)), STREAM));
        assert!(!is_moderator(None, STREAM));
    }

    #[test]
    fn stream_without_caster_has_no_moderator() {
        assert!(!is_moderator(Some(Fid::new(123)), "https://live.example.com/watch"));
        assert!(!is_moderator(Some(Fid::new(123)), "https://live.example.com/?caster_fid=abc"));
    }

    #[test]
    fn malformed_address_never_panics() {
        assert!(!is_moderator(Some(Fid::new(123)), "not a url"));
        assert!(!is_moderator(Some(Fid::new(123)), ""));
    }

    #[test]
    fn labels() {
        assert_eq!(author_label(Some(Fid::new(123))), "User 123");
        assert_eq!(author_label(None), "Guest");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_identity("123456789012"), "123456789012");
        assert_eq!(truncate_identity("1234567890123"), "123456...0123");
        assert_eq!(
            author_label(Some(Fid::new(18_446_744_073_709_551_615))),
            "User 184467...1615"
        );
    }

    #[test]
    fn host_display() {
        assert_eq!(stream_host(STREAM), "live.example.com");
        assert_eq!(stream_host("not a url"), "not a url");
    }
}
