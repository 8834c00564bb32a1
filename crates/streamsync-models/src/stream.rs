//! Stream address parsing.
//!
//! The stream address is an opaque URL. Only two things are read from it:
//! the hostname (for display) and the `caster_fid` query parameter, which
//! designates the single moderator of the stream.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::ModelError;
use crate::identity::Fid;

/// Query parameter carrying the caster's fid.
pub const CASTER_FID_PARAM: &str = "caster_fid";

/// A parsed, absolute stream URL.
///
/// # Examples
///
/// ```
/// use streamsync_models::{Fid, StreamAddress};
///
/// let stream = StreamAddress::parse("https://live.example.com/watch?caster_fid=123").unwrap();
/// assert_eq!(stream.hostname(), "live.example.com");
/// assert_eq!(stream.caster_fid(), Some(Fid::new(123)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamAddress(Url);

impl StreamAddress {
    /// Parse a stream address.
    ///
    /// Fails for relative or otherwise malformed URLs; never panics.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        Url::parse(raw.trim())
            .map(Self)
            .map_err(|e| ModelError::InvalidStreamAddress {
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }

    /// Hostname to display. Empty for URLs without a host (e.g. `data:`).
    pub fn hostname(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// The designated caster, if the address names one.
    ///
    /// The first `caster_fid` parameter wins; a non-numeric value is treated
    /// as absent.
    pub fn caster_fid(&self) -> Option<Fid> {
        self.0
            .query_pairs()
            .find(|(key, _)| key == CASTER_FID_PARAM)
            .and_then(|(_, value)| value.parse::<Fid>().ok())
    }

    /// Returns true if `viewer` is the caster of this stream.
    ///
    /// An unknown viewer or a stream without a caster is never a match.
    pub fn is_caster(&self, viewer: Option<Fid>) -> bool {
        matches!((viewer, self.caster_fid()), (Some(v), Some(c)) if v == c)
    }

    /// Return the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StreamAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for StreamAddress {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hostname() {
        let s = StreamAddress::parse("https://player.example.tv/live/abc").unwrap();
        assert_eq!(s.hostname(), "player.example.tv");
        assert_eq!(s.caster_fid(), None);
    }

    #[test]
    fn reads_caster_fid() {
        let s = StreamAddress::parse("https://x.tv/watch?foo=1&caster_fid=123").unwrap();
        assert_eq!(s.caster_fid(), Some(Fid::new(123)));
    }

    #[test]
    fn non_numeric_caster_is_absent() {
        let s = StreamAddress::parse("https://x.tv/watch?caster_fid=alice").unwrap();
        assert_eq!(s.caster_fid(), None);
        assert!(!s.is_caster(Some(Fid::new(0))));
    }

    #[test]
    fn is_caster_requires_both_sides() {
        let s = StreamAddress::parse("https://x.tv/watch?caster_fid=5").unwrap();
        assert!(s.is_caster(Some(Fid::new(5))));
        assert!(!s.is_caster(Some(Fid::new(6))));
        assert!(!s.is_caster(None));

        let no_caster = StreamAddress::parse("https://x.tv/watch").unwrap();
        assert!(!no_caster.is_caster(None));
    }

    #[test]
    fn malformed_address_is_an_error() {
        let err = StreamAddress::parse("not a url").unwrap_err();
        assert!(matches!(err, ModelError::InvalidStreamAddress { .. }));
        assert!("".parse::<StreamAddress>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let s: StreamAddress = "https://x.tv/watch?caster_fid=5".parse().unwrap();
        assert_eq!(s.to_string(), "https://x.tv/watch?caster_fid=5");
        assert_eq!(s.as_str(), "https://x.tv/watch?caster_fid=5");
    }
}
