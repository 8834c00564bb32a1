//! Viewer identity types.
//!
//! A viewer is identified by a numeric [`Fid`] when the session/auth provider
//! knows who they are. Anonymous viewers are a valid state and are
//! represented by a [`Viewer`] without a fid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Fid
// ---------------------------------------------------------------------------

/// Numeric identity of a user on the host network.
///
/// # Examples
///
/// ```
/// use streamsync_models::Fid;
///
/// let fid: Fid = "123".parse().unwrap();
/// assert_eq!(fid, Fid::new(123));
/// assert_eq!(fid.to_string(), "123");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Fid(u64);

impl Fid {
    /// Create a new fid.
    pub fn new(fid: u64) -> Self {
        Self(fid)
    }

    /// Return the inner numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Fid {
    fn from(fid: u64) -> Self {
        Self(fid)
    }
}

impl FromStr for Fid {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| ModelError::InvalidFid {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

/// The person looking at the frame, as reported by the session provider.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer {
    /// Identity of the viewer, if authenticated.
    pub fid: Option<Fid>,
}

impl Viewer {
    /// An unauthenticated viewer.
    pub fn guest() -> Self {
        Self { fid: None }
    }

    /// A viewer the session provider has authenticated.
    pub fn authenticated(fid: Fid) -> Self {
        Self { fid: Some(fid) }
    }

    /// Returns true if no identity is known for this viewer.
    pub fn is_guest(&self) -> bool {
        self.fid.is_none()
    }
}

impl From<Option<Fid>> for Viewer {
    fn from(fid: Option<Fid>) -> Self {
        Self { fid }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
