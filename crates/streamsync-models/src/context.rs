//! Host-supplied session context.
//!
//! The host fetches a [`SessionContext`] once per mount. It tells the frame
//! who is watching, whether the frame is already installed (`added`), and
//! how much of the screen edge is unsafe for content.

use serde::{Deserialize, Serialize};

use crate::identity::Fid;

/// Everything the host knows about the current viewing session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// The user who opened the frame.
    pub user: UserContext,
    /// The client application hosting the frame.
    pub client: ClientContext,
}

/// Identity of the viewing user as reported by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// The user's fid.
    pub fid: Fid,
    /// Handle, if the host shares it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name, if the host shares it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL, if the host shares it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
}

/// State of the hosting client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    /// Fid of the client application itself.
    pub client_fid: Fid,
    /// Whether the viewer has added (installed/pinned) this frame.
    pub added: bool,
    /// Notification endpoint, present when notifications are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_details: Option<NotificationDetails>,
    /// Screen-edge insets the frame should pad by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_area_insets: Option<SafeAreaInsets>,
}

/// Where and how the host delivers notifications for this frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationDetails {
    /// Endpoint notifications are posted to.
    pub url: String,
    /// Token identifying this viewer's subscription.
    pub token: String,
}

/// Layout insets, in host pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SafeAreaInsets {
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
}

impl SessionContext {
    /// Insets to apply, zero when the host does not report any.
    pub fn insets(&self) -> SafeAreaInsets {
        self.client.safe_area_insets.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
