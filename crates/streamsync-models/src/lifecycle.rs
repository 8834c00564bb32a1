//! Frame lifecycle notifications and add-frame outcomes.
//!
//! The host delivers lifecycle notifications as `(event name, JSON payload)`
//! pairs. [`LifecycleEvent::from_host`] turns such a pair into a typed event;
//! [`LifecycleEvent::to_host`] produces it.
//!
//! ```text
//! frameAdded            { notificationDetails? }
//! frameAddRejected      { reason: "invalid_domain_manifest" | "rejected_by_user" }
//! frameRemoved          {}
//! notificationsEnabled  { notificationDetails }
//! notificationsDisabled {}
//! primaryButtonClicked  {}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::NotificationDetails;
use crate::error::ModelError;

/// Tag key used to discriminate lifecycle payloads internally.
const EVENT_TAG: &str = "event";

// ---------------------------------------------------------------------------
// LifecycleEventKind
// ---------------------------------------------------------------------------

/// The fixed set of lifecycle notifications a frame subscribes to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum LifecycleEventKind {
    /// The viewer added the frame.
    FrameAdded,
    /// The viewer declined to add the frame, or the host refused it.
    FrameAddRejected,
    /// The viewer removed the frame.
    FrameRemoved,
    /// Notifications were turned on.
    NotificationsEnabled,
    /// Notifications were turned off.
    NotificationsDisabled,
    /// The host's primary action button was pressed.
    PrimaryButtonClicked,
}

impl LifecycleEventKind {
    /// Wire name of the notification.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Every kind, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

// ---------------------------------------------------------------------------
// AddRejectionReason
// ---------------------------------------------------------------------------

/// Why the host reported a `frameAddRejected` notification.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddRejectionReason {
    /// The frame's domain manifest failed validation.
    InvalidDomainManifest,
    /// The viewer dismissed the add prompt.
    RejectedByUser,
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// A decoded lifecycle notification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// See [`LifecycleEventKind::FrameAdded`].
    FrameAdded {
        /// Notification endpoint granted alongside the add, if any.
        #[serde(
            default,
            rename = "notificationDetails",
            skip_serializing_if = "Option::is_none"
        )]
        notification_details: Option<NotificationDetails>,
    },
    /// See [`LifecycleEventKind::FrameAddRejected`].
    FrameAddRejected {
        /// Rejection cause reported by the host.
        reason: AddRejectionReason,
    },
    /// See [`LifecycleEventKind::FrameRemoved`].
    FrameRemoved,
    /// See [`LifecycleEventKind::NotificationsEnabled`].
    NotificationsEnabled {
        /// The newly issued notification endpoint.
        #[serde(rename = "notificationDetails")]
        notification_details: NotificationDetails,
    },
    /// See [`LifecycleEventKind::NotificationsDisabled`].
    NotificationsDisabled,
    /// See [`LifecycleEventKind::PrimaryButtonClicked`].
    PrimaryButtonClicked,
}

impl LifecycleEvent {
    /// The kind of this event.
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            Self::FrameAdded { .. } => LifecycleEventKind::FrameAdded,
            Self::FrameAddRejected { .. } => LifecycleEventKind::FrameAddRejected,
            Self::FrameRemoved => LifecycleEventKind::FrameRemoved,
            Self::NotificationsEnabled { .. } => LifecycleEventKind::NotificationsEnabled,
            Self::NotificationsDisabled => LifecycleEventKind::NotificationsDisabled,
            Self::PrimaryButtonClicked => LifecycleEventKind::PrimaryButtonClicked,
        }
    }

    /// Decode a host notification delivered under `name`.
    ///
    /// A `null` payload is accepted for events that carry no data.
    pub fn from_host(name: &str, payload: Value) -> Result<Self, ModelError> {
        let malformed = |reason: String| ModelError::MalformedEvent {
            event: name.to_string(),
            reason,
        };

        let kind: LifecycleEventKind = name
            .parse()
            .map_err(|_| malformed("not a lifecycle event".to_string()))?;

        let mut fields = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => return Err(malformed(format!("expected an object, got {other}"))),
        };
        fields.insert(EVENT_TAG.to_string(), Value::from(kind.as_str()));

        serde_json::from_value(Value::Object(fields)).map_err(|e| malformed(e.to_string()))
    }

    /// Encode as the `(event name, payload)` pair the host delivers.
    pub fn to_host(&self) -> (&'static str, Value) {
        let mut payload = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut payload {
            map.remove(EVENT_TAG);
        }
        (self.kind().as_str(), payload)
    }
}

// ---------------------------------------------------------------------------
// Add-frame outcome
// ---------------------------------------------------------------------------

/// Why a request to add the frame did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddFrameError {
    /// The viewer dismissed the prompt.
    #[error("rejected by user: {0}")]
    RejectedByUser(String),
    /// The host refused the frame's domain manifest.
    #[error("invalid domain manifest: {0}")]
    InvalidDomainManifest(String),
    /// Any other failure, including transport errors.
    #[error("{0}")]
    Failed(String),
}

impl AddFrameError {
    /// Status line shown to the viewer.
    ///
    /// The two expected rejections read `Not added: …`; anything else reads
    /// `Error: …`.
    pub fn status_line(&self) -> String {
        match self {
            Self::RejectedByUser(msg) | Self::InvalidDomainManifest(msg) => {
                format!("Not added: {msg}")
            }
            Self::Failed(msg) => format!("Error: {msg}"),
        }
    }
}

/// Wire form of a host's reply to an add-frame request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddFrameResponse {
    /// The frame was added.
    Added {
        /// Notification endpoint granted alongside the add, if any.
        #[serde(
            default,
            rename = "notificationDetails",
            skip_serializing_if = "Option::is_none"
        )]
        notification_details: Option<NotificationDetails>,
    },
    /// See [`AddFrameError::RejectedByUser`].
    RejectedByUser {
        /// Host-provided explanation.
        message: String,
    },
    /// See [`AddFrameError::InvalidDomainManifest`].
    InvalidDomainManifest {
        /// Host-provided explanation.
        message: String,
    },
    /// See [`AddFrameError::Failed`].
    Failed {
        /// Host-provided explanation.
        message: String,
    },
}

impl AddFrameResponse {
    /// Convert into the outcome the frame acts on.
    pub fn into_result(self) -> Result<Option<NotificationDetails>, AddFrameError> {
        match self {
            Self::Added {
                notification_details,
            } => Ok(notification_details),
            Self::RejectedByUser { message } => Err(AddFrameError::RejectedByUser(message)),
            Self::InvalidDomainManifest { message } => {
                Err(AddFrameError::InvalidDomainManifest(message))
            }
            Self::Failed { message } => Err(AddFrameError::Failed(message)),
        }
    }
}

impl From<Result<Option<NotificationDetails>, AddFrameError>> for AddFrameResponse {
    fn from(result: Result<Option<NotificationDetails>, AddFrameError>) -> Self {
        match result {
            Ok(notification_details) => Self::Added {
                notification_details,
            },
            Err(AddFrameError::RejectedByUser(message)) => Self::RejectedByUser { message },
            Err(AddFrameError::InvalidDomainManifest(message)) => {
                Self::InvalidDomainManifest { message }
            }
            Err(AddFrameError::Failed(message)) => Self::Failed { message },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn details() -> NotificationDetails {
        NotificationDetails {
            url: "https://api.example.com/notify".into(),
            token: "tok".into(),
        }
    }

    #[test]
    fn kind_wire_names() {
        let names: Vec<&str> = LifecycleEventKind::iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "frameAdded",
                "frameAddRejected",
                "frameRemoved",
                "notificationsEnabled",
                "notificationsDisabled",
                "primaryButtonClicked",
            ]
        );
        assert_eq!(LifecycleEventKind::FrameRemoved.to_string(), "frameRemoved");
    }

    #[test]
    fn decodes_frame_added_with_details() {
        let event = LifecycleEvent::from_host(
            "frameAdded",
            serde_json::json!({ "notificationDetails": { "url": "https://api.example.com/notify", "token": "tok" } }),
        )
        .unwrap();
        assert_eq!(
            event,
            LifecycleEvent::FrameAdded {
                notification_details: Some(details())
            }
        );
    }

    #[test]
    fn decodes_null_payload_for_unit_events() {
        let event = LifecycleEvent::from_host("frameRemoved", Value::Null).unwrap();
        assert_eq!(event, LifecycleEvent::FrameRemoved);
        let event = LifecycleEvent::from_host("frameAdded", Value::Null).unwrap();
        assert_eq!(
            event,
            LifecycleEvent::FrameAdded {
                notification_details: None
            }
        );
    }

    #[test]
    fn decodes_rejection_reason() {
        let event = LifecycleEvent::from_host(
            "frameAddRejected",
            serde_json::json!({ "reason": "rejected_by_user" }),
        )
        .unwrap();
        assert_eq!(
            event,
            LifecycleEvent::FrameAddRejected {
                reason: AddRejectionReason::RejectedByUser
            }
        );
    }

    #[test]
    fn rejects_unknown_names_and_bad_payloads() {
        assert!(matches!(
            LifecycleEvent::from_host("streamsync-chat-message", Value::Null),
            Err(ModelError::MalformedEvent { .. })
        ));
        assert!(LifecycleEvent::from_host("frameAddRejected", Value::Null).is_err());
        assert!(LifecycleEvent::from_host("frameRemoved", serde_json::json!(3)).is_err());
    }

    #[test]
    fn to_host_strips_the_tag() {
        let (name, payload) = LifecycleEvent::NotificationsEnabled {
            notification_details: details(),
        }
        .to_host();
        assert_eq!(name, "notificationsEnabled");
        assert!(payload.get("event").is_none());
        assert_eq!(payload["notificationDetails"]["token"], "tok");

        let (name, payload) = LifecycleEvent::PrimaryButtonClicked.to_host();
        assert_eq!(name, "primaryButtonClicked");
        assert_eq!(payload, serde_json::json!({}));
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            AddFrameError::RejectedByUser("user dismissed".into()).status_line(),
            "Not added: user dismissed"
        );
        assert_eq!(
            AddFrameError::InvalidDomainManifest("bad signature".into()).status_line(),
            "Not added: bad signature"
        );
        assert_eq!(
            AddFrameError::Failed("timeout".into()).status_line(),
            "Error: timeout"
        );
    }

    #[test]
    fn add_response_maps_to_result() {
        let resp: AddFrameResponse = serde_json::from_value(serde_json::json!({
            "status": "invalid_domain_manifest",
            "message": "no manifest"
        }))
        .unwrap();
        assert_eq!(
            resp.into_result(),
            Err(AddFrameError::InvalidDomainManifest("no manifest".into()))
        );

        let resp: AddFrameResponse =
            serde_json::from_value(serde_json::json!({ "status": "added" })).unwrap();
        assert_eq!(resp.into_result(), Ok(None));
    }

    #[test]
    fn add_response_from_result() {
        let resp = AddFrameResponse::from(Err(AddFrameError::Failed("boom".into())));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({ "status": "failed", "message": "boom" })
        );
    }
}
