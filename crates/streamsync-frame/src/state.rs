//! Frame state and its single reducer.
//!
//! Every change to a mounted frame goes through [`FrameState::reduce`]. The
//! runtime is the only caller, so transitions are applied one at a time in
//! the order they are dequeued.

use streamsync_models::{
    AddFrameError, ChatMessage, LifecycleEvent, NotificationDetails, SessionContext,
};
use tracing::{debug, info};

use crate::chat::{ChatLog, Recorded};

/// Status recorded after a successful add-frame prompt.
pub const ADDED_STATUS: &str = "Added";

/// Where the frame is in its bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum LoadPhase {
    /// Context not loaded yet.
    #[default]
    Loading,
    /// Context loaded and readiness signalled.
    Ready,
    /// The host offered no context; the frame stays unloaded.
    Unavailable,
}

/// Observable state of a mounted frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameState {
    /// Bootstrap phase.
    pub phase: LoadPhase,
    /// Session context, once loaded.
    pub context: Option<SessionContext>,
    /// Whether the viewer has added the frame.
    pub added: bool,
    /// Status line from the last add-frame prompt.
    pub add_frame_result: Option<String>,
    /// Whether notifications are enabled.
    pub notifications_enabled: bool,
    /// Current notification endpoint.
    pub notification_details: Option<NotificationDetails>,
    /// Readiness signals sent to the host.
    pub ready_signals: u32,
    /// Chat log.
    pub chat: ChatLog,
}

/// A single state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    /// The host returned a session context.
    ContextLoaded(SessionContext),
    /// The host had no context to offer, or never answered.
    ContextUnavailable,
    /// The add-frame prompt finished.
    AddFrameFinished(Result<Option<NotificationDetails>, AddFrameError>),
    /// The host delivered a lifecycle notification.
    Lifecycle(LifecycleEvent),
    /// Readiness was signalled to the host.
    Ready,
    /// This frame sent a chat message.
    ChatSubmitted(ChatMessage),
    /// A chat message arrived from the host.
    ChatReceived(ChatMessage),
}

impl FrameState {
    /// Returns true once readiness has been signalled.
    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// Apply `action`. Returns false if nothing observable changed.
    pub fn reduce(&mut self, action: FrameAction) -> bool {
        match action {
            FrameAction::ContextLoaded(context) => {
                self.added = context.client.added;
                if let Some(details) = &context.client.notification_details {
                    self.notification_details = Some(details.clone());
                    self.notifications_enabled = true;
                }
                self.context = Some(context);
                true
            }
            FrameAction::ContextUnavailable => {
                self.phase = LoadPhase::Unavailable;
                true
            }
            FrameAction::AddFrameFinished(result) => {
                self.add_frame_result = Some(match result {
                    Ok(details) => {
                        self.added = true;
                        if let Some(details) = details {
                            self.notification_details = Some(details);
                            self.notifications_enabled = true;
                        }
                        ADDED_STATUS.to_string()
                    }
                    Err(e) => e.status_line(),
                });
                true
            }
            FrameAction::Lifecycle(event) => self.apply_lifecycle(event),
            FrameAction::Ready => {
                self.phase = LoadPhase::Ready;
                self.ready_signals += 1;
                true
            }
            FrameAction::ChatSubmitted(message) => {
                // Subscriptions are installed before the frame turns ready.
                let subscribed = self.phase == LoadPhase::Ready;
                self.chat.record_sent(message, subscribed) == Recorded::Appended
            }
            FrameAction::ChatReceived(message) => {
                self.chat.record_received(message) == Recorded::Appended
            }
        }
    }

    fn apply_lifecycle(&mut self, event: LifecycleEvent) -> bool {
        debug!(event = %event.kind(), "lifecycle event");
        match event {
            LifecycleEvent::FrameAdded {
                notification_details,
            } => {
                self.added = true;
                if let Some(details) = notification_details {
                    self.notification_details = Some(details);
                    self.notifications_enabled = true;
                }
                true
            }
            LifecycleEvent::FrameAddRejected { reason } => {
                info!(%reason, "frame add rejected");
                false
            }
            LifecycleEvent::FrameRemoved => {
                self.added = false;
                self.notification_details = None;
                self.notifications_enabled = false;
                true
            }
            LifecycleEvent::NotificationsEnabled {
                notification_details,
            } => {
                self.notification_details = Some(notification_details);
                self.notifications_enabled = true;
                true
            }
            LifecycleEvent::NotificationsDisabled => {
                self.notification_details = None;
                self.notifications_enabled = false;
                true
            }
            LifecycleEvent::PrimaryButtonClicked => {
                info!("primary button clicked");
                false
            }
        }
    }
}
