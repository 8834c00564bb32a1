//! The host capability a frame runs against.
//!
//! A frame never talks to a global SDK object. Everything it needs from its
//! host is reached through a [`FrameHost`] value injected at mount time,
//! which keeps the frame testable against an in-process host and lets the
//! same frame run over different transports.

use std::future::Future;

use serde_json::Value;
use streamsync_models::{AddFrameError, NotificationDetails, SessionContext};

use crate::error::SdkError;
use crate::providers::ProviderStore;
use crate::subscription::Subscription;

/// Capabilities a host environment offers to an embedded frame.
pub trait FrameHost: Send + Sync + 'static {
    /// Fetch the session context.
    ///
    /// `Ok(None)` means the host has no context to offer (the frame is not
    /// running inside a client).
    fn context(&self) -> impl Future<Output = Result<Option<SessionContext>, SdkError>> + Send;

    /// Prompt the viewer to add this frame.
    ///
    /// Transport failures are reported as [`AddFrameError::Failed`].
    fn request_add(
        &self,
    ) -> impl Future<Output = Result<Option<NotificationDetails>, AddFrameError>> + Send;

    /// Tell the host the frame has finished loading.
    fn ready(&self) -> impl Future<Output = Result<(), SdkError>> + Send;

    /// Subscribe to the named event.
    ///
    /// The subscription stays active until the returned handle is dropped.
    fn subscribe(&self, event: &str) -> impl Future<Output = Result<Subscription, SdkError>> + Send;

    /// Broadcast `payload` under the named event.
    fn emit(&self, event: &str, payload: Value) -> impl Future<Output = Result<(), SdkError>> + Send;

    /// Registry of wallet providers announced to this host.
    fn providers(&self) -> ProviderStore;
}
