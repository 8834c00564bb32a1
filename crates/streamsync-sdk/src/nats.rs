//! Host bridged over NATS.
//!
//! [`NatsHost`] maps every [`FrameHost`] operation onto the subjects defined
//! in [`HostSubjects`]: context and add-frame prompts are request/reply,
//! readiness and events are plain publishes, subscriptions are NATS
//! subscriptions. NATS delivers a connection's own publications back to its
//! subscribers, so frames on this host see their own broadcasts echoed.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use streamsync_sdk::{FrameHost, NatsHost};
//!
//! # async fn run() -> Result<(), streamsync_sdk::SdkError> {
//! let host = NatsHost::connect("nats://localhost:4222", "streamsync-frame", None).await?;
//! let context = host.context().await?;
//! host.ready().await?;
//! # Ok(())
//! # }
//! ```

use async_nats::ConnectOptions;
use futures::StreamExt;
use nkeys::KeyPair;
use serde::Serialize;
use serde_json::Value;
use streamsync_models::{
    AddFrameError, AddFrameResponse, NotificationDetails, ProviderDetail, SessionContext,
};
use tracing::{debug, info, warn};

use crate::credentials::HostCredentials;
use crate::error::SdkError;
use crate::host::FrameHost;
use crate::providers::ProviderStore;
use crate::subjects::HostSubjects;
use crate::subscription::{Subscription, SubscriptionCounter};

/// A frame host reached over NATS.
#[derive(Clone)]
pub struct NatsHost {
    nats_client: async_nats::Client,
    app: String,
    providers: ProviderStore,
    subscriptions: SubscriptionCounter,
}

impl NatsHost {
    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Connect to NATS, optionally authenticating with JWT + NKey.
    ///
    /// Supports both TCP (`nats://`) and WebSocket (`ws://`, `wss://`).
    /// Provider announcements for `app` are collected into
    /// [`providers`](FrameHost::providers) for the lifetime of the
    /// connection.
    pub async fn connect(
        nats_url: &str,
        app: &str,
        creds: Option<HostCredentials>,
    ) -> Result<Self, SdkError> {
        let options = match creds {
            Some(creds) => {
                // Sanity-check the seed
                let _ = KeyPair::from_seed(&creds.seed)
                    .map_err(|e| SdkError::Config(format!("invalid NKey seed: {e}")))?;

                let seed_for_sign = creds.seed.clone();
                ConnectOptions::with_jwt(creds.jwt, move |nonce| {
                    let seed = seed_for_sign.clone();
                    async move {
                        let kp = KeyPair::from_seed(&seed).map_err(async_nats::AuthError::new)?;
                        kp.sign(&nonce).map_err(async_nats::AuthError::new)
                    }
                })
            }
            None => ConnectOptions::new(),
        };

        let nats_client = async_nats::connect_with_options(nats_url, options).await?;
        info!(%nats_url, %app, "connected to frame host");

        let host = Self::with_client(nats_client, app);
        host.listen_for_providers().await?;
        Ok(host)
    }

    /// Wrap an existing NATS connection.
    pub fn with_client(nats_client: async_nats::Client, app: &str) -> Self {
        Self {
            nats_client,
            app: app.to_string(),
            providers: ProviderStore::new(),
            subscriptions: SubscriptionCounter::new(),
        }
    }

    /// Collect provider announcements into the provider store.
    async fn listen_for_providers(&self) -> Result<(), SdkError> {
        let mut announcements = self
            .nats_client
            .subscribe(HostSubjects::provider_announce(&self.app))
            .await?;
        let providers = self.providers.clone();
        tokio::spawn(async move {
            while let Some(message) = announcements.next().await {
                match serde_json::from_slice::<ProviderDetail>(&message.payload) {
                    Ok(detail) => {
                        if providers.announce(detail) {
                            debug!("provider announced");
                        }
                    }
                    Err(e) => warn!(error = %e, "ignoring malformed provider announcement"),
                }
            }
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    /// Low-level: serialize a payload and publish it on a raw subject.
    pub async fn publish_json<T: Serialize + ?Sized>(
        &self,
        subject: String,
        payload: &T,
    ) -> Result<(), SdkError> {
        let bytes = serde_json::to_vec(payload)?;
        self.nats_client.publish(subject, bytes.into()).await?;
        self.nats_client
            .flush()
            .await
            .map_err(|e| SdkError::Nats(e.to_string()))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of subscriptions currently held by frames.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active()
    }

    /// Access the raw NATS client for advanced operations.
    pub fn nats_client(&self) -> &async_nats::Client {
        &self.nats_client
    }
}

impl FrameHost for NatsHost {
    async fn context(&self) -> Result<Option<SessionContext>, SdkError> {
        let reply = self
            .nats_client
            .request(HostSubjects::context(&self.app), Vec::<u8>::new().into())
            .await?;
        decode_context(&reply.payload)
    }

    async fn request_add(&self) -> Result<Option<NotificationDetails>, AddFrameError> {
        let reply = self
            .nats_client
            .request(HostSubjects::add_frame(&self.app), Vec::<u8>::new().into())
            .await
            .map_err(|e| AddFrameError::Failed(e.to_string()))?;
        serde_json::from_slice::<AddFrameResponse>(&reply.payload)
            .map_err(|e| AddFrameError::Failed(e.to_string()))?
            .into_result()
    }

    async fn ready(&self) -> Result<(), SdkError> {
        self.publish_json(HostSubjects::ready(&self.app), &serde_json::json!({}))
            .await
    }

    async fn subscribe(&self, event: &str) -> Result<Subscription, SdkError> {
        let mut subscriber = self
            .nats_client
            .subscribe(HostSubjects::event(&self.app, event))
            .await?;
        let (tx, subscription) = Subscription::channel(event);
        let name = event.to_string();
        let forwarder = tokio::spawn(async move {
            while let Some(message) = subscriber.next().await {
                match serde_json::from_slice::<Value>(&message.payload) {
                    Ok(payload) => {
                        if tx.send(payload).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(event = %name, error = %e, "ignoring malformed event payload"),
                }
            }
        });
        Ok(subscription
            .with_forwarder(forwarder)
            .with_lease(self.subscriptions.acquire()))
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), SdkError> {
        self.publish_json(HostSubjects::event(&self.app, event), &payload)
            .await
    }

    fn providers(&self) -> ProviderStore {
        self.providers.clone()
    }
}

/// Decode a context reply. An empty body or `null` means "no context".
fn decode_context(payload: &[u8]) -> Result<Option<SessionContext>, SdkError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice(payload)?)
}
