//! In-process host over a broadcast bus.
//!
//! [`LocalHost`] plays the host's part without any network: it answers
//! context and add-frame requests from fixed configuration, counts readiness
//! signals, and fans emitted events out to every subscriber of the same
//! name. Like most pub/sub transports, an emitter that is also subscribed
//! receives its own events back.
//!
//! Several frames mounted on clones of the same `LocalHost` share one bus,
//! which makes it the natural double for multi-viewer chat tests and for
//! offline demos.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use streamsync_models::{
    AddFrameError, AddFrameResponse, LifecycleEvent, NotificationDetails, SessionContext,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::SdkError;
use crate::host::FrameHost;
use crate::providers::ProviderStore;
use crate::subscription::{HostEvent, Subscription, SubscriptionCounter};

/// Default capacity of the event bus.
const BUS_CAPACITY: usize = 1024;

/// In-process [`FrameHost`].
///
/// Cloning shares the bus, counters and provider registry.
#[derive(Clone)]
pub struct LocalHost {
    inner: Arc<Inner>,
}

struct Inner {
    context: Option<SessionContext>,
    context_delay: Duration,
    failing_context_calls: AtomicU32,
    add_response: AddFrameResponse,
    bus: broadcast::Sender<HostEvent>,
    subscriptions: SubscriptionCounter,
    providers: ProviderStore,
    context_calls: AtomicUsize,
    add_requests: AtomicUsize,
    ready_signals: AtomicUsize,
    emitted: AtomicUsize,
}

impl LocalHost {
    /// Start configuring a host.
    pub fn builder() -> LocalHostBuilder {
        LocalHostBuilder::default()
    }

    /// Deliver a lifecycle notification to its subscribers.
    pub fn dispatch(&self, event: &LifecycleEvent) {
        let (name, payload) = event.to_host();
        debug!(event = name, "dispatching lifecycle event");
        self.publish(name, payload);
    }

    /// Number of readiness signals received.
    pub fn ready_count(&self) -> usize {
        self.inner.ready_signals.load(Ordering::SeqCst)
    }

    /// Number of context requests received.
    pub fn context_calls(&self) -> usize {
        self.inner.context_calls.load(Ordering::SeqCst)
    }

    /// Number of add-frame prompts requested.
    pub fn add_requests(&self) -> usize {
        self.inner.add_requests.load(Ordering::SeqCst)
    }

    /// Number of events emitted by frames (lifecycle dispatches excluded).
    pub fn emitted(&self) -> usize {
        self.inner.emitted.load(Ordering::SeqCst)
    }

    /// Number of subscriptions currently held by frames.
    pub fn active_subscriptions(&self) -> usize {
        self.inner.subscriptions.active()
    }

    fn publish(&self, name: &str, payload: Value) {
        // No subscribers is not an error: the event is simply dropped.
        let _ = self.inner.bus.send(HostEvent {
            name: name.to_string(),
            payload,
        });
    }
}

impl FrameHost for LocalHost {
    async fn context(&self) -> Result<Option<SessionContext>, SdkError> {
        self.inner.context_calls.fetch_add(1, Ordering::SeqCst);
        if !self.inner.context_delay.is_zero() {
            tokio::time::sleep(self.inner.context_delay).await;
        }

        let failed = self
            .inner
            .failing_context_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(SdkError::Host("context temporarily unavailable".into()));
        }

        Ok(self.inner.context.clone())
    }

    async fn request_add(&self) -> Result<Option<NotificationDetails>, AddFrameError> {
        self.inner.add_requests.fetch_add(1, Ordering::SeqCst);
        let result = self.inner.add_response.clone().into_result();
        if let Ok(notification_details) = &result {
            self.dispatch(&LifecycleEvent::FrameAdded {
                notification_details: notification_details.clone(),
            });
        }
        result
    }

    async fn ready(&self) -> Result<(), SdkError> {
        self.inner.ready_signals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self, event: &str) -> Result<Subscription, SdkError> {
        let bus_rx = self.inner.bus.subscribe();
        let (tx, subscription) = Subscription::channel(event);
        let forwarder = tokio::spawn(forward(event.to_string(), bus_rx, tx));
        Ok(subscription
            .with_forwarder(forwarder)
            .with_lease(self.inner.subscriptions.acquire()))
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), SdkError> {
        self.inner.emitted.fetch_add(1, Ordering::SeqCst);
        self.publish(event, payload);
        Ok(())
    }

    fn providers(&self) -> ProviderStore {
        self.inner.providers.clone()
    }
}

/// Pump bus events named `name` into one subscription.
async fn forward(name: String, mut bus_rx: broadcast::Receiver<HostEvent>, tx: mpsc::Sender<Value>) {
    loop {
        match bus_rx.recv().await {
            Ok(event) if event.name == name => {
                if tx.send(event.payload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(event = %name, skipped, "subscriber lagged, events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configuration for a [`LocalHost`].
pub struct LocalHostBuilder {
    context: Option<SessionContext>,
    context_delay: Duration,
    failing_context_calls: u32,
    add_response: AddFrameResponse,
    providers: ProviderStore,
}

impl Default for LocalHostBuilder {
    fn default() -> Self {
        Self {
            context: None,
            context_delay: Duration::ZERO,
            failing_context_calls: 0,
            add_response: AddFrameResponse::Added {
                notification_details: None,
            },
            providers: ProviderStore::new(),
        }
    }
}

impl LocalHostBuilder {
    /// Context returned to frames. Without one the host reports no context.
    pub fn context(mut self, context: SessionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Delay every context request by `delay`.
    pub fn context_delay(mut self, delay: Duration) -> Self {
        self.context_delay = delay;
        self
    }

    /// Fail the first `calls` context requests with [`SdkError::Host`].
    pub fn failing_context_calls(mut self, calls: u32) -> Self {
        self.failing_context_calls = calls;
        self
    }

    /// Reply given to every add-frame prompt.
    pub fn add_frame_response(mut self, response: AddFrameResponse) -> Self {
        self.add_response = response;
        self
    }

    /// Share an existing provider registry.
    pub fn providers(mut self, providers: ProviderStore) -> Self {
        self.providers = providers;
        self
    }

    /// Build the host.
    pub fn build(self) -> LocalHost {
        let (bus, _) = broadcast::channel(BUS_CAPACITY);
        LocalHost {
            inner: Arc::new(Inner {
                context: self.context,
                context_delay: self.context_delay,
                failing_context_calls: AtomicU32::new(self.failing_context_calls),
                add_response: self.add_response,
                bus,
                subscriptions: SubscriptionCounter::new(),
                providers: self.providers,
                context_calls: AtomicUsize::new(0),
                add_requests: AtomicUsize::new(0),
                ready_signals: AtomicUsize::new(0),
                emitted: AtomicUsize::new(0),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
