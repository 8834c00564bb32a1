//! Scoped subscription handles.
//!
//! A [`Subscription`] is the frame's end of one named host event stream.
//! Dropping it releases the host side: the forwarding task is aborted and
//! the host's [`SubscriptionCounter`] is decremented immediately. A
//! [`SubscriptionSet`] merges many subscriptions into one stream and
//! releases them all at once.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::stream::{SelectAll, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Buffer size for each subscription's delivery queue.
pub const SUBSCRIPTION_BUFFER: usize = 256;

/// One event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// Event name the payload was delivered under.
    pub name: String,
    /// Raw JSON payload.
    pub payload: Value,
}

// ---------------------------------------------------------------------------
// SubscriptionCounter / Lease
// ---------------------------------------------------------------------------

/// Counts live subscriptions on a host.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionCounter(Arc<AtomicUsize>);

impl SubscriptionCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscriptions currently held.
    pub fn active(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Register one subscription; the returned lease releases it on drop.
    pub fn acquire(&self) -> Lease {
        self.0.fetch_add(1, Ordering::SeqCst);
        Lease(Arc::clone(&self.0))
    }
}

/// Accounting token for one live subscription.
#[derive(Debug)]
pub struct Lease(Arc<AtomicUsize>);

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A named stream of host events.
#[derive(Debug)]
pub struct Subscription {
    name: String,
    rx: mpsc::Receiver<Value>,
    forwarder: Option<JoinHandle<()>>,
    _lease: Option<Lease>,
}

impl Subscription {
    /// Create a subscription together with the sender that feeds it.
    pub fn channel(name: impl Into<String>) -> (mpsc::Sender<Value>, Self) {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let sub = Self {
            name: name.into(),
            rx,
            forwarder: None,
            _lease: None,
        };
        (tx, sub)
    }

    /// Attach the task that pumps host events into this subscription.
    ///
    /// The task is aborted when the subscription is dropped.
    pub fn with_forwarder(mut self, forwarder: JoinHandle<()>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// Attach the host's accounting lease.
    pub fn with_lease(mut self, lease: Lease) -> Self {
        self._lease = Some(lease);
        self
    }

    /// Event name this subscription listens to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the next event; `None` once the host side is gone.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        self.next().await
    }
}

impl Stream for Subscription {
    type Item = HostEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<HostEvent>> {
        let this = self.get_mut();
        this.rx.poll_recv(cx).map(|payload| {
            payload.map(|payload| HostEvent {
                name: this.name.clone(),
                payload,
            })
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// SubscriptionSet
// ---------------------------------------------------------------------------

/// A merged stream over several subscriptions.
///
/// Events are yielded in the order each underlying subscription delivers
/// them; there is no ordering across different event names.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    streams: SelectAll<Subscription>,
}

impl SubscriptionSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription to the set.
    pub fn push(&mut self, subscription: Subscription) {
        self.streams.push(subscription);
    }

    /// Number of subscriptions still delivering.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns true if the set holds no live subscription.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Drop every subscription in the set.
    pub fn release_all(&mut self) {
        self.streams = SelectAll::new();
    }
}

impl Stream for SubscriptionSet {
    type Item = HostEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<HostEvent>> {
        self.streams.poll_next_unpin(cx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
