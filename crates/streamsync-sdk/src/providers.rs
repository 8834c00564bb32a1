//! Wallet provider discovery registry.
//!
//! Providers announce themselves at any time; the store keeps one entry per
//! provider `uuid` and notifies subscribers with the full list whenever it
//! changes.

use std::sync::Arc;

use streamsync_models::ProviderDetail;
use tokio::sync::watch;

/// Shared registry of announced providers.
///
/// Cloning the store shares the underlying registry.
#[derive(Debug, Clone)]
pub struct ProviderStore {
    tx: Arc<watch::Sender<Vec<ProviderDetail>>>,
}

impl ProviderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { tx: Arc::new(tx) }
    }

    /// Record a provider announcement.
    ///
    /// Returns `false` (and notifies no one) if a provider with the same
    /// uuid was already announced.
    pub fn announce(&self, detail: ProviderDetail) -> bool {
        self.tx.send_if_modified(|providers| {
            if providers.iter().any(|p| p.uuid() == detail.uuid()) {
                false
            } else {
                providers.push(detail);
                true
            }
        })
    }

    /// Snapshot of every provider announced so far, in announcement order.
    pub fn providers(&self) -> Vec<ProviderDetail> {
        self.tx.borrow().clone()
    }

    /// Receive the full provider list on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ProviderDetail>> {
        self.tx.subscribe()
    }
}

impl Default for ProviderStore {
    fn default() -> Self {
        Self::new()
    }
}
