//! Session bootstrap steps.
//!
//! The runtime drives these in order once per mount: fetch the context,
//! prompt for addition if needed, install subscriptions, signal readiness,
//! then watch for wallet providers.

use std::time::Duration;

use streamsync_models::{LifecycleEventKind, ProviderDetail, SessionContext};
use streamsync_sdk::{FrameHost, ProviderStore, SdkError, SubscriptionSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FrameConfig;

/// Fetch the session context with a per-attempt timeout.
///
/// Failed or timed-out requests are retried up to
/// [`context_attempts`](FrameConfig::context_attempts) times. A host that
/// answers with no context is not asked again.
pub async fn fetch_context<H: FrameHost>(host: &H, config: &FrameConfig) -> Option<SessionContext> {
    let attempts = config.context_attempts.max(1);
    for attempt in 1..=attempts {
        match tokio::time::timeout(config.context_timeout, host.context()).await {
            Ok(Ok(Some(context))) => {
                debug!(attempt, fid = %context.user.fid, "session context loaded");
                return Some(context);
            }
            Ok(Ok(None)) => {
                info!("host has no session context");
                return None;
            }
            Ok(Err(e)) => warn!(attempt, attempts, error = %e, "context request failed"),
            Err(_) => warn!(
                attempt,
                attempts,
                timeout_ms = duration_ms(config.context_timeout),
                "context request timed out"
            ),
        }
        if attempt < attempts && !config.retry_backoff.is_zero() {
            tokio::time::sleep(config.retry_backoff).await;
        }
    }
    warn!(attempts, "giving up on session context");
    None
}

/// Subscribe to every lifecycle event and to the chat channel.
///
/// On error the subscriptions made so far are released.
pub async fn subscribe_all<H: FrameHost>(
    host: &H,
    chat_event: &str,
) -> Result<SubscriptionSet, SdkError> {
    let mut set = SubscriptionSet::new();
    for kind in LifecycleEventKind::all() {
        set.push(host.subscribe(kind.as_str()).await?);
    }
    set.push(host.subscribe(chat_event).await?);
    debug!(subscriptions = set.len(), "subscriptions installed");
    Ok(set)
}

/// Log the provider list every time it changes, until cancelled.
pub async fn watch_providers(providers: ProviderStore, cancel: CancellationToken) {
    let mut rx = providers.subscribe();
    let current = rx.borrow_and_update().clone();
    if !current.is_empty() {
        log_providers(&current);
    }
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = rx.borrow_and_update().clone();
                log_providers(&current);
            }
        }
    }
}

fn log_providers(providers: &[ProviderDetail]) {
    let names: Vec<&str> = providers.iter().map(|p| p.info.name.as_str()).collect();
    info!(count = providers.len(), ?names, "wallet providers");
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
