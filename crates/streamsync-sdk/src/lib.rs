//! # StreamSync SDK
//!
//! Host-side capabilities a StreamSync frame runs against.
//!
//! The SDK provides:
//!
//! * [`FrameHost`]: the injected host capability covering session context,
//!   the add-frame prompt, readiness, and named event subscriptions and emits.
//! * [`Subscription`] / [`SubscriptionSet`]: scoped subscription handles
//!   that release the host-side subscription when dropped.
//! * [`HostSubjects`]: canonical NATS subject definitions shared by frames
//!   and host bridges.
//! * [`ProviderStore`]: wallet provider discovery registry.
//! * [`LocalHost`]: in-process host over a broadcast bus.
//! * [`NatsHost`]: host bridged over NATS.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Model types from [`streamsync_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use streamsync_sdk::{FrameHost, LocalHost};
//!
//! # async fn run() -> Result<(), streamsync_sdk::SdkError> {
//! let host = LocalHost::builder().build();
//! let mut chat = host.subscribe("streamsync-chat-message").await?;
//! host.emit("streamsync-chat-message", serde_json::json!({ "hello": "world" })).await?;
//! let event = chat.recv().await;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod host;
pub mod local;
pub mod nats;
pub mod providers;
pub mod subjects;
pub mod subscription;

pub use credentials::HostCredentials;
pub use error::SdkError;
pub use host::FrameHost;
pub use local::{LocalHost, LocalHostBuilder};
pub use nats::NatsHost;
pub use providers::ProviderStore;
pub use subjects::HostSubjects;
pub use subscription::{HostEvent, Lease, Subscription, SubscriptionCounter, SubscriptionSet};

// Re-export model types for ergonomic usage.
pub use streamsync_models::{
    AddFrameError, AddFrameResponse, LifecycleEvent, LifecycleEventKind, NotificationDetails,
    ProviderDetail, SessionContext,
};
