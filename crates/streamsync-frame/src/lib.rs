//! # StreamSync Frame
//!
//! A live stream with a chat room beside it, embedded in a host client.
//!
//! Mounting a frame bootstraps a session against an injected
//! [`FrameHost`](streamsync_sdk::FrameHost): it fetches the viewer's context,
//! prompts the viewer to add the frame when needed, subscribes to lifecycle
//! notifications and to the chat channel, then signals readiness. Chat
//! messages typed by the viewer are broadcast to every other frame watching
//! the same stream; the caster named in the stream address is flagged as
//! moderator.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use streamsync_frame::{mount, FrameConfig};
//! use streamsync_models::{Fid, Viewer};
//! use streamsync_sdk::LocalHost;
//!
//! # async fn run() -> Result<(), streamsync_frame::FrameError> {
//! let host = Arc::new(LocalHost::builder().build());
//! let frame = mount(host, FrameConfig::from_env(), Viewer::authenticated(Fid::new(123)));
//! frame.submit("gm").await?;
//! frame.unmount().await;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod moderation;
pub mod runtime;
pub mod state;
pub mod view;

pub use chat::{ChatLog, ChatSynchronizer};
pub use config::FrameConfig;
pub use error::FrameError;
pub use runtime::{mount, MountedFrame};
pub use state::{FrameAction, FrameState, LoadPhase};
pub use view::FrameView;
