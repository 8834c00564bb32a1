#![deny(missing_docs)]

//! # StreamSync Models
//!
//! Core data types for the StreamSync live-stream frame.
//!
//! ## Data flow
//!
//! ```text
//! FrameHost ── SessionContext ──▶ Session Bootstrapper
//!           ── LifecycleEvent ──▶ frame state (added / notifications)
//!           ◀─ ChatMessage ─────▶ Chat Synchronizer (broadcast channel)
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identity`] | Viewer identity (`Fid`, `Viewer`) |
//! | [`stream`] | Stream address parsing and caster lookup |
//! | [`context`] | Host-supplied `SessionContext` |
//! | [`chat`] | `ChatMessage` broadcast payload |
//! | [`lifecycle`] | Frame lifecycle notifications and add-frame outcomes |
//! | [`provider`] | Wallet provider announcements |
//! | [`message_builder`] | Fluent construction of chat messages |

pub mod chat;
pub mod context;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod message_builder;
pub mod provider;
pub mod stream;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `streamsync_models::Fid` directly.
pub use chat::*;
pub use context::*;
pub use error::*;
pub use identity::*;
pub use lifecycle::*;
pub use message_builder::*;
pub use provider::*;
pub use stream::*;
