//! Error types for the frame runtime.

use streamsync_sdk::SdkError;

/// Errors surfaced to code driving a mounted frame.
///
/// Host-side failures during bootstrap never show up here: they degrade the
/// frame's state instead (see [`FrameState`](crate::state::FrameState)).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame was unmounted; the command was not delivered.
    #[error("frame is not mounted")]
    Unmounted,

    /// A host operation failed.
    #[error(transparent)]
    Sdk(#[from] SdkError),
}
