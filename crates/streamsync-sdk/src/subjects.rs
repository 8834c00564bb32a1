//! Canonical NATS subject definitions for StreamSync host bridges.
//!
//! All NATS subject strings used between a frame and its host **must** be
//! built through [`HostSubjects`], so that frames, host bridges and tooling
//! agree on a single naming convention.
//!
//! # Subject layout
//!
//! ```text
//! streamsync.v1.{app}.event.{name}          ← lifecycle notifications and broadcast channels
//! streamsync.v1.{app}.host.context          ← request/reply: session context
//! streamsync.v1.{app}.host.add-frame        ← request/reply: add-frame prompt
//! streamsync.v1.{app}.host.ready            ← frame PUBLISHES its readiness here
//! streamsync.v1.{app}.providers.announce    ← wallet provider announcements
//! ```

/// Current subject version prefix.
const VERSION: &str = "v1";

/// Central authority for all NATS subject names.
///
/// # Examples
///
/// ```
/// use streamsync_sdk::HostSubjects;
///
/// assert_eq!(
///     HostSubjects::event("streamsync-frame", "frameAdded"),
///     "streamsync.v1.streamsync-frame.event.frameAdded",
/// );
/// assert_eq!(
///     HostSubjects::ready("streamsync-frame"),
///     "streamsync.v1.streamsync-frame.host.ready",
/// );
/// ```
pub struct HostSubjects;

impl HostSubjects {
    // ------------------------------------------------------------------
    // Event subjects
    // ------------------------------------------------------------------

    /// Subject carrying the named event (lifecycle notification or
    /// broadcast channel) for an app.
    pub fn event(app: &str, name: &str) -> String {
        format!("streamsync.{VERSION}.{app}.event.{name}")
    }

    // ------------------------------------------------------------------
    // Host request subjects
    // ------------------------------------------------------------------

    /// Request/reply subject returning the session context.
    pub fn context(app: &str) -> String {
        format!("streamsync.{VERSION}.{app}.host.context")
    }

    /// Request/reply subject prompting the viewer to add the frame.
    pub fn add_frame(app: &str) -> String {
        format!("streamsync.{VERSION}.{app}.host.add-frame")
    }

    /// Subject the frame publishes its readiness signal on.
    pub fn ready(app: &str) -> String {
        format!("streamsync.{VERSION}.{app}.host.ready")
    }

    /// Subject wallet providers announce themselves on.
    pub fn provider_announce(app: &str) -> String {
        format!("streamsync.{VERSION}.{app}.providers.announce")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
