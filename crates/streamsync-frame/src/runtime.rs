//! Mounted frame runtime.
//!
//! [`mount`] spawns one task that owns the frame's state. User commands,
//! host events and the results of background bootstrap steps all funnel
//! into that task, which applies them through
//! [`FrameState::reduce`](crate::state::FrameState::reduce) and publishes
//! the result on a `watch` channel.
//!
//! ```text
//!  MountedFrame ── Command ──┐
//!  SubscriptionSet ─ event ──┼──▶ runtime task ──▶ watch<FrameState>
//!  background steps ─ Step ──┘        │
//!                                     └──▶ FrameHost (ready, emit)
//! ```
//!
//! Unmounting cancels the task and every step it started. Steps that finish
//! afterwards find their channel closed and their result is discarded.

use std::sync::Arc;

use futures::StreamExt;
use streamsync_models::{
    AddFrameError, LifecycleEvent, NotificationDetails, SessionContext, Viewer,
};
use streamsync_sdk::{FrameHost, HostEvent, SubscriptionSet};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bootstrap;
use crate::chat::ChatSynchronizer;
use crate::config::FrameConfig;
use crate::error::FrameError;
use crate::state::{FrameAction, FrameState};

const COMMAND_BUFFER: usize = 64;
const STEP_BUFFER: usize = 8;

enum Command {
    Load,
    Submit(String),
}

enum Step {
    Context(Option<SessionContext>),
    AddFrame(Result<Option<NotificationDetails>, AddFrameError>),
}

/// Mount a frame for `viewer` on `host` and start loading it.
///
/// Must be called from within a Tokio runtime.
pub fn mount<H: FrameHost>(host: Arc<H>, config: FrameConfig, viewer: Viewer) -> MountedFrame {
    let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (steps, step_rx) = mpsc::channel(STEP_BUFFER);
    let (state, state_rx) = watch::channel(FrameState::default());
    let cancel = CancellationToken::new();

    info!(viewer = ?viewer.fid, stream = %config.stream_url, "mounting frame");
    let runtime = FrameRuntime {
        synchronizer: ChatSynchronizer::new(viewer, &config.stream_url),
        host,
        config,
        state,
        steps,
        subscriptions: SubscriptionSet::new(),
        cancel: cancel.clone(),
        load_started: false,
        ready_sent: false,
    };
    let task = tokio::spawn(runtime.run(command_rx, step_rx));

    let frame = MountedFrame {
        commands,
        state: state_rx,
        cancel,
        task: Some(task),
    };
    frame.load();
    frame
}

/// Handle to a mounted frame.
///
/// Dropping the handle unmounts the frame without waiting for it.
pub struct MountedFrame {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<FrameState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl MountedFrame {
    /// Ask the frame to run its bootstrap. Only the first request has any
    /// effect; [`mount`] already makes it.
    pub fn load(&self) {
        if self.commands.try_send(Command::Load).is_err() {
            debug!("load request not delivered");
        }
    }

    /// Send `text` to the chat. Blank text is ignored.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), FrameError> {
        self.commands
            .send(Command::Submit(text.into()))
            .await
            .map_err(|_| FrameError::Unmounted)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> FrameState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn state(&self) -> watch::Receiver<FrameState> {
        self.state.clone()
    }

    /// Returns true until the frame is unmounted.
    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Unmount the frame, releasing its subscriptions, and wait for it to stop.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "frame task ended abnormally");
            }
        }
    }
}

impl Drop for MountedFrame {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct FrameRuntime<H: FrameHost> {
    host: Arc<H>,
    config: FrameConfig,
    synchronizer: ChatSynchronizer,
    state: watch::Sender<FrameState>,
    steps: mpsc::Sender<Step>,
    subscriptions: SubscriptionSet,
    cancel: CancellationToken,
    load_started: bool,
    ready_sent: bool,
}

impl<H: FrameHost> FrameRuntime<H> {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut steps: mpsc::Receiver<Step>) {
        let cancel = self.cancel.clone();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                Some(step) = steps.recv() => self.handle_step(step).await,
                Some(event) = self.subscriptions.next(), if !self.subscriptions.is_empty() => {
                    self.handle_event(event);
                }
                Some(command) = commands.recv() => self.handle_command(command).await,
            }
        }
        self.subscriptions.release_all();
        info!("frame unmounted");
    }

    fn apply(&self, action: FrameAction) {
        self.state.send_if_modified(|state| state.reduce(action));
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Load => self.start_load(),
            Command::Submit(text) => self.submit(&text).await,
        }
    }

    fn start_load(&mut self) {
        if self.load_started {
            debug!("load already started");
            return;
        }
        self.load_started = true;
        info!("loading session context");

        let host = Arc::clone(&self.host);
        let config = self.config.clone();
        let steps = self.steps.clone();
        let cancel = self.cancel.child_token();
        tokio::spawn(async move {
            let context = tokio::select! {
                () = cancel.cancelled() => return,
                context = bootstrap::fetch_context(host.as_ref(), &config) => context,
            };
            // Closed once unmounted; the result is no longer wanted.
            let _ = steps.send(Step::Context(context)).await;
        });
    }

    async fn submit(&mut self, text: &str) {
        let Some(message) = self.synchronizer.compose(text) else {
            debug!("ignoring blank chat input");
            return;
        };
        let payload = match serde_json::to_value(&message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "could not encode chat message");
                return;
            }
        };
        debug!(id = %message.id, "sending chat message");
        self.apply(FrameAction::ChatSubmitted(message));
        let emitted = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return,
            emitted = self.host.emit(&self.config.chat_event, payload) => emitted,
        };
        if let Err(e) = emitted {
            warn!(error = %e, "chat message not broadcast");
        }
    }

    async fn handle_step(&mut self, step: Step) {
        match step {
            Step::Context(None) => {
                warn!("no session context; frame stays unloaded");
                self.apply(FrameAction::ContextUnavailable);
            }
            Step::Context(Some(context)) => self.finish_load(context).await,
            Step::AddFrame(result) => {
                match &result {
                    Ok(_) => info!("frame added"),
                    Err(e) => info!(error = %e, "frame not added"),
                }
                self.apply(FrameAction::AddFrameFinished(result));
            }
        }
    }

    async fn finish_load(&mut self, context: SessionContext) {
        let added = context.client.added;
        self.apply(FrameAction::ContextLoaded(context));

        if !added {
            self.request_add();
        }

        let subscribed = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return,
            subscribed = bootstrap::subscribe_all(self.host.as_ref(), &self.config.chat_event) => subscribed,
        };
        match subscribed {
            Ok(set) => self.subscriptions = set,
            Err(e) => warn!(error = %e, "could not subscribe to host events"),
        }

        if !self.ready_sent {
            self.ready_sent = true;
            info!("calling ready");
            let signalled = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return,
                signalled = self.host.ready() => signalled,
            };
            if let Err(e) = signalled {
                warn!(error = %e, "ready signal failed");
            }
            self.apply(FrameAction::Ready);
        }

        tokio::spawn(bootstrap::watch_providers(
            self.host.providers(),
            self.cancel.child_token(),
        ));
    }

    fn request_add(&self) {
        info!("requesting frame add");
        let host = Arc::clone(&self.host);
        let steps = self.steps.clone();
        let cancel = self.cancel.child_token();
        tokio::spawn(async move {
            let result = tokio::select! {
                () = cancel.cancelled() => return,
                result = host.request_add() => result,
            };
            let _ = steps.send(Step::AddFrame(result)).await;
        });
    }

    fn handle_event(&mut self, event: HostEvent) {
        let HostEvent { name, payload } = event;
        if name == self.config.chat_event {
            match serde_json::from_value(payload) {
                Ok(message) => self.apply(FrameAction::ChatReceived(message)),
                Err(e) => warn!(error = %e, "ignoring malformed chat message"),
            }
            return;
        }
        match LifecycleEvent::from_host(&name, payload) {
            Ok(event) => self.apply(FrameAction::Lifecycle(event)),
            Err(e) => warn!(event = %name, error = %e, "ignoring malformed lifecycle event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use streamsync_models::{AddFrameResponse, ChatMessage, ClientContext, Fid, UserContext};
    use streamsync_sdk::LocalHost;

    use crate::state::LoadPhase;

    const STREAM: &str = "https://live.example.com/watch?caster_fid=123";
    const CHAT: &str = crate::constants::CHAT_MESSAGE_EVENT;
    const WAIT: Duration = Duration::from_secs(5);

    fn context(fid: u64, added: bool) -> SessionContext {
        SessionContext {
            user: UserContext {
                fid: Fid::new(fid),
                username: None,
                display_name: None,
                pfp_url: None,
            },
            client: ClientContext {
                client_fid: Fid::new(9152),
                added,
                notification_details: None,
                safe_area_insets: None,
            },
        }
    }

    fn config() -> FrameConfig {
        FrameConfig::default().with_stream_url(STREAM)
    }

    async fn wait_for(frame: &MountedFrame, what: impl Fn(&FrameState) -> bool) -> FrameState {
        let mut rx = frame.state();
        tokio::time::timeout(WAIT, rx.wait_for(|s| what(s)))
            .await
            .expect("state never reached")
            .expect("frame task stopped")
            .clone()
    }

    fn texts(state: &FrameState) -> Vec<String> {
        state
            .chat
            .messages()
            .iter()
            .map(|m| format!("{}: {}", m.author, m.message))
            .collect()
    }

    #[tokio::test]
    async fn loads_and_signals_ready_once() {
        let host = Arc::new(LocalHost::builder().context(context(123, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::authenticated(Fid::new(123)));
        frame.load();
        frame.load();

        let state = wait_for(&frame, FrameState::is_ready).await;
        assert_eq!(state.ready_signals, 1);
        assert!(state.added);

        frame.load();
        frame.submit("sync").await.unwrap();
        wait_for(&frame, |s| s.chat.len() == 1).await;
        assert_eq!(host.ready_count(), 1);
        assert_eq!(host.context_calls(), 1);
        assert_eq!(host.add_requests(), 0);
    }

    #[tokio::test]
    async fn caster_submission_is_moderated() {
        let host = Arc::new(LocalHost::builder().context(context(123, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::authenticated(Fid::new(123)));
        wait_for(&frame, FrameState::is_ready).await;

        frame.submit("hello").await.unwrap();
        let state = wait_for(&frame, |s| s.chat.len() == 1).await;
        let msg = &state.chat.messages()[0];
        assert_eq!(msg.author, "User 123");
        assert_eq!(msg.message, "hello");
        assert!(msg.is_moderator);
        assert_eq!(host.emitted(), 1);
    }

    #[tokio::test]
    async fn guest_submission_is_plain() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(host, config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;

        frame.submit("hi").await.unwrap();
        let state = wait_for(&frame, |s| s.chat.len() == 1).await;
        assert_eq!(state.chat.messages()[0].author, "Guest");
        assert!(!state.chat.messages()[0].is_moderator);
    }

    #[tokio::test]
    async fn blank_submission_is_ignored() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;

        frame.submit("   ").await.unwrap();
        frame.submit("").await.unwrap();
        frame.submit("after").await.unwrap();
        let state = wait_for(&frame, |s| !s.chat.is_empty()).await;
        assert_eq!(texts(&state), ["Guest: after"]);
        assert_eq!(host.emitted(), 1);
    }

    #[tokio::test]
    async fn received_messages_keep_order() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;

        for text in ["a", "b"] {
            let msg = ChatMessage::new("User 9", text, false);
            host.emit(CHAT, serde_json::to_value(&msg).unwrap())
                .await
                .unwrap();
        }
        let state = wait_for(&frame, |s| s.chat.len() == 2).await;
        assert_eq!(texts(&state), ["User 9: a", "User 9: b"]);
    }

    #[tokio::test]
    async fn two_viewers_see_each_other_without_echoes() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let alice = mount(Arc::clone(&host), config(), Viewer::authenticated(Fid::new(123)));
        let bob = mount(Arc::clone(&host), config(), Viewer::authenticated(Fid::new(7)));
        wait_for(&alice, FrameState::is_ready).await;
        wait_for(&bob, FrameState::is_ready).await;

        alice.submit("hello").await.unwrap();
        wait_for(&bob, |s| s.chat.len() == 1).await;
        bob.submit("hey").await.unwrap();

        let alice_state = wait_for(&alice, |s| s.chat.len() >= 2).await;
        let bob_state = wait_for(&bob, |s| s.chat.len() >= 2).await;

        // Give any stray echo time to land before checking counts.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(alice.snapshot().chat.len(), 2);
        assert_eq!(bob.snapshot().chat.len(), 2);
        assert_eq!(texts(&alice_state), ["User 123: hello", "User 7: hey"]);
        assert_eq!(texts(&bob_state), ["User 123: hello", "User 7: hey"]);
        assert!(alice_state.chat.messages()[0].is_moderator);
        assert!(!bob_state.chat.messages()[1].is_moderator);
    }

    #[tokio::test]
    async fn missing_context_leaves_frame_unavailable() {
        let host = Arc::new(LocalHost::builder().build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        let state = wait_for(&frame, |s| s.phase == LoadPhase::Unavailable).await;
        assert!(state.context.is_none());
        assert_eq!(host.ready_count(), 0);
        assert_eq!(host.active_subscriptions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_before_context_discards_it() {
        let host = Arc::new(
            LocalHost::builder()
                .context(context(5, false))
                .context_delay(Duration::from_millis(200))
                .build(),
        );
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        let rx = frame.state();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(frame.is_mounted());
        frame.unmount().await;

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*rx.borrow(), FrameState::default());
        assert_eq!(host.ready_count(), 0);
        assert_eq!(host.add_requests(), 0);
        assert_eq!(host.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn unmount_releases_subscriptions() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;
        assert_eq!(host.active_subscriptions(), 7);

        frame.unmount().await;
        assert_eq!(host.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn submit_after_unmount_fails() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(host, config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;
        frame.cancel.cancel();
        if let Some(task) = frame.task.as_ref() {
            while !task.is_finished() {
                tokio::task::yield_now().await;
            }
        }
        assert!(!frame.is_mounted());
        assert!(matches!(
            frame.submit("late").await,
            Err(FrameError::Unmounted)
        ));
    }

    #[tokio::test]
    async fn remount_does_not_duplicate_delivery() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let first = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&first, FrameState::is_ready).await;
        first.unmount().await;

        let second = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&second, FrameState::is_ready).await;
        assert_eq!(host.active_subscriptions(), 7);

        let msg = ChatMessage::new("User 9", "once", false);
        host.emit(CHAT, serde_json::to_value(&msg).unwrap())
            .await
            .unwrap();
        wait_for(&second, |s| s.chat.len() == 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(second.snapshot().chat.len(), 1);
    }

    #[tokio::test]
    async fn prompts_for_add_when_not_added() {
        let host = Arc::new(LocalHost::builder().context(context(5, false)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        let state = wait_for(&frame, |s| s.add_frame_result.is_some() && s.added).await;
        assert_eq!(state.add_frame_result.as_deref(), Some("Added"));
        assert_eq!(host.add_requests(), 1);
    }

    #[tokio::test]
    async fn rejected_add_is_reported() {
        let host = Arc::new(
            LocalHost::builder()
                .context(context(5, false))
                .add_frame_response(AddFrameResponse::RejectedByUser {
                    message: "dismissed".into(),
                })
                .build(),
        );
        let frame = mount(host, config(), Viewer::guest());
        let state = wait_for(&frame, |s| s.add_frame_result.is_some()).await;
        assert_eq!(state.add_frame_result.as_deref(), Some("Not added: dismissed"));
        assert!(!state.added);
    }

    #[tokio::test]
    async fn lifecycle_events_update_state() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;

        host.dispatch(&LifecycleEvent::FrameRemoved);
        wait_for(&frame, |s| !s.added).await;

        host.dispatch(&LifecycleEvent::NotificationsEnabled {
            notification_details: NotificationDetails {
                url: "https://notify.example.com".into(),
                token: "abc".into(),
            },
        });
        let state = wait_for(&frame, |s| s.notifications_enabled).await;
        assert_eq!(
            state.notification_details.map(|d| d.token).as_deref(),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn retried_context_still_loads() {
        let host = Arc::new(
            LocalHost::builder()
                .context(context(5, true))
                .failing_context_calls(1)
                .build(),
        );
        let cfg = FrameConfig {
            retry_backoff: Duration::from_millis(1),
            ..config()
        };
        let frame = mount(Arc::clone(&host), cfg, Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;
        assert_eq!(host.context_calls(), 2);
    }

    #[tokio::test]
    async fn own_submissions_keep_order() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        wait_for(&frame, FrameState::is_ready).await;

        frame.submit("a").await.unwrap();
        frame.submit("b").await.unwrap();
        wait_for(&frame, |s| s.chat.len() == 2).await;

        // Let both echoes come back through the host.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = frame.snapshot();
        assert_eq!(host.emitted(), 2);
        assert_eq!(texts(&state), ["Guest: a", "Guest: b"]);
    }

    #[tokio::test]
    async fn lifecycle_events_do_not_repeat_ready() {
        let host = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let frame = mount(Arc::clone(&host), config(), Viewer::guest());
        host.dispatch(&LifecycleEvent::NotificationsDisabled);
        host.dispatch(&LifecycleEvent::FrameRemoved);
        wait_for(&frame, FrameState::is_ready).await;

        host.dispatch(&LifecycleEvent::FrameRemoved);
        wait_for(&frame, |s| !s.added).await;
        host.dispatch(&LifecycleEvent::FrameAdded {
            notification_details: None,
        });
        let state = wait_for(&frame, |s| s.added).await;

        assert_eq!(state.ready_signals, 1);
        assert_eq!(host.ready_count(), 1);
    }

    /// Delegates to a [`LocalHost`] but takes `delay` to install each subscription.
    struct SlowSubscribeHost {
        inner: Arc<LocalHost>,
        delay: Duration,
    }

    impl FrameHost for SlowSubscribeHost {
        async fn context(&self) -> Result<Option<SessionContext>, streamsync_sdk::SdkError> {
            self.inner.context().await
        }

        async fn request_add(&self) -> Result<Option<NotificationDetails>, AddFrameError> {
            self.inner.request_add().await
        }

        async fn ready(&self) -> Result<(), streamsync_sdk::SdkError> {
            self.inner.ready().await
        }

        async fn subscribe(
            &self,
            event: &str,
        ) -> Result<streamsync_sdk::Subscription, streamsync_sdk::SdkError> {
            tokio::time::sleep(self.delay).await;
            self.inner.subscribe(event).await
        }

        async fn emit(
            &self,
            event: &str,
            payload: serde_json::Value,
        ) -> Result<(), streamsync_sdk::SdkError> {
            self.inner.emit(event, payload).await
        }

        fn providers(&self) -> streamsync_sdk::ProviderStore {
            self.inner.providers()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_interrupts_slow_subscriptions() {
        let inner = Arc::new(LocalHost::builder().context(context(5, true)).build());
        let host = Arc::new(SlowSubscribeHost {
            inner: Arc::clone(&inner),
            delay: Duration::from_secs(10),
        });
        let frame = mount(host, config(), Viewer::guest());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(frame.snapshot().phase, LoadPhase::Loading);

        let started = tokio::time::Instant::now();
        frame.unmount().await;
        assert!(started.elapsed() < Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(inner.ready_count(), 0);
        assert_eq!(inner.active_subscriptions(), 0);
    }
}
