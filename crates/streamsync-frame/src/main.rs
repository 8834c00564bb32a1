//! StreamSync frame: terminal front end.
//!
//! Lines typed on stdin are sent to the chat; chat lines from every viewer
//! are printed as they arrive. Ctrl-C unmounts the frame and exits.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use streamsync_frame::constants::PROJECT_ID;
use streamsync_frame::{mount, FrameConfig, FrameState, FrameView, LoadPhase, MountedFrame};
use streamsync_models::{ClientContext, Fid, SessionContext, UserContext, Viewer};
use streamsync_sdk::{FrameHost, HostCredentials, LocalHost, NatsHost};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Client fid reported by the in-process host.
const LOCAL_CLIENT_FID: u64 = 9152;

/// Live stream frame with chat.
#[derive(Parser, Debug)]
#[command(name = "streamsync-frame", about = "Live stream frame with chat")]
#[command(author, version, long_about = None)]
struct Args {
    /// Stream address; may carry `caster_fid`. Overrides STREAMSYNC_STREAM_URL.
    #[arg(long)]
    stream_url: Option<String>,

    /// Viewer fid. Without one the viewer chats as a guest.
    #[arg(long)]
    fid: Option<Fid>,

    /// NATS server hosting the frame. Overrides NATS_URL.
    #[arg(long)]
    nats_url: Option<String>,

    /// App id host subjects are scoped to.
    #[arg(long, default_value = PROJECT_ID)]
    app_id: String,

    /// Run against an in-process host instead of NATS.
    #[arg(long)]
    local: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (controlled via RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = FrameConfig::from_env();
    if let Some(stream_url) = args.stream_url.clone() {
        config = config.with_stream_url(stream_url);
    }
    let viewer = Viewer::from(args.fid);

    if args.local {
        let host = LocalHost::builder()
            .context(demo_context(args.fid.unwrap_or(Fid::new(1))))
            .build();
        run(Arc::new(host), config, viewer).await
    } else {
        let nats_url = args.nats_url.clone().unwrap_or_else(|| {
            std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string())
        });
        let host = NatsHost::connect(&nats_url, &args.app_id, credentials_from_env())
            .await
            .with_context(|| format!("connecting to {nats_url}"))?;
        run(Arc::new(host), config, viewer).await
    }
}

/// Optional JWT + NKey credentials from `NATS_JWT` and `NATS_NKEY_SEED`.
fn credentials_from_env() -> Option<HostCredentials> {
    let jwt = std::env::var("NATS_JWT").ok()?;
    let seed = std::env::var("NATS_NKEY_SEED").ok()?;
    Some(HostCredentials { seed, jwt })
}

fn demo_context(fid: Fid) -> SessionContext {
    SessionContext {
        user: UserContext {
            fid,
            username: None,
            display_name: None,
            pfp_url: None,
        },
        client: ClientContext {
            client_fid: Fid::new(LOCAL_CLIENT_FID),
            added: false,
            notification_details: None,
            safe_area_insets: None,
        },
    }
}

async fn run<H: FrameHost>(host: Arc<H>, config: FrameConfig, viewer: Viewer) -> anyhow::Result<()> {
    let stream_url = config.stream_url.clone();
    let frame = mount(host, config, viewer);
    let mut state = frame.state();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printer = Printer::default();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                printer.print(&snapshot, &stream_url, viewer);
            }
            line = lines.next_line() => {
                match line.context("reading stdin")? {
                    Some(line) => submit(&frame, line).await,
                    None => break,
                }
            }
        }
    }

    frame.unmount().await;
    Ok(())
}

async fn submit(frame: &MountedFrame, line: String) {
    if let Err(e) = frame.submit(line).await {
        warn!(error = %e, "message not sent");
    }
}

/// Prints the frame once it is ready, then each new chat line.
#[derive(Default)]
struct Printer {
    phase: Option<LoadPhase>,
    printed: usize,
    status: Option<String>,
}

impl Printer {
    fn print(&mut self, state: &FrameState, stream_url: &str, viewer: Viewer) {
        if self.phase != Some(state.phase) {
            self.phase = Some(state.phase);
            print!("{}", FrameView::from_state(state, stream_url, viewer));
            println!();
            self.printed = state.chat.len();
            self.status.clone_from(&state.add_frame_result);
            return;
        }

        for message in &state.chat.messages()[self.printed..] {
            let star = if message.is_moderator { " ⭐" } else { "" };
            println!(
                "[{}] {}: {}{star}",
                chrono::Local::now().format("%H:%M:%S"),
                message.author,
                message.message
            );
        }
        self.printed = state.chat.len();

        if state.add_frame_result != self.status {
            self.status.clone_from(&state.add_frame_result);
            if let Some(status) = &self.status {
                println!("{status}");
            }
        }
    }
}
