//! Contanki GW - gamepad-to-action gateway
//!
//! Binary entry point: feeds bridge messages from stdin or a replay file
//! through a session wired to the console host, for exercising the input
//! pipeline end to end without the embedding application.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contanki_gw::{AddonConfig, ConsoleHost, Contanki, ProfileStore, State};

/// Contanki Gateway - drive the input pipeline from a bridge message stream
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay bridge messages from a file instead of stdin
    #[arg(short, long)]
    replay: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Initial application context reported by the console host
    #[arg(long, default_value = "deckBrowser")]
    state: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let state = State::parse(&args.state)
        .with_context(|| format!("unknown state '{}'", args.state))?;

    let host = Arc::new(ConsoleHost::new(AddonConfig::default()));
    host.set_state(state).await;

    let mut session = Contanki::new(host.clone(), ProfileStore::builtin())?;
    info!("Session ready, feeding bridge messages...");

    match &args.replay {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("cannot open replay file '{path}'"))?;
            run(&mut session, &host, BufReader::new(file)).await?;
        }
        None => run(&mut session, &host, BufReader::new(tokio::io::stdin())).await?,
    }

    info!("Bridge stream ended");
    Ok(())
}

/// Pump one line per bridge message. Lines starting with `state ` switch the
/// console host's reported context; `#` lines and blanks are skipped.
async fn run<R>(session: &mut Contanki, host: &ConsoleHost, reader: BufReader<R>) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix("state ") {
            match State::parse(name.trim()) {
                Some(state) => host.set_state(state).await,
                None => warn!("unknown state '{}'", name.trim()),
            }
            continue;
        }
        match session.on_receive_message(line).await {
            Ok(true) => {}
            Ok(false) => warn!("unhandled message: {line}"),
            Err(err) => warn!("bad bridge message: {err}"),
        }
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
