//! Letterbox — Entry Point
//!
//! Parses the command line, loads configuration, initializes logging,
//! and wires the adapters into the use cases. One-shot commands run a
//! single REST operation; `watch` runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Parse CLI args (clap)
//! 2. Load config.toml + validate
//! 3. Init tracing (compact format on stderr; stdout carries letters)
//! 4. Resolve credentials (config file or LETTERBOX_* env vars)
//! 5. Create LettersClient (HTTP + retry, implements LetterStore)
//! 6. Dispatch the subcommand; `watch` additionally spawns the
//!    live-feed supervisor and waits for SIGINT → graceful close

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

mod adapters;
mod cli;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::api::{LettersClient, SessionAuth};
use adapters::console::{format_detail, ConsoleStatus, ConsoleView};
use adapters::feeds::WsTransport;
use cli::{Cli, Commands};
use usecases::{Inbox, LiveFeed};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Parse command line ───────────────────────────────
    let cli = Cli::parse();

    // ── 2. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&cli.config)
        .context("Failed to load configuration")?;

    // ── 3. Initialize logging on stderr ─────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.client.log_level)
            }),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    // ── 4. Resolve credentials and build the REST client ────
    let auth = SessionAuth::from_config(&config.client);
    let store = Arc::new(
        LettersClient::new(&config.api, auth).context("Failed to create API client")?,
    );
    let view = Arc::new(ConsoleView);
    let inbox = Inbox::new(Arc::clone(&store), Arc::clone(&view));

    // ── 5. Dispatch ─────────────────────────────────────────
    match cli.command {
        Commands::Watch(cmd) => run_watch(&config, &inbox, view, cmd.no_backlog).await,
        Commands::List(_) => {
            let count = inbox.load_all().await?;
            if count == 0 {
                println!("No letters.");
            }
            Ok(())
        }
        Commands::Show(cmd) => {
            let letter = inbox.fetch(&cmd.id).await?;
            print!("{}", format_detail(&letter));
            Ok(())
        }
        Commands::Send(cmd) => {
            let draft = cmd.read_draft()?;
            let id = inbox.send(&draft).await?;
            println!("Letter sent, id {id}");
            Ok(())
        }
        Commands::Users(_) => {
            let directory = inbox.users().await?;
            println!("Senders:");
            for user in &directory.senders {
                println!("  {} <{}>", user.name, user.email);
            }
            println!("Recipients:");
            for user in &directory.recipients {
                println!("  {} <{}>", user.name, user.email);
            }
            Ok(())
        }
    }
}

/// The `watch` command: print the backlog, then follow the live feed
/// until SIGINT. A failed backlog load is reported and skipped; the
/// feed is still started, matching how the mailbox behaves when the
/// listing endpoint hiccups but the stream is fine.
async fn run_watch<S, V>(
    config: &config::AppConfig,
    inbox: &Inbox<S, V>,
    view: Arc<V>,
    no_backlog: bool,
) -> Result<()>
where
    S: ports::LetterStore,
    V: ports::ViewRenderer,
{
    if no_backlog {
        info!("Skipping backlog, live letters only");
    } else {
        match inbox.load_all().await {
            Ok(0) => println!("No letters yet."),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Backlog load failed, continuing with live feed");
                eprintln!("could not load existing letters: {e}");
            }
        }
    }

    let feed = LiveFeed::new(
        Arc::new(WsTransport),
        view,
        Arc::new(ConsoleStatus),
        &config.feed,
    );
    feed.connect();
    info!(url = %config.feed.ws_url, "Watching for new letters, Ctrl-C to stop");

    wait_for_shutdown(&feed).await?;

    feed.close().await;
    info!("Watch stopped");
    Ok(())
}

/// Block until SIGINT. On Unix, SIGHUP nudges the feed instead of
/// stopping, so an operator can revive a connection that gave up.
#[cfg(unix)]
async fn wait_for_shutdown(feed: &LiveFeed) -> Result<()> {
    let mut hangup = signal::unix::signal(signal::unix::SignalKind::hangup())
        .context("Failed to install SIGHUP handler")?;
    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("Failed to listen for SIGINT")?;
                info!("SIGINT received, closing feed");
                return Ok(());
            }
            _ = hangup.recv() => {
                info!("SIGHUP received, nudging feed");
                feed.notify_visible();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_feed: &LiveFeed) -> Result<()> {
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, closing feed");
    Ok(())
}
