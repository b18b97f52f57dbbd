//! CLI definitions and argument handling.
//!
//! Clap derive types only; command execution lives in `main.rs` so the
//! handlers can share the wired-up adapters.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::domain::letter::LetterDraft;

/// Terminal client for the letters mailbox.
///
/// Reads the mailbox over the backend REST API and follows new letters
/// live over its WebSocket feed.
#[derive(Parser, Debug)]
#[command(name = "letterbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short = 'c', long, global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands for letterbox.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the mailbox, then follow new letters live.
    ///
    /// Reconnects with growing pauses when the feed drops and gives up
    /// after the configured number of attempts. Send SIGHUP to nudge a
    /// feed that has given up; press Ctrl-C to stop.
    Watch(WatchCommand),

    /// List all letters in the mailbox.
    List(ListCommand),

    /// Show one letter in full.
    Show(ShowCommand),

    /// Compose and send a letter.
    ///
    /// Requires credentials in the config file or the
    /// LETTERBOX_USERNAME / LETTERBOX_PASSWORD environment variables.
    /// The body is read from stdin unless --body is given.
    Send(SendCommand),

    /// List the allowed senders and recipients.
    Users(UsersCommand),
}

/// Arguments for the 'watch' command.
#[derive(Args, Debug)]
pub struct WatchCommand {
    /// Follow live updates only, without printing the backlog first.
    #[arg(long)]
    pub no_backlog: bool,
}

/// Arguments for the 'list' command.
#[derive(Args, Debug)]
pub struct ListCommand {}

/// Arguments for the 'show' command.
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Letter id to display.
    pub id: String,
}

/// Arguments for the 'send' command.
#[derive(Args, Debug)]
pub struct SendCommand {
    /// Recipient address. Repeat the flag for several recipients.
    #[arg(short = 't', long = "to", required = true)]
    pub to: Vec<String>,

    /// Sender address.
    #[arg(short = 'f', long = "from")]
    pub sender: String,

    /// Carbon-copy address. Repeatable.
    #[arg(long)]
    pub cc: Vec<String>,

    /// Blind carbon-copy address. Repeatable.
    #[arg(long)]
    pub bcc: Vec<String>,

    /// Subject line.
    #[arg(short = 's', long)]
    pub subject: String,

    /// Message body. Read from stdin when omitted.
    #[arg(short = 'b', long)]
    pub body: Option<String>,
}

impl SendCommand {
    /// Assemble the draft, reading the body from stdin when it was not
    /// given as a flag.
    pub fn read_draft(&self) -> Result<LetterDraft> {
        let body = match &self.body {
            Some(body) => body.clone(),
            None => std::io::read_to_string(std::io::stdin())
                .context("Failed to read letter body from stdin")?,
        };
        Ok(LetterDraft {
            to: self.to.clone(),
            sender: self.sender.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            subject: self.subject.clone(),
            body: body.trim_end().to_string(),
        })
    }
}

/// Arguments for the 'users' command.
#[derive(Args, Debug)]
pub struct UsersCommand {}
