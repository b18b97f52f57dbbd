//! Console Adapter - Terminal Rendering
//!
//! Implements the view ports for a terminal: letters go to stdout,
//! connection status to stderr so piped output stays clean. Formatting
//! is lenient about half-filled records; fallbacks stand in for absent
//! fields instead of errors.

use chrono::NaiveDateTime;

use crate::domain::connection::ConnectionState;
use crate::domain::letter::Letter;
use crate::ports::view::{StatusReporter, ViewRenderer};

/// Longest body excerpt shown on a letter card.
const PREVIEW_CHARS: usize = 150;

/// Renders letters as cards on stdout.
pub struct ConsoleView;

impl ViewRenderer for ConsoleView {
    fn letter_received(&self, letter: &Letter) {
        println!("{}", format_card(letter));
    }
}

/// Prints connection state lines on stderr.
pub struct ConsoleStatus;

impl StatusReporter for ConsoleStatus {
    fn status_changed(&self, state: ConnectionState) {
        eprintln!("live updates: {state}");
    }
}

/// One letter as a compact card.
///
/// The dot marks unread letters. Body text is collapsed to a single
/// line and cut to a preview; `show` prints the whole thing.
pub fn format_card(letter: &Letter) -> String {
    let dot = if letter.is_unread() { '●' } else { '○' };
    let sender = if letter.sender.is_empty() {
        "Unknown"
    } else {
        &letter.sender
    };
    let subject = if letter.subject.is_empty() {
        "No Subject"
    } else {
        &letter.subject
    };

    let mut card = format!(
        "{dot} {}  {sender} -> {}\n  Subject: {subject}",
        format_timestamp(&letter.timestamp),
        letter.to.join(),
    );
    if !letter.cc.is_empty() {
        card.push_str(&format!("\n  Cc: {}", letter.cc.join()));
    }
    let excerpt = preview(&letter.body);
    if !excerpt.is_empty() {
        card.push_str(&format!("\n  {excerpt}"));
    }
    card.push('\n');
    card
}

/// One letter in full, for single-letter lookup.
pub fn format_detail(letter: &Letter) -> String {
    let mut detail = format!(
        "From: {}\nTo: {}\n",
        if letter.sender.is_empty() {
            "Unknown"
        } else {
            &letter.sender
        },
        letter.to.join(),
    );
    if !letter.cc.is_empty() {
        detail.push_str(&format!("Cc: {}\n", letter.cc.join()));
    }
    if !letter.bcc.is_empty() {
        detail.push_str(&format!("Bcc: {}\n", letter.bcc.join()));
    }
    detail.push_str(&format!(
        "Date: {}\nSubject: {}\nStatus: {}\n\n{}\n",
        format_timestamp(&letter.timestamp),
        if letter.subject.is_empty() {
            "No Subject"
        } else {
            &letter.subject
        },
        if letter.status.is_empty() {
            "unknown"
        } else {
            &letter.status
        },
        letter.body,
    ));
    detail
}

/// Render the backend's naive ISO timestamp as a short local-style
/// date. Unparseable input is shown verbatim rather than hidden.
pub fn format_timestamp(raw: &str) -> String {
    match raw.parse::<NaiveDateTime>() {
        Ok(ts) => ts.format("%b %d, %Y %I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Collapse whitespace and cut the body to card length.
fn preview(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}
