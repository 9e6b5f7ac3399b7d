//! Console move input.
//!
//! A dedicated thread prompts and reads lines from stdin, and sends each
//! line, trailing newline included, over a channel. [`forward`] hands
//! them to [`AppState::update`] one at a time. Rejected moves are logged
//! by the state; the reader just prompts again.
//!
//! The reader is a plain thread rather than a Tokio task so a pending
//! read never holds up runtime shutdown.

use std::io::{BufRead, Write};

use boardcast_observer::AppState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Printed before each line is read.
pub const PROMPT: &str = "Enter your move...";

/// Lines buffered between the reader thread and [`forward`].
const LINE_BUFFER: usize = 1;

/// Start the stdin reader thread and return the receiving end.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::Builder::new()
        .name(String::from("move-input"))
        .spawn(move || {
            let stdin = std::io::stdin();
            match read_lines(stdin.lock(), std::io::stdout(), &tx) {
                Ok(lines) => info!(lines, "move input closed"),
                Err(e) => warn!(error = %e, "move input failed"),
            }
        })?;
    Ok(rx)
}

/// Prompt on `writer`, read a line from `reader`, send it, repeat.
///
/// Stops at end of input or when the receiver is gone. Blocking; call
/// from a plain thread. Returns the number of lines sent.
pub fn read_lines<R, W>(mut reader: R, mut writer: W, tx: &mpsc::Sender<String>) -> std::io::Result<u64>
where
    R: BufRead,
    W: Write,
{
    let mut sent: u64 = 0;
    loop {
        writeln!(writer, "{PROMPT}")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(sent);
        }
        if tx.blocking_send(line).is_err() {
            return Ok(sent);
        }
        sent = sent.saturating_add(1);
    }
}

/// Apply every received line to `state` until the sender is dropped.
///
/// Returns the number of lines forwarded.
pub async fn forward(state: &AppState, mut lines: mpsc::Receiver<String>) -> u64 {
    let mut forwarded: u64 = 0;
    while let Some(line) = lines.recv().await {
        debug!(input = line.trim_end(), "handling move input");
        state.update(&line).await;
        forwarded = forwarded.saturating_add(1);
    }
    forwarded
}
