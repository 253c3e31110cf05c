//! Line protocol spoken with a player process.
//!
//! Every message is one ASCII line terminated by `\n`. The arbiter sends
//! [`START`] once to the first mover, then forwards each opponent move as its
//! two-character token, and finally [`QUIT`] during teardown. Players answer
//! every message but `QUIT` with exactly one move line.
//!
//! Reads are strict: one `read` must return one complete line and nothing
//! more. There is no buffering across calls and no retry.

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::{instrument, trace};

use crate::player_process::{DiagnosticsSink, PlayerProcess};

/// Sent once to the player moving first.
pub const START: &str = "Start";
/// Sent to every player at teardown, no reply expected.
pub const QUIT: &str = "Quit";

const READ_BUFFER_SIZE: usize = 1024;

/// Quotes `bytes`, escaping anything that is not printable ASCII.
pub fn escape(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}

/// A player broke the line protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("End of file reached!")]
    EndOfStream,
    #[error("End of line not found in {}!", escape(.0))]
    MissingNewline(Vec<u8>),
    #[error("Extra data after end of line found in {}!", escape(.0))]
    TrailingData(Vec<u8>),
    #[error("read from player failed")]
    Read(#[source] io::Error),
    #[error("could not send {message:?}")]
    Undeliverable {
        message: String,
        #[source]
        source: io::Error,
    },
}

/// One side of a match: a running player and the channel to it.
///
/// The player is told to [`QUIT`] and reaped when the handler is closed or dropped.
#[derive(Debug)]
pub struct ClientHandler {
    process: PlayerProcess,
}

impl ClientHandler {
    /// Launch `command` as a player whose diagnostics go to `sink`.
    #[instrument(skip(sink))]
    pub fn init(command: &str, sink: &DiagnosticsSink) -> anyhow::Result<ClientHandler> {
        let process = PlayerProcess::spawn(command, sink)?;
        Ok(ClientHandler { process })
    }

    pub fn pid(&self) -> u32 {
        self.process.id()
    }

    /// Write `message` followed by a newline.
    ///
    /// A player that already went away yields [`ProtocolError::Undeliverable`]
    /// instead of killing the arbiter: Rust binaries ignore `SIGPIPE`, so the
    /// broken pipe comes back as an ordinary `io::Error` for this call only.
    pub fn send_line(&mut self, message: &str) -> Result<(), ProtocolError> {
        let undeliverable = |source| ProtocolError::Undeliverable {
            message: message.to_owned(),
            source,
        };
        let stdin = self
            .process
            .input()
            .ok_or_else(|| undeliverable(io::ErrorKind::BrokenPipe.into()))?;
        let line = format!("{message}\n");
        stdin.write_all(line.as_bytes()).map_err(undeliverable)?;
        trace!(pid = self.pid(), message, "sent");
        Ok(())
    }

    /// Read exactly one line, without its terminator.
    pub fn receive_line(&mut self) -> Result<String, ProtocolError> {
        let stdout = self.process.output().ok_or(ProtocolError::EndOfStream)?;
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = stdout.read(&mut buf).map_err(ProtocolError::Read)?;
        let data = &buf[..n];
        if n == 0 {
            return Err(ProtocolError::EndOfStream);
        }
        match data.iter().position(|&b| b == b'\n') {
            None => Err(ProtocolError::MissingNewline(data.to_vec())),
            Some(end) if end + 1 != n => Err(ProtocolError::TrailingData(data.to_vec())),
            Some(end) => {
                let line = String::from_utf8_lossy(&data[..end]).into_owned();
                trace!(pid = self.pid(), line = %line, "received");
                Ok(line)
            }
        }
    }

    /// Say [`QUIT`] and reap the player. Only the first call has any effect.
    pub fn close(&mut self) {
        self.process.terminate(format!("{QUIT}\n").as_bytes());
    }
}

impl Drop for ClientHandler {
    fn drop(&mut self) {
        self.close();
    }
}
