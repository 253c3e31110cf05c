//! Child processes running player programs.
//!
//! A [`PlayerProcess`] owns the child and both ends of its standard
//! input/output pipes. It is terminated exactly once: explicitly through
//! [`PlayerProcess::terminate`], or on drop if that never happened.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::Context;
use tracing::{debug, instrument, trace, warn};

/// Where a player's standard error goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiagnosticsSink {
    /// Thrown away.
    #[default]
    Discard,
    /// Shared with the arbiter's own standard error.
    Inherit,
    /// Written to this file, truncated first.
    File(PathBuf),
}

impl DiagnosticsSink {
    fn stdio(&self) -> anyhow::Result<Stdio> {
        Ok(match self {
            DiagnosticsSink::Discard => Stdio::null(),
            DiagnosticsSink::Inherit => Stdio::inherit(),
            DiagnosticsSink::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot open log file {}", path.display()))?;
                Stdio::from(file)
            }
        })
    }
}

#[derive(Debug)]
pub struct PlayerProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    terminated: bool,
}

impl PlayerProcess {
    /// Launch `command` through `/bin/sh -c` with piped stdin/stdout.
    ///
    /// # Errors
    /// Returned when the diagnostics file cannot be created or the shell cannot
    /// be started. These are setup failures, not something a player did.
    #[instrument(skip(sink))]
    pub fn spawn(command: &str, sink: &DiagnosticsSink) -> anyhow::Result<PlayerProcess> {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(sink.stdio()?)
            .spawn()
            .with_context(|| format!("could not launch '{command}'"))?;

        let stdin = child.stdin.take().context("child stdin was not piped")?;
        let stdout = child.stdout.take().context("child stdout was not piped")?;
        debug!(pid = child.id(), "player launched");

        Ok(PlayerProcess {
            child,
            stdin: Some(stdin),
            stdout: Some(stdout),
            terminated: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Write side of the pipe into the player. `None` once terminated.
    pub fn input(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    /// Read side of the pipe out of the player. `None` once terminated.
    pub fn output(&mut self) -> Option<&mut ChildStdout> {
        self.stdout.as_mut()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Sends `farewell`, closes the player's stdin, waits for it to exit, then
    /// closes its stdout.
    ///
    /// Nothing here is an error for the caller: the player may already be
    /// gone, and an abnormal exit status is only logged. Calling this again is
    /// a no-op.
    pub fn terminate(&mut self, farewell: &[u8]) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        if let Some(mut stdin) = self.stdin.take() {
            if let Err(e) = stdin.write_all(farewell) {
                trace!(pid = self.id(), "farewell not delivered: {e}");
            }
        }

        match self.child.wait() {
            Ok(status) if status.success() => trace!(pid = self.id(), "player exited"),
            Ok(status) => warn!(pid = self.id(), "Player did not exit normally! {status}"),
            Err(e) => warn!(pid = self.id(), "could not wait for player: {e}"),
        }

        self.stdout.take();
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        if !self.terminated {
            trace!(pid = self.id(), "terminating player on drop");
            self.terminate(b"");
        }
    }
}

#[cfg(test)]
mod process_tests {
    use std::io::Read;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arbiter_{}_{name}", std::process::id()))
    }

    #[test]
    fn pipes_are_connected() {
        let mut process =
            PlayerProcess::spawn("read line; echo \"<$line>\"", &DiagnosticsSink::Discard)
                .unwrap();
        process.input().unwrap().write_all(b"ping\n").unwrap();
        let mut reply = String::new();
        process.output().unwrap().read_to_string(&mut reply).unwrap();
        assert_eq!(reply, "<ping>\n");
        process.terminate(b"");
        assert!(process.is_terminated());
        assert!(process.input().is_none());
        assert!(process.output().is_none());
    }

    #[test]
    fn stderr_goes_to_file() {
        let path = temp_path("stderr_goes_to_file");
        let mut process = PlayerProcess::spawn(
            "echo diagnostics >&2",
            &DiagnosticsSink::File(path.clone()),
        )
        .unwrap();
        process.terminate(b"");
        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(content, "diagnostics\n");
    }

    #[test]
    fn farewell_is_delivered_before_close() {
        let path = temp_path("farewell_is_delivered_before_close");
        let mut process = PlayerProcess::spawn(
            "read line; echo \"$line\" >&2",
            &DiagnosticsSink::File(path.clone()),
        )
        .unwrap();
        process.terminate(b"Quit\n");
        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(content, "Quit\n");
    }

    #[test]
    fn abnormal_exit_and_dead_player_are_tolerated() {
        let mut process = PlayerProcess::spawn("exit 3", &DiagnosticsSink::Discard).unwrap();
        let mut rest = Vec::new();
        process.output().unwrap().read_to_end(&mut rest).unwrap();
        // the farewell hits a closed pipe
        process.terminate(b"Quit\n");
        process.terminate(b"Quit\n");
        assert!(process.is_terminated());
    }

    #[test]
    fn unwritable_log_file_fails_setup() {
        let sink = DiagnosticsSink::File(PathBuf::from("/nonexistent-dir/player.log"));
        let err = PlayerProcess::spawn("true", &sink).unwrap_err();
        assert!(err.to_string().contains("cannot open log file"));
    }

    #[test]
    fn drop_reaps_player() {
        let process = PlayerProcess::spawn("cat", &DiagnosticsSink::Discard).unwrap();
        // closing stdin on drop lets `cat` exit, so this returns
        drop(process);
    }
}
