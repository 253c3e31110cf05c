use std::fmt::Display;
use std::path::PathBuf;

use crate::configuration::PlayerLogs;
use crate::player_process::DiagnosticsSink;
use crate::rules::Side;

/// Widest name the summary table has room for.
const NAME_WIDTH: usize = 20;

/// One of the two competing programs, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Agent {
    /// `p1` or `p2`.
    pub name: String,
    /// Shell command launching the program.
    pub command: String,
    pub id: usize,
}

impl Agent {
    pub fn new(id: usize, command: impl Into<String>) -> Agent {
        Agent {
            name: format!("p{}", id + 1),
            command: command.into(),
            id,
        }
    }

    /// The command, with leading path components dropped while it is too
    /// wide for the summary table.
    pub fn display_name(&self) -> &str {
        let mut name = self.command.as_str();
        while name.len() > NAME_WIDTH {
            match name.split_once('/') {
                Some((_, rest)) => name = rest,
                None => break,
            }
        }
        name
    }

    /// Where this agent's stderr goes when it plays `side` in game `game`.
    pub fn diagnostics_sink(&self, logs: &PlayerLogs, game: usize, side: Side) -> DiagnosticsSink {
        match logs {
            PlayerLogs::Discard => DiagnosticsSink::Discard,
            PlayerLogs::Inherit => DiagnosticsSink::Inherit,
            PlayerLogs::Prefix(prefix) => DiagnosticsSink::File(PathBuf::from(format!(
                "{prefix}{game:04}_{}_{}",
                self.name,
                side.name()
            ))),
        }
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.display_name())
    }
}

#[cfg(test)]
mod agent_tests {
    use super::*;

    #[test]
    fn names_follow_position() {
        assert_eq!(Agent::new(0, "./a").name, "p1");
        assert_eq!(Agent::new(1, "./b").name, "p2");
    }

    #[test]
    fn short_commands_are_kept() {
        assert_eq!(Agent::new(0, "./player").display_name(), "./player");
        assert_eq!(
            Agent::new(0, "a-very-long-command-without-slash").display_name(),
            "a-very-long-command-without-slash"
        );
    }

    #[test]
    fn long_paths_are_shortened() {
        let agent = Agent::new(0, "/home/someone/projects/othello/target/release/player");
        assert_eq!(agent.display_name(), "release/player");
        let agent = Agent::new(0, "/usr/local/bin/my-player --depth=4");
        assert_eq!(agent.display_name(), "my-player --depth=4");
    }

    #[test]
    fn log_file_names() {
        let agent = Agent::new(1, "./b");
        let logs = PlayerLogs::Prefix("logs/run-".to_owned());
        assert_eq!(
            agent.diagnostics_sink(&logs, 7, Side::Black),
            DiagnosticsSink::File(PathBuf::from("logs/run-0007_p2_black"))
        );
        assert_eq!(
            agent.diagnostics_sink(&PlayerLogs::Discard, 7, Side::White),
            DiagnosticsSink::Discard
        );
        assert_eq!(
            agent.diagnostics_sink(&PlayerLogs::Inherit, 0, Side::White),
            DiagnosticsSink::Inherit
        );
    }
}
