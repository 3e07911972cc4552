//! Database backend module
//!
//! Narrow interface over the external database program. The route layer only
//! sees [`DbBackend`], so the subprocess can later be replaced by an in-process
//! store without touching the handlers.

pub mod args;
pub mod external;

pub use args::{delete_args, insert_args, update_args, ArgsError};
pub use external::ExternalBinary;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;
use thiserror::Error;

/// Boxed future returned by backends, kept object-safe for `Arc<dyn DbBackend>`
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// First argv entry of every invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Select,
    Insert,
    Update,
    Delete,
    Export,
}

impl Subcommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit state of a finished invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Non-zero exit code
    Failed(i32),
    /// Killed by a signal, no exit code
    Terminated,
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            status.code().map_or(Self::Terminated, Self::Failed)
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("exit code 0"),
            Self::Failed(code) => write!(f, "exit code {code}"),
            Self::Terminated => f.write_str("terminated by signal"),
        }
    }
}

/// Captured output of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: CommandStatus,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == CommandStatus::Success
    }

    /// Everything the program wrote, stdout first
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executes one subcommand of the database
pub trait DbBackend: Send + Sync {
    fn run<'a>(
        &'a self,
        subcommand: Subcommand,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<CommandOutput, DbError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommand_names() {
        assert_eq!(Subcommand::Select.as_str(), "select");
        assert_eq!(Subcommand::Insert.as_str(), "insert");
        assert_eq!(Subcommand::Update.as_str(), "update");
        assert_eq!(Subcommand::Delete.as_str(), "delete");
        assert_eq!(Subcommand::Export.to_string(), "export");
    }

    #[test]
    fn test_combined_output_order() {
        let out = CommandOutput {
            stdout: "partial\n".to_string(),
            stderr: "Error: Missing value for column: id\n".to_string(),
            status: CommandStatus::Failed(1),
        };
        assert!(!out.success());
        assert_eq!(
            out.combined(),
            "partial\nError: Missing value for column: id\n"
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CommandStatus::Failed(2).to_string(), "exit code 2");
        assert_eq!(CommandStatus::Terminated.to_string(), "terminated by signal");
    }
}
