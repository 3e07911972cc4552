//! Subprocess backend
//!
//! Runs the configured database program once per request. Arguments are passed
//! as a discrete argv, never through a shell.

use super::{BoxFuture, CommandOutput, DbBackend, DbError, Subcommand};
use crate::config::DatabaseConfig;
use crate::logger;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// The external database executable
#[derive(Debug, Clone)]
pub struct ExternalBinary {
    program: String,
    work_dir: PathBuf,
}

impl ExternalBinary {
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.binary.clone(), config.data_dir.clone())
    }

    async fn execute(
        &self,
        subcommand: Subcommand,
        args: &[String],
    ) -> Result<CommandOutput, DbError> {
        logger::log_command(&self.program, subcommand.as_str(), args);

        let output = Command::new(&self.program)
            .arg(subcommand.as_str())
            .args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DbError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.into(),
        };

        if !result.success() {
            logger::log_command_failed(subcommand.as_str(), &result.status, &result.stderr);
        }

        Ok(result)
    }
}

impl DbBackend for ExternalBinary {
    fn run<'a>(
        &'a self,
        subcommand: Subcommand,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<CommandOutput, DbError>> {
        Box::pin(self.execute(subcommand, args))
    }
}
