//! Command abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The process could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("failed to run {command}: {}", .output.summary())]
    Failed {
        /// Command line
        command: String,
        /// Captured output, kept for diagnostics
        output: CommandOutput,
    },
}

impl ToolError {
    /// Captured output of the failed command, if it ran at all.
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            ToolError::Failed { output, .. } => Some(output),
            ToolError::Spawn { .. } => None,
        }
    }
}

/// Runs external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion.
    ///
    /// A non-zero exit code is an error carrying the captured output.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// Deletes a resource by kind and name with an imperative client.
#[async_trait]
pub trait ImperativeDelete: Send + Sync {
    /// Delete `name` of `kind`, returning the raw command output.
    async fn delete(&self, kind: &str, name: &str) -> Result<CommandOutput>;
}

/// A command to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program name
    pub name: String,

    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command.
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line as it would be typed in a shell.
    pub fn cli(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.cli())
    }
}

/// Output from a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit code
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error
    pub stderr: String,

    /// Execution duration
    pub duration: std::time::Duration,
}

impl CommandOutput {
    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// One-line description of the result for error messages.
    pub fn summary(&self) -> String {
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        if detail.is_empty() {
            format!("exit code {}", self.exit_code)
        } else {
            format!("exit code {}: {}", self.exit_code, detail)
        }
    }
}
