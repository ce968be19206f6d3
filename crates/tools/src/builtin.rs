//! Built-in command runner and kubectl integration.

use super::r#trait::*;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Runs commands with captured output, printing nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietRunner;

#[async_trait]
impl CommandRunner for QuietRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        let start = std::time::Instant::now();

        debug!(command = %command, "Running command");
        let output = Command::new(&command.name)
            .args(&command.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                command: command.cli(),
                source,
            })?;

        let output = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        };

        if !output.success() {
            return Err(ToolError::Failed {
                command: command.cli(),
                output,
            });
        }

        Ok(output)
    }
}

const KUBECTL: &str = "kubectl";

/// Deletes resources with `kubectl delete`.
pub struct KubectlTool {
    runner: Arc<dyn CommandRunner>,
    namespace: Option<String>,
}

impl KubectlTool {
    /// Create a kubectl tool running through `runner`.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            namespace: None,
        }
    }

    /// Pin deletions to a namespace instead of the kubeconfig default.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The command that deletes `name` of `kind`.
    pub fn delete_command(&self, kind: &str, name: &str) -> CommandSpec {
        let mut args = vec!["delete".to_string(), kind.to_string(), name.to_string()];
        if let Some(ns) = &self.namespace {
            args.push("--namespace".to_string());
            args.push(ns.clone());
        }
        CommandSpec::new(KUBECTL, args)
    }
}

#[async_trait]
impl ImperativeDelete for KubectlTool {
    async fn delete(&self, kind: &str, name: &str) -> Result<CommandOutput> {
        let command = self.delete_command(kind, name);
        self.runner.run(&command).await
    }
}
