//! External command integration.
//!
//! Runs `kubectl` to delete custom resources imperatively.

#![warn(missing_docs)]

pub mod r#trait;
pub mod builtin;

pub use r#trait::{CommandRunner, CommandSpec, CommandOutput, ImperativeDelete, ToolError, Result};
pub use builtin::{QuietRunner, KubectlTool};
