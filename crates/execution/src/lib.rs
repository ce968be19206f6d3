//! Execution layer - retention evaluation and cascading deletion.

#![warn(missing_docs)]

pub mod error;
pub mod deleter;
pub mod report;
pub mod engine;

pub use error::{GcError, Result};
pub use deleter::CascadingDeleter;
pub use report::{RunReport, InstanceReport};
pub use engine::{GcEngine, EngineConfig, RunState};

#[cfg(test)]
mod testing;
