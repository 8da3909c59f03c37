//! Running a single test definition through a backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::Backend;
use crate::definition::TestDefinition;
use crate::error::RunResult;

/// Snapshot of one command invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Arguments passed to the backend.
    pub command: Vec<String>,

    /// Captured output.
    pub raw_output: String,
}

/// Executes test definitions against a configured backend.
///
/// There is no timeout here; the backend owns that policy.
#[derive(Clone)]
pub struct ExecutionRunner {
    backend: Arc<dyn Backend>,
}

impl ExecutionRunner {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Run the definition's command and capture its output.
    pub async fn run(&self, definition: &TestDefinition) -> RunResult<ExecutionResult> {
        let command = definition.args();
        debug!(
            test = %definition.name,
            backend = self.backend.name(),
            command = %definition.command,
            "Executing test command"
        );
        let raw_output = self.backend.execute(&command).await?;
        Ok(ExecutionResult {
            command,
            raw_output,
        })
    }
}
