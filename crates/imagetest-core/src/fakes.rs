//! In-memory fakes for the backend and output seams (testing only)
//!
//! Provides `FakeBackend` and `FakeOutput`, which satisfy the trait
//! contracts without docker or the filesystem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::{ExecutionError, RunResult, SinkError};
use crate::output::OutputSink;
use crate::suite::SuiteResult;

// ---------------------------------------------------------------------------
// FakeBackend
// ---------------------------------------------------------------------------

/// Backend answering from canned outputs keyed by command line.
///
/// Commands without a canned answer fail to launch.
#[derive(Debug, Default)]
pub struct FakeBackend {
    answers: HashMap<String, Result<String, String>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `output`.
    pub fn with_output(mut self, command: &str, output: &str) -> Self {
        self.answers.insert(key(command), Ok(output.to_string()));
        self
    }

    /// Fail to launch `command` with `cause`.
    pub fn failing(mut self, command: &str, cause: &str) -> Self {
        self.answers.insert(key(command), Err(cause.to_string()));
        self
    }

    /// Sleep before answering `command`.
    pub fn with_delay(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(key(command), delay);
        self
    }

    /// Every argument vector received, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

fn key(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn execute(&self, args: &[String]) -> RunResult<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        let command = args.join(" ");

        if let Some(delay) = self.delays.get(&command) {
            tokio::time::sleep(*delay).await;
        }

        match self.answers.get(&command) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(cause)) => Err(ExecutionError::launch(args, cause)),
            None => Err(ExecutionError::launch(args, "no canned output")),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeOutput
// ---------------------------------------------------------------------------

/// Sink collecting every trace line it is given. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeOutput {
    lines: Arc<Mutex<Vec<String>>>,
    results: Arc<Mutex<Vec<SuiteResult>>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected trace lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// How many times `render` was called.
    pub fn renders(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    /// Every suite result received.
    pub fn results(&self) -> Vec<SuiteResult> {
        self.results.lock().unwrap().clone()
    }
}

impl OutputSink for FakeOutput {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError> {
        self.lines
            .lock()
            .unwrap()
            .extend(result.outcomes.iter().flat_map(|o| o.trace.iter().cloned()));
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_backend_answers_and_records() {
        let backend = FakeBackend::new()
            .with_output("echo hi", "hi")
            .failing("node -v", "image missing");

        let hi = vec!["echo".to_string(), "hi".to_string()];
        assert_eq!(backend.execute(&hi).await.unwrap(), "hi");

        let node = vec!["node".to_string(), "-v".to_string()];
        match backend.execute(&node).await.unwrap_err() {
            ExecutionError::Launch { command, cause } => {
                assert_eq!(command, "node -v");
                assert_eq!(cause, "image missing");
            }
            other => panic!("expected Launch, got {:?}", other),
        }

        assert!(backend.execute(&["ls".to_string()]).await.is_err());
        assert_eq!(backend.calls().len(), 3);
    }
}
