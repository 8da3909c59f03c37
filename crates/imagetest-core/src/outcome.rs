//! Evaluated result of one test.

use serde::{Deserialize, Serialize};

use crate::definition::TestDefinition;
use crate::error::ExecutionError;
use crate::runner::ExecutionResult;

/// Pass/fail verdict for one test plus the trace explaining it.
///
/// The trace is assembled once, at evaluation time, in a fixed order:
/// command, assumption, captured output, one line per predicate, verdict.
/// Errored outcomes carry the launch error where the output would be.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub test_name: String,
    pub passed: bool,
    pub trace: Vec<String>,

    /// Set when the command could not be run at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_error: Option<String>,
}

impl Outcome {
    /// Apply every predicate of `definition` to the captured output.
    pub fn evaluate(definition: &TestDefinition, result: &ExecutionResult) -> Self {
        let actual = result.raw_output.as_str();
        let mut trace = header(definition);
        trace.push(format!("output: {:?}", actual));
        let mut passed = true;

        for predicate in &definition.predicates {
            if predicate.evaluate(actual) {
                trace.push(format!("+ {} matched", predicate));
            } else {
                passed = false;
                trace.push(format!("- {} did not match actual {:?}", predicate, actual));
            }
        }
        trace.push(if passed { "PASSED" } else { "FAILED" }.to_string());

        Self {
            test_name: definition.name.clone(),
            passed,
            trace,
            launch_error: None,
        }
    }

    /// Outcome for a test whose command could not be launched.
    pub fn errored(definition: &TestDefinition, error: &ExecutionError) -> Self {
        let mut trace = header(definition);
        trace.push(format!("error: {}", error));
        trace.push("ERROR".to_string());

        Self {
            test_name: definition.name.clone(),
            passed: false,
            trace,
            launch_error: Some(error.to_string()),
        }
    }

    /// True when the command never ran, as opposed to an assertion failure.
    pub fn is_error(&self) -> bool {
        self.launch_error.is_some()
    }

    /// True when the command ran and at least one predicate did not match.
    pub fn is_failure(&self) -> bool {
        !self.passed && !self.is_error()
    }
}

fn header(definition: &TestDefinition) -> Vec<String> {
    vec![
        format!("$ {}", definition.command),
        format!("assume: {}", definition.assumption),
    ]
}
