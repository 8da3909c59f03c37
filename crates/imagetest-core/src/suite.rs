//! Suite execution and outcome aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::definition::TestDefinition;
use crate::outcome::Outcome;
use crate::runner::ExecutionRunner;

/// Outcomes of one suite run, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<Outcome>,
}

impl SuiteResult {
    /// Result of a run that started and finished now, with a fresh run id.
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            outcomes,
        }
    }

    /// True iff the suite is non-empty and every outcome passed.
    pub fn overall_success(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.passed)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Tests that ran but did not meet their predicates.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Tests whose command could not be launched.
    pub fn errored_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_error()).count()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Runs every definition of a suite and collects one outcome per definition.
pub struct SuiteRunner {
    runner: ExecutionRunner,
    jobs: usize,
}

impl SuiteRunner {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            runner: ExecutionRunner::new(backend),
            jobs: 1,
        }
    }

    /// Run up to `jobs` tests at once. `0` is treated as `1`.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Run one definition to an outcome. Launch failures become errored outcomes.
    pub async fn run_one(&self, definition: &TestDefinition) -> Outcome {
        match self.runner.run(definition).await {
            Ok(result) => Outcome::evaluate(definition, &result),
            Err(e) => {
                warn!(test = %definition.name, error = %e, "Test command could not be run");
                Outcome::errored(definition, &e)
            }
        }
    }

    /// Run the whole suite.
    ///
    /// A failing or unlaunchable test never stops the others. Outcomes are
    /// stored by definition index, so the result keeps document order even
    /// when tests finish out of order.
    pub async fn run(&self, definitions: &[TestDefinition]) -> SuiteResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            tests = definitions.len(),
            jobs = self.jobs,
            backend = self.runner.backend().name(),
            "Starting test suite"
        );

        let mut slots: Vec<Option<Outcome>> = vec![None; definitions.len()];
        let mut completed = stream::iter(definitions.iter().enumerate())
            .map(|(index, definition)| async move { (index, self.run_one(definition).await) })
            .buffer_unordered(self.jobs);

        while let Some((index, outcome)) = completed.next().await {
            info!(
                test = %outcome.test_name,
                passed = outcome.passed,
                "Test finished"
            );
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<Outcome> = slots.into_iter().flatten().collect();
        let result = SuiteResult {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            run_id = %run_id,
            passed = result.passed_count(),
            failed = result.failed_count(),
            errored = result.errored_count(),
            success = result.overall_success(),
            "Test suite finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, passed: bool) -> Outcome {
        Outcome {
            test_name: name.to_string(),
            passed,
            trace: vec![],
            launch_error: None,
        }
    }

    #[test]
    fn test_overall_success_all_passed() {
        let result = SuiteResult::new(vec![outcome("a", true), outcome("b", true)]);
        assert!(result.overall_success());
        assert_eq!(result.passed_count(), 2);
        assert_eq!(result.failed_count(), 0);
    }

    #[test]
    fn test_single_failure_flips_success() {
        let mut result = SuiteResult::new(vec![
            outcome("a", true),
            outcome("b", true),
            outcome("c", true),
        ]);
        assert!(result.overall_success());
        for i in 0..result.outcomes.len() {
            result.outcomes[i].passed = false;
            assert!(!result.overall_success());
            result.outcomes[i].passed = true;
        }
    }

    #[test]
    fn test_empty_suite_is_not_success() {
        assert!(!SuiteResult::new(vec![]).overall_success());
    }

    #[test]
    fn test_counts_distinguish_errors() {
        let mut errored = outcome("c", false);
        errored.launch_error = Some("image missing".to_string());
        let result = SuiteResult::new(vec![outcome("a", true), outcome("b", false), errored]);

        assert_eq!(result.total(), 3);
        assert_eq!(result.passed_count(), 1);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.errored_count(), 1);
    }
}
