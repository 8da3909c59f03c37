//! Plain-text report on stdout.

use std::io::Write;

use crate::error::SinkError;
use crate::output::OutputSink;
use crate::suite::SuiteResult;

/// Default sink: one block per test followed by a summary, on stdout.
#[derive(Debug, Clone, Default)]
pub struct StdOutput;

impl StdOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for StdOutput {
    fn name(&self) -> &'static str {
        "std"
    }

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError> {
        let text = render_plain(result);
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|source| SinkError::Io {
                sink: self.name(),
                source,
            })
    }
}

/// Render the plain-text report.
pub fn render_plain(result: &SuiteResult) -> String {
    let mut out = String::new();

    for outcome in &result.outcomes {
        out.push_str(&format!("test {:?}\n", outcome.test_name));
        for line in &outcome.trace {
            out.push_str(&format!("  {}\n", line));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Summary: {}/{} tests passed, {} failed, {} could not run ({}ms)\n",
        result.passed_count(),
        result.total(),
        result.failed_count(),
        result.errored_count(),
        result.duration_ms()
    ));
    out.push_str(&format!(
        "Status: {}\n",
        if result.overall_success() {
            "✓ PASSED"
        } else {
            "✗ FAILED"
        }
    ));
    out
}
