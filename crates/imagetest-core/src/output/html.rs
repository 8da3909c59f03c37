//! HTML report.

use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::output::{escape_markup, write_report, OutputSink};
use crate::suite::SuiteResult;

#[derive(Debug, Clone)]
pub struct HtmlOutput {
    path: PathBuf,
}

impl HtmlOutput {
    pub const FILE_NAME: &'static str = "imagetest-report.html";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for HtmlOutput {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError> {
        write_report(self.name(), &self.path, &render_html(result))
    }
}

/// Render the report as a standalone HTML page with one table row per test.
pub fn render_html(result: &SuiteResult) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>imagetest report</title>\n</head>\n<body>\n",
    );
    html.push_str(&format!(
        "<h1>imagetest report {}</h1>\n<p>{}/{} tests passed, {} failed, {} could not run</p>\n",
        result.run_id,
        result.passed_count(),
        result.total(),
        result.failed_count(),
        result.errored_count()
    ));
    html.push_str("<table>\n<tr><th>Test</th><th>Status</th><th>Details</th></tr>\n");

    for outcome in &result.outcomes {
        let status = if outcome.passed {
            "passed"
        } else if outcome.is_error() {
            "error"
        } else {
            "failed"
        };
        html.push_str(&format!(
            "<tr class=\"{status}\"><td>{}</td><td>{status}</td><td><pre>{}</pre></td></tr>\n",
            escape_markup(&outcome.test_name),
            escape_markup(&outcome.trace.join("\n")),
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_render_html() {
        let now = Utc::now();
        let result = SuiteResult {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            outcomes: vec![
                Outcome {
                    test_name: "<script>".to_string(),
                    passed: true,
                    trace: vec!["PASSED".to_string()],
                    launch_error: None,
                },
                Outcome {
                    test_name: "node".to_string(),
                    passed: false,
                    trace: vec!["ERROR".to_string()],
                    launch_error: Some("image missing".to_string()),
                },
            ],
        };

        let html = render_html(&result);
        assert!(html.contains("<td>&lt;script&gt;</td><td>passed</td>"));
        assert!(html.contains("<tr class=\"error\"><td>node</td>"));
        assert!(html.contains("1/2 tests passed, 0 failed, 1 could not run"));
        assert!(!html.contains("<script>"));
    }
}
