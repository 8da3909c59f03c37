//! JUnit-style XML report.

use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::output::{escape_markup, write_report, OutputSink};
use crate::suite::SuiteResult;

/// Writes a JUnit-compatible `<testsuite>` document, so CI servers can pick it up.
#[derive(Debug, Clone)]
pub struct XmlOutput {
    path: PathBuf,
}

impl XmlOutput {
    pub const FILE_NAME: &'static str = "imagetest-report.xml";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for XmlOutput {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError> {
        write_report(self.name(), &self.path, &render_xml(result))
    }
}

/// Render the report as JUnit XML.
pub fn render_xml(result: &SuiteResult) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuite name=\"imagetest\" id=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" timestamp=\"{}\" time=\"{:.3}\">\n",
        result.run_id,
        result.total(),
        result.failed_count(),
        result.errored_count(),
        result.started_at.to_rfc3339(),
        result.duration_ms() as f64 / 1000.0
    ));

    for outcome in &result.outcomes {
        let name = escape_markup(&outcome.test_name);
        let trace = escape_markup(&outcome.trace.join("\n"));
        xml.push_str(&format!("  <testcase name=\"{}\">\n", name));
        if let Some(error) = &outcome.launch_error {
            xml.push_str(&format!(
                "    <error message=\"{}\">{}</error>\n",
                escape_markup(error),
                trace
            ));
        } else if !outcome.passed {
            xml.push_str(&format!(
                "    <failure message=\"output did not match\">{}</failure>\n",
                trace
            ));
        }
        xml.push_str(&format!("    <system-out>{}</system-out>\n", trace));
        xml.push_str("  </testcase>\n");
    }

    xml.push_str("</testsuite>\n");
    xml
}
