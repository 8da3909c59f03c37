//! Machine-readable JSON report.

use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::output::{write_report, OutputSink};
use crate::suite::SuiteResult;

/// Writes the serialized [`SuiteResult`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub const FILE_NAME: &'static str = "imagetest-report.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(result)?;
        write_report(self.name(), &self.path, &json)
    }
}
