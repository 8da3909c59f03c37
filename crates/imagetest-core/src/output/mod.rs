//! Output sinks: render a finished suite result somewhere.
//!
//! Sinks are picked by name from a selector such as `xml|html`:
//!
//! - [`plain`] - `std`: plain text on stdout (default, always available)
//! - [`xml`] - JUnit-style report file
//! - [`html`] - HTML report file
//! - [`json`] - serialized [`SuiteResult`] file

pub mod html;
pub mod json;
pub mod plain;
pub mod xml;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::SinkError;
use crate::suite::SuiteResult;

pub use self::html::HtmlOutput;
pub use self::json::JsonOutput;
pub use self::plain::StdOutput;
pub use self::xml::XmlOutput;

/// Consumer of a finished suite result.
///
/// Sinks only get a shared reference; they cannot alter the result other
/// sinks see.
pub trait OutputSink: Send + Sync {
    /// Selector name of this sink.
    fn name(&self) -> &'static str;

    fn render(&self, result: &SuiteResult) -> Result<(), SinkError>;
}

/// Selector name of the sink used when nothing recognizable was requested.
pub const DEFAULT_OUTPUT: &str = "std";

/// Static mapping from selector names to sinks.
#[derive(Debug, Clone)]
pub struct SupportedOutputs {
    report_dir: PathBuf,
}

impl SupportedOutputs {
    /// Recognized selector names.
    pub const NAMES: [&'static str; 4] = ["std", "xml", "html", "json"];

    /// File-based sinks write their reports into `report_dir`.
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// True if any of `names` is a recognized sink.
    pub fn supports(&self, names: &[&str]) -> bool {
        names.iter().any(|name| Self::NAMES.contains(name))
    }

    /// Sinks requested by `selector` (names separated by `|` or `,`).
    ///
    /// Each recognized name yields its sink once, in selector order; unknown
    /// names are skipped. When nothing is recognized the default sink is
    /// returned alone.
    pub fn available_for(&self, selector: &str) -> Vec<Box<dyn OutputSink>> {
        let names = parse_selector(selector);
        if !self.supports(&names) {
            if !selector.trim().is_empty() {
                warn!(selector, "No supported output requested, using default");
            }
            return vec![Box::new(StdOutput::new())];
        }

        let mut seen = HashSet::new();
        names
            .into_iter()
            .filter(|name| seen.insert(*name))
            .filter_map(|name| {
                let sink = self.sink_for(name);
                if sink.is_none() {
                    warn!(output = name, "Ignoring unsupported output");
                }
                sink
            })
            .collect()
    }

    fn sink_for(&self, name: &str) -> Option<Box<dyn OutputSink>> {
        let dir = &self.report_dir;
        match name {
            "std" => Some(Box::new(StdOutput::new())),
            "xml" => Some(Box::new(XmlOutput::new(dir.join(XmlOutput::FILE_NAME)))),
            "html" => Some(Box::new(HtmlOutput::new(dir.join(HtmlOutput::FILE_NAME)))),
            "json" => Some(Box::new(JsonOutput::new(dir.join(JsonOutput::FILE_NAME)))),
            _ => None,
        }
    }
}

impl Default for SupportedOutputs {
    fn default() -> Self {
        Self::new(".")
    }
}

fn parse_selector(selector: &str) -> Vec<&str> {
    selector
        .split(['|', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Hand `result` to every sink exactly once.
///
/// A failing sink does not stop the rest; all failures are returned.
pub fn fan_out(sinks: &[Box<dyn OutputSink>], result: &SuiteResult) -> Vec<SinkError> {
    sinks
        .iter()
        .filter_map(|sink| match sink.render(result) {
            Ok(()) => None,
            Err(e) => {
                warn!(output = sink.name(), error = %e, "Output failed");
                Some(e)
            }
        })
        .collect()
}

/// Escape text for XML and HTML bodies and attributes.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Write a rendered report file for `sink`.
pub(crate) fn write_report(
    sink: &'static str,
    path: &Path,
    contents: &str,
) -> Result<(), SinkError> {
    std::fs::write(path, contents).map_err(|source| SinkError::Io { sink, source })
}
