//! Run configuration: which backend to use, how to report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, DockerBackend, ProcessBackend};
use crate::output::{OutputSink, SupportedOutputs, DEFAULT_OUTPUT};

/// Settings for one suite run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Image to run tests in. Without one, commands run as local processes.
    pub image: Option<String>,

    /// Docker client binary.
    pub docker_bin: String,

    /// Per-command timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,

    /// Maximum number of tests running at once.
    pub jobs: usize,

    /// Output selector, e.g. `std` or `xml|html`.
    pub outputs: String,

    /// Directory file-based outputs write into.
    pub report_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image: None,
            docker_bin: "docker".to_string(),
            timeout_secs: 0,
            jobs: 1,
            outputs: DEFAULT_OUTPUT.to_string(),
            report_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Docker backend when an image is configured, local processes otherwise.
    pub fn backend(&self) -> Arc<dyn Backend> {
        match &self.image {
            Some(image) => Arc::new(
                DockerBackend::new(image.clone())
                    .with_docker(self.docker_bin.clone())
                    .with_timeout(self.timeout()),
            ),
            None => Arc::new(ProcessBackend::new().with_timeout(self.timeout())),
        }
    }

    /// Sinks selected by `outputs`.
    pub fn sinks(&self) -> Vec<Box<dyn OutputSink>> {
        SupportedOutputs::new(self.report_dir.clone()).available_for(&self.outputs)
    }
}
