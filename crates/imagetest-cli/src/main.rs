//! imagetest - acceptance tests for runtime images
//!
//! Reads a YAML document of tests, runs each command inside the given image
//! (or as a local process when no image is given), checks the output against
//! the declared predicates, and reports through the selected outputs.
//!
//! ## Exit status
//!
//! - `0`: every test passed
//! - `1`: tests ran and at least one predicate did not match
//! - `2`: the test document could not be loaded
//! - `3`: at least one command could not be launched
//! - `4`: an output failed to render

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use imagetest_core::{
    fan_out, init_tracing, load_path, LoadError, RunConfig, SuiteResult, SuiteRunner,
    DEFAULT_OUTPUT,
};

#[derive(Parser, Debug)]
#[command(name = "imagetest")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Declarative acceptance tests for runtime images", long_about = None)]
struct Cli {
    /// YAML document with the tests to run
    #[arg(short, long, env = "IMAGETEST_FILE")]
    file: PathBuf,

    /// Image to run the tests in (commands run locally when omitted)
    #[arg(short, long, env = "IMAGETEST_IMAGE")]
    image: Option<String>,

    /// Outputs to report to, separated by `|` or `,` (std, xml, html, json)
    #[arg(short, long, env = "IMAGETEST_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Directory for file-based reports
    #[arg(long, env = "IMAGETEST_REPORT_DIR", default_value = ".")]
    report_dir: PathBuf,

    /// Docker client binary
    #[arg(long, env = "IMAGETEST_DOCKER", default_value = "docker")]
    docker: String,

    /// Per-command timeout in seconds (0 = none)
    #[arg(long, default_value = "0")]
    timeout_secs: u64,

    /// Number of tests to run at once
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Skip the version banner
    #[arg(long)]
    no_banner: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            image: self.image.clone(),
            docker_bin: self.docker.clone(),
            timeout_secs: self.timeout_secs,
            jobs: self.jobs,
            outputs: self.output.clone(),
            report_dir: self.report_dir.clone(),
        }
    }
}

/// Process exit status, see the crate docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Passed,
    Failed,
    LoadFailed,
    LaunchFailed,
    OutputFailed,
}

impl Status {
    fn of(result: &SuiteResult, sink_errors: usize) -> Self {
        if result.errored_count() > 0 {
            Status::LaunchFailed
        } else if !result.overall_success() {
            Status::Failed
        } else if sink_errors > 0 {
            Status::OutputFailed
        } else {
            Status::Passed
        }
    }

    fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<LoadError>().is_some() {
            Status::LoadFailed
        } else {
            Status::LaunchFailed
        }
    }

    fn code(self) -> u8 {
        match self {
            Status::Passed => 0,
            Status::Failed => 1,
            Status::LoadFailed => 2,
            Status::LaunchFailed => 3,
            Status::OutputFailed => 4,
        }
    }
}

fn banner() -> String {
    format!(
        concat!(
            "\nDocker image testing tool (v{})\n",
            "                  ##         .\n",
            "            ## ## ##        ==\n",
            "         ## ## ## ##       ===\n",
            "     /\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"___/ ===\n",
            "~~~ {{~~ ~~~~ ~~~ ~~~~ ~~ ~ /===- ~~~\n",
            "     \\______ o          __/\n",
            "      \\    \\        __/\n",
            "       \\____\\______/\n",
        ),
        env!("CARGO_PKG_VERSION")
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    if !cli.no_banner {
        println!("{}", banner());
    }

    let status = match run(&cli).await {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            Status::for_error(&e)
        }
    };
    ExitCode::from(status.code())
}

async fn run(cli: &Cli) -> Result<Status> {
    let config = cli.run_config();

    let definitions = load_path(&cli.file)
        .with_context(|| format!("Failed to load tests from {}", cli.file.display()))?;
    info!(file = %cli.file.display(), tests = definitions.len(), "Loaded tests");

    let result = SuiteRunner::new(config.backend())
        .with_jobs(config.jobs)
        .run(&definitions)
        .await;

    let sinks = config.sinks();
    let errors = fan_out(&sinks, &result);
    for error in &errors {
        eprintln!("Output error: {}", error);
    }

    Ok(Status::of(&result, errors.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use imagetest_core::Outcome;

    fn suite(outcomes: &[(&str, bool, bool)]) -> SuiteResult {
        SuiteResult::new(
            outcomes
                .iter()
                .map(|(name, passed, errored)| Outcome {
                    test_name: name.to_string(),
                    passed: *passed,
                    trace: vec![],
                    launch_error: errored.then(|| "image missing".to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["imagetest", "-f", "tests.yml"]).unwrap();
        let config = cli.run_config();
        assert_eq!(config.image, None);
        assert_eq!(config.outputs, "std");
        assert_eq!(config.jobs, 1);
        assert_eq!(config.docker_bin, "docker");
    }

    #[test]
    fn test_cli_full() {
        let cli = Cli::try_parse_from([
            "imagetest",
            "--file",
            "tests.yml",
            "-i",
            "node:8.5",
            "-o",
            "xml|html",
            "--timeout-secs",
            "30",
            "-j",
            "4",
        ])
        .unwrap();
        let config = cli.run_config();
        assert_eq!(config.image.as_deref(), Some("node:8.5"));
        assert_eq!(config.outputs, "xml|html");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.jobs, 4);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::of(&suite(&[("a", true, false)]), 0), Status::Passed);
        assert_eq!(
            Status::of(&suite(&[("a", true, false), ("b", false, false)]), 0),
            Status::Failed
        );
        assert_eq!(
            Status::of(&suite(&[("a", false, false), ("b", false, true)]), 0),
            Status::LaunchFailed
        );
        assert_eq!(Status::of(&suite(&[("a", true, false)]), 1), Status::OutputFailed);
        assert_eq!(Status::of(&suite(&[]), 0), Status::Failed);
    }

    #[test]
    fn test_load_error_status() {
        let err = anyhow::Error::new(LoadError::NoTests).context("Failed to load tests");
        assert_eq!(Status::for_error(&err), Status::LoadFailed);
        assert_eq!(Status::for_error(&err).code(), 2);
    }

    #[test]
    fn test_banner_has_version() {
        assert!(banner().contains(env!("CARGO_PKG_VERSION")));
    }
}
