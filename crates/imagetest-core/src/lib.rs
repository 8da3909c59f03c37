//! imagetest core - declarative acceptance tests for runtime images
//!
//! Provides the pieces behind the `imagetest` binary:
//! - Loads a YAML test document into validated test definitions
//! - Runs each command through a backend (docker or local process)
//! - Evaluates output predicates into per-test outcomes
//! - Fans the aggregated suite result out to output sinks

pub mod backend;
pub mod config;
pub mod definition;
pub mod error;
pub mod fakes;
pub mod loader;
pub mod outcome;
pub mod output;
pub mod predicate;
pub mod runner;
pub mod suite;
pub mod tag;
pub mod telemetry;

// Re-export key types
pub use backend::{Backend, DockerBackend, ProcessBackend};
pub use config::RunConfig;
pub use definition::TestDefinition;
pub use error::{ExecutionError, LoadError, LoadResult, RunResult, SinkError};
pub use loader::{load_path, load_str, load_value};
pub use outcome::Outcome;
pub use output::{fan_out, OutputSink, SupportedOutputs, DEFAULT_OUTPUT};
pub use predicate::{Predicate, PredicateKind};
pub use runner::{ExecutionResult, ExecutionRunner};
pub use suite::{SuiteResult, SuiteRunner};
pub use tag::Tag;
pub use telemetry::init_tracing;
