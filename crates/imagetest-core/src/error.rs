//! Error taxonomy for loading, running and reporting a suite.

use std::path::PathBuf;

/// Structural problems found while loading a test document.
///
/// Any of these aborts the whole load; a partial suite is never returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("the `{child}` tag is missing in tag \"{tag_path}\"")]
    MissingTag { tag_path: String, child: String },

    #[error("tag \"{tag_path}/{child}\" must be a sequence")]
    NotASequence { tag_path: String, child: String },

    #[error("tag \"{tag_path}\" must be a mapping")]
    NotAMapping { tag_path: String },

    #[error("tag \"{tag_path}/cmd\" has no command to run")]
    EmptyCommand { tag_path: String },

    #[error("tag \"{tag_path}/output\" has no predicates")]
    EmptyOutput { tag_path: String },

    #[error("predicate in tag \"{tag_path}\" is malformed: {reason}")]
    MalformedPredicate { tag_path: String, reason: String },

    #[error("unknown predicate kind `{kind}` (expected contains, startWith, endWith or equal)")]
    UnknownPredicateKind { kind: String },

    #[error("the `tests` tag has no tests")]
    NoTests,

    #[error("malformed yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// The backend could not run a command at all.
///
/// Distinct from a predicate mismatch: the command never produced output to check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("unable to run `{command}`: {cause}")]
    Launch { command: String, cause: String },

    #[error("`{command}` timed out after {secs} seconds")]
    TimedOut { command: String, secs: u64 },
}

impl ExecutionError {
    pub(crate) fn launch(args: &[String], cause: impl ToString) -> Self {
        Self::Launch {
            command: args.join(" "),
            cause: cause.to_string(),
        }
    }
}

/// Result type for a single command execution.
pub type RunResult<T> = std::result::Result<T, ExecutionError>;

/// An output sink failed to render a suite result.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{sink} output failed: {source}")]
    Io {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tag_display() {
        let err = LoadError::MissingTag {
            tag_path: "tests/test[1]".to_string(),
            child: "cmd".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`cmd`"));
        assert!(msg.contains("tests/test[1]"));
    }

    #[test]
    fn test_unknown_kind_display() {
        let err = LoadError::UnknownPredicateKind {
            kind: "matches".to_string(),
        };
        assert!(err.to_string().contains("`matches`"));
    }

    #[test]
    fn test_launch_error_joins_command() {
        let args = vec!["docker".to_string(), "run".to_string()];
        let err = ExecutionError::launch(&args, "No such file or directory");
        assert_eq!(
            err.to_string(),
            "unable to run `docker run`: No such file or directory"
        );
    }
}
