//! Execution backends: where a test command actually runs.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ExecutionError, RunResult};

/// Runs an argument vector somewhere and returns its captured text output.
///
/// A non-zero exit status of the command under test is not an error; only a
/// failure to run it at all is.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn execute(&self, args: &[String]) -> RunResult<String>;
}

/// Runs commands as local processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessBackend {
    timeout: Option<Duration>,
}

impl ProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Backend for ProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn execute(&self, args: &[String]) -> RunResult<String> {
        capture(args, self.timeout).await.map(|captured| captured.text)
    }
}

/// Runs each command in a fresh, auto-removed container:
/// `<docker> run --rm <image> <args...>`.
#[derive(Debug, Clone)]
pub struct DockerBackend {
    docker: String,
    image: String,
    timeout: Option<Duration>,
}

impl DockerBackend {
    /// Exit codes the docker client uses when the container itself could not
    /// run the command: daemon error, command not invocable, command not found.
    ///
    /// `docker run` passes the command's own exit status through, so a tested
    /// command that itself exits 126 or 127 is indistinguishable from a failed
    /// launch and is reported as one.
    pub const LAUNCH_FAILURE_CODES: [i32; 3] = [125, 126, 127];

    pub fn new(image: impl Into<String>) -> Self {
        Self {
            docker: "docker".to_string(),
            image: image.into(),
            timeout: None,
        }
    }

    /// Use a different docker client binary.
    pub fn with_docker(mut self, docker: impl Into<String>) -> Self {
        self.docker = docker.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Full argument vector for running `args` inside the image.
    pub fn container_args(&self, args: &[String]) -> Vec<String> {
        [
            self.docker.clone(),
            "run".to_string(),
            "--rm".to_string(),
            self.image.clone(),
        ]
        .into_iter()
        .chain(args.iter().cloned())
        .collect()
    }
}

#[async_trait]
impl Backend for DockerBackend {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn execute(&self, args: &[String]) -> RunResult<String> {
        let full = self.container_args(args);
        let captured = capture(&full, self.timeout).await?;
        match captured.code {
            Some(code) if Self::LAUNCH_FAILURE_CODES.contains(&code) => Err(ExecutionError::Launch {
                command: full.join(" "),
                cause: format!("exit code {}: {}", code, captured.text),
            }),
            _ => Ok(captured.text),
        }
    }
}

struct Captured {
    code: Option<i32>,
    text: String,
}

/// Spawn `args`, wait for it, and collect stdout followed by stderr.
async fn capture(args: &[String], timeout: Option<Duration>) -> RunResult<Captured> {
    let (exe, rest) = args
        .split_first()
        .ok_or_else(|| ExecutionError::launch(args, "empty command"))?;

    debug!(command = %args.join(" "), "Spawning command");

    let child = Command::new(exe)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ExecutionError::launch(args, e))?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ExecutionError::TimedOut {
                command: args.join(" "),
                secs: limit.as_secs(),
            })?,
        None => child.wait_with_output().await,
    }
    .map_err(|e| ExecutionError::launch(args, e))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let text = text.trim_end_matches(|c| c == '\n' || c == '\r').to_string();

    Ok(Captured {
        code: output.status.code(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_process_captures_stdout() {
        let out = ProcessBackend::new()
            .execute(&args(&["echo", "hello"]))
            .await
            .expect("echo runs");
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_process_captures_stderr() {
        let out = ProcessBackend::new()
            .execute(&args(&["sh", "-c", "echo out; echo err 1>&2"]))
            .await
            .expect("sh runs");
        assert_eq!(out, "out\nerr");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let out = ProcessBackend::new()
            .execute(&args(&["sh", "-c", "echo nope; exit 3"]))
            .await
            .expect("exit status is not a launch error");
        assert_eq!(out, "nope");
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let err = ProcessBackend::new()
            .execute(&args(&["imagetest-no-such-binary", "-v"]))
            .await
            .unwrap_err();
        match err {
            ExecutionError::Launch { command, .. } => {
                assert_eq!(command, "imagetest-no-such-binary -v")
            }
            other => panic!("expected Launch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_args_is_launch_error() {
        let err = ProcessBackend::new().execute(&[]).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = ProcessBackend::new()
            .with_timeout(Some(Duration::from_secs(1)))
            .execute(&args(&["sleep", "5"]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::TimedOut {
                command: "sleep 5".to_string(),
                secs: 1,
            }
        );
    }

    #[test]
    fn test_container_args() {
        let backend = DockerBackend::new("node:8.5").with_docker("podman");
        assert_eq!(
            backend.container_args(&args(&["node", "-v"])),
            args(&["podman", "run", "--rm", "node:8.5", "node", "-v"])
        );
    }

    #[tokio::test]
    async fn test_docker_backend_invokes_client() {
        // `echo` stands in for the docker client and prints what it was given.
        let out = DockerBackend::new("alpine:3")
            .with_docker("echo")
            .execute(&args(&["cat", "/etc/os-release"]))
            .await
            .expect("echo runs");
        assert_eq!(out, "run --rm alpine:3 cat /etc/os-release");
    }

    /// Writes a stand-in docker client that prints its first container
    /// argument and exits with the second.
    #[cfg(unix)]
    fn stub_client(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("docker-stub");
        std::fs::write(&path, "#!/bin/sh\necho \"$4\"\nexit \"$5\"\n").expect("write stub");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod stub");
        path.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_docker_launch_failure_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = DockerBackend::new("alpine:3").with_docker(stub_client(dir.path()));

        for code in DockerBackend::LAUNCH_FAILURE_CODES {
            let exit = code.to_string();
            let err = backend
                .execute(&args(&["no such image", exit.as_str()]))
                .await
                .unwrap_err();
            match err {
                ExecutionError::Launch { command, cause } => {
                    let expected = format!("run --rm alpine:3 no such image {}", code);
                    assert!(command.ends_with(&expected));
                    assert_eq!(cause, format!("exit code {}: no such image", code));
                }
                other => panic!("expected Launch for {}, got {:?}", code, other),
            }
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_docker_other_exit_codes_return_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = DockerBackend::new("alpine:3").with_docker(stub_client(dir.path()));

        for code in ["0", "1", "3", "124"] {
            let out = backend
                .execute(&args(&["v8.5.1", code]))
                .await
                .expect("command exit status is not a launch error");
            assert_eq!(out, "v8.5.1");
        }
    }

    #[tokio::test]
    async fn test_docker_missing_client() {
        let err = DockerBackend::new("alpine:3")
            .with_docker("imagetest-no-such-docker")
            .execute(&args(&["true"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Launch { .. }));
    }
}
