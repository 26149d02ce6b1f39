//! External program invocation.

use std::fmt;
use std::process::{ExitStatus, Stdio};

use rec_common::error::{RecError, RecResult};

/// A program and its arguments, exactly as they will be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// How a program exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
}

impl ToolExit {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            success: code == 0,
        }
    }
}

impl From<ExitStatus> for ToolExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("termination by signal"),
        }
    }
}

/// Output of a program run with stdout and stderr collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit: ToolExit,
    /// stdout followed by stderr, lossily decoded.
    pub text: String,
}

/// Seam between the capture flow and the external programs it drives.
#[async_trait::async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run to completion with output collected. A non-zero exit is reported
    /// in the result, not as an error; only failing to launch is an error.
    async fn capture(&self, invocation: &Invocation) -> RecResult<CapturedOutput>;

    /// Run attached to the current terminal and wait for it to exit.
    async fn run_attached(&self, invocation: &Invocation) -> RecResult<ToolExit>;
}

/// Runs programs as child processes of rec.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ToolRunner for SystemRunner {
    async fn capture(&self, invocation: &Invocation) -> RecResult<CapturedOutput> {
        tracing::debug!(command = %invocation, "Running");
        let output = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| launch_error(invocation, e))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CapturedOutput {
            exit: output.status.into(),
            text,
        })
    }

    async fn run_attached(&self, invocation: &Invocation) -> RecResult<ToolExit> {
        tracing::debug!(command = %invocation, "Running attached");
        let mut child = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| launch_error(invocation, e))?;

        tracing::info!(pid = child.id(), "Recorder started, press q to stop");

        // Ctrl+C reaches the child too; keep waiting so it can finish the file.
        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.map_err(|e| {
                        RecError::subprocess(format!("Failed waiting for {}: {e}", invocation.program))
                    })?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, waiting for recorder to finalize output");
                }
            }
        };
        Ok(status.into())
    }
}

fn launch_error(invocation: &Invocation, err: std::io::Error) -> RecError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RecError::subprocess(format!("{} not found on PATH", invocation.program))
    } else {
        RecError::subprocess(format!("Failed to start `{invocation}`: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display_quotes_empty_and_spaced_args() {
        let inv = Invocation::new(
            "ffmpeg",
            ["-f", "avfoundation", "-list_devices", "true", "-i", ""],
        );
        assert_eq!(
            inv.to_string(),
            "ffmpeg -f avfoundation -list_devices true -i \"\""
        );
        let spaced = Invocation::new("ffmpeg", ["out dir/a.mkv"]);
        assert_eq!(spaced.to_string(), "ffmpeg \"out dir/a.mkv\"");
    }

    #[test]
    fn test_tool_exit_display() {
        assert_eq!(ToolExit::from_code(1).to_string(), "exit status 1");
        assert!(ToolExit::from_code(0).success);
        let signalled = ToolExit {
            code: None,
            success: false,
        };
        assert_eq!(signalled.to_string(), "termination by signal");
    }

    #[tokio::test]
    async fn test_missing_program_is_subprocess_error() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("rec-definitely-missing-binary", ["-version"]);
        let err = runner.capture(&inv).await.unwrap_err();
        assert!(matches!(err, RecError::Subprocess { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_collects_output_despite_failure_exit() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("sh", ["-c", "echo listed; echo diag 1>&2; exit 1"]);
        let out = runner.capture(&inv).await.unwrap();
        assert_eq!(out.exit, ToolExit::from_code(1));
        assert!(out.text.contains("listed"));
        assert!(out.text.contains("diag"));
    }
}
