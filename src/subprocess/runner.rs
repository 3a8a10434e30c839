use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::time::Instant;

use super::error::ProcessError;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl ProcessCommand {
    /// Shell-quoted rendering of the full command line, for logs and dry runs
    pub fn display(&self) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Success,
    Error(i32),
    Timeout,
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "success"),
            ExitStatus::Error(code) => write!(f, "exit code {}", code),
            ExitStatus::Timeout => write!(f, "timed out"),
            ExitStatus::Signal(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

pub type ProcessStreamItem = Result<String, ProcessError>;
pub type ProcessLineStream = Pin<Box<dyn Stream<Item = ProcessStreamItem> + Send>>;
pub type ProcessStatusFut = Pin<Box<dyn Future<Output = Result<ExitStatus, ProcessError>> + Send>>;

/// How long stdout may stay open after a timeout kill before it is cut off.
pub const TIMEOUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// A running process: its stdout as lines, and its eventual exit status.
///
/// Both halves must be driven together; the status future only resolves
/// once the child exits, which may require stdout to be drained first.
pub struct ProcessStream {
    pub stdout: ProcessLineStream,
    pub status: ProcessStatusFut,
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run_streaming(&self, command: ProcessCommand) -> Result<ProcessStream, ProcessError>;
}

/// Turn any async reader into a lazy stream of lines.
///
/// Lines lose their `\n` (and a preceding `\r`). Invalid UTF-8 is replaced
/// lossily. A trailing line without a newline is still yielded.
pub fn line_stream<R>(reader: R) -> ProcessLineStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    Box::pin(futures::stream::unfold(
        BufReader::new(reader),
        |mut reader| async move {
            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => None, // EOF
                Ok(_) => Some((Ok(normalize_line(buf)), reader)),
                Err(e) => Some((Err(ProcessError::Io(e)), reader)),
            }
        },
    ))
}

fn normalize_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    match String::from_utf8(buf) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Convert a std ExitStatus to our ExitStatus enum
    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());

        if !command.env.is_empty() {
            tracing::trace!("Extra environment variables: {:?}", command.env);
        }
        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
        if let Some(timeout) = command.timeout {
            tracing::trace!("Timeout: {:?}", timeout);
        }
    }

    /// Stdout is piped for line processing; stderr goes straight to the
    /// operator's terminal.
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);

        // Own process group, so a timeout also reaches grandchildren holding stdout
        #[cfg(unix)]
        cmd.process_group(0);

        cmd.args(&command.args);

        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }

    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(command.program.clone())
        } else {
            ProcessError::SpawnFailed {
                command: command.display(),
                source: error,
            }
        }
    }

    #[cfg(unix)]
    fn kill_process_group(child: &tokio::process::Child) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                tracing::debug!("Failed to kill process group {}: {}", pid, e);
            }
        }
    }

    #[cfg(not(unix))]
    fn kill_process_group(_child: &tokio::process::Child) {}

    fn create_status_future(
        mut child: tokio::process::Child,
        deadline: Option<Instant>,
        command_str: String,
    ) -> ProcessStatusFut {
        Box::pin(async move {
            let waited = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, child.wait()).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!("Subprocess timed out, killing: {}", command_str);
                        Self::kill_process_group(&child);
                        child.kill().await?;
                        return Ok(ExitStatus::Timeout);
                    }
                },
                None => child.wait().await,
            };

            let status = Self::parse_exit_status(waited?);
            match &status {
                ExitStatus::Success => {
                    tracing::debug!("Subprocess completed successfully: {}", command_str)
                }
                other => tracing::debug!("Subprocess finished with {}: {}", other, command_str),
            }
            Ok(status)
        })
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run_streaming(&self, command: ProcessCommand) -> Result<ProcessStream, ProcessError> {
        Self::log_command_start(&command);

        let mut child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::StdoutUnavailable(command.display()))?;

        let deadline = command.timeout.map(|timeout| Instant::now() + timeout);
        let stdout: ProcessLineStream = match deadline {
            // A descendant that left the process group could keep the pipe open
            Some(deadline) => Box::pin(
                line_stream(stdout)
                    .take_until(tokio::time::sleep_until(deadline + TIMEOUT_DRAIN_GRACE)),
            ),
            None => line_stream(stdout),
        };

        Ok(ProcessStream {
            stdout,
            status: Self::create_status_future(child, deadline, command.display()),
        })
    }
}

#[cfg(test)]
mod line_tests {
    use super::*;

    async fn collect(input: &'static [u8]) -> Vec<String> {
        line_stream(input)
            .map(|line| line.unwrap())
            .collect::<Vec<_>>()
            .await
    }

    #[tokio::test]
    async fn test_line_stream_strips_line_endings() {
        assert_eq!(collect(b"a\nb\r\n\nc\n").await, vec!["a", "b", "", "c"]);
    }

    #[tokio::test]
    async fn test_line_stream_keeps_unterminated_last_line() {
        assert_eq!(collect(b"first\nlast").await, vec!["first", "last"]);
    }

    #[tokio::test]
    async fn test_line_stream_does_not_trim_whitespace() {
        assert_eq!(collect(b"  Start MLFT \n").await, vec!["  Start MLFT "]);
    }

    #[tokio::test]
    async fn test_line_stream_replaces_invalid_utf8() {
        let lines = collect(b"ok\n\xff\xfe\n").await;
        assert_eq!(lines[0], "ok");
        assert!(lines[1].contains('\u{FFFD}'));
    }

    #[test]
    fn test_command_display_quotes_arguments() {
        let command = crate::subprocess::ProcessCommandBuilder::new("python")
            .args(["full_cut_mlft.py", "supremacy", "12", "results/with space"])
            .build();
        assert_eq!(
            command.display(),
            "python full_cut_mlft.py supremacy 12 'results/with space'"
        );
    }
}
