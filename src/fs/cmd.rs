//! Subprocess execution with captured output

use crate::error::{Error, Result};
use std::io::{IsTerminal, Read};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of [`exec_cmd`].
#[derive(Debug, Clone)]
pub struct CompletedCommand {
    pub args: Vec<String>,
    /// Exit code, `-1` when the process was killed by a signal.
    pub returncode: i32,
    pub time_taken: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl CompletedCommand {
    pub fn success(&self) -> bool {
        self.returncode == 0
    }

    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.stderr.lines().collect()
    }

    /// Turn a non-zero exit code into [`Error::CommandFailed`].
    pub fn check(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                cmd: shell_words::join(&self.args),
                code: Some(self.returncode),
            })
        }
    }
}

/// Run a command line, splitting it shell-style (`"ls -l 'my dir'"`).
///
/// A non-zero exit status is not an error; inspect `returncode` or call
/// [`CompletedCommand::check`].
pub fn exec_cmd(cmd: &str) -> Result<CompletedCommand> {
    let args = shell_words::split(cmd)
        .map_err(|e| Error::invalid(format!("cannot parse command '{}': {}", cmd, e)))?;
    exec_args(&args)
}

/// Run a command given as an argument vector.
pub fn exec_args<S: AsRef<str>>(args: &[S]) -> Result<CompletedCommand> {
    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| Error::invalid("empty command"))?;

    tracing::debug!(cmd = %shell_words::join(&args), "running command");
    let start = Instant::now();
    let output = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .output()?;
    let time_taken = start.elapsed();

    Ok(CompletedCommand {
        returncode: output.status.code().unwrap_or(-1),
        time_taken,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        args,
    })
}

/// Read everything piped into stdin. Returns an empty string when stdin is a
/// terminal.
pub fn read_piped() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(buf)
}
