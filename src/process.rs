//! Subprocess helpers shared by the git and cmake collaborators
//!
//! Long-running tools inherit the terminal so their diagnostics reach the
//! operator unmodified; short queries are captured and parsed.

use crate::error::{DepchainError, DepchainResult};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Render a program and its arguments for logs and error messages
pub fn describe<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line
}

/// Run a command with inherited stdio, failing on a non-zero exit
pub async fn run_inherited(mut command: Command, command_line: String) -> DepchainResult<()> {
    debug!("Executing: {}", command_line);

    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| DepchainError::command_failed(command_line.clone(), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(DepchainError::ToolInvocationFailed {
            command: command_line,
            code: status.code(),
        })
    }
}

/// Run a command and capture its output; the exit status is left to the caller
pub async fn run_captured(mut command: Command, command_line: &str) -> DepchainResult<Output> {
    debug!("Executing: {}", command_line);

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| DepchainError::command_failed(command_line, e))
}
