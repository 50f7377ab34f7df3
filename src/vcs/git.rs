//! `git` command line implementation of [`VersionControl`]

use super::{RefListing, VersionControl};
use crate::error::{DepchainError, DepchainResult};
use crate::process::{describe, run_captured, run_inherited};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Version control through the `git` executable on `PATH`
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Use `git` from `PATH`
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[String], cwd: Option<&Path>) -> (Command, String) {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        (command, describe(&self.program, args))
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_string()).collect()
}

#[async_trait]
impl VersionControl for GitCli {
    async fn list_refs(&self, url: &str) -> DepchainResult<RefListing> {
        let (command, command_line) = self.command(&owned(&["ls-remote", "--heads", "--tags", url]), None);
        let output = run_captured(command, &command_line)
            .await
            .map_err(|e| DepchainError::remote(url, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DepchainError::remote(url, stderr.trim()));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| DepchainError::remote(url, "ls-remote output is not UTF-8"))?;
        RefListing::parse(url, &stdout)
    }

    async fn clone_ref(
        &self,
        url: &str,
        reference: &str,
        depth: Option<u32>,
        dest: &Path,
    ) -> DepchainResult<()> {
        let mut args = owned(&["clone", "--branch", reference]);
        if let Some(depth) = depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        args.push(url.to_string());
        args.push(dest.to_string_lossy().into_owned());

        let (command, command_line) = self.command(&args, None);
        run_inherited(command, command_line).await
    }

    async fn clone_no_checkout(&self, url: &str, dest: &Path) -> DepchainResult<()> {
        let mut args = owned(&["clone", "--no-checkout", url]);
        args.push(dest.to_string_lossy().into_owned());

        let (command, command_line) = self.command(&args, None);
        run_inherited(command, command_line).await
    }

    async fn checkout(&self, dir: &Path, revision: &str) -> DepchainResult<()> {
        let (command, command_line) = self.command(&owned(&["checkout", revision]), Some(dir));
        run_inherited(command, command_line).await
    }

    async fn head(&self, dir: &Path) -> DepchainResult<String> {
        let (command, command_line) = self.command(&owned(&["rev-parse", "HEAD"]), Some(dir));
        let output = run_captured(command, &command_line).await?;

        if !output.status.success() {
            eprint!("{}", String::from_utf8_lossy(&output.stderr));
            return Err(DepchainError::ToolInvocationFailed {
                command: command_line,
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
