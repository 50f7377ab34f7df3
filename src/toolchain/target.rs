//! Configure/install lifecycle of one source tree

use super::{BuildToolchain, ToolEnv};
use crate::disk::remove_tree;
use crate::error::{DepchainError, DepchainResult};
use std::fmt;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Lifecycle of a [`BuildTarget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Uninitialized,
    Configured,
    Installed,
}

impl TargetState {
    fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configured => "configured",
            Self::Installed => "installed",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source tree built into an install destination
pub struct BuildTarget<'a> {
    toolchain: &'a dyn BuildToolchain,
    project: String,
    source_dir: PathBuf,
    binary_dir: PathBuf,
    install_prefix: PathBuf,
    state: TargetState,
}

impl<'a> BuildTarget<'a> {
    pub fn new(
        toolchain: &'a dyn BuildToolchain,
        project: impl Into<String>,
        source_dir: PathBuf,
        binary_dir: PathBuf,
        install_prefix: PathBuf,
    ) -> Self {
        Self {
            toolchain,
            project: project.into(),
            source_dir,
            binary_dir,
            install_prefix,
            state: TargetState::Uninitialized,
        }
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    /// Create the binary directory if needed and run the configure step
    pub async fn configure(
        &mut self,
        generator: &str,
        options: &[String],
        env: &ToolEnv,
    ) -> DepchainResult<()> {
        fs::create_dir_all(&self.binary_dir).await.map_err(|e| {
            DepchainError::io(
                format!("creating build directory {}", self.binary_dir.display()),
                e,
            )
        })?;

        debug!("Source directory: {}", self.source_dir.display());
        debug!("Binary directory: {}", self.binary_dir.display());

        self.toolchain
            .configure(
                &self.source_dir,
                &self.binary_dir,
                &self.install_prefix,
                generator,
                options,
                env,
            )
            .await?;

        self.state = TargetState::Configured;
        Ok(())
    }

    /// Build and install; only valid once configured
    pub async fn install(&mut self, env: &ToolEnv) -> DepchainResult<()> {
        if self.state != TargetState::Configured {
            return Err(DepchainError::InvalidState {
                project: self.project.clone(),
                expected: TargetState::Configured.name(),
                actual: self.state.name(),
            });
        }

        self.toolchain.install(&self.binary_dir, env).await?;

        info!("Installed {} into {}", self.project, self.install_prefix.display());
        self.state = TargetState::Installed;
        Ok(())
    }

    /// Remove the whole install destination so no file from a previous
    /// revision survives
    pub async fn clean_install(&mut self) -> DepchainResult<()> {
        remove_tree(&self.install_prefix).await?;
        self.state = TargetState::Uninitialized;
        Ok(())
    }
}
