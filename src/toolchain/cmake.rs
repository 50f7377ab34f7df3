//! CMake implementation of [`BuildToolchain`]

use super::{BuildToolchain, ToolEnv};
use crate::error::DepchainResult;
use crate::process::{describe, run_inherited};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Drives `cmake` for configure and `cmake --build` for install
pub struct CmakeToolchain {
    program: String,
    build_config: String,
    install_target: String,
}

impl CmakeToolchain {
    pub fn new(build_config: impl Into<String>, install_target: impl Into<String>) -> Self {
        Self {
            program: "cmake".to_string(),
            build_config: build_config.into(),
            install_target: install_target.into(),
        }
    }

    /// Use a specific cmake executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments of the configure step
    fn configure_args(
        source_dir: &Path,
        install_prefix: &Path,
        generator: &str,
        options: &[String],
    ) -> Vec<String> {
        let mut args = vec![
            "-G".to_string(),
            generator.to_string(),
            format!("-DCMAKE_INSTALL_PREFIX={}", install_prefix.display()),
        ];
        args.extend(options.iter().cloned());
        args.push(source_dir.to_string_lossy().into_owned());
        args
    }

    /// Arguments of the build-and-install step
    fn install_args(&self) -> Vec<String> {
        vec![
            "--build".to_string(),
            ".".to_string(),
            "--config".to_string(),
            self.build_config.clone(),
            "--target".to_string(),
            self.install_target.clone(),
        ]
    }

    async fn run(&self, args: Vec<String>, cwd: &Path, env: &ToolEnv) -> DepchainResult<()> {
        let command_line = describe(&self.program, &args);
        let mut command = Command::new(&self.program);
        command.args(&args).current_dir(cwd).envs(env);
        run_inherited(command, command_line).await
    }
}

#[async_trait]
impl BuildToolchain for CmakeToolchain {
    async fn configure(
        &self,
        source_dir: &Path,
        binary_dir: &Path,
        install_prefix: &Path,
        generator: &str,
        options: &[String],
        env: &ToolEnv,
    ) -> DepchainResult<()> {
        let args = Self::configure_args(source_dir, install_prefix, generator, options);
        self.run(args, binary_dir, env).await
    }

    async fn install(&self, binary_dir: &Path, env: &ToolEnv) -> DepchainResult<()> {
        self.run(self.install_args(), binary_dir, env).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DepchainError;

    #[test]
    fn configure_args_keep_option_order() {
        let args = CmakeToolchain::configure_args(
            Path::new("/src/panda3d"),
            Path::new("/install/panda3d"),
            "Ninja",
            &["-Dbuild_minimal:BOOL=ON".to_string(), "-DFOO=1".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "-G",
                "Ninja",
                "-DCMAKE_INSTALL_PREFIX=/install/panda3d",
                "-Dbuild_minimal:BOOL=ON",
                "-DFOO=1",
                "/src/panda3d",
            ]
        );
    }

    #[test]
    fn install_args_use_config_and_target() {
        let cmake = CmakeToolchain::new("RelWithDebInfo", "INSTALL");
        assert_eq!(
            cmake.install_args(),
            vec!["--build", ".", "--config", "RelWithDebInfo", "--target", "INSTALL"]
        );
    }

    #[tokio::test]
    async fn missing_cmake_is_command_failed() {
        let dir = tempfile::TempDir::new().unwrap();
        let cmake = CmakeToolchain::new("Release", "install").with_program("depchain-no-such-cmake");
        let err = cmake.install(dir.path(), &ToolEnv::new()).await.unwrap_err();
        assert!(matches!(err, DepchainError::CommandFailed { .. }));
    }
}
