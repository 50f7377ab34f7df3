//! depchain - incremental builds of git-hosted CMake dependency chains
//!
//! Clones, configures and installs an ordered set of projects, rebuilding
//! only what changed upstream and everything downstream of it.

pub mod artifact;
pub mod cache;
pub mod chain;
pub mod cli;
pub mod config;
pub mod disk;
pub mod error;
pub mod process;
pub mod toolchain;
pub mod ui;
pub mod vcs;

pub use error::{DepchainError, DepchainResult};
