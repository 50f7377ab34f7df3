//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// depchain - incremental builds of git-hosted CMake dependency chains
///
/// Rebuilds only the projects whose upstream revision changed, plus
/// everything that depends on them.
#[derive(Parser, Debug)]
#[command(name = "depchain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Chain file path
    #[arg(short, long, global = true, env = "DEPCHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log line format, overrides `general.log_format`
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild stale projects and everything downstream of them
    Build(BuildArgs),

    /// Show the cached state of every project (no network access)
    Status(StatusArgs),

    /// Delete hash records so projects rebuild on the next run
    Invalidate(InvalidateArgs),

    /// Print the resolved processing order and dependency edges
    Plan(PlanArgs),
}

/// Where install destinations and hash records live
#[derive(Args, Debug, Clone, Default)]
pub struct RootArgs {
    /// Install root, overrides `general.install_root`
    #[arg(long, value_name = "DIR")]
    pub install_prefix: Option<PathBuf>,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Rebuild this project and its dependents unconditionally
    pub target: Option<String>,

    /// With TARGET: stop after the target instead of cascading; dependents
    /// lose their hash records and rebuild on the next full run
    #[arg(long, requires = "target")]
    pub only: bool,

    /// CMake generator, overrides `general.generator`
    #[arg(short, long)]
    pub generator: Option<String>,

    /// Build configuration, overrides `general.build_config`
    #[arg(long, value_name = "CONFIG")]
    pub build_config: Option<String>,

    /// Install prebuilt artifacts where projects publish them
    #[arg(long)]
    pub prefer_artifacts: bool,

    /// Continue with independent projects after a failure
    #[arg(short, long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub root: RootArgs,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub root: RootArgs,
}

/// Arguments for the invalidate command
#[derive(Args, Debug)]
pub struct InvalidateArgs {
    /// Projects to invalidate
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub projects: Vec<String>,

    /// Invalidate every project
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub root: RootArgs,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Format of tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse the `general.log_format` value; anything but "json" is text
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}
