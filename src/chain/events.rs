//! Progress notifications emitted while the chain runs

use super::report::BuildOutcome;
use crate::error::DepchainError;

/// Lifecycle step of a project rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Cloning,
    CheckingOut,
    Configuring,
    Installing,
    Pruning,
    FetchingArtifact,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cloning => "cloning",
            Self::CheckingOut => "checking out",
            Self::Configuring => "configuring",
            Self::Installing => "building and installing",
            Self::Pruning => "pruning install tree",
            Self::FetchingArtifact => "fetching prebuilt artifact",
        }
    }
}

/// Something the orchestrator wants the operator to know
#[derive(Debug)]
pub enum ChainEvent<'a> {
    Started { project: &'a str, forced: bool },
    UpToDate { project: &'a str, hash: &'a str },
    Stale {
        project: &'a str,
        current: Option<&'a str>,
        cached: Option<&'a str>,
    },
    Step { project: &'a str, step: Step },
    CacheWriteFailed { project: &'a str, error: &'a DepchainError },
    Finished { project: &'a str, outcome: BuildOutcome },
    Failed { project: &'a str, error: &'a DepchainError },
    Blocked { project: &'a str, by: &'a str },
}

/// Receiver of [`ChainEvent`]s
pub type EventSink<'s> = dyn Fn(&ChainEvent<'_>) + 's;
