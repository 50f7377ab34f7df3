//! Results of one orchestrator run

use crate::error::{DepchainError, DepchainResult};
use serde::Serialize;
use std::fmt;

/// What happened to a project that was processed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildOutcome {
    SkippedCached,
    RebuiltFromSource,
    RebuiltFromArtifact,
}

impl BuildOutcome {
    /// Whether the install output changed, which forces every dependent
    pub fn is_rebuild(self) -> bool {
        !matches!(self, Self::SkippedCached)
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SkippedCached => "up to date",
            Self::RebuiltFromSource => "built",
            Self::RebuiltFromArtifact => "installed from artifact",
        };
        f.write_str(name)
    }
}

/// Final state of one project in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProjectStatus {
    Done { outcome: BuildOutcome },
    Failed { error: String },
    Blocked { by: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: String,
    #[serde(flatten)]
    pub status: ProjectStatus,
}

/// Per-project results in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    entries: Vec<ProjectReport>,
}

impl RunReport {
    pub(crate) fn push(&mut self, project: &str, status: ProjectStatus) {
        self.entries.push(ProjectReport {
            project: project.to_string(),
            status,
        });
    }

    pub fn entries(&self) -> &[ProjectReport] {
        &self.entries
    }

    /// Outcome of a successfully processed project
    pub fn outcome(&self, project: &str) -> Option<BuildOutcome> {
        self.entries.iter().find(|e| e.project == project).and_then(|e| match e.status {
            ProjectStatus::Done { outcome } => Some(outcome),
            _ => None,
        })
    }

    /// Whether any project was rebuilt in this run
    pub fn any_rebuilt(&self) -> bool {
        self.rebuilt().next().is_some()
    }

    /// Projects whose install output changed
    pub fn rebuilt(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e.status {
            ProjectStatus::Done { outcome } if outcome.is_rebuild() => Some(e.project.as_str()),
            _ => None,
        })
    }

    /// Projects that failed
    pub fn failed(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, ProjectStatus::Failed { .. }))
            .map(|e| e.project.clone())
            .collect()
    }

    /// `Err(ChainFailed)` if any project failed
    pub fn into_result(self) -> DepchainResult<Self> {
        let failed = self.failed();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(DepchainError::ChainFailed { failed })
        }
    }
}
