//! Projects of a build chain

use crate::artifact::ArtifactSpec;
use crate::config::ProjectConfig;
use crate::toolchain::PrunePolicy;
use crate::vcs::VersionSelector;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Repository name of a git URL: the last path segment without `.git`.
///
/// Works for `https://host/org/name.git`, `git@host:org/name.git` and local
/// paths.
pub fn identity_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':', '\\']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// One unit of the chain
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    identity: String,
    remote_url: String,
    selector: VersionSelector,
    install_destination: PathBuf,
    options: Vec<String>,
    export_env: Option<String>,
    prune: Option<PrunePolicy>,
    artifact: Option<ArtifactSpec>,
}

impl Project {
    /// Build a project from its configuration entry.
    ///
    /// Returns the reason when the entry is unusable.
    pub fn from_config(config: &ProjectConfig, install_root: &Path) -> Result<Self, String> {
        if config.url.trim().is_empty() {
            return Err("project is missing `url`".to_string());
        }

        let identity = match &config.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            Some(_) => return Err(format!("empty `name` for {}", config.url)),
            None => identity_from_url(&config.url)
                .ok_or_else(|| format!("cannot derive a project name from {}", config.url))?,
        };

        if identity.contains(['/', '\\']) {
            return Err(format!("project name {} must not contain path separators", identity));
        }

        let selector = match (&config.branch, &config.commit) {
            (Some(_), Some(_)) => {
                return Err(format!("{}: `branch` and `commit` are mutually exclusive", identity))
            }
            (_, Some(commit)) if commit.trim().is_empty() => {
                return Err(format!("{}: empty `commit`", identity))
            }
            (Some(branch), _) if branch.trim().is_empty() => {
                return Err(format!("{}: empty `branch`", identity))
            }
            (Some(branch), None) => VersionSelector::Ref(branch.trim().to_string()),
            (None, Some(commit)) => VersionSelector::Commit(commit.trim().to_ascii_lowercase()),
            (None, None) => VersionSelector::default(),
        };

        Ok(Self {
            install_destination: install_root.join(&identity),
            identity,
            remote_url: config.url.trim().to_string(),
            selector,
            options: config.options.clone(),
            export_env: config.export_env.clone(),
            prune: config.prune,
            artifact: config.artifact.clone(),
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn selector(&self) -> &VersionSelector {
        &self.selector
    }

    pub fn install_destination(&self) -> &Path {
        &self.install_destination
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn export_env(&self) -> Option<&str> {
        self.export_env.as_deref()
    }

    pub fn prune(&self) -> Option<PrunePolicy> {
        self.prune
    }

    pub fn artifact(&self) -> Option<&ArtifactSpec> {
        self.artifact.as_ref()
    }

    /// Follow a branch or tag; clears any pinned commit
    pub fn set_ref(&mut self, reference: impl Into<String>) {
        self.selector = VersionSelector::Ref(reference.into());
    }

    /// Pin a commit; clears any branch or tag
    pub fn pin_commit(&mut self, commit: impl Into<String>) {
        self.selector = VersionSelector::Commit(commit.into());
    }
}
