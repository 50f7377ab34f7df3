//! Staleness detection and rebuild cascade
//!
//! Every selected project, in dependency order:
//!
//! | step | forced | not forced |
//! |------|--------|------------|
//! | compare hashes | skipped | pinned commit: prefix match, no network; ref: working copy or remote |
//! | fresh | - | `SkippedCached`, nothing touched |
//! | stale | invalidate own and descendant records, rebuild, write new hash, force all descendants | same |
//!
//! Descendant records are deleted before the rebuild starts, so the cascade
//! survives an aborted run: whatever happens afterwards, the next run finds
//! those records missing and rebuilds them.
//!
//! A failed hash write is reported but does not fail the project: the next
//! run simply sees a missing record and rebuilds.

use super::context::RunContext;
use super::events::{ChainEvent, EventSink, Step};
use super::graph::ProjectGraph;
use super::project::Project;
use super::report::{BuildOutcome, ProjectStatus, RunReport};
use crate::artifact::{ArtifactSource, ArtifactSpec};
use crate::cache::HashCache;
use crate::disk::remove_tree;
use crate::error::DepchainResult;
use crate::toolchain::{BuildTarget, BuildToolchain, ToolEnv};
use crate::vcs::{resolve_remote, Checkout, VersionControl, VersionSelector};
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Directory under the source root holding per-project build trees
pub const BUILD_DIR_NAME: &str = "_build";

/// Which part of the chain to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Every project, normal staleness checks
    All,
    /// The target and its ancestors; the target is rebuilt and nothing
    /// downstream runs, but downstream records are dropped so the next
    /// full run rebuilds them
    Only(String),
    /// Every project; the target and everything downstream of it are rebuilt
    Cascade(String),
}

enum Freshness {
    Fresh(String),
    Stale {
        current: Option<String>,
        cached: Option<String>,
    },
}

/// Drives one run over a [`ProjectGraph`] with injected collaborators
pub struct Orchestrator<'a> {
    ctx: &'a RunContext,
    graph: &'a ProjectGraph,
    vcs: &'a dyn VersionControl,
    toolchain: &'a dyn BuildToolchain,
    artifacts: &'a dyn ArtifactSource,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: &'a RunContext,
        graph: &'a ProjectGraph,
        vcs: &'a dyn VersionControl,
        toolchain: &'a dyn BuildToolchain,
        artifacts: &'a dyn ArtifactSource,
    ) -> Self {
        Self {
            ctx,
            graph,
            vcs,
            toolchain,
            artifacts,
        }
    }

    /// Projects a run would visit, in order, with the initially forced set
    pub fn plan(&self, mode: &RunMode) -> DepchainResult<(Vec<NodeIndex>, HashSet<NodeIndex>)> {
        match mode {
            RunMode::All => Ok((self.graph.order().to_vec(), HashSet::new())),
            RunMode::Only(target) => {
                let target = self.graph.index_of(target)?;
                let mut selected = self.graph.ancestors(target);
                selected.insert(target);
                let order = self
                    .graph
                    .order()
                    .iter()
                    .copied()
                    .filter(|idx| selected.contains(idx))
                    .collect();
                Ok((order, HashSet::from([target])))
            }
            RunMode::Cascade(target) => {
                let target = self.graph.index_of(target)?;
                let mut forced = self.graph.descendants(target);
                forced.insert(target);
                Ok((self.graph.order().to_vec(), forced))
            }
        }
    }

    /// Process the selected projects.
    ///
    /// Without `keep_going` the first failure aborts the run and is returned
    /// as is. With it, dependents of a failed project are blocked, independent
    /// projects still run, and failures are recorded in the report; call
    /// [`RunReport::into_result`] to turn them into an error.
    pub async fn run(&self, mode: &RunMode, on_event: &EventSink<'_>) -> DepchainResult<RunReport> {
        let (selected, mut forced) = self.plan(mode)?;
        let mut blocked: HashMap<NodeIndex, String> = HashMap::new();
        let mut env = ToolEnv::new();
        let mut report = RunReport::default();

        info!(
            "Processing {} of {} projects in {}",
            selected.len(),
            self.graph.len(),
            self.ctx.install_root.display()
        );

        for idx in selected {
            let project = self.graph.project(idx);
            let name = project.identity();

            if let Some(by) = blocked.get(&idx) {
                warn!("Skipping {}: dependency {} failed", name, by);
                on_event(&ChainEvent::Blocked { project: name, by });
                report.push(name, ProjectStatus::Blocked { by: by.clone() });
                continue;
            }

            let force = forced.contains(&idx);
            match self.process(idx, force, &env, on_event).await {
                Ok(outcome) => {
                    if outcome.is_rebuild() {
                        forced.extend(self.graph.descendants(idx));
                    }
                    if let Some(var) = project.export_env() {
                        env.insert(
                            var.to_string(),
                            project.install_destination().display().to_string(),
                        );
                    }
                    on_event(&ChainEvent::Finished {
                        project: name,
                        outcome,
                    });
                    report.push(name, ProjectStatus::Done { outcome });
                }
                Err(error) => {
                    on_event(&ChainEvent::Failed {
                        project: name,
                        error: &error,
                    });
                    if !self.ctx.keep_going {
                        return Err(error);
                    }
                    warn!("{} failed: {}", name, error);
                    for dependent in self.graph.descendants(idx) {
                        blocked.entry(dependent).or_insert_with(|| name.to_string());
                    }
                    report.push(
                        name,
                        ProjectStatus::Failed {
                            error: error.to_string(),
                        },
                    );
                }
            }
        }

        Ok(report)
    }

    async fn process(
        &self,
        idx: NodeIndex,
        force: bool,
        env: &ToolEnv,
        on_event: &EventSink<'_>,
    ) -> DepchainResult<BuildOutcome> {
        let project = self.graph.project(idx);
        let name = project.identity();
        let cache = HashCache::for_project(&self.ctx.install_root, name);
        let checkout = Checkout::new(
            self.vcs,
            project.remote_url(),
            project.selector(),
            self.ctx.source_root.join(name),
        );

        on_event(&ChainEvent::Started {
            project: name,
            forced: force,
        });

        if force {
            debug!("{} is forced, skipping hash comparison", name);
        } else {
            match self.freshness(project, &checkout, &cache).await? {
                Freshness::Fresh(hash) => {
                    info!("{} is up to date at {}", name, hash);
                    on_event(&ChainEvent::UpToDate {
                        project: name,
                        hash: &hash,
                    });
                    return Ok(BuildOutcome::SkippedCached);
                }
                Freshness::Stale { current, cached } => {
                    info!(
                        "{} is stale (current {}, cached {})",
                        name,
                        current.as_deref().unwrap_or("unknown"),
                        cached.as_deref().unwrap_or("none")
                    );
                    on_event(&ChainEvent::Stale {
                        project: name,
                        current: current.as_deref(),
                        cached: cached.as_deref(),
                    });
                }
            }
        }

        // The record must never describe a half-rebuilt install tree
        cache.invalidate().await?;
        self.invalidate_descendants(idx).await?;

        match self.artifact_for(project) {
            Some(spec) => {
                self.install_artifact(project, spec, &cache, on_event).await?;
                Ok(BuildOutcome::RebuiltFromArtifact)
            }
            None => {
                self.build_from_source(project, &checkout, &cache, env, on_event)
                    .await?;
                Ok(BuildOutcome::RebuiltFromSource)
            }
        }
    }

    /// Drop the records of everything built against `idx`
    async fn invalidate_descendants(&self, idx: NodeIndex) -> DepchainResult<()> {
        for dependent in self.graph.descendants(idx) {
            let name = self.graph.project(dependent).identity();
            HashCache::for_project(&self.ctx.install_root, name)
                .invalidate()
                .await?;
        }
        Ok(())
    }

    async fn freshness(
        &self,
        project: &Project,
        checkout: &Checkout<'_>,
        cache: &HashCache,
    ) -> DepchainResult<Freshness> {
        let cached = cache.read().await?;

        let current = match project.selector() {
            VersionSelector::Commit(commit) => {
                return Ok(match cached {
                    Some(hash) if hash.starts_with(commit.as_str()) => Freshness::Fresh(hash),
                    cached => Freshness::Stale {
                        current: Some(commit.clone()),
                        cached,
                    },
                });
            }
            VersionSelector::Ref(_) if cached.is_none() => {
                return Ok(Freshness::Stale {
                    current: None,
                    cached: None,
                })
            }
            VersionSelector::Ref(reference) => {
                if checkout.exists() {
                    Some(checkout.current_hash().await?)
                } else {
                    let resolved = resolve_remote(self.vcs, project.remote_url(), reference).await?;
                    if resolved.is_none() {
                        warn!("{} has no branch or tag named {}", project.remote_url(), reference);
                    }
                    resolved
                }
            }
        };

        Ok(match (current, cached) {
            (Some(current), Some(cached)) if current == cached => Freshness::Fresh(current),
            (current, cached) => Freshness::Stale { current, cached },
        })
    }

    fn artifact_for<'p>(&self, project: &'p Project) -> Option<&'p ArtifactSpec> {
        if self.ctx.prefer_artifacts {
            project.artifact()
        } else {
            None
        }
    }

    async fn build_from_source(
        &self,
        project: &Project,
        checkout: &Checkout<'_>,
        cache: &HashCache,
        env: &ToolEnv,
        on_event: &EventSink<'_>,
    ) -> DepchainResult<()> {
        let name = project.identity();

        if !checkout.exists() {
            on_event(&ChainEvent::Step {
                project: name,
                step: Step::Cloning,
            });
            checkout.clone(self.ctx.clone_depth).await?;
        } else if let VersionSelector::Commit(commit) = project.selector() {
            on_event(&ChainEvent::Step {
                project: name,
                step: Step::CheckingOut,
            });
            checkout.checkout(commit).await?;
        }

        let mut target = BuildTarget::new(
            self.toolchain,
            name,
            checkout.path().to_path_buf(),
            self.binary_dir(name),
            project.install_destination().to_path_buf(),
        );
        target.clean_install().await?;

        on_event(&ChainEvent::Step {
            project: name,
            step: Step::Configuring,
        });
        target
            .configure(&self.ctx.generator, project.options(), env)
            .await?;

        on_event(&ChainEvent::Step {
            project: name,
            step: Step::Installing,
        });
        target.install(env).await?;

        if let Some(policy) = project.prune() {
            on_event(&ChainEvent::Step {
                project: name,
                step: Step::Pruning,
            });
            let removed = policy.apply(project.install_destination()).await?;
            debug!("Pruned {} files from {}", removed.len(), name);
        }

        let hash = checkout.current_hash().await?;
        self.record(name, cache, &hash, on_event).await;
        Ok(())
    }

    async fn install_artifact(
        &self,
        project: &Project,
        spec: &ArtifactSpec,
        cache: &HashCache,
        on_event: &EventSink<'_>,
    ) -> DepchainResult<()> {
        let name = project.identity();
        let dest = project.install_destination();

        on_event(&ChainEvent::Step {
            project: name,
            step: Step::FetchingArtifact,
        });
        remove_tree(dest).await?;
        self.artifacts.fetch_and_unpack(spec, dest).await?;

        if !self.ctx.track_artifacts {
            debug!("Not recording a hash for artifact install of {}", name);
            return Ok(());
        }

        let hash = match project.selector() {
            VersionSelector::Commit(commit) => Some(commit.clone()),
            VersionSelector::Ref(reference) => {
                resolve_remote(self.vcs, project.remote_url(), reference).await?
            }
        };
        match hash {
            Some(hash) => self.record(name, cache, &hash, on_event).await,
            None => warn!("Cannot record a hash for {}: remote ref not found", name),
        }
        Ok(())
    }

    /// Persist the new hash; failures are reported, never propagated
    async fn record(&self, name: &str, cache: &HashCache, hash: &str, on_event: &EventSink<'_>) {
        match cache.write(hash).await {
            Ok(()) => debug!("Recorded {} for {}", hash, name),
            Err(error) => {
                warn!("{}", error);
                on_event(&ChainEvent::CacheWriteFailed {
                    project: name,
                    error: &error,
                });
            }
        }
    }

    fn binary_dir(&self, name: &str) -> PathBuf {
        self.ctx.source_root.join(BUILD_DIR_NAME).join(name)
    }
}
