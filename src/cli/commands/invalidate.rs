//! Invalidate command - drop hash records

use super::install_root;
use crate::cache::HashCache;
use crate::chain::ProjectGraph;
use crate::cli::args::InvalidateArgs;
use crate::config::Config;
use crate::error::DepchainResult;
use crate::ui::{self, UiContext};
use std::path::Path;
use tracing::info;

/// Execute the invalidate command
pub async fn execute(
    args: InvalidateArgs,
    config: &Config,
    config_path: &Path,
) -> DepchainResult<()> {
    let ctx = UiContext::detect();
    let root = install_root(config, &args.root)?;
    let graph = ProjectGraph::from_config(config, &root, config_path)?;

    // Resolve every name first so a typo invalidates nothing
    let targets: Vec<String> = if args.all {
        graph
            .order()
            .iter()
            .map(|&idx| graph.project(idx).identity().to_string())
            .collect()
    } else {
        args.projects
            .iter()
            .map(|name| graph.index_of(name).map(|_| name.clone()))
            .collect::<DepchainResult<_>>()?
    };

    for name in &targets {
        let cache = HashCache::for_project(&root, name);
        cache.invalidate().await?;
        info!("Invalidated {}", cache.path().display());
        ui::step_ok(&ctx, &format!("Invalidated {}", name));
    }

    ui::remark(
        &ctx,
        "Invalidated projects and their dependents rebuild on the next `depchain build`",
    );
    Ok(())
}
