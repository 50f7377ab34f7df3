//! Build command - run the chain

use crate::artifact::HttpArchiveFetcher;
use crate::chain::{ContextOverrides, Orchestrator, ProjectGraph, RunContext, RunMode};
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::disk;
use crate::error::{DepchainError, DepchainResult};
use crate::toolchain::CmakeToolchain;
use crate::ui::{self, ChainReporter, UiContext};
use crate::vcs::GitCli;
use std::path::Path;
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs, config: &Config, config_path: &Path) -> DepchainResult<()> {
    let ui_ctx = UiContext::detect();

    let overrides = ContextOverrides {
        generator: args.generator,
        install_root: args.root.install_prefix,
        prefer_artifacts: args.prefer_artifacts,
        keep_going: args.keep_going,
    };
    let ctx = RunContext::resolve(&config.general, overrides, config_path)?;
    let graph = ProjectGraph::from_config(config, &ctx.install_root, config_path)?;

    if graph.is_empty() {
        ui::step_info(&ui_ctx, &format!("No projects in {}", config_path.display()));
        return Ok(());
    }

    let mode = match (args.target, args.only) {
        (None, _) => RunMode::All,
        (Some(target), true) => RunMode::Only(target),
        (Some(target), false) => RunMode::Cascade(target),
    };
    debug!("Run mode: {:?}", mode);

    let build_config = args
        .build_config
        .unwrap_or_else(|| config.general.build_config.clone());
    let toolchain = CmakeToolchain::new(build_config, config.general.install_target.clone());
    let vcs = GitCli::new();
    let artifacts = HttpArchiveFetcher::new();

    ui::intro(&ui_ctx, "depchain build");
    ui::key_value(&ui_ctx, "Generator", &ctx.generator);
    ui::key_value(&ui_ctx, "Install root", &ctx.install_root.display().to_string());

    let reporter = ChainReporter::new(&ui_ctx);
    let orchestrator = Orchestrator::new(&ctx, &graph, &vcs, &toolchain, &artifacts);
    let report = match orchestrator.run(&mode, &|event| reporter.handle(event)).await {
        Ok(report) => report,
        Err(e) => {
            ui::outro_error(&ui_ctx, "Build failed");
            return Err(e);
        }
    };

    let size = install_root_size(&ctx.install_root).await?;
    ui::key_value(&ui_ctx, "Install size", &disk::format_mib(size));

    let processed = report.entries().len();
    let rebuilt = report.rebuilt().count();
    match report.into_result() {
        Ok(_) => {
            ui::outro_success(
                &ui_ctx,
                &format!("{} project(s) processed, {} rebuilt", processed, rebuilt),
            );
            Ok(())
        }
        Err(e) => {
            ui::outro_error(&ui_ctx, "Build finished with failures");
            Err(e)
        }
    }
}

async fn install_root_size(root: &Path) -> DepchainResult<u64> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || disk::tree_size(&root))
        .await
        .map_err(|e| DepchainError::Internal(format!("measuring install root: {}", e)))
}
