//! Status command - cached state of every project

use super::install_root;
use crate::cache::HashCache;
use crate::chain::ProjectGraph;
use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::Config;
use crate::error::{DepchainError, DepchainResult};
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

/// One project's local state
#[derive(Debug, Serialize)]
pub struct ProjectState {
    pub project: String,
    pub selector: String,
    pub cached_hash: Option<String>,
    pub installed: bool,
}

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config, config_path: &Path) -> DepchainResult<()> {
    let root = install_root(config, &args.root)?;
    let graph = ProjectGraph::from_config(config, &root, config_path)?;
    let states = collect(&graph, &root).await?;

    match args.format {
        OutputFormat::Table => print_table(&states, &root),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&states)?),
        OutputFormat::Plain => {
            for state in &states {
                println!(
                    "{} {}",
                    state.project,
                    state.cached_hash.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Read hash records and install destinations; never touches the network
pub async fn collect(graph: &ProjectGraph, root: &Path) -> DepchainResult<Vec<ProjectState>> {
    let mut states = Vec::with_capacity(graph.len());
    for &idx in graph.order() {
        let project = graph.project(idx);
        let cached_hash = HashCache::for_project(root, project.identity()).read().await?;
        let dest = project.install_destination();
        let installed = fs::try_exists(dest).await.map_err(|e| {
            DepchainError::io(format!("checking {}", dest.display()), e)
        })?;
        states.push(ProjectState {
            project: project.identity().to_string(),
            selector: project.selector().to_string(),
            cached_hash,
            installed,
        });
    }
    Ok(states)
}

fn print_table(states: &[ProjectState], root: &Path) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Chain status");
    ui::key_value(&ctx, "Install root", &root.display().to_string());
    println!();

    println!(
        "{:<24} {:<20} {:<14} {:<10}",
        style("PROJECT").bold(),
        style("REVISION").bold(),
        style("CACHED").bold(),
        style("INSTALLED").bold()
    );
    println!("{}", "-".repeat(70));

    for state in states {
        let cached = match &state.cached_hash {
            Some(hash) => style(short(hash).to_string()).green(),
            None => style("none".to_string()).yellow(),
        };
        let installed = if state.installed {
            style("yes").green()
        } else {
            style("no").dim()
        };
        println!(
            "{:<24} {:<20} {:<14} {:<10}",
            state.project, state.selector, cached, installed
        );
    }

    println!();
    println!("{} project(s)", states.len());
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reports_records_and_installs() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            projects: vec![
                ProjectConfig {
                    url: "https://x/zlib.git".into(),
                    ..Default::default()
                },
                ProjectConfig {
                    url: "https://x/libpng.git".into(),
                    commit: Some("abc123".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let graph = ProjectGraph::from_config(&config, dir.path(), Path::new("x")).unwrap();
        HashCache::for_project(dir.path(), "zlib")
            .write("deadbeef")
            .await
            .unwrap();
        std::fs::create_dir_all(dir.path().join("zlib")).unwrap();

        let states = collect(&graph, dir.path()).await.unwrap();

        assert_eq!(states[0].project, "zlib");
        assert_eq!(states[0].selector, "master");
        assert_eq!(states[0].cached_hash.as_deref(), Some("deadbeef"));
        assert!(states[0].installed);
        assert_eq!(states[1].selector, "@abc123");
        assert_eq!(states[1].cached_hash, None);
        assert!(!states[1].installed);
    }

    #[test]
    fn short_hash() {
        assert_eq!(short("0123456789abcdef"), "0123456789ab");
        assert_eq!(short("abc"), "abc");
    }
}
