//! Plan command - processing order and dependency edges

use crate::chain::{resolve_install_root, ProjectGraph};
use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::Config;
use crate::error::DepchainResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::Path;

/// One row of the plan
#[derive(Debug, Serialize)]
pub struct PlanEntry {
    pub project: String,
    pub url: String,
    pub selector: String,
    pub depends_on: Vec<String>,
}

/// Execute the plan command
pub async fn execute(args: PlanArgs, config: &Config, config_path: &Path) -> DepchainResult<()> {
    let root = resolve_install_root(&config.general, None);
    let graph = ProjectGraph::from_config(config, &root, config_path)?;
    let entries = plan(&graph);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.project);
            }
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::intro(&ctx, "Build plan");
            for (position, entry) in entries.iter().enumerate() {
                let deps = if entry.depends_on.is_empty() {
                    style("(root)".to_string()).dim()
                } else {
                    style(format!("<- {}", entry.depends_on.join(", "))).dim()
                };
                println!(
                    "{:>3}. {:<24} {:<16} {}",
                    position + 1,
                    style(&entry.project).bold(),
                    entry.selector,
                    deps
                );
            }
        }
    }

    Ok(())
}

/// Projects in processing order with their direct dependencies
pub fn plan(graph: &ProjectGraph) -> Vec<PlanEntry> {
    graph
        .order()
        .iter()
        .map(|&idx| {
            let project = graph.project(idx);
            PlanEntry {
                project: project.identity().to_string(),
                url: project.remote_url().to_string(),
                selector: project.selector().to_string(),
                depends_on: graph
                    .dependencies(idx)
                    .into_iter()
                    .map(|dep| graph.project(dep).identity().to_string())
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn lists_direct_dependencies_in_order() {
        let mut config: Config = toml::from_str(
            r#"
            [[project]]
            url = "https://x/thirdparty.git"
            [[project]]
            url = "https://x/panda3d.git"
            branch = "develop"
            "#,
        )
        .unwrap();
        config.projects.push(ProjectConfig {
            url: "https://x/plugin.git".into(),
            depends_on: Some(vec!["thirdparty".into(), "panda3d".into()]),
            ..Default::default()
        });

        let graph =
            ProjectGraph::from_config(&config, Path::new("/install"), Path::new("x")).unwrap();
        let entries = plan(&graph);

        assert_eq!(entries.len(), 3);
        assert!(entries[0].depends_on.is_empty());
        assert_eq!(entries[1].selector, "develop");
        assert_eq!(entries[1].depends_on, vec!["thirdparty"]);
        assert_eq!(entries[2].depends_on, vec!["thirdparty", "panda3d"]);
    }
}
