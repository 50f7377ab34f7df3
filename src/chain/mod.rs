//! Build chain engine
//!
//! A chain is an ordered set of git-hosted CMake projects where later
//! projects consume the install trees of earlier ones. The engine decides
//! which projects are stale, rebuilds them, and forces everything
//! downstream of a rebuild.

mod context;
mod events;
mod graph;
mod orchestrator;
mod project;
mod report;

pub use context::{resolve_install_root, ContextOverrides, RunContext};
pub use events::{ChainEvent, EventSink, Step};
pub use graph::ProjectGraph;
pub use orchestrator::{Orchestrator, RunMode, BUILD_DIR_NAME};
pub use project::{identity_from_url, Project};
pub use report::{BuildOutcome, ProjectReport, ProjectStatus, RunReport};
