//! Renders [`ChainEvent`]s for the operator

use super::context::UiContext;
use super::output;
use super::progress::TaskSpinner;
use crate::chain::{BuildOutcome, ChainEvent};
use std::cell::RefCell;

/// Turns orchestrator events into spinner updates and step lines
pub struct ChainReporter {
    ctx: UiContext,
    spinner: RefCell<TaskSpinner>,
}

impl ChainReporter {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            ctx: ctx.clone(),
            spinner: RefCell::new(TaskSpinner::new(ctx)),
        }
    }

    pub fn handle(&self, event: &ChainEvent<'_>) {
        let mut spinner = self.spinner.borrow_mut();

        match event {
            ChainEvent::Started { project, forced } => {
                let note = if *forced { " (forced)" } else { "" };
                spinner.start(&format!("{}: checking{}", project, note));
            }
            ChainEvent::UpToDate { .. } | ChainEvent::Stale { .. } => {}
            ChainEvent::Step { project, step } => {
                spinner.start(&format!("{}: {}", project, step.label()));
            }
            ChainEvent::CacheWriteFailed { project, error } => {
                spinner.clear();
                output::step_warn_hint(
                    &self.ctx,
                    &format!("{}: could not record build hash", project),
                    &error.to_string(),
                );
            }
            ChainEvent::Finished { project, outcome } => {
                let message = match outcome {
                    BuildOutcome::SkippedCached => format!("{} is up to date", project),
                    other => format!("{} {}", project, other),
                };
                spinner.stop(&message);
            }
            ChainEvent::Failed { project, error } => {
                spinner.stop_error(&format!("{} failed: {}", project, error));
            }
            ChainEvent::Blocked { project, by } => {
                spinner.clear();
                output::step_blocked(&self.ctx, project, by);
            }
        }
    }
}
