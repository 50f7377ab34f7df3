//! Spinner with CI fallback

use super::context::UiContext;
use console::style;

/// One spinner at a time; plain lines when not interactive
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start (or restart) with a message
    pub fn start(&mut self, message: &str) {
        if !self.interactive {
            println!("  {} {}", style("...").dim(), message);
            return;
        }
        match self.spinner {
            Some(ref spinner) => spinner.start(message),
            None => {
                let spinner = cliclack::spinner();
                spinner.start(message);
                self.spinner = Some(spinner);
            }
        }
    }

    pub fn stop(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => println!("  {} {}", style("[OK]").green(), message),
        }
    }

    pub fn stop_error(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => println!("  {} {}", style("[FAIL]").red(), message),
        }
    }

    /// Remove the spinner line without a message
    pub fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
    }
}
