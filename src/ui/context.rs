//! Interactive vs CI detection

use std::io::IsTerminal;

/// Decides whether output may use spinners and cliclack framing
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
        }
    }

    /// Plain line-oriented output (tests, CI, machine-readable formats)
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Spinners and colors
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive() -> bool {
        if !std::io::stdout().is_terminal() {
            return false;
        }

        // Build logs from CI runners are read after the fact
        let ci_vars = [
            "CI",
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "JENKINS_URL",
            "BUILDKITE",
            "TEAMCITY_VERSION",
            "TF_BUILD",
            "APPVEYOR",
        ];

        !ci_vars.iter().any(|var| std::env::var_os(var).is_some())
    }
}
