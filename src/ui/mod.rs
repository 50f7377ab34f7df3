//! Terminal output
//!
//! Uses `cliclack` framing and spinners when attached to a terminal and
//! falls back to plain `[OK]`/`[FAIL]` lines in CI logs.

mod context;
mod output;
mod progress;
mod reporter;

pub use context::UiContext;
pub use output::{intro, key_value, outro_error, outro_success, remark, step_info, step_ok};
pub use reporter::ChainReporter;
