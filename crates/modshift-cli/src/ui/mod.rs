//! Terminal output for status lines and summaries.
//!
//! Everything goes to stderr so stdout stays usable for `check` output.
//!
//! ```no_run
//! use modshift_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Transpiling 2 files");
//! ui::success("Wrote dist/app/even.js");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{OutputSummary, format_duration, format_size, print_summary};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Whether stderr should get colors.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise color is on for a terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status output is colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
