//! Terminal messages.
//!
//! Everything goes to stderr: passmenu is usually started from a key
//! binding and its stdout may belong to an `--execute` command.
//!
//! Color scheme (respects NO_COLOR):
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: hints

use console::style;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled_stderr()
}

/// Print an error message.
///
/// Example: `✗ pass web/site exited with exit status: 2`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").for_stderr().red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message.
///
/// Example: `⚠ no username found in web/site`
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").for_stderr().yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message.
///
/// Example: `→ use --store <DIR> or set PASSWORD_STORE_DIR`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!(
            "{} {}",
            style("→").for_stderr().cyan(),
            style(msg).for_stderr().cyan()
        );
    } else {
        eprintln!("→ {}", msg);
    }
}
