//! Entry selection through dmenu (or any tool speaking its protocol:
//! choices on stdin, the chosen line on stdout).

use std::path::Path;
use tracing::{debug, warn};

use crate::core::process::{Invocation, Runner};
use crate::core::types::EntryId;
use crate::error::Result;

/// Menu arguments: a prompt naming the delivery mode, unless the user
/// forwarded a prompt of their own, then the forwarded arguments.
pub fn menu_args(mode: &str, forwarded: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(forwarded.len() + 2);
    if !forwarded.iter().any(|a| a == "-p") {
        args.push("-p".to_string());
        args.push(mode.to_string());
    }
    args.extend(forwarded.iter().cloned());
    args
}

/// Show `candidates` and return the chosen one.
///
/// `Ok(None)` means the user backed out: the menu exited non-zero, printed
/// nothing, or printed something that is not one of the candidates.
///
/// # Errors
///
/// Returns `ToolError::Spawn` (via `Error::Tool`) if the menu cannot be started.
pub fn select(
    runner: &dyn Runner,
    dmenu: &Path,
    args: &[String],
    candidates: &[EntryId],
) -> Result<Option<EntryId>> {
    let inv = Invocation::new(dmenu)
        .args(args)
        .stdin(&candidates.join("\n"));
    let output = runner.run(&inv)?;

    match output.code {
        Some(0) => {}
        Some(1) => {
            debug!("menu cancelled");
            return Ok(None);
        }
        _ => {
            warn!(
                tool = %inv.tool(),
                status = %output.status,
                stderr = %output.stderr.trim(),
                "menu failed, treating as cancel"
            );
            return Ok(None);
        }
    }

    let text = output.text(&inv.tool())?;
    let choice = text.trim_end_matches(['\n', '\r']);
    if choice.is_empty() {
        debug!("nothing selected");
        return Ok(None);
    }
    if !candidates.iter().any(|c| c == choice) {
        debug!("selection is not a store entry");
        return Ok(None);
    }

    debug!(id = choice, "selected");
    Ok(Some(choice.to_string()))
}
