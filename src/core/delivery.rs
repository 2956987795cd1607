//! Delivery of a resolved entry.
//!
//! Three independent steps run in a fixed order: copy to X selections,
//! type into the focused window, and pipe the decrypted content to a user
//! command. A failing step is reported and the remaining steps still run.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::config::{Config, Tools};
use crate::core::entry::ResolvedEntry;
use crate::core::process::{Invocation, Runner, Stdout};
use crate::core::types::{Fields, Selection};
use crate::error::{DeliveryError, ToolError};

/// Raw delivery switches as given by the user.
#[derive(Debug, Default, Clone)]
pub struct DeliveryFlags {
    pub copy: bool,
    pub autotype: bool,
    pub press_return: bool,
    pub user: bool,
    pub pw: bool,
    pub selections: Vec<Selection>,
    pub delay: Option<u32>,
    pub execute: Option<PathBuf>,
}

/// Typing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typing {
    /// Milliseconds between keystrokes; xdotool's default when `None`.
    pub delay: Option<u32>,
    pub press_return: bool,
}

/// Where the fields of the chosen entry go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub fields: Fields,
    /// Target selections, deduplicated, in the order given.
    pub copy: Option<Vec<Selection>>,
    pub typing: Option<Typing>,
    pub execute: Option<PathBuf>,
}

impl DeliveryRequest {
    /// Apply the defaulting rules:
    ///
    /// - the password is delivered unless only `user` was asked for
    /// - `press_return` implies typing
    /// - copying happens when asked for, when selections were named, or when
    ///   nothing is typed; the default selection is primary
    pub fn new(flags: DeliveryFlags) -> Self {
        let fields = Fields {
            username: flags.user,
            password: flags.pw || !flags.user,
        };

        let autotype = flags.autotype || flags.press_return;
        let typing = autotype.then(|| Typing {
            delay: flags.delay,
            press_return: flags.press_return,
        });

        let copy = if flags.copy || !flags.selections.is_empty() || !autotype {
            let mut targets: Vec<Selection> = Vec::new();
            for s in flags.selections {
                if !targets.contains(&s) {
                    targets.push(s);
                }
            }
            if targets.is_empty() {
                targets.push(Selection::Primary);
            }
            Some(targets)
        } else {
            None
        };

        Self {
            fields,
            copy,
            typing,
            execute: flags.execute,
        }
    }

    /// Short name of the delivery mode, used as the menu prompt.
    pub fn mode(&self) -> &'static str {
        match &self.typing {
            Some(t) if t.press_return => "enter",
            Some(_) => "type",
            None => "copy",
        }
    }
}

/// Outcome of one delivery step.
#[derive(Debug)]
pub enum Step {
    Done,
    Skipped,
    Failed(ToolError),
}

/// What happened during delivery, one entry per enabled step.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// The username was asked for but the entry has none.
    pub missing_username: bool,
    pub copy: Option<Step>,
    pub typing: Option<Step>,
    pub execute: Option<Step>,
}

impl DeliveryReport {
    fn steps(&self) -> impl Iterator<Item = &Step> {
        [&self.copy, &self.typing, &self.execute]
            .into_iter()
            .flatten()
    }

    /// Failed steps with their errors, in delivery order.
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &ToolError)> {
        [
            ("copy", &self.copy),
            ("type", &self.typing),
            ("execute", &self.execute),
        ]
        .into_iter()
        .filter_map(|(name, step)| match step {
            Some(Step::Failed(e)) => Some((name, e)),
            _ => None,
        })
    }

    /// Error if any step failed.
    pub fn into_result(self) -> Result<(), DeliveryError> {
        let attempted = self.steps().count();
        let failed = self
            .steps()
            .filter(|s| matches!(s, Step::Failed(_)))
            .count();
        if failed > 0 {
            Err(DeliveryError { failed, attempted })
        } else {
            Ok(())
        }
    }
}

/// Arguments handed to the execute command after the entry id.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub id: &'a str,
    pub store: &'a Path,
    pub filter: Option<&'a str>,
}

/// Run every enabled delivery step.
pub fn dispatch(
    runner: &dyn Runner,
    config: &Config,
    entry: &ResolvedEntry,
    content: &str,
    ctx: Context<'_>,
) -> DeliveryReport {
    let request = &config.delivery;
    let fields = entry.fields(request.fields);
    let mut report = DeliveryReport {
        missing_username: request.fields.username && entry.username.is_none(),
        ..DeliveryReport::default()
    };

    if let Some(targets) = &request.copy {
        let step = if fields.is_empty() {
            warn!("nothing to copy: requested fields are empty");
            Step::Skipped
        } else {
            let display = config.display.as_deref();
            finish("copy", copy(runner, &config.tools, display, targets, &fields))
        };
        report.copy = Some(step);
    }

    if let Some(typing) = &request.typing {
        let step = if fields.is_empty() {
            warn!("nothing to type: requested fields are empty");
            Step::Skipped
        } else {
            finish("type", autotype(runner, &config.tools.xdotool, typing, &fields))
        };
        report.typing = Some(step);
    }

    if let Some(command) = &request.execute {
        report.execute = Some(finish("execute", execute(runner, command, content, ctx)));
    }

    report
}

fn finish(step: &str, result: Result<(), ToolError>) -> Step {
    match result {
        Ok(()) => {
            debug!(step, "delivered");
            Step::Done
        }
        Err(e) => {
            debug!(step, tool = e.tool(), "delivery step failed");
            Step::Failed(e)
        }
    }
}

/// One xclip call per (selection, field). A failing call stops this step.
fn copy(
    runner: &dyn Runner,
    tools: &Tools,
    display: Option<&str>,
    targets: &[Selection],
    fields: &[&str],
) -> Result<(), ToolError> {
    for target in targets {
        for field in fields {
            let mut inv = Invocation::new(&tools.xclip).args(["-selection", target.as_str()]);
            if let Some(display) = display {
                inv = inv.args(["-d", display]);
            }
            runner.run_checked(&inv.stdin(field).stdout(Stdout::Null))?;
        }
        debug!(selection = %target, fields = fields.len(), "copied");
    }
    Ok(())
}

/// Type the fields separated by Tab, optionally followed by Return.
fn autotype(
    runner: &dyn Runner,
    xdotool: &Path,
    typing: &Typing,
    fields: &[&str],
) -> Result<(), ToolError> {
    let delay = typing.delay.map(|d| d.to_string());
    let base = |action: &str| {
        let inv = Invocation::new(xdotool).args([action, "--clearmodifiers"]);
        match &delay {
            Some(d) => inv.args(["--delay", d.as_str()]),
            None => inv,
        }
    };

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            runner.run_checked(&base("key").arg("Tab"))?;
        }
        runner.run_checked(&base("type").arg("--").secret_arg(field))?;
    }
    if typing.press_return {
        runner.run_checked(&base("key").arg("Return"))?;
    }
    debug!(fields = fields.len(), press_return = typing.press_return, "typed");
    Ok(())
}

/// `<command> <id> <store> [<filter>]` with the decrypted content on stdin.
fn execute(
    runner: &dyn Runner,
    command: &Path,
    content: &str,
    ctx: Context<'_>,
) -> Result<(), ToolError> {
    let mut inv = Invocation::new(command)
        .arg(ctx.id)
        .arg(ctx.store.as_os_str());
    if let Some(filter) = ctx.filter {
        inv = inv.arg(filter);
    }
    runner.run_checked(&inv.stdin(content).stdout(Stdout::Inherit))?;
    Ok(())
}
