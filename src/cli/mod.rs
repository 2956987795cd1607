//! Command-line interface.

pub mod args;
pub mod output;

use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::config::{Config, Options, Settings};
use crate::core::pipeline::{self, Outcome};
use crate::core::process::System;
use crate::core::types::Selection;
use crate::error::Result;

/// Pick a pass entry from dmenu and copy or type it.
#[derive(Parser, Debug)]
#[command(
    name = "passmenu",
    about = "Pick a pass entry from dmenu and copy or type it",
    version,
    after_help = "Arguments not listed above, and everything after `--`, are passed to dmenu."
)]
pub struct Cli {
    /// Copy to the X selection(s). Default unless typing
    #[arg(long)]
    pub copy: bool,

    /// Type the fields into the focused window with xdotool
    #[arg(short = 't', long = "type")]
    pub autotype: bool,

    /// Press Return after typing. Implies --type
    #[arg(short = 'r', long = "return")]
    pub press_return: bool,

    /// Deliver the username, captured by group 1 of PATTERN
    /// (defaults to user_pattern from the config file)
    #[arg(short = 'u', long, value_name = "PATTERN", num_args = 0..=1)]
    pub user: Option<Option<String>>,

    /// Deliver the password. Default; use -u -P for both
    #[arg(short = 'P', long = "pw")]
    pub pw: bool,

    /// Password store directory [default: ~/.password-store]
    #[arg(short = 's', long, env = "PASSWORD_STORE_DIR", value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Path to the pass binary
    #[arg(short = 'B', long = "pass", value_name = "PATH")]
    pub pass_bin: Option<PathBuf>,

    /// Path to the dmenu binary
    #[arg(short = 'D', long = "dmenu", value_name = "PATH")]
    pub dmenu_bin: Option<PathBuf>,

    /// Path to the xclip binary
    #[arg(long = "xclip", value_name = "PATH")]
    pub xclip_bin: Option<PathBuf>,

    /// Path to the xdotool binary
    #[arg(long = "xdotool", value_name = "PATH")]
    pub xdotool_bin: Option<PathBuf>,

    /// Delay between keystrokes in milliseconds
    #[arg(short = 'd', long, value_name = "MS")]
    pub delay: Option<u32>,

    /// Only offer entries matching this regular expression
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// X selection to copy to; repeat for several [default: primary]
    #[arg(short = 'S', long = "selection", value_enum, value_name = "SELECTION")]
    pub selections: Vec<Selection>,

    /// X display for xclip
    #[arg(long, value_name = "DISPLAY")]
    pub display: Option<String>,

    /// Also run CMD with the decrypted entry on stdin
    /// (arguments: entry, store, filter)
    #[arg(short = 'e', long, value_name = "CMD")]
    pub execute: Option<PathBuf>,

    /// Config file [default: ~/.config/passmenu/config.toml]
    #[arg(long, env = "PASSMENU_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Arguments forwarded to dmenu.
    #[arg(skip)]
    pub menu_args: Vec<String>,
}

impl Cli {
    /// Parse the process arguments, setting aside the ones meant for dmenu.
    ///
    /// Exits with a usage message on invalid arguments, like `Parser::parse`.
    pub fn parse_with_menu_args() -> Self {
        Self::parse_with_menu_args_from(std::env::args_os())
    }

    pub fn parse_with_menu_args_from<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut cmd = Self::command();
        cmd.build();

        let argv = argv
            .into_iter()
            .map(|a| a.into().to_string_lossy().into_owned());
        let split = args::split(&cmd, argv);

        let mut cli = cmd
            .try_get_matches_from_mut(split.own)
            .and_then(|mut m| Self::from_arg_matches_mut(&mut m))
            .unwrap_or_else(|e| e.format(&mut Self::command()).exit());
        cli.menu_args = split.forwarded;
        cli
    }
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Self {
            copy: cli.copy,
            autotype: cli.autotype,
            press_return: cli.press_return,
            user: cli.user,
            pw: cli.pw,
            store: cli.store,
            pass: cli.pass_bin,
            dmenu: cli.dmenu_bin,
            xclip: cli.xclip_bin,
            xdotool: cli.xdotool_bin,
            delay: cli.delay,
            filter: cli.filter,
            selections: cli.selections,
            display: cli.display,
            execute: cli.execute,
            config: cli.config,
            menu_args: cli.menu_args,
        }
    }
}

/// Run the pipeline for parsed arguments.
///
/// A cancelled menu is a success. Failed delivery steps are printed once
/// delivery is over and turn into one `DeliveryError`.
pub fn execute(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let config = Config::build(cli.into(), settings)?;

    match pipeline::run(&config, &System)? {
        Outcome::Cancelled => Ok(()),
        Outcome::Delivered { id, report } => {
            if report.missing_username {
                output::warn(&format!("no username found in {}", id));
            }
            for (step, err) in report.failures() {
                output::error(&format!("{} failed: {}", step, err));
            }
            report.into_result()?;
            Ok(())
        }
    }
}
