//! Run configuration.
//!
//! Settings come from two places: an optional TOML file
//! (`~/.config/passmenu/config.toml`) and the command line. Both are folded
//! into one immutable [`Config`] before any external tool runs; command-line
//! values win.
//!
//! ```toml
//! store = "~/.password-store"
//! dmenu = "/usr/bin/rofi"
//! menu_args = ["-dmenu", "-i"]
//! selections = ["primary", "clipboard"]
//! user_pattern = "^login: (.*)$"
//! delay = 12
//! ```

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::delivery::{DeliveryFlags, DeliveryRequest};
use crate::core::types::Selection;
use crate::error::{ConfigError, Result};

/// Contents of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub store: Option<PathBuf>,
    pub pass: Option<PathBuf>,
    pub dmenu: Option<PathBuf>,
    pub xclip: Option<PathBuf>,
    pub xdotool: Option<PathBuf>,
    pub delay: Option<u32>,
    pub filter: Option<String>,
    pub selections: Vec<Selection>,
    pub display: Option<String>,
    pub user_pattern: Option<String>,
    pub execute: Option<PathBuf>,
    pub menu_args: Vec<String>,
}

impl Settings {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_FILE))
    }

    /// Load settings.
    ///
    /// An explicitly named file must exist. The default file is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound`, `ConfigError::ReadFile` or
    /// `ConfigError::Parse`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) if !p.exists() => {
                return Err(ConfigError::FileNotFound(p.to_path_buf()).into());
            }
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("no config file");
                    return Ok(Self::default());
                }
            },
        };

        debug!(path = %path.display(), "loading config file");
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse { path, source }.into())
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Values taken from the command line, before merging.
#[derive(Debug, Default, Clone)]
pub struct Options {
    pub copy: bool,
    pub autotype: bool,
    pub press_return: bool,
    /// `None`: not requested. `Some(None)`: bare flag. `Some(Some(p))`: pattern given.
    pub user: Option<Option<String>>,
    pub pw: bool,
    pub store: Option<PathBuf>,
    pub pass: Option<PathBuf>,
    pub dmenu: Option<PathBuf>,
    pub xclip: Option<PathBuf>,
    pub xdotool: Option<PathBuf>,
    pub delay: Option<u32>,
    pub filter: Option<String>,
    pub selections: Vec<Selection>,
    pub display: Option<String>,
    pub execute: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub menu_args: Vec<String>,
}

/// A compiled regular expression together with the text it came from.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub source: String,
    pub regex: Regex,
}

impl Pattern {
    /// Compile a filter pattern (unanchored match against entry ids).
    pub fn filter(source: &str) -> Result<Self> {
        let regex = Regex::new(source).map_err(|e| ConfigError::InvalidPattern {
            what: "filter",
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Compile a username pattern.
    ///
    /// `^` and `$` match at line boundaries, `\n` or `\r\n`. The pattern must
    /// have exactly one capture group.
    pub fn username(source: &str) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .multi_line(true)
            .crlf(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                what: "username",
                pattern: source.to_string(),
                source: e,
            })?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(ConfigError::CaptureGroups {
                pattern: source.to_string(),
                groups,
            }
            .into());
        }

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Paths of the external tools.
#[derive(Debug, Clone)]
pub struct Tools {
    pub pass: PathBuf,
    pub dmenu: PathBuf,
    pub xclip: PathBuf,
    pub xdotool: PathBuf,
}

/// Everything one run needs, validated.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: PathBuf,
    pub tools: Tools,
    pub filter: Option<Pattern>,
    /// Username extraction. `None` yields no username even if one was requested.
    pub username: Option<Pattern>,
    pub display: Option<String>,
    pub menu_args: Vec<String>,
    pub delivery: DeliveryRequest,
}

impl Config {
    /// Merge command-line options over file settings and validate.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the store is missing, pass or dmenu cannot
    /// be found, or a pattern does not compile.
    pub fn build(options: Options, settings: Settings) -> Result<Self> {
        let store = match options.store.or(settings.store) {
            Some(p) => expand_home(&p),
            None => dirs::home_dir()
                .ok_or(ConfigError::NoHome)?
                .join(constants::DEFAULT_STORE),
        };
        if !store.is_dir() {
            return Err(ConfigError::StoreMissing(store).into());
        }

        let tools = Tools {
            pass: locate(options.pass.or(settings.pass), constants::PASS_BIN),
            dmenu: locate(options.dmenu.or(settings.dmenu), constants::DMENU_BIN),
            xclip: locate(options.xclip.or(settings.xclip), constants::XCLIP_BIN),
            xdotool: locate(options.xdotool.or(settings.xdotool), constants::XDOTOOL_BIN),
        };
        // xclip and xdotool are checked when used so one missing delivery
        // tool does not block the others.
        require("pass", &tools.pass)?;
        require("dmenu", &tools.dmenu)?;

        let filter = options
            .filter
            .or(settings.filter)
            .filter(|f| !f.is_empty())
            .map(|f| Pattern::filter(&f))
            .transpose()?;

        let username = match &options.user {
            Some(Some(p)) if !p.is_empty() => Some(Pattern::username(p)?),
            Some(_) => settings
                .user_pattern
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(Pattern::username)
                .transpose()?,
            None => None,
        };

        let selections = if options.selections.is_empty() {
            settings.selections
        } else {
            options.selections
        };

        let delivery = DeliveryRequest::new(DeliveryFlags {
            copy: options.copy,
            autotype: options.autotype,
            press_return: options.press_return,
            user: options.user.is_some(),
            pw: options.pw,
            selections,
            delay: options.delay.or(settings.delay),
            execute: options.execute.or(settings.execute).map(|p| expand_home(&p)),
        });

        let mut menu_args = settings.menu_args;
        menu_args.extend(options.menu_args);

        let config = Self {
            store,
            tools,
            filter,
            username,
            display: options.display.or(settings.display),
            menu_args,
            delivery,
        };
        debug!(
            store = %config.store.display(),
            filter = config.filter.as_ref().map(|f| f.source.as_str()),
            mode = config.delivery.mode(),
            "config ready"
        );
        Ok(config)
    }
}

/// Explicit path, else the PATH lookup of `name`, else `name` itself.
fn locate(explicit: Option<PathBuf>, name: &str) -> PathBuf {
    explicit
        .map(|p| expand_home(&p))
        .or_else(|| which::which(name).ok())
        .unwrap_or_else(|| PathBuf::from(name))
}

fn require(tool: &'static str, path: &Path) -> Result<()> {
    which::which(path).map_err(|_| ConfigError::MissingBinary {
        tool,
        path: path.display().to_string(),
    })?;
    Ok(())
}

/// Expand a leading `~/`.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
