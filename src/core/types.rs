//! Domain types shared by the pipeline stages.

use std::fmt;

use serde::Deserialize;

/// Relative path of a store entry without the `.gpg` extension
/// (e.g. `web/github.com`).
pub type EntryId = String;

/// An X selection a copy can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Primary,
    Secondary,
    Clipboard,
}

impl Selection {
    /// Name as understood by `xclip -selection`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Clipboard => "clipboard",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which parts of an entry get delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub username: bool,
    pub password: bool,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            username: false,
            password: true,
        }
    }
}
