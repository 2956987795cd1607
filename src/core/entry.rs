//! Entry decryption and field extraction.

use std::fmt;
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::Pattern;
use crate::core::constants;
use crate::core::process::{Invocation, Runner};
use crate::core::types::Fields;
use crate::error::{Error, Result};

/// Fields extracted from a decrypted entry.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// First line of the content. `None` only for empty content.
    pub password: Option<Zeroizing<String>>,
    /// First capture of the username pattern, when one was configured and matched.
    pub username: Option<Zeroizing<String>>,
}

impl fmt::Debug for ResolvedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<Zeroizing<String>>| v.as_ref().map(|_| constants::REDACTED);
        f.debug_struct("ResolvedEntry")
            .field("password", &mask(&self.password))
            .field("username", &mask(&self.username))
            .finish()
    }
}

impl ResolvedEntry {
    /// Extract the fields from decrypted content.
    ///
    /// The password is the first line without its terminator. The username
    /// is capture group 1 of the first match of `username`; no match means
    /// no username.
    pub fn parse(content: &str, username: Option<&Pattern>) -> Self {
        let password = content
            .split('\n')
            .next()
            .filter(|_| !content.is_empty())
            .map(|line| Zeroizing::new(line.strip_suffix('\r').unwrap_or(line).to_string()));

        let username = username.and_then(|pattern| {
            pattern
                .regex
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| Zeroizing::new(m.as_str().to_string()))
        });

        Self { password, username }
    }

    /// Requested fields that are present, username first.
    pub fn fields(&self, wanted: Fields) -> Vec<&str> {
        let mut out = Vec::with_capacity(2);
        if wanted.username {
            if let Some(u) = &self.username {
                out.push(u.as_str());
            }
        }
        if wanted.password {
            if let Some(p) = &self.password {
                out.push(p.as_str());
            }
        }
        out
    }
}

/// Decrypt an entry with `pass`.
///
/// # Errors
///
/// Returns `Error::Resolve` if pass cannot be started, exits non-zero or
/// prints invalid UTF-8.
pub fn decrypt(
    runner: &dyn Runner,
    pass: &Path,
    store: &Path,
    id: &str,
) -> Result<Zeroizing<String>> {
    let inv = Invocation::new(pass)
        .arg(id)
        .env(constants::STORE_ENV, store.as_os_str());

    let fail = |source| Error::Resolve {
        id: id.to_string(),
        source,
    };
    let output = runner.run_checked(&inv).map_err(fail)?;
    let content = output.text(&inv.tool()).map_err(fail)?;

    debug!(id, bytes = content.len(), "decrypted");
    Ok(content)
}

/// Decrypt an entry and extract its fields.
pub fn resolve(
    runner: &dyn Runner,
    pass: &Path,
    store: &Path,
    id: &str,
    username: Option<&Pattern>,
) -> Result<(ResolvedEntry, Zeroizing<String>)> {
    let content = decrypt(runner, pass, store, id)?;
    let entry = ResolvedEntry::parse(&content, username);
    debug!(
        id,
        password = entry.password.is_some(),
        username = entry.username.is_some(),
        "resolved"
    );
    Ok((entry, content))
}
