//! Store listing.
//!
//! Walks the password store and returns the id of every encrypted entry,
//! i.e. each `*.gpg` file path relative to the store root, without the
//! extension.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::core::config::Pattern;
use crate::core::constants;
use crate::core::types::EntryId;
use crate::error::{ConfigError, Result};

/// List entry ids under `store`, sorted, keeping only those `filter` matches.
///
/// Symlinks are followed and every alias of a linked directory is listed;
/// a link back to a directory on the current path is not descended into.
/// Hidden directories (`.git`, `.extensions`) are skipped, as are
/// subdirectories that cannot be read.
///
/// # Errors
///
/// Returns `ConfigError::Walk` if the store root cannot be read.
pub fn list(store: &Path, filter: Option<&Pattern>) -> Result<Vec<EntryId>> {
    let root = fs::canonicalize(store).map_err(ConfigError::Walk)?;
    let items = fs::read_dir(store).map_err(ConfigError::Walk)?;

    let mut ids = Vec::new();
    let mut ancestors = vec![root];
    scan(store, items, &mut ancestors, &mut ids);

    let total = ids.len();
    if let Some(filter) = filter {
        ids.retain(|id| filter.is_match(id));
    }
    ids.sort();

    debug!(total, listed = ids.len(), "listed store");
    Ok(ids)
}

/// Descend into `dir` unless it is already on the path from the root.
fn walk(root: &Path, dir: &Path, ancestors: &mut Vec<PathBuf>, ids: &mut Vec<EntryId>) {
    let canonical = match fs::canonicalize(dir) {
        Ok(c) => c,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unresolvable directory");
            return;
        }
    };
    if ancestors.contains(&canonical) {
        trace!(dir = %dir.display(), "symlink loop");
        return;
    }
    let items = match fs::read_dir(dir) {
        Ok(items) => items,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    ancestors.push(canonical);
    scan(root, items, ancestors, ids);
    ancestors.pop();
}

fn scan(root: &Path, items: fs::ReadDir, ancestors: &mut Vec<PathBuf>, ids: &mut Vec<EntryId>) {
    for item in items {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = item.path();
        let name = item.file_name();
        let name = name.to_string_lossy();

        // metadata() follows symlinks; dangling links are ignored
        let Ok(meta) = fs::metadata(&path) else {
            trace!(path = %path.display(), "skipping unreadable entry");
            continue;
        };

        if meta.is_dir() {
            if !name.starts_with('.') {
                walk(root, &path, ancestors, ids);
            }
        } else if meta.is_file() && name != constants::GPG_ID_FILE {
            if let Some(id) = entry_id(root, &path) {
                ids.push(id);
            }
        }
    }
}

/// `root/web/site.gpg` → `web/site`.
fn entry_id(root: &Path, path: &Path) -> Option<EntryId> {
    if path.extension()? != constants::ENTRY_EXTENSION {
        return None;
    }
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
