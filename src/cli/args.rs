//! Separating our own arguments from those meant for dmenu.
//!
//! Anything clap does not know about is forwarded to the menu verbatim, as
//! is every argument after `--`. The split is driven by the clap command
//! definition so it stays in sync with the flags in [`super::Cli`].

use clap::{Arg, Command};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Flag,
    Value,
    OptionalValue,
}

impl Kind {
    fn of(arg: &Arg) -> Self {
        if !arg.get_action().takes_values() {
            return Self::Flag;
        }
        match arg.get_num_args() {
            Some(range) if range.min_values() == 0 => Self::OptionalValue,
            _ => Self::Value,
        }
    }
}

struct Table {
    longs: HashMap<String, Kind>,
    shorts: HashMap<char, Kind>,
}

impl Table {
    fn new(cmd: &Command) -> Self {
        let mut longs = HashMap::new();
        let mut shorts = HashMap::new();
        for arg in cmd.get_arguments().filter(|a| !a.is_positional()) {
            let kind = Kind::of(arg);
            if let Some(long) = arg.get_long() {
                longs.insert(long.to_string(), kind);
            }
            for alias in arg.get_all_aliases().into_iter().flatten() {
                longs.insert(alias.to_string(), kind);
            }
            if let Some(short) = arg.get_short() {
                shorts.insert(short, kind);
            }
            for alias in arg.get_all_short_aliases().into_iter().flatten() {
                shorts.insert(alias, kind);
            }
        }
        Self { longs, shorts }
    }

    /// Kind of a `-x...` token: a known short alone or a cluster of known
    /// switches. Attached values (`-d50`) are not recognised so dmenu's
    /// two-letter options such as `-sb` pass through untouched.
    fn short(&self, body: &str) -> Option<Kind> {
        let mut chars = body.chars();
        let first = *self.shorts.get(&chars.next()?)?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Some(first);
        }
        (first == Kind::Flag
            && rest
                .chars()
                .all(|c| self.shorts.get(&c) == Some(&Kind::Flag)))
        .then_some(Kind::Flag)
    }
}

/// Arguments split into ours (program name first) and the menu's.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Split {
    pub own: Vec<String>,
    pub forwarded: Vec<String>,
}

/// Split `args` (including the program name) according to `cmd`.
///
/// `cmd` must be built so help and version flags are present.
pub fn split<I>(cmd: &Command, args: I) -> Split
where
    I: IntoIterator<Item = String>,
{
    let table = Table::new(cmd);
    let mut split = Split::default();
    let mut args = args.into_iter().peekable();

    if let Some(bin) = args.next() {
        split.own.push(bin);
    }

    while let Some(arg) = args.next() {
        if arg == "--" {
            split.forwarded.extend(args.by_ref());
            break;
        }

        let kind = if let Some(body) = arg.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, _)) => (name, true),
                None => (body, false),
            };
            table
                .longs
                .get(name)
                .map(|k| if inline { Kind::Flag } else { *k })
        } else if let Some(body) = arg.strip_prefix('-').filter(|b| !b.is_empty()) {
            table.short(body)
        } else {
            None
        };

        let Some(kind) = kind else {
            split.forwarded.push(arg);
            continue;
        };

        split.own.push(arg);
        match kind {
            Kind::Flag => {}
            Kind::Value => {
                if let Some(value) = args.next() {
                    split.own.push(value);
                }
            }
            Kind::OptionalValue => {
                if let Some(value) = args.next_if(|v| !v.starts_with('-')) {
                    split.own.push(value);
                }
            }
        }
    }

    split
}
