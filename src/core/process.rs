//! External tool invocation.
//!
//! Every collaborator (pass, dmenu, xclip, xdotool, the user's execute
//! command) is reached through the [`Runner`] trait so pipeline stages can be
//! exercised against a fake in tests.
//!
//! Secret material only ever travels through [`Invocation::stdin`] or
//! [`Arg::Secret`]; both are zeroized on drop and masked when rendered.

use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::trace;
use zeroize::Zeroizing;

use crate::core::constants::REDACTED;
use crate::error::ToolError;

/// One command-line argument.
#[derive(Clone)]
pub enum Arg {
    Plain(OsString),
    Secret(Zeroizing<String>),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(s) => write!(f, "{}", s.to_string_lossy()),
            Self::Secret(_) => f.write_str(REDACTED),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

/// How the child's stdout is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stdout {
    /// Read stdout and stderr into [`Output`].
    Capture,
    /// Let the child write to our stdout, stderr is inherited.
    Inherit,
    /// Discard stdout, stderr is inherited.
    ///
    /// Needed for tools such as xclip that fork a server which keeps
    /// inherited pipes open long after the parent exits.
    Null,
}

/// A fully described external command.
#[derive(Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<Arg>,
    pub env: Vec<(OsString, OsString)>,
    pub stdin: Option<Zeroizing<String>>,
    pub stdout: Stdout,
}

impl Invocation {
    /// New invocation that captures stdout.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: None,
            stdout: Stdout::Capture,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args
            .extend(args.into_iter().map(|a| Arg::Plain(a.into())));
        self
    }

    /// Add an argument that must never be shown.
    pub fn secret_arg(mut self, arg: &str) -> Self {
        self.args.push(Arg::Secret(Zeroizing::new(arg.to_string())));
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(Zeroizing::new(input.to_string()));
        self
    }

    pub fn stdout(mut self, stdout: Stdout) -> Self {
        self.stdout = stdout;
        self
    }

    /// Short tool name for messages (file name of the program).
    pub fn tool(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Arguments joined by spaces, secrets masked.
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &self.env)
            .field("stdin", &self.stdin.as_ref().map(|_| REDACTED))
            .field("stdout", &self.stdout)
            .finish()
    }
}

/// Result of a finished invocation.
///
/// `stdout` is only populated for [`Stdout::Capture`].
#[derive(Debug)]
pub struct Output {
    pub code: Option<i32>,
    pub status: String,
    pub stdout: Zeroizing<Vec<u8>>,
    pub stderr: String,
}

impl Output {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout as UTF-8 text.
    pub fn text(&self, tool: &str) -> Result<Zeroizing<String>, ToolError> {
        std::str::from_utf8(&self.stdout)
            .map(|s| Zeroizing::new(s.to_string()))
            .map_err(|_| ToolError::Utf8 {
                tool: tool.to_string(),
            })
    }
}

/// Runs external commands.
pub trait Runner {
    /// Run `invocation` to completion.
    ///
    /// A non-zero exit is NOT an error at this level; callers decide what
    /// an exit status means. Only failing to start or talk to the child is.
    fn run(&self, invocation: &Invocation) -> Result<Output, ToolError>;

    /// Run and require a zero exit status.
    fn run_checked(&self, invocation: &Invocation) -> Result<Output, ToolError> {
        let output = self.run(invocation)?;
        if !output.success() {
            return Err(ToolError::Failed {
                tool: invocation.tool(),
                args: invocation.display_args(),
                code: output.status.clone(),
                stderr: output.stderr.clone(),
            });
        }
        Ok(output)
    }
}

/// Runner backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct System;

impl Runner for System {
    fn run(&self, invocation: &Invocation) -> Result<Output, ToolError> {
        let tool = invocation.tool();
        trace!(tool = %tool, args = %invocation.display_args(), "spawning");

        let mut cmd = Command::new(&invocation.program);
        for arg in &invocation.args {
            match arg {
                Arg::Plain(s) => cmd.arg(s),
                Arg::Secret(s) => cmd.arg(s.as_str()),
            };
        }
        cmd.envs(invocation.env.iter().map(|(k, v)| (k, v)));
        cmd.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        match invocation.stdout {
            Stdout::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
            Stdout::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            Stdout::Null => {
                cmd.stdout(Stdio::null()).stderr(Stdio::inherit());
            }
        }

        let mut child = cmd.spawn().map_err(|source| ToolError::Spawn {
            tool: tool.clone(),
            args: invocation.display_args(),
            source,
        })?;

        if let (Some(input), Some(mut stdin)) = (&invocation.stdin, child.stdin.take()) {
            // A child that exits without reading its input is not our failure.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(ToolError::Io { tool, source: e });
                }
            }
            // stdin is dropped here so the child sees EOF
        }

        let output = child
            .wait_with_output()
            .map_err(|source| ToolError::Io {
                tool: tool.clone(),
                source,
            })?;

        trace!(tool = %tool, status = %output.status, "finished");
        Ok(Output {
            code: output.status.code(),
            status: output.status.to_string(),
            stdout: Zeroizing::new(output.stdout),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
