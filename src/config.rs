//! Process-level logging configuration.
//!
//! Two settings exist: the module filter (`log`) and the color choice.
//! They come from the environment and the command line:
//!
//! | Source                       | Effect                                  |
//! |------------------------------|-----------------------------------------|
//! | `LOG=<expr>`                 | module filter                           |
//! | `--log <expr>` / `--log=<expr>` | module filter, overrides `LOG`       |
//! | `NO_COLOR` / `--no-colors`   | never style output                      |
//! | `FORCE_COLOR`                | always style output                     |
//!
//! A filter of `*` or `true` enables every module logger; any other value is
//! a case-insensitive pattern tested against module names; no value disables
//! them all.
//!
//! [`LogConfig`] also derives serde traits so it can be embedded in an
//! application's own configuration file.

use std::ffi::OsString;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether styled output is wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Decide from the output stream.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Module filter expression, the `log` setting.
    #[serde(rename = "log")]
    pub filter: Option<String>,
    pub color: ColorChoice,
}

impl LogConfig {
    /// Reads `LOG`, `NO_COLOR` and `FORCE_COLOR` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let color = if lookup("NO_COLOR").is_some() {
            ColorChoice::Never
        } else if lookup("FORCE_COLOR").is_some_and(|v| v != "0" && v != "false") {
            ColorChoice::Always
        } else {
            ColorChoice::Auto
        };
        Self {
            filter: lookup("LOG"),
            color,
        }
    }

    /// Environment first, then command-line flags of the running process.
    pub fn from_process() -> Result<Self> {
        Self::from_env().apply_os_args(std::env::args_os().skip(1))
    }

    /// Like [`apply_args`](Self::apply_args) for raw OS arguments.
    ///
    /// Arguments that are not valid UTF-8 cannot be one of our flags and are
    /// skipped.
    pub fn apply_os_args<I>(self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        self.apply_args(args.into_iter().filter_map(|arg| arg.into_string().ok()))
    }

    /// Applies `--log` and `--no-colors`; other arguments are ignored.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            if arg == "--log" {
                let value = args.next().ok_or_else(|| Error::MissingArgValue {
                    flag: "log".to_string(),
                })?;
                self.filter = Some(value);
            } else if let Some(value) = arg.strip_prefix("--log=") {
                self.filter = Some(value.to_string());
            } else if arg == "--no-colors" {
                self.color = ColorChoice::Never;
            }
        }
        Ok(self)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}
