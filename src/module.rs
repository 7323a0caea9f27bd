//! Named, filterable module loggers.
//!
//! [`LogContext::create_module_logger`](crate::LogContext::create_module_logger)
//! hands out a [`ModuleLogger`] per name. Each logger gets the next color of
//! [`PALETTE`] and is either enabled or inert depending on the context's
//! [`ModuleFilter`]. Enabled loggers prefix every line with their colored
//! name and suffix it with the time since the previous module log line of
//! the same context:
//!
//! ```text
//! sync: applied 3 updates +12ms
//! ```

use std::rc::Rc;

use regex::{Regex, RegexBuilder};

use crate::context::LogContext;
use crate::error::{Error, Result};
use crate::format::{canonical, Arg};
use crate::style::{StyleToken, BLUE, GREEN, ORANGE, PURPLE, UNCOLOR};

/// Colors assigned to module loggers, in rotation.
pub const PALETTE: [StyleToken; 4] = [GREEN, PURPLE, ORANGE, BLUE];

/// Decides which module names log.
#[derive(Debug, Clone)]
pub enum ModuleFilter {
    /// No filter configured.
    Disabled,
    /// `*` or `true`.
    All,
    /// Case-insensitive pattern searched for anywhere in the name.
    Pattern(Regex),
}

impl ModuleFilter {
    /// Parses a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] when the expression is not a valid
    /// regular expression.
    pub fn parse(expr: Option<&str>) -> Result<Self> {
        match expr {
            None => Ok(ModuleFilter::Disabled),
            Some("*") | Some("true") => Ok(ModuleFilter::All),
            Some(pattern) => case_insensitive(pattern)
                .map(ModuleFilter::Pattern)
                .map_err(|source| Error::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }

    /// Like [`parse`](Self::parse), but an invalid expression is matched
    /// literally instead of failing.
    pub fn parse_lossy(expr: Option<&str>) -> Self {
        Self::parse(expr).unwrap_or_else(|_| {
            let literal = regex::escape(expr.unwrap_or_default());
            match case_insensitive(&literal) {
                Ok(regex) => ModuleFilter::Pattern(regex),
                Err(_) => ModuleFilter::Disabled,
            }
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            ModuleFilter::Disabled => false,
            ModuleFilter::All => true,
            ModuleFilter::Pattern(regex) => regex.is_match(name),
        }
    }
}

fn case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A logging callable bound to one module name.
///
/// Disabled loggers hold no context and do nothing when invoked. Use the
/// [`mlog!`](crate::mlog) macro to also skip building the arguments.
#[derive(Debug, Clone)]
pub struct ModuleLogger {
    name: String,
    color: StyleToken,
    context: Option<Rc<LogContext>>,
}

impl ModuleLogger {
    pub(crate) fn new(name: &str, color: StyleToken, context: Option<Rc<LogContext>>) -> Self {
        Self {
            name: name.to_string(),
            color,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The palette color assigned at creation.
    pub fn color(&self) -> StyleToken {
        self.color
    }

    pub fn is_enabled(&self) -> bool {
        self.context.is_some()
    }

    /// Logs one line.
    ///
    /// Text, numbers and tokens are kept as they are; any other value is
    /// serialized to canonical JSON first.
    pub fn log<I>(&self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let Some(context) = &self.context else {
            return;
        };

        let elapsed = context.tick();
        let mut line = vec![
            Arg::Style(self.color),
            Arg::Text(format!("{}: ", self.name)),
            Arg::Style(UNCOLOR),
        ];
        line.extend(args.into_iter().map(|arg| match arg.into() {
            Arg::Value(value) => Arg::Text(canonical(&value)),
            kept => kept,
        }));
        line.push(Arg::Style(self.color));
        line.push(Arg::Text(format!(" +{}ms", elapsed)));
        context.print(&line);
    }

    /// Logs the arguments produced by `build`, calling it only when enabled.
    pub fn log_with<F>(&self, build: F)
    where
        F: FnOnce() -> Vec<Arg>,
    {
        if self.is_enabled() {
            self.log(build());
        }
    }
}
