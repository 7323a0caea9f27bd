//! Argument stream formatting.
//!
//! A logging call is a mixed sequence of [`Arg`]s: style tokens, text,
//! numbers and opaque values. A [`Formatter`] turns that sequence into the
//! values a native console expects. Three strategies exist:
//!
//! | Strategy              | Environment | Header                               |
//! |-----------------------|-------------|--------------------------------------|
//! | [`GraphicalFormatter`] | rich console | `%c` placeholders + CSS style list |
//! | [`TerminalFormatter`]  | terminal    | ANSI escapes inline, reset appended  |
//! | [`PlainFormatter`]     | anything    | bare concatenated text               |
//!
//! All three share one shape: a *prefix* of tokens and primitives is folded
//! into a single header, and scanning stops at the first opaque value. The
//! rest of the arguments form the *tail*, appended with tokens removed.
//!
//! The strategy is chosen once from [`Capabilities`] via [`select_formatter`].

mod graphical;
mod plain;
mod terminal;
mod value;

pub use graphical::GraphicalFormatter;
pub use plain::PlainFormatter;
pub use terminal::TerminalFormatter;
pub use value::{canonical, format_number, Arg, LogValue};

use crate::config::{ColorChoice, LogConfig};
use crate::style::Environment;

/// Converts an argument sequence into native console values.
pub trait Formatter {
    /// The environment this strategy renders for.
    fn environment(&self) -> Environment;

    /// Formats one logging call.
    fn format(&self, args: &[Arg]) -> RenderedLine;
}

/// The environment-native result of formatting one argument sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedLine {
    /// The composed prefix, absent when the first argument was opaque.
    pub header: Option<String>,
    /// CSS strings matching the header's `%c` placeholders (graphical only).
    pub styles: Vec<String>,
    /// Everything after the prefix, tokens removed.
    pub tail: Vec<LogValue>,
}

impl RenderedLine {
    /// Flattens into the argument list of a native console call:
    /// header, then styles, then tail.
    pub fn into_values(self) -> Vec<LogValue> {
        let mut values = Vec::with_capacity(self.len());
        values.extend(self.header.map(LogValue::Text));
        values.extend(self.styles.into_iter().map(LogValue::Text));
        values.extend(self.tail);
        values
    }

    pub fn len(&self) -> usize {
        usize::from(self.header.is_some()) + self.styles.len() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Appends the unformatted remainder of a call.
///
/// Tokens are dropped. Opaque values are serialized when `serialize` is set
/// and passed through otherwise.
pub(crate) fn push_tail(rest: &[Arg], tail: &mut Vec<LogValue>, serialize: bool) {
    for arg in rest {
        match arg {
            Arg::Style(_) => {}
            Arg::Text(text) => tail.push(LogValue::Text(text.clone())),
            Arg::Number(n) => tail.push(LogValue::Number(*n)),
            Arg::Value(value) if serialize => tail.push(LogValue::Text(canonical(value))),
            Arg::Value(value) => tail.push(LogValue::Value(value.clone())),
        }
    }
}

/// What the host environment can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Output may carry styling.
    pub supports_color: bool,
    /// Output goes to a terminal-class console (as opposed to a rich one).
    pub is_terminal: bool,
    /// A document tree and rich console are available.
    pub graphical_host: bool,
}

impl Capabilities {
    /// Detects the capabilities of a native process.
    ///
    /// A native process is always terminal-class and never has a graphical
    /// host. Color support follows `config.color`; in auto mode the `console`
    /// crate decides from the tty state and `CLICOLOR`/`CLICOLOR_FORCE`.
    pub fn detect(config: &LogConfig) -> Self {
        let supports_color = match config.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::colors_enabled(),
        };
        Self {
            supports_color,
            is_terminal: true,
            graphical_host: false,
        }
    }

    pub fn terminal() -> Self {
        Self {
            supports_color: true,
            is_terminal: true,
            graphical_host: false,
        }
    }

    pub fn graphical() -> Self {
        Self {
            supports_color: true,
            is_terminal: false,
            graphical_host: true,
        }
    }

    pub fn plain() -> Self {
        Self {
            supports_color: false,
            is_terminal: true,
            graphical_host: false,
        }
    }

    /// The environment the formatter will target.
    pub fn environment(&self) -> Environment {
        match (self.supports_color, self.is_terminal) {
            (false, _) => Environment::Plain,
            (true, true) => Environment::Terminal,
            (true, false) => Environment::Graphical,
        }
    }
}

/// Picks the formatting strategy for the given capabilities.
pub fn select_formatter(capabilities: &Capabilities) -> Box<dyn Formatter> {
    formatter_for(capabilities.environment())
}

/// Returns the strategy for an explicit environment.
pub fn formatter_for(environment: Environment) -> Box<dyn Formatter> {
    match environment {
        Environment::Graphical => Box::new(GraphicalFormatter),
        Environment::Terminal => Box::new(TerminalFormatter),
        Environment::Plain => Box::new(PlainFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_matrix() {
        assert_eq!(
            select_formatter(&Capabilities::terminal()).environment(),
            Environment::Terminal
        );
        assert_eq!(
            select_formatter(&Capabilities::graphical()).environment(),
            Environment::Graphical
        );
        assert_eq!(
            select_formatter(&Capabilities::plain()).environment(),
            Environment::Plain
        );
        let no_color_rich = Capabilities {
            supports_color: false,
            is_terminal: false,
            graphical_host: true,
        };
        assert_eq!(no_color_rich.environment(), Environment::Plain);
    }

    #[test]
    fn test_detect_honors_explicit_color_choice() {
        let always = LogConfig {
            color: ColorChoice::Always,
            ..LogConfig::default()
        };
        let never = LogConfig {
            color: ColorChoice::Never,
            ..LogConfig::default()
        };
        assert_eq!(Capabilities::detect(&always).environment(), Environment::Terminal);
        assert_eq!(Capabilities::detect(&never).environment(), Environment::Plain);
        assert!(!Capabilities::detect(&always).graphical_host);
    }

    #[test]
    fn test_into_values_order() {
        let line = RenderedLine {
            header: Some("%ca".into()),
            styles: vec!["color:red;".into()],
            tail: vec![LogValue::Value(json!({}))],
        };
        assert_eq!(line.len(), 3);
        assert_eq!(
            line.into_values(),
            vec![
                LogValue::from("%ca"),
                LogValue::from("color:red;"),
                LogValue::Value(json!({}))
            ]
        );
    }

    #[test]
    fn test_push_tail_drops_tokens() {
        let rest = vec![
            Arg::from(crate::RED),
            Arg::from("x"),
            Arg::from(json!({"a": 1})),
        ];
        let mut serialized = Vec::new();
        push_tail(&rest, &mut serialized, true);
        assert_eq!(
            serialized,
            vec![LogValue::from("x"), LogValue::from(r#"{"a":1}"#)]
        );

        let mut passed = Vec::new();
        push_tail(&rest, &mut passed, false);
        assert_eq!(passed[1], LogValue::Value(json!({"a": 1})));
    }
}
