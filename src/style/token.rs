//! Opaque style markers and their per-environment directives.

use std::sync::atomic::{AtomicU64, Ordering};

/// The rendering target a directive is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// A rich console that styles `%c` placeholders with CSS declarations.
    Graphical,
    /// A terminal that understands ANSI escape sequences.
    Terminal,
    /// No styling capability at all.
    Plain,
}

/// What a [`StyleToken`] does in a given [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// A CSS declaration, e.g. `color: red`.
    Css {
        property: &'static str,
        value: &'static str,
    },
    /// A raw ANSI escape sequence.
    Escape(&'static str),
}

/// An opaque style marker.
///
/// Tokens are compared by identity only: every token owns a unique id handed
/// out by a process-wide counter, and two tokens are equal only if they are
/// copies of the same handle. The nine predefined tokens occupy the first ids.
///
/// # Example
///
/// ```rust
/// use isolog::{Environment, StyleToken, BLUE, RED};
///
/// assert_ne!(BLUE, RED);
/// assert!(BLUE.render(Environment::Terminal).is_some());
/// assert!(BLUE.render(Environment::Plain).is_none());
///
/// let custom = StyleToken::create();
/// assert_ne!(custom, StyleToken::create());
/// assert!(custom.render(Environment::Graphical).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleToken(u64);

pub const BOLD: StyleToken = StyleToken(0);
pub const UNBOLD: StyleToken = StyleToken(1);
pub const BLUE: StyleToken = StyleToken(2);
pub const GREY: StyleToken = StyleToken(3);
pub const GREEN: StyleToken = StyleToken(4);
pub const RED: StyleToken = StyleToken(5);
pub const PURPLE: StyleToken = StyleToken(6);
pub const ORANGE: StyleToken = StyleToken(7);
pub const UNCOLOR: StyleToken = StyleToken(8);

/// Escape sequence that clears every terminal attribute.
pub const RESET: &str = "\x1b[0m";

const PREDEFINED: u64 = 9;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(PREDEFINED);

impl StyleToken {
    /// Returns a fresh token, distinct from every token created before it.
    ///
    /// Created tokens carry no directive in any environment.
    pub fn create() -> Self {
        StyleToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the directive this token stands for in `env`, if any.
    pub fn render(self, env: Environment) -> Option<Directive> {
        match env {
            Environment::Graphical => self
                .css()
                .map(|(property, value)| Directive::Css { property, value }),
            Environment::Terminal => self.escape().map(Directive::Escape),
            Environment::Plain => None,
        }
    }

    /// The `(property, value)` CSS declaration for the graphical environment.
    pub fn css(self) -> Option<(&'static str, &'static str)> {
        let declaration = match self {
            BOLD => ("font-weight", "bold"),
            UNBOLD => ("font-weight", "normal"),
            BLUE => ("color", "blue"),
            GREEN => ("color", "green"),
            GREY => ("color", "grey"),
            RED => ("color", "red"),
            PURPLE => ("color", "purple"),
            ORANGE => ("color", "orange"),
            UNCOLOR => ("color", "black"),
            _ => return None,
        };
        Some(declaration)
    }

    /// The ANSI escape sequence for the terminal environment.
    pub fn escape(self) -> Option<&'static str> {
        let sequence = match self {
            BOLD => "\x1b[1m",
            UNBOLD => "\x1b[2m",
            BLUE => "\x1b[34m",
            GREEN => "\x1b[32m",
            GREY => "\x1b[37m",
            RED => "\x1b[31m",
            PURPLE => "\x1b[35m",
            ORANGE => "\x1b[38;5;208m",
            UNCOLOR => "\x1b[0m",
            _ => return None,
        };
        Some(sequence)
    }

    /// Whether this token styles output in at least one environment.
    ///
    /// Only the predefined tokens do.
    pub fn is_styling(self) -> bool {
        self.0 < PREDEFINED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StyleToken; 9] = [BOLD, UNBOLD, BLUE, GREY, GREEN, RED, PURPLE, ORANGE, UNCOLOR];

    #[test]
    fn test_predefined_tokens_are_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_created_tokens_never_collide() {
        let a = StyleToken::create();
        let b = StyleToken::create();
        assert_ne!(a, b);
        assert!(ALL.iter().all(|t| *t != a && *t != b));
        assert!(!a.is_styling());
    }

    #[test]
    fn test_created_ids_only_grow() {
        let a = StyleToken::create();
        let b = StyleToken::create();
        assert!(b.0 > a.0);
        assert!(a.0 >= PREDEFINED);
        // 64-bit ids so the counter cannot wrap back onto BOLD.
        assert_eq!(std::mem::size_of::<StyleToken>(), 8);
    }

    #[test]
    fn test_every_predefined_token_renders_in_styled_environments() {
        for token in ALL {
            assert!(token.is_styling());
            assert!(matches!(
                token.render(Environment::Graphical),
                Some(Directive::Css { .. })
            ));
            assert!(matches!(
                token.render(Environment::Terminal),
                Some(Directive::Escape(_))
            ));
            assert_eq!(token.render(Environment::Plain), None);
        }
    }

    #[test]
    fn test_directive_table() {
        assert_eq!(RED.css(), Some(("color", "red")));
        assert_eq!(UNCOLOR.css(), Some(("color", "black")));
        assert_eq!(UNBOLD.css(), Some(("font-weight", "normal")));
        assert_eq!(ORANGE.escape(), Some("\x1b[38;5;208m"));
        assert_eq!(UNCOLOR.escape(), Some(RESET));
    }
}
