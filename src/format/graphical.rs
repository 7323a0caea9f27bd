//! Rich-console strategy: `%c` placeholders paired with CSS strings.

use super::{push_tail, Arg, Formatter, RenderedLine};
use crate::style::{Environment, StyleAccumulator};

/// Formats for consoles that style `%c` segments with CSS.
///
/// Each primitive in the prefix becomes `%c<text>` and the accumulated style
/// string is pushed to [`RenderedLine::styles`]. The only exception is a
/// primitive in first position with no active style, which is inlined bare.
/// Opaque values in the tail are passed through so the console can render
/// them as inspectable objects.
///
/// ```rust
/// use isolog::{log_args, Formatter, GraphicalFormatter, BOLD, RED};
///
/// let line = GraphicalFormatter.format(&log_args![RED, "a", BOLD, "b"]);
/// assert_eq!(line.header.as_deref(), Some("%ca%cb"));
/// assert_eq!(line.styles, vec!["color:red;", "color:red;font-weight:bold;"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphicalFormatter;

impl Formatter for GraphicalFormatter {
    fn environment(&self) -> Environment {
        Environment::Graphical
    }

    fn format(&self, args: &[Arg]) -> RenderedLine {
        let mut header = String::new();
        let mut styles = Vec::new();
        let mut current = StyleAccumulator::new();

        let mut consumed = 0;
        for (i, arg) in args.iter().enumerate() {
            if let Some(token) = arg.token() {
                if !current.apply(token) {
                    break;
                }
            } else if let Some(text) = arg.primitive_text() {
                let style = current.to_style_string();
                if i > 0 || !style.is_empty() {
                    header.push_str("%c");
                    header.push_str(&text);
                    styles.push(style);
                } else {
                    header.push_str(&text);
                }
            } else {
                break;
            }
            consumed = i + 1;
        }

        let mut tail = Vec::new();
        push_tail(&args[consumed..], &mut tail, false);

        RenderedLine {
            header: (consumed > 0).then_some(header),
            styles,
            tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LogValue;
    use crate::log_args;
    use crate::style::{BLUE, BOLD, GREEN, RED, UNBOLD, UNCOLOR};
    use serde_json::json;

    fn format(args: Vec<Arg>) -> RenderedLine {
        GraphicalFormatter.format(&args)
    }

    #[test]
    fn test_leading_unstyled_primitive_is_inlined() {
        let line = format(log_args!["plain", " more"]);
        assert_eq!(line.header.as_deref(), Some("plain%c more"));
        assert_eq!(line.styles, vec![String::new()]);
    }

    #[test]
    fn test_styled_first_primitive_gets_placeholder() {
        let line = format(log_args![BLUE, "blue "]);
        assert_eq!(line.header.as_deref(), Some("%cblue "));
        assert_eq!(line.styles, vec!["color:blue;"]);
        assert!(line.tail.is_empty());
    }

    #[test]
    fn test_later_color_overwrites_earlier() {
        let line = format(log_args![GREEN, RED, "red "]);
        assert_eq!(line.styles, vec!["color:red;"]);
    }

    #[test]
    fn test_bold_then_unbold() {
        let line = format(log_args![BOLD, "bold ", UNBOLD, "nobold"]);
        assert_eq!(line.header.as_deref(), Some("%cbold %cnobold"));
        assert_eq!(
            line.styles,
            vec!["font-weight:bold;", "font-weight:normal;"]
        );
    }

    #[test]
    fn test_uncolor_sets_black() {
        let line = format(log_args![GREEN, "green ", UNCOLOR, "nocolor"]);
        assert_eq!(line.styles, vec!["color:green;", "color:black;"]);
    }

    #[test]
    fn test_opaque_values_pass_through() {
        let line = format(log_args![GREEN, "green ", json!({"k": 1}), RED, "unformatted"]);
        assert_eq!(line.header.as_deref(), Some("%cgreen "));
        assert_eq!(
            line.tail,
            vec![LogValue::Value(json!({"k": 1})), LogValue::from("unformatted")]
        );
    }

    #[test]
    fn test_opaque_first_argument_has_no_header() {
        let line = format(log_args![json!({"k": 1})]);
        assert_eq!(line.header, None);
        assert!(line.styles.is_empty());
        assert_eq!(line.into_values(), vec![LogValue::Value(json!({"k": 1}))]);
    }

    #[test]
    fn test_tokens_only_prefix_yields_empty_header() {
        let line = format(log_args![RED, json!([1])]);
        assert_eq!(line.header.as_deref(), Some(""));
        assert!(line.styles.is_empty());
        assert_eq!(line.tail, vec![LogValue::Value(json!([1]))]);
    }

    #[test]
    fn test_unknown_token_ends_prefix_and_is_dropped() {
        let custom = crate::StyleToken::create();
        let line = format(log_args![RED, "a", custom, "b"]);
        assert_eq!(line.header.as_deref(), Some("%ca"));
        assert_eq!(line.tail, vec![LogValue::from("b")]);
    }

    #[test]
    fn test_numbers_are_primitives() {
        let line = format(log_args![BOLD, 42, " items"]);
        assert_eq!(line.header.as_deref(), Some("%c42%c items"));
    }
}
