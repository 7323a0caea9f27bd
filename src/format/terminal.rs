//! Terminal strategy: ANSI escape sequences written inline.

use super::{push_tail, Arg, Formatter, RenderedLine};
use crate::style::{Environment, RESET};

/// Formats for ANSI terminals.
///
/// Tokens emit their escape sequence at the point they appear, so the
/// terminal itself carries the accumulated state. A reset is appended to the
/// header so styling never leaks into the tail or the next line.
///
/// ```rust
/// use isolog::{log_args, Formatter, TerminalFormatter, BLUE};
///
/// let line = TerminalFormatter.format(&log_args![BLUE, "blue "]);
/// assert_eq!(line.header.as_deref(), Some("\x1b[34mblue \x1b[0m"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalFormatter;

impl Formatter for TerminalFormatter {
    fn environment(&self) -> Environment {
        Environment::Terminal
    }

    fn format(&self, args: &[Arg]) -> RenderedLine {
        let mut header = String::new();

        let mut consumed = 0;
        for (i, arg) in args.iter().enumerate() {
            if let Some(token) = arg.token() {
                match token.escape() {
                    Some(sequence) => header.push_str(sequence),
                    None => break,
                }
            } else if let Some(text) = arg.primitive_text() {
                header.push_str(&text);
            } else {
                break;
            }
            consumed = i + 1;
        }

        let header = (consumed > 0).then(|| {
            header.push_str(RESET);
            header
        });

        let mut tail = Vec::new();
        push_tail(&args[consumed..], &mut tail, true);

        RenderedLine {
            header,
            styles: Vec::new(),
            tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LogValue;
    use crate::log_args;
    use crate::style::{BLUE, BOLD, GREEN, RED, UNBOLD};
    use serde_json::json;

    fn format(args: Vec<Arg>) -> RenderedLine {
        TerminalFormatter.format(&args)
    }

    #[test]
    fn test_blue_scenario() {
        let line = format(log_args![BLUE, "blue "]);
        let values = line.into_values();
        assert_eq!(values.len(), 1);
        let text = values[0].as_text().unwrap();
        assert!(text.starts_with("\x1b[34m"));
        assert!(text.contains("blue "));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_primitives_only_compose_into_one_element() {
        let line = format(log_args!["a", 1, "b"]);
        assert_eq!(line.header.as_deref(), Some("a1b\x1b[0m"));
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn test_overwritten_color_shows_red_last() {
        let line = format(log_args![GREEN, RED, "red "]);
        let header = line.header.unwrap();
        let visible = console::strip_ansi_codes(&header);
        assert_eq!(visible, "red ");
        let red_at = header.find("\x1b[31m").unwrap();
        let text_at = header.find("red ").unwrap();
        assert!(header.find("\x1b[32m").unwrap() < red_at);
        assert!(red_at < text_at);
    }

    #[test]
    fn test_bold_reverts_before_nobold() {
        let header = format(log_args![BOLD, "bold ", UNBOLD, "nobold"])
            .header
            .unwrap();
        assert_eq!(header, "\x1b[1mbold \x1b[2mnobold\x1b[0m");
    }

    #[test]
    fn test_tail_is_serialized() {
        let line = format(log_args![GREEN, "green ", json!({"my-object": "isLogged"}), "unformatted"]);
        assert_eq!(
            line.tail,
            vec![
                LogValue::from(r#"{"my-object":"isLogged"}"#),
                LogValue::from("unformatted")
            ]
        );
    }

    #[test]
    fn test_opaque_first_argument_has_no_header() {
        let line = format(log_args![json!({"my-object": "isLogged"})]);
        assert_eq!(line.header, None);
        assert_eq!(line.tail.len(), 1);
    }

    #[test]
    fn test_empty_call() {
        assert!(format(Vec::new()).is_empty());
    }
}
