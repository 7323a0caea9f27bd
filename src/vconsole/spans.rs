//! Turning an argument sequence into inline `span` elements.

use crate::dom::{Document, NodeId};
use crate::format::{canonical, Arg};
use crate::style::StyleAccumulator;

/// Builds the spans of one line.
///
/// Scans like [`GraphicalFormatter`](crate::GraphicalFormatter) does, but
/// every styled primitive becomes its own `span` carrying the accumulated
/// style inline. Empty text renders as a non-breaking space so the span keeps
/// its height. After the first opaque value, tokens are dropped and opaque
/// values are shown as padded JSON in unstyled spans.
pub(crate) fn line_spans(doc: &mut Document, args: &[Arg]) -> Vec<NodeId> {
    let mut spans = Vec::new();
    let mut current = StyleAccumulator::new();

    let mut consumed = 0;
    for (i, arg) in args.iter().enumerate() {
        if let Some(token) = arg.token() {
            if !current.apply(token) {
                break;
            }
        } else if let Some(text) = arg.primitive_text() {
            let content = if text.is_empty() {
                "\u{a0}".to_string()
            } else {
                text.into_owned()
            };
            let text = doc.text(content);
            let style = current.to_style_string();
            spans.push(doc.element("span", vec![("style", style.into())], vec![text]));
        } else {
            break;
        }
        consumed = i + 1;
    }

    for arg in &args[consumed..] {
        let content = match arg {
            Arg::Style(_) => continue,
            Arg::Value(value) => format!(" {} ", canonical(value)),
            primitive => primitive
                .primitive_text()
                .map(|t| t.into_owned())
                .unwrap_or_default(),
        };
        let text = doc.text(content);
        spans.push(doc.element("span", vec![], vec![text]));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_args;
    use crate::style::{BOLD, RED};
    use serde_json::json;

    #[test]
    fn test_styled_spans() {
        let mut doc = Document::new();
        let spans = line_spans(&mut doc, &log_args![RED, "a", BOLD, "b"]);
        assert_eq!(spans.len(), 2);
        assert_eq!(
            doc.to_html(spans[0]),
            r#"<span style="color:red;">a</span>"#
        );
        assert_eq!(
            doc.to_html(spans[1]),
            r#"<span style="color:red;font-weight:bold;">b</span>"#
        );
    }

    #[test]
    fn test_unstyled_primitive_has_empty_style() {
        let mut doc = Document::new();
        let spans = line_spans(&mut doc, &log_args!["x"]);
        assert_eq!(doc.attribute(spans[0], "style"), Some(""));
    }

    #[test]
    fn test_empty_text_becomes_nbsp() {
        let mut doc = Document::new();
        let spans = line_spans(&mut doc, &log_args![""]);
        assert_eq!(doc.text_content(spans[0]), "\u{a0}");
    }

    #[test]
    fn test_tail_rendering() {
        let mut doc = Document::new();
        let spans = line_spans(
            &mut doc,
            &log_args![RED, "a", json!({"k": 1}), BOLD, "after", 2],
        );
        assert_eq!(spans.len(), 4);
        assert_eq!(doc.to_html(spans[1]), r#"<span> {"k":1} </span>"#);
        assert_eq!(doc.text_content(spans[2]), "after");
        assert_eq!(doc.text_content(spans[3]), "2");
        assert!(!doc.has_attribute(spans[2], "style"));
    }
}
