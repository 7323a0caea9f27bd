//! Fallback strategy for outputs without styling.

use super::{push_tail, Arg, Formatter, RenderedLine};
use crate::style::Environment;

/// Formats for sinks that cannot style anything.
///
/// Styling tokens are skipped, primitives are concatenated and opaque values
/// are serialized to canonical JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn environment(&self) -> Environment {
        Environment::Plain
    }

    fn format(&self, args: &[Arg]) -> RenderedLine {
        let mut header = String::new();

        let mut consumed = 0;
        for (i, arg) in args.iter().enumerate() {
            if let Some(token) = arg.token() {
                if !token.is_styling() {
                    break;
                }
            } else if let Some(text) = arg.primitive_text() {
                header.push_str(&text);
            } else {
                break;
            }
            consumed = i + 1;
        }

        let mut tail = Vec::new();
        push_tail(&args[consumed..], &mut tail, true);

        RenderedLine {
            header: (consumed > 0).then_some(header),
            styles: Vec::new(),
            tail,
        }
    }
}
