//! Left-to-right accumulation of CSS declarations.

use super::token::StyleToken;
use crate::dom::map_to_style_string;

/// The style in effect while scanning an argument sequence.
///
/// Keeps one value per property in first-insertion order. Setting a property
/// that is already present replaces its value in place, so `BOLD` followed by
/// `RED` yields both declarations while `GREEN` followed by `RED` yields only
/// `color:red`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleAccumulator {
    entries: Vec<(&'static str, &'static str)>,
}

impl StyleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the token's CSS declaration.
    ///
    /// Returns `false` without touching the accumulator when the token has no
    /// graphical directive.
    pub fn apply(&mut self, token: StyleToken) -> bool {
        match token.css() {
            Some((property, value)) => {
                self.set(property, value);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, property: &'static str, value: &'static str) {
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the declarations as `property:value;` pairs.
    pub fn to_style_string(&self) -> String {
        map_to_style_string(self.entries.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BOLD, GREEN, RED, UNBOLD};

    #[test]
    fn test_empty_accumulator_renders_nothing() {
        let acc = StyleAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.to_style_string(), "");
    }

    #[test]
    fn test_same_property_overwrites() {
        let mut acc = StyleAccumulator::new();
        acc.apply(GREEN);
        acc.apply(RED);
        assert_eq!(acc.get("color"), Some("red"));
        assert_eq!(acc.to_style_string(), "color:red;");
    }

    #[test]
    fn test_distinct_properties_compose() {
        let mut acc = StyleAccumulator::new();
        acc.apply(BOLD);
        acc.apply(RED);
        assert_eq!(acc.to_style_string(), "font-weight:bold;color:red;");
    }

    #[test]
    fn test_overwrite_keeps_first_insertion_position() {
        let mut acc = StyleAccumulator::new();
        acc.apply(BOLD);
        acc.apply(RED);
        acc.apply(UNBOLD);
        assert_eq!(acc.to_style_string(), "font-weight:normal;color:red;");
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let mut acc = StyleAccumulator::new();
        assert!(!acc.apply(crate::StyleToken::create()));
        assert!(acc.is_empty());
    }
}
