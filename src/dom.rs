//! A small retained element tree.
//!
//! [`Document`] stores nodes in an arena and hands out [`NodeId`] handles.
//! Handles are plain indices, so holding one never keeps a node alive or
//! borrows the document; a virtual console's "current container" is just a
//! `NodeId` it looks up again on every mutation.
//!
//! The API mirrors what a host document offers: create elements and text,
//! append, set and toggle attributes, register event listeners and dispatch
//! events. [`Document::to_html`] serializes a subtree for inspection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A document shared between a virtual console and its owner.
pub type SharedDocument = Rc<RefCell<Document>>;

type Listener = Rc<dyn Fn(&mut Document)>;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Attribute value accepted by [`Document::element`].
///
/// `Flag(true)` sets an empty attribute, `Flag(false)` leaves it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Flag(bool),
    Str(String),
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        AttrValue::Flag(flag)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// Arena-backed element tree with event listeners.
#[derive(Default)]
pub struct Document {
    nodes: Vec<Node>,
    listeners: HashMap<(NodeId, String), Vec<Listener>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document wrapped for sharing.
    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Creates a detached element with the given attributes and children.
    pub fn element(
        &mut self,
        tag: &str,
        attributes: Vec<(&str, AttrValue)>,
        children: Vec<NodeId>,
    ) -> NodeId {
        let attributes = attributes
            .into_iter()
            .filter_map(|(name, value)| match value {
                AttrValue::Flag(false) => None,
                AttrValue::Flag(true) => Some((name.to_string(), String::new())),
                AttrValue::Str(value) => Some((name.to_string(), value)),
            })
            .collect();
        let id = self.push(NodeKind::Element {
            tag: tag.to_string(),
            attributes,
        });
        self.append(id, &children);
        id
    }

    /// Creates a detached text node.
    pub fn text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(content.into()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `children` to `parent`, detaching them from any previous parent.
    ///
    /// A child that is `parent` itself or one of its ancestors is skipped,
    /// since moving it would detach it from the tree into a cycle.
    pub fn append(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            if self.is_inclusive_ancestor(child, parent) {
                continue;
            }
            if let Some(old) = self.nodes[child.0].parent.take() {
                self.nodes[old.0].children.retain(|c| *c != child);
            }
            self.nodes[child.0].parent = Some(parent);
            self.nodes[parent.0].children.push(child);
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// The tag name, `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            let value = value.into();
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = value,
                None => attributes.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.retain(|(n, _)| n != name);
        }
    }

    /// Flips a boolean attribute. Returns whether it is now present.
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str) -> bool {
        if self.has_attribute(node, name) {
            self.remove_attribute(node, name);
            false
        } else {
            self.set_attribute(node, name, "");
            true
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn add_event_listener<F>(&mut self, node: NodeId, event: &str, listener: F)
    where
        F: Fn(&mut Document) + 'static,
    {
        self.listeners
            .entry((node, event.to_string()))
            .or_default()
            .push(Rc::new(listener));
    }

    /// Runs every listener registered for `event` on `node`.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&mut self, node: NodeId, event: &str) -> usize {
        let listeners = match self.listeners.get(&(node, event.to_string())) {
            Some(listeners) => listeners.clone(),
            None => return 0,
        };
        for listener in &listeners {
            listener(self);
        }
        listeners.len()
    }

    pub fn click(&mut self, node: NodeId) -> usize {
        self.dispatch(node, "click")
    }

    /// Serializes the subtree rooted at `node`.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    if value.is_empty() {
                        let _ = write!(out, " {}", name);
                    } else {
                        let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
                    }
                }
                out.push('>');
                if tag == "img" {
                    return;
                }
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders `property:value;` pairs into an inline style string.
pub fn map_to_style_string<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    entries
        .into_iter()
        .map(|(property, value)| format!("{}:{};", property, value))
        .collect()
}

/// A drawing surface that can export itself as an image.
pub trait Canvas {
    /// A `data:` URL of the current contents.
    fn to_data_url(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_element_with_children() {
        let mut doc = Document::new();
        let text = doc.text("hi");
        let span = doc.element("span", vec![("style", "color:red;".into())], vec![text]);
        assert_eq!(doc.parent(text), Some(span));
        assert_eq!(doc.tag(span), Some("span"));
        assert_eq!(doc.tag(text), None);
        assert_eq!(doc.to_html(span), r#"<span style="color:red;">hi</span>"#);
    }

    #[test]
    fn test_flag_attributes() {
        let mut doc = Document::new();
        let shown = doc.element("div", vec![("hidden", false.into())], vec![]);
        let hidden = doc.element("div", vec![("hidden", true.into())], vec![]);
        assert!(!doc.has_attribute(shown, "hidden"));
        assert!(doc.has_attribute(hidden, "hidden"));
        assert_eq!(doc.to_html(hidden), "<div hidden></div>");
    }

    #[test]
    fn test_toggle_attribute() {
        let mut doc = Document::new();
        let div = doc.element("div", vec![], vec![]);
        assert!(doc.toggle_attribute(div, "hidden"));
        assert!(doc.has_attribute(div, "hidden"));
        assert!(!doc.toggle_attribute(div, "hidden"));
        assert!(!doc.has_attribute(div, "hidden"));
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let a = doc.element("div", vec![], vec![]);
        let b = doc.element("div", vec![], vec![]);
        let child = doc.text("x");
        doc.append(a, &[child]);
        doc.append(b, &[child]);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::new();
        let leaf = doc.element("span", vec![], vec![]);
        let mid = doc.element("div", vec![], vec![leaf]);
        let top = doc.element("div", vec![], vec![mid]);

        doc.append(leaf, &[top]);
        doc.append(mid, &[mid]);

        assert_eq!(doc.parent(top), None);
        assert_eq!(doc.parent(mid), Some(top));
        assert!(doc.children(leaf).is_empty());
        assert_eq!(doc.to_html(top), "<div><div><span></span></div></div>");
    }

    #[test]
    fn test_listeners_receive_document() {
        let mut doc = Document::new();
        let target = doc.element("div", vec![], vec![]);
        let other = doc.element("div", vec![], vec![]);
        doc.add_event_listener(target, "click", move |doc| {
            doc.toggle_attribute(other, "hidden");
        });
        assert_eq!(doc.click(target), 1);
        assert!(doc.has_attribute(other, "hidden"));
        assert_eq!(doc.click(other), 0);
    }

    #[test]
    fn test_dispatch_counts_every_listener() {
        let mut doc = Document::new();
        let target = doc.element("div", vec![], vec![]);
        let hits = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let hits = Rc::clone(&hits);
            doc.add_event_listener(target, "click", move |_| hits.set(hits.get() + 1));
        }
        assert_eq!(doc.dispatch(target, "click"), 2);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_html_escaping() {
        let mut doc = Document::new();
        let text = doc.text("<a & b>\u{a0}");
        let div = doc.element("div", vec![("title", "\"q\"".into())], vec![text]);
        assert_eq!(
            doc.to_html(div),
            r#"<div title="&quot;q&quot;">&lt;a &amp; b&gt;&nbsp;</div>"#
        );
        assert_eq!(doc.text_content(div), "<a & b>\u{a0}");
    }

    #[test]
    fn test_map_to_style_string() {
        assert_eq!(
            map_to_style_string([("color", "red"), ("font-weight", "bold")]),
            "color:red;font-weight:bold;"
        );
        assert_eq!(map_to_style_string(Vec::<(&str, &str)>::new()), "");
    }
}
