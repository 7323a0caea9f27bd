//! Virtual consoles: logging mirrored into a collapsible element tree.
//!
//! A [`VConsole`] renders every logging call it receives into a
//! [`Document`](crate::dom::Document) under a root container supplied by the
//! caller. Groups become a clickable header line followed by a nested
//! container; clicking the header shows or hides the container.
//!
//! Mutations are never applied on the caller's stack. Each operation posts
//! a closure to the owning context's task queue, and the tree only changes
//! when that queue is drained (see [`LogContext::flush`](crate::LogContext::flush)).
//! Because the queue is FIFO across every console, rendering order always
//! matches call order.
//!
//! Tree shape produced by `group(["A"])` followed by `print(["C"])`:
//!
//! ```text
//! root
//! └── div                      (line)
//!     ├── div style=…          (header: ▼ ▶ " " spans…)
//!     └── div                  (container, current after the group)
//!         └── div style=…      (line "C")
//! ```

mod spans;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::dom::{Document, NodeId, SharedDocument};
use crate::format::Arg;
use crate::queue::TaskSender;
use crate::style::{BOLD, RED};

pub(crate) use spans::line_spans;

const LINE_STYLE: &str = "font-family:monospace;border-bottom:1px solid #e2e2e2;padding:2px;";
const INDENT_PX: usize = 10;

/// The set of consoles a context mirrors output to, in registration order.
pub(crate) type Registry = Rc<RefCell<Vec<VConsole>>>;

#[derive(Debug, Clone, Copy)]
struct Cursor {
    container: NodeId,
    depth: usize,
}

struct Inner {
    document: SharedDocument,
    root: NodeId,
    cursor: Cell<Cursor>,
    tasks: TaskSender,
    registry: Weak<RefCell<Vec<VConsole>>>,
}

/// A handle to one virtual console. Clones refer to the same console.
#[derive(Clone)]
pub struct VConsole {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for VConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VConsole")
            .field("root", &self.inner.root)
            .field("depth", &self.depth())
            .finish()
    }
}

impl PartialEq for VConsole {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for VConsole {}

impl VConsole {
    /// Creates a console rendering under `root` and adds it to `registry`.
    pub(crate) fn register(
        document: SharedDocument,
        root: NodeId,
        tasks: TaskSender,
        registry: &Registry,
    ) -> Self {
        let console = VConsole {
            inner: Rc::new(Inner {
                document,
                root,
                cursor: Cell::new(Cursor {
                    container: root,
                    depth: 0,
                }),
                tasks,
                registry: Rc::downgrade(registry),
            }),
        };
        registry.borrow_mut().push(console.clone());
        console
    }

    pub fn document(&self) -> &SharedDocument {
        &self.inner.document
    }

    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// Group nesting as of the last applied task.
    pub fn depth(&self) -> usize {
        self.inner.cursor.get().depth
    }

    /// The container new lines go into, as of the last applied task.
    pub fn current_container(&self) -> NodeId {
        self.inner.cursor.get().container
    }

    fn defer<F>(&self, action: F)
    where
        F: FnOnce(&Inner) + 'static,
    {
        let inner = Rc::clone(&self.inner);
        self.inner.tasks.enqueue(move || action(&*inner));
    }

    /// Opens a group whose header shows `args`.
    pub fn group(&self, args: Vec<Arg>, collapsed: bool) {
        self.defer(move |inner| inner.render_group(&args, collapsed));
    }

    pub fn group_collapsed(&self, args: Vec<Arg>) {
        self.group(args, true);
    }

    /// Closes the innermost open group. Does nothing at depth zero.
    pub fn group_end(&self) {
        self.defer(|inner| inner.render_group_end());
    }

    /// Appends one line to the current container.
    pub fn print(&self, args: Vec<Arg>) {
        self.defer(move |inner| inner.render_line(&args));
    }

    pub fn print_error(&self, err: &dyn std::error::Error) {
        self.print(vec![Arg::Style(RED), Arg::Style(BOLD), Arg::Text(err.to_string())]);
    }

    /// Appends an image scaled to one and a half times `height` pixels.
    pub fn print_img(&self, url: &str, height: f64) {
        let url = url.to_string();
        self.defer(move |inner| inner.render_img(&url, height));
    }

    /// Appends the node `create` builds in this console's document.
    ///
    /// `create` runs when the queue reaches this action, not on the caller's
    /// stack, so it is safe to call from a document event listener.
    pub fn print_dom<F>(&self, create: F)
    where
        F: FnOnce(&mut Document) -> NodeId + 'static,
    {
        self.defer(move |inner| {
            let node = create(&mut *inner.document.borrow_mut());
            inner.append(node);
        });
    }

    /// Stops mirroring output to this console once the queue reaches it.
    pub fn destroy(&self) {
        let this = self.clone();
        self.inner.tasks.enqueue(move || {
            if let Some(registry) = this.inner.registry.upgrade() {
                registry.borrow_mut().retain(|c| *c != this);
            }
        });
    }
}

impl Inner {
    fn line_style(depth: usize) -> String {
        format!("{};padding-left:{}px", LINE_STYLE, depth * INDENT_PX)
    }

    fn append(&self, node: NodeId) {
        let container = self.cursor.get().container;
        self.document.borrow_mut().append(container, &[node]);
    }

    fn render_group(&self, args: &[Arg], collapsed: bool) {
        let Cursor { container, depth } = self.cursor.get();
        let mut doc = self.document.borrow_mut();

        let down = doc.text("▼");
        let triangle_down = doc.element(
            "span",
            vec![
                ("hidden", collapsed.into()),
                ("style", "color:grey;font-size:120%;".into()),
            ],
            vec![down],
        );
        let right = doc.text("▶");
        let triangle_right = doc.element(
            "span",
            vec![
                ("hidden", (!collapsed).into()),
                ("style", "color:grey;font-size:125%;".into()),
            ],
            vec![right],
        );
        let gap = doc.text(" ");

        let mut children = vec![triangle_down, triangle_right, gap];
        children.extend(line_spans(&mut doc, args));
        let header = doc.element(
            "div",
            vec![("style", Self::line_style(depth).into())],
            children,
        );
        let next = doc.element("div", vec![("hidden", collapsed.into())], Vec::new());
        let line = doc.element("div", Vec::new(), vec![header, next]);
        doc.append(container, &[line]);

        doc.add_event_listener(header, "click", move |doc| {
            doc.toggle_attribute(next, "hidden");
            doc.toggle_attribute(triangle_down, "hidden");
            doc.toggle_attribute(triangle_right, "hidden");
        });

        self.cursor.set(Cursor {
            container: next,
            depth: depth + 1,
        });
    }

    fn render_group_end(&self) {
        let Cursor { container, depth } = self.cursor.get();
        if depth == 0 {
            return;
        }
        // The container sits under its line div, which sits under the parent container.
        let parent = {
            let doc = self.document.borrow();
            doc.parent(container)
                .and_then(|line| doc.parent(line))
                .unwrap_or(self.root)
        };
        self.cursor.set(Cursor {
            container: parent,
            depth: depth - 1,
        });
    }

    fn render_line(&self, args: &[Arg]) {
        let Cursor { container, depth } = self.cursor.get();
        let mut doc = self.document.borrow_mut();
        let spans = line_spans(&mut doc, args);
        let line = doc.element("div", vec![("style", Self::line_style(depth).into())], spans);
        doc.append(container, &[line]);
    }

    fn render_img(&self, url: &str, height: f64) {
        let container = self.cursor.get().container;
        let mut doc = self.document.borrow_mut();
        let scaled = format!("{}px", (height * 1.5).round() as i64);
        let img = doc.element(
            "img",
            vec![("src", url.into()), ("height", scaled.into())],
            Vec::new(),
        );
        doc.append(container, &[img]);
    }
}
