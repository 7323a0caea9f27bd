//! The logging context: every piece of shared logging state in one place.
//!
//! A [`LogContext`] owns the formatter strategy, the native console sink,
//! the registered virtual consoles, the deferred task queue, the module
//! logger state (color rotation and last-logged timestamp) and the cached
//! module filter. Contexts are independent of one another, which keeps tests
//! isolated; the crate-level free functions use a lazily created per-thread
//! default context.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use isolog::{log_args, Capabilities, LogContext, MemorySink, BLUE};
//!
//! let sink = Rc::new(MemorySink::new());
//! let ctx = LogContext::builder()
//!     .capabilities(Capabilities::plain())
//!     .sink(Rc::clone(&sink))
//!     .build();
//!
//! ctx.print(&log_args![BLUE, "ready"]);
//! assert_eq!(sink.calls()[0].text(), "ready");
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::clock::{Clock, SystemClock};
use crate::config::LogConfig;
use crate::dom::{Canvas, Document, NodeId, SharedDocument};
use crate::format::{select_formatter, Arg, Capabilities, Formatter, LogValue};
use crate::module::{ModuleFilter, ModuleLogger, PALETTE};
use crate::queue::TaskQueue;
use crate::sink::{Channel, ConsoleSink, TermSink};
use crate::style::{Environment, ORANGE};
use crate::vconsole::{Registry, VConsole};

/// Shared logging state and the entry points that use it.
pub struct LogContext {
    capabilities: Capabilities,
    formatter: Box<dyn Formatter>,
    sink: Box<dyn ConsoleSink>,
    config: LogConfig,
    clock: Box<dyn Clock>,
    queue: TaskQueue,
    vconsoles: Registry,
    next_color: Cell<usize>,
    last_logged_at: Cell<u64>,
    filter: OnceCell<ModuleFilter>,
}

impl std::fmt::Debug for LogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogContext")
            .field("capabilities", &self.capabilities)
            .field("environment", &self.formatter.environment())
            .field("config", &self.config)
            .field("vconsoles", &self.vconsoles.borrow().len())
            .field("pending", &self.queue.pending())
            .finish()
    }
}

/// Builder for [`LogContext`].
///
/// Unset parts default to: configuration from the process environment and
/// command line, capabilities detected from that configuration, a
/// [`TermSink`], and the [`SystemClock`].
#[derive(Default)]
pub struct LogContextBuilder {
    config: Option<LogConfig>,
    capabilities: Option<Capabilities>,
    sink: Option<Box<dyn ConsoleSink>>,
    clock: Option<Box<dyn Clock>>,
}

impl LogContextBuilder {
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn sink<S: ConsoleSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn build(self) -> Rc<LogContext> {
        let config = self
            .config
            .unwrap_or_else(|| LogConfig::from_process().unwrap_or_else(|_| LogConfig::from_env()));
        let capabilities = self
            .capabilities
            .unwrap_or_else(|| Capabilities::detect(&config));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let started = clock.now_ms();

        Rc::new(LogContext {
            formatter: select_formatter(&capabilities),
            capabilities,
            sink: self.sink.unwrap_or_else(|| Box::new(TermSink::new())),
            config,
            clock,
            queue: TaskQueue::new(),
            vconsoles: Rc::new(RefCell::new(Vec::new())),
            next_color: Cell::new(0),
            last_logged_at: Cell::new(started),
            filter: OnceCell::new(),
        })
    }
}

impl LogContext {
    pub fn builder() -> LogContextBuilder {
        LogContextBuilder::default()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The environment of the formatter selected at construction.
    pub fn environment(&self) -> Environment {
        self.formatter.environment()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn emit(&self, channel: Channel, args: &[Arg]) {
        self.sink
            .write(channel, self.formatter.format(args).into_values());
    }

    /// Snapshot of the registered consoles, so tasks may unregister freely.
    fn consoles(&self) -> Vec<VConsole> {
        self.vconsoles.borrow().clone()
    }

    /// Logs one line to the native console and every virtual console.
    pub fn print(&self, args: &[Arg]) {
        self.emit(Channel::Log, args);
        for console in self.consoles() {
            console.print(args.to_vec());
        }
    }

    /// Logs a warning; virtual consoles show it in orange.
    pub fn warn(&self, args: &[Arg]) {
        self.emit(Channel::Warn, args);
        let mut highlighted = Vec::with_capacity(args.len() + 1);
        highlighted.push(Arg::Style(ORANGE));
        highlighted.extend_from_slice(args);
        for console in self.consoles() {
            console.print(highlighted.clone());
        }
    }

    /// Logs an error value.
    pub fn print_error(&self, err: &dyn std::error::Error) {
        self.sink
            .write(Channel::Error, vec![LogValue::Text(err.to_string())]);
        for console in self.consoles() {
            console.print_error(err);
        }
    }

    /// Shows an image. The native console only gets it on a graphical host.
    pub fn print_img(&self, url: &str, height: f64) {
        if self.capabilities.graphical_host {
            self.sink.write(
                Channel::Log,
                vec![
                    LogValue::from("%c                      "),
                    LogValue::Text(format!(
                        "font-size: {}px; background-size: contain; background-repeat: no-repeat; background-image: url({})",
                        crate::format::format_number(height),
                        url
                    )),
                ],
            );
        }
        for console in self.consoles() {
            console.print_img(url, height);
        }
    }

    /// Shows a base64-encoded GIF.
    pub fn print_img_base64(&self, base64: &str, height: f64) {
        self.print_img(&format!("data:image/gif;base64,{}", base64), height);
    }

    pub fn print_canvas(&self, canvas: &dyn Canvas, height: f64) {
        self.print_img(&canvas.to_data_url(), height);
    }

    /// Appends a node built by `create` to every virtual console.
    ///
    /// `create` runs once per console, against that console's document, when
    /// the queue is flushed.
    pub fn print_dom<F>(&self, create: F)
    where
        F: Fn(&mut Document) -> NodeId + 'static,
    {
        let create = Rc::new(create);
        for console in self.consoles() {
            let create = Rc::clone(&create);
            console.print_dom(move |doc| create(doc));
        }
    }

    pub fn group(&self, args: &[Arg]) {
        self.emit(Channel::Group, args);
        for console in self.consoles() {
            console.group(args.to_vec(), false);
        }
    }

    pub fn group_collapsed(&self, args: &[Arg]) {
        self.emit(Channel::GroupCollapsed, args);
        for console in self.consoles() {
            console.group_collapsed(args.to_vec());
        }
    }

    pub fn group_end(&self) {
        self.sink.write(Channel::GroupEnd, Vec::new());
        for console in self.consoles() {
            console.group_end();
        }
    }

    /// Registers a virtual console rendering under `root`.
    pub fn create_vconsole(&self, document: SharedDocument, root: NodeId) -> VConsole {
        VConsole::register(document, root, self.queue.sender(), &self.vconsoles)
    }

    /// Number of virtual consoles currently receiving output.
    pub fn vconsole_count(&self) -> usize {
        self.vconsoles.borrow().len()
    }

    /// Applies every deferred virtual console mutation, in call order.
    ///
    /// Returns the number of actions run.
    pub fn flush(&self) -> usize {
        self.queue.run_pending()
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// The module filter, read from the configuration on first use.
    pub fn module_filter(&self) -> &ModuleFilter {
        self.filter
            .get_or_init(|| ModuleFilter::parse_lossy(self.config.filter.as_deref()))
    }

    /// Creates a logger for `name`, assigning the next palette color.
    pub fn create_module_logger(self: &Rc<Self>, name: &str) -> ModuleLogger {
        let index = self.next_color.get();
        self.next_color.set(index + 1);
        let color = PALETTE[index % PALETTE.len()];

        let context = self
            .module_filter()
            .matches(name)
            .then(|| Rc::clone(self));
        ModuleLogger::new(name, color, context)
    }

    /// How many module loggers this context has created.
    pub fn module_loggers_created(&self) -> usize {
        self.next_color.get()
    }

    /// Timestamp of the most recent module log line, in milliseconds.
    pub fn last_logged_at(&self) -> u64 {
        self.last_logged_at.get()
    }

    /// Records a module log line now and returns the time since the last one.
    pub(crate) fn tick(&self) -> u64 {
        let now = self.clock.now_ms();
        let elapsed = now.saturating_sub(self.last_logged_at.get());
        self.last_logged_at.set(now);
        elapsed
    }
}
