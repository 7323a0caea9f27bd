//! # isolog: styled logging for terminals, rich consoles and plain text
//!
//! `isolog` takes one logging call, a mixed sequence of style tokens and
//! values, and renders it for whatever console the process has:
//!
//! - **Terminal**: ANSI escape sequences
//! - **Graphical**: `%c` placeholders with CSS, for consoles that style them
//! - **Plain**: bare text, opaque values serialized as JSON
//!
//! The same calls can be mirrored into any number of [`VConsole`]s, which
//! render them as a collapsible element tree, and wrapped by
//! [`ModuleLogger`]s that add a colored name, filtering and timing.
//!
//! ## Quick start
//!
//! ```rust
//! use isolog::{log_args, mlog, BLUE, BOLD, UNBOLD};
//!
//! isolog::print(&log_args![BLUE, "blue ", BOLD, "and bold ", UNBOLD, "and not"]);
//!
//! // Enabled with `LOG=sync` (or `LOG=*`), otherwise a no-op.
//! let log = isolog::create_module_logger("sync");
//! mlog!(log, "applied ", 3, " updates");
//! ```
//!
//! ## Concepts
//!
//! ### Style tokens
//!
//! [`StyleToken`]s are opaque markers compared by identity. The predefined
//! ones ([`BOLD`], [`UNBOLD`], [`BLUE`], [`GREY`], [`GREEN`], [`RED`],
//! [`PURPLE`], [`ORANGE`], [`UNCOLOR`]) style every value after them until
//! overridden. Tokens of different kinds compose: `BOLD` then `RED` is bold
//! red, while `GREEN` then `RED` is just red.
//!
//! ### Prefix and tail
//!
//! Formatting folds the leading run of tokens, text and numbers into one
//! styled header. The first opaque value (any [`serde_json::Value`] that is
//! not a string or number) ends the run; the remaining arguments are
//! appended as they are, minus tokens.
//!
//! ### Contexts
//!
//! All shared state lives in a [`LogContext`]. The free functions in this
//! crate use a per-thread default context created on first use from the
//! process environment (see [`config`]). Build your own context with
//! [`LogContext::builder`] to pick capabilities, sinks and clocks explicitly,
//! and install it for the thread with [`set_default_context`].
//!
//! ### Deferred rendering
//!
//! Virtual console updates are queued, not applied on the spot. Call
//! [`flush`] (or [`LogContext::flush`]) from your host's loop to apply them.

pub mod bridge;
pub mod clock;
pub mod config;
mod context;
pub mod dom;
mod error;
mod format;
mod module;
pub mod queue;
pub mod sink;
mod style;
mod vconsole;

use std::cell::RefCell;
use std::rc::Rc;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ColorChoice, LogConfig};
pub use context::{LogContext, LogContextBuilder};
pub use dom::{Canvas, Document, NodeId, SharedDocument};
pub use error::{Error, Result};
pub use format::{
    canonical, format_number, formatter_for, select_formatter, Arg, Capabilities, Formatter,
    GraphicalFormatter, LogValue, PlainFormatter, RenderedLine, TerminalFormatter,
};
pub use module::{ModuleFilter, ModuleLogger, PALETTE};
pub use sink::{Channel, ConsoleCall, ConsoleSink, MemorySink, TermSink};
pub use style::{
    Directive, Environment, StyleAccumulator, StyleToken, BLUE, BOLD, GREEN, GREY, ORANGE, PURPLE,
    RED, RESET, UNBOLD, UNCOLOR,
};
pub use vconsole::VConsole;

thread_local! {
    static DEFAULT_CONTEXT: RefCell<Option<Rc<LogContext>>> = const { RefCell::new(None) };
}

/// The calling thread's default context, created on first use.
pub fn default_context() -> Rc<LogContext> {
    DEFAULT_CONTEXT.with(|slot| {
        let mut slot = slot.borrow_mut();
        Rc::clone(slot.get_or_insert_with(|| LogContext::builder().build()))
    })
}

/// Makes `context` the calling thread's default context, returning the
/// previous one if it had been created.
///
/// The free functions and the [`bridge`] use the new context from the next
/// call on.
pub fn set_default_context(context: Rc<LogContext>) -> Option<Rc<LogContext>> {
    DEFAULT_CONTEXT.with(|slot| slot.borrow_mut().replace(context))
}

fn with_default<R>(f: impl FnOnce(&Rc<LogContext>) -> R) -> R {
    let context = default_context();
    f(&context)
}

/// Logs one line. See [`LogContext::print`].
pub fn print(args: &[Arg]) {
    with_default(|ctx| ctx.print(args))
}

/// Logs a warning. See [`LogContext::warn`].
pub fn warn(args: &[Arg]) {
    with_default(|ctx| ctx.warn(args))
}

/// Logs an error value. See [`LogContext::print_error`].
pub fn print_error(err: &dyn std::error::Error) {
    with_default(|ctx| ctx.print_error(err))
}

pub fn print_img(url: &str, height: f64) {
    with_default(|ctx| ctx.print_img(url, height))
}

pub fn print_img_base64(base64: &str, height: f64) {
    with_default(|ctx| ctx.print_img_base64(base64, height))
}

pub fn print_canvas(canvas: &dyn Canvas, height: f64) {
    with_default(|ctx| ctx.print_canvas(canvas, height))
}

pub fn print_dom<F>(create: F)
where
    F: Fn(&mut Document) -> NodeId + 'static,
{
    with_default(|ctx| ctx.print_dom(create))
}

pub fn group(args: &[Arg]) {
    with_default(|ctx| ctx.group(args))
}

pub fn group_collapsed(args: &[Arg]) {
    with_default(|ctx| ctx.group_collapsed(args))
}

pub fn group_end() {
    with_default(|ctx| ctx.group_end())
}

/// Creates a module logger on the default context.
pub fn create_module_logger(name: &str) -> ModuleLogger {
    with_default(|ctx| ctx.create_module_logger(name))
}

/// Registers a virtual console on the default context.
pub fn create_vconsole(document: SharedDocument, root: NodeId) -> VConsole {
    with_default(|ctx| ctx.create_vconsole(document, root))
}

/// Applies the default context's pending virtual console updates.
pub fn flush() -> usize {
    with_default(|ctx| ctx.flush())
}

/// Builds a `Vec<Arg>` from anything convertible into [`Arg`].
///
/// ```rust
/// use isolog::{log_args, Arg, RED};
///
/// let args = log_args![RED, "x", 1.5];
/// assert_eq!(args, vec![Arg::Style(RED), Arg::Text("x".into()), Arg::Number(1.5)]);
/// ```
#[macro_export]
macro_rules! log_args {
    ($($arg:expr),* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::Arg> = ::std::vec![$($crate::Arg::from($arg)),*];
        args
    }};
}

/// Logs through a [`ModuleLogger`], evaluating the arguments only when the
/// logger is enabled.
///
/// ```rust
/// use isolog::{mlog, LogConfig, LogContext, Capabilities};
///
/// let ctx = LogContext::builder()
///     .config(LogConfig::default())
///     .capabilities(Capabilities::plain())
///     .build();
/// let log = ctx.create_module_logger("quiet");
/// mlog!(log, "never built: ", expensive());
/// # fn expensive() -> u32 { unreachable!() }
/// ```
#[macro_export]
macro_rules! mlog {
    ($logger:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.is_enabled() {
            logger.log($crate::log_args![$($arg),*]);
        }
    }};
}
