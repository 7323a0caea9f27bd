//! Native console outputs.
//!
//! A [`ConsoleSink`] receives the already formatted values of each call on
//! one of several [`Channel`]s. [`TermSink`] writes to the process's
//! stdout/stderr through the `console` crate; [`MemorySink`] records calls
//! for tests or for hosts that forward them elsewhere.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use console::Term;

use crate::format::LogValue;

/// Which console method a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Log,
    Warn,
    Error,
    Group,
    GroupCollapsed,
    GroupEnd,
}

/// The native console.
///
/// Sinks never report failures: a logging call must not fail its caller.
pub trait ConsoleSink {
    fn write(&self, channel: Channel, values: Vec<LogValue>);
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Rc<S> {
    fn write(&self, channel: Channel, values: Vec<LogValue>) {
        (**self).write(channel, values)
    }
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Box<S> {
    fn write(&self, channel: Channel, values: Vec<LogValue>) {
        (**self).write(channel, values)
    }
}

/// Joins values the way a console prints multiple arguments.
pub fn join_values(values: &[LogValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes to stdout (log, groups) and stderr (warnings, errors).
///
/// Group headers indent every following line by two spaces until the
/// matching group end.
#[derive(Debug)]
pub struct TermSink {
    out: Term,
    err: Term,
    depth: Cell<usize>,
}

impl TermSink {
    pub fn new() -> Self {
        Self::with_terms(Term::stdout(), Term::stderr())
    }

    pub fn with_terms(out: Term, err: Term) -> Self {
        Self {
            out,
            err,
            depth: Cell::new(0),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn line(&self, values: &[LogValue]) -> String {
        let indent = "  ".repeat(self.depth.get());
        let text = join_values(values);
        text.lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink for TermSink {
    fn write(&self, channel: Channel, values: Vec<LogValue>) {
        match channel {
            Channel::Log => {
                let _ = self.out.write_line(&self.line(&values));
            }
            Channel::Warn | Channel::Error => {
                let _ = self.err.write_line(&self.line(&values));
            }
            Channel::Group | Channel::GroupCollapsed => {
                if !values.is_empty() {
                    let _ = self.out.write_line(&self.line(&values));
                }
                self.depth.set(self.depth.get() + 1);
            }
            Channel::GroupEnd => self.depth.set(self.depth.get().saturating_sub(1)),
        }
    }
}

/// One recorded console call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleCall {
    pub channel: Channel,
    pub values: Vec<LogValue>,
}

impl ConsoleCall {
    /// The values joined with spaces.
    pub fn text(&self) -> String {
        join_values(&self.values)
    }
}

/// Records every call in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    calls: RefCell<Vec<ConsoleCall>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Ref<'_, Vec<ConsoleCall>> {
        self.calls.borrow()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<ConsoleCall> {
        self.calls.take()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

impl ConsoleSink for MemorySink {
    fn write(&self, channel: Channel, values: Vec<LogValue>) {
        self.calls.borrow_mut().push(ConsoleCall { channel, values });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.write(Channel::Log, vec![LogValue::from("a")]);
        sink.write(Channel::Warn, vec![LogValue::from("b"), LogValue::Number(1.0)]);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.calls()[1].channel, Channel::Warn);
        assert_eq!(sink.calls()[1].text(), "b 1");
        let taken = sink.take();
        assert_eq!(taken.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_sink_through_rc() {
        let sink = Rc::new(MemorySink::new());
        let boxed: Box<dyn ConsoleSink> = Box::new(Rc::clone(&sink));
        boxed.write(Channel::Error, vec![LogValue::from("boom")]);
        assert_eq!(sink.calls()[0].text(), "boom");
    }

    #[test]
    fn test_term_sink_tracks_group_depth() {
        let sink = TermSink::new();
        sink.write(Channel::GroupEnd, Vec::new());
        assert_eq!(sink.depth(), 0);
        sink.write(Channel::Group, Vec::new());
        sink.write(Channel::GroupCollapsed, Vec::new());
        assert_eq!(sink.depth(), 2);
        assert_eq!(sink.line(&[LogValue::from("a\nb")]), "    a\n    b");
        sink.write(Channel::GroupEnd, Vec::new());
        assert_eq!(sink.depth(), 1);
    }
}
