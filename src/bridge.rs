//! Routing records from the `log` facade into module loggers.
//!
//! Libraries that log through the `log` crate can be shown with the same
//! filtering, coloring and timing as native module loggers:
//!
//! ```rust,no_run
//! isolog::bridge::init(log::LevelFilter::Debug).unwrap();
//! log::info!(target: "db", "connected");
//! ```
//!
//! Records below `Warn` go to a module logger named after the record's
//! target, so the `log` filter setting applies to them. Warnings and errors
//! are always shown, on the warning channel, prefixed with the target.
//! Records are handled by the calling thread's default context (see
//! [`set_default_context`](crate::set_default_context)).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::context::LogContext;
use crate::format::Arg;
use crate::module::ModuleLogger;
use crate::style::{BOLD, RED, UNBOLD};

/// Module loggers created for record targets, valid for one context.
#[derive(Default)]
struct ModuleCache {
    context: Weak<LogContext>,
    loggers: HashMap<String, ModuleLogger>,
}

impl ModuleCache {
    fn logger(&mut self, context: &Rc<LogContext>, target: &str) -> &ModuleLogger {
        if !self.context.ptr_eq(&Rc::downgrade(context)) {
            self.context = Rc::downgrade(context);
            self.loggers.clear();
        }
        self.loggers
            .entry(target.to_string())
            .or_insert_with(|| context.create_module_logger(target))
    }
}

thread_local! {
    static MODULES: RefCell<ModuleCache> = RefCell::new(ModuleCache::default());
}

/// A [`Log`] implementation backed by the per-thread default context.
#[derive(Debug, Clone, Copy)]
pub struct LogBridge {
    level: LevelFilter,
}

impl LogBridge {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target();
        let message = record.args().to_string();
        let context = crate::default_context();
        match record.level() {
            Level::Error => context.warn(&[
                Arg::Style(RED),
                Arg::Style(BOLD),
                Arg::Text(format!("{}: ", target)),
                Arg::Style(UNBOLD),
                Arg::Text(message),
            ]),
            Level::Warn => context.warn(&[Arg::Text(format!("{}: ", target)), Arg::Text(message)]),
            _ => {
                let logger = MODULES.with(|modules| {
                    modules.borrow_mut().logger(&context, target).clone()
                });
                logger.log([Arg::Text(message)]);
            }
        }
    }

    /// Applies the default context's pending virtual console updates.
    fn flush(&self) {
        crate::flush();
    }
}

/// Installs a [`LogBridge`] as the global `log` logger.
///
/// # Errors
///
/// Fails if another logger was installed first.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
