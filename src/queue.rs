//! Deferred, strictly FIFO task execution.
//!
//! Producers hold a [`TaskSender`] and post boxed closures through a channel;
//! the owner of the [`TaskQueue`] drains it with [`TaskQueue::run_pending`].
//! Every producer shares the same channel, so actions run in exactly the
//! order they were posted, across all producers. Nothing is ever cancelled.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A deferred action.
pub type Task = Box<dyn FnOnce()>;

/// Posting side of a [`TaskQueue`].
#[derive(Clone)]
pub struct TaskSender {
    tx: Sender<Task>,
    pending: Rc<Cell<usize>>,
}

impl TaskSender {
    /// Posts an action. Actions posted after the queue is dropped are discarded.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        if self.tx.send(Box::new(task)).is_ok() {
            self.pending.set(self.pending.get() + 1);
        }
    }
}

impl std::fmt::Debug for TaskSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSender")
            .field("pending", &self.pending.get())
            .finish()
    }
}

/// Single-threaded FIFO of deferred actions.
pub struct TaskQueue {
    sender: TaskSender,
    rx: Receiver<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            sender: TaskSender {
                tx,
                pending: Rc::new(Cell::new(0)),
            },
            rx,
        }
    }

    /// A new producer handle for this queue.
    pub fn sender(&self) -> TaskSender {
        self.sender.clone()
    }

    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.sender.enqueue(task);
    }

    /// Number of posted actions that have not run yet.
    pub fn pending(&self) -> usize {
        self.sender.pending.get()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Runs actions until the queue is empty, including any posted by the
    /// actions themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            self.sender.pending.set(self.sender.pending.get().saturating_sub(1));
            task();
            ran += 1;
        }
        ran
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
