//! Deferred work: the scheduling primitive the engine depends on, and a
//! channel-backed queue that a host loop can drive.

use core::cmp::Ordering;
use core::time::Duration;
use std::collections::BinaryHeap;

use flume::{Receiver, Sender};

use crate::{Engine, Result};

/// A unit of deferred work that runs against the engine.
///
/// Whatever the task returns is handed back to the code that ran it, so an
/// `Err` from an action function surfaces at the queue driver.
pub struct Task(Box<dyn FnOnce(&mut Engine) -> Result<()> + 'static>);

impl Task {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Engine) -> Result<()> + 'static,
    {
        Self(Box::new(f))
    }

    pub fn run(self, engine: &mut Engine) -> Result<()> {
        (self.0)(engine)
    }
}

/// The single timing primitive the engine needs: run `task` after `delay`.
///
/// Bridge this to your toolkit's timer (an `after` call, an idle callback, ...)
/// or use [`TaskQueue`]. Closures with the matching signature implement it
/// via the blanket implementation.
pub trait Scheduler {
    fn schedule_after(&self, delay: Duration, task: Task);
}

impl<F> Scheduler for F
where
    F: Fn(Duration, Task),
{
    fn schedule_after(&self, delay: Duration, task: Task) {
        self(delay, task)
    }
}

/// Handle that submits tasks to a [`TaskQueue`].
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct QueueScheduler(Sender<(Duration, Task)>);

impl Scheduler for QueueScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) {
        // The queue may already be gone during shutdown.
        self.0.send((delay, task)).ok();
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest due task first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Ordered task queue with a virtual clock.
///
/// Tasks submitted through [`scheduler`](Self::scheduler) become due
/// `delay` after the queue time at which they were received. The host loop
/// moves the clock with [`advance`](Self::advance); due tasks run in due-time
/// order, ties broken by submission order. Nothing runs on submission.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use hive_ui::{Engine, Task, TaskQueue};
///
/// let mut queue = TaskQueue::new();
/// let mut engine = Engine::new(queue.scheduler());
///
/// engine.schedule_after(Duration::from_millis(50), Task::new(|_engine| Ok(())));
///
/// assert_eq!(queue.advance(&mut engine, Duration::from_millis(10)).unwrap(), 0);
/// assert_eq!(queue.advance(&mut engine, Duration::from_millis(40)).unwrap(), 1);
/// ```
pub struct TaskQueue {
    sender: Sender<(Duration, Task)>,
    receiver: Receiver<(Duration, Task)>,
    pending: BinaryHeap<Pending>,
    now: Duration,
    next_seq: u64,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            pending: BinaryHeap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// A handle for the engine (or anything else) to submit tasks with.
    pub fn scheduler(&self) -> QueueScheduler {
        QueueScheduler(self.sender.clone())
    }

    /// Current queue time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks submitted and not yet run.
    pub fn len(&self) -> usize {
        self.pending.len() + self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the clock forward by `elapsed`, running every task that falls due.
    ///
    /// Tasks scheduled by running tasks are picked up in the same call if
    /// they fall due before the new time. Returns how many tasks ran. The
    /// first task error stops the advance and is returned; the clock then
    /// stays at that task's due time and later tasks stay queued.
    pub fn advance(&mut self, engine: &mut Engine, elapsed: Duration) -> Result<usize> {
        let target = self.now + elapsed;
        let mut ran = 0;

        loop {
            self.collect();
            match self.pending.peek() {
                Some(next) if next.due <= target => {}
                _ => break,
            }
            if let Some(next) = self.pending.pop() {
                self.now = next.due;
                next.task.run(engine)?;
                ran += 1;
            }
        }

        self.now = target;
        Ok(ran)
    }

    /// Run tasks, jumping the clock to each due time, until nothing is left.
    ///
    /// Does not return while tasks keep rescheduling themselves.
    pub fn run_until_idle(&mut self, engine: &mut Engine) -> Result<usize> {
        let mut ran = 0;

        loop {
            self.collect();
            let Some(next) = self.pending.pop() else {
                break;
            };
            self.now = self.now.max(next.due);
            next.task.run(engine)?;
            ran += 1;
        }

        Ok(ran)
    }

    fn collect(&mut self) {
        while let Ok((delay, task)) = self.receiver.try_recv() {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.pending.push(Pending {
                due: self.now + delay,
                seq,
                task,
            });
        }
    }
}
