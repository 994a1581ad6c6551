//! Millisecond tick clock and the cooperative task scheduler

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Elapsed milliseconds, advanced by a single ticker thread
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    elapsed: Arc<AtomicU64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.elapsed.load(Ordering::Acquire)
    }

    pub fn advance(&self, ms: u64) {
        self.elapsed.fetch_add(ms, Ordering::AcqRel);
    }
}

/// Handle to the running ticker thread; stops it on drop
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a thread advancing `clock` by `tick_ms` every `tick_ms`
    pub fn spawn(clock: TickClock, tick_ms: u64) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = Duration::from_millis(tick_ms.max(1));

        let handle = thread::Builder::new()
            .name("tick".to_string())
            .spawn(move || {
                while flag.load(Ordering::Relaxed) {
                    thread::sleep(period);
                    clock.advance(tick_ms.max(1));
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Identifier returned by [`Scheduler::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

#[derive(Debug)]
struct Task {
    period_ms: u64,
    last_run_ms: Option<u64>,
}

/// Periodic tasks run from the UI loop
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, period_ms: u64) -> TaskId {
        self.tasks.push(Task {
            period_ms,
            last_run_ms: None,
        });
        TaskId(self.tasks.len() - 1)
    }

    /// Tasks due at `now_ms`, marked as run. A new task is due immediately.
    pub fn due(&mut self, now_ms: u64) -> Vec<TaskId> {
        let mut due = Vec::new();
        for (idx, task) in self.tasks.iter_mut().enumerate() {
            let ready = match task.last_run_ms {
                None => true,
                Some(last) => now_ms.saturating_sub(last) >= task.period_ms,
            };
            if ready {
                task.last_run_ms = Some(now_ms);
                due.push(TaskId(idx));
            }
        }
        due
    }
}
