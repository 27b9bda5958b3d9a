//! Fight dispatch queue
//!
//! Unbounded FIFO between the movement loop (producer) and the combat loop
//! (consumer). It has its own mutex so a producer never waits on the
//! registry lock and vice versa.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::types::EntityId;

/// Request for `attacker` to fight `defender`
///
/// Captured at detection time; either side may be dead by the time it is
/// processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FightTask {
    pub attacker: EntityId,
    pub defender: EntityId,
}

impl FightTask {
    pub fn new(attacker: EntityId, defender: EntityId) -> Self {
        Self { attacker, defender }
    }
}

#[derive(Debug, Default)]
pub struct FightQueue {
    tasks: Mutex<VecDeque<FightTask>>,
    available: Condvar,
}

impl FightQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task and wake one waiting consumer
    pub fn push(&self, task: FightTask) {
        self.tasks.lock().push_back(task);
        self.available.notify_one();
    }

    /// Take the oldest task, waiting up to `wait` for one to arrive
    ///
    /// Returns `None` when the wait runs out or `running` is cleared while
    /// the queue is empty. An empty result is not an error.
    pub fn pop_timeout(&self, wait: Duration, running: &AtomicBool) -> Option<FightTask> {
        let deadline = Instant::now() + wait;
        let mut tasks = self.tasks.lock();
        while tasks.is_empty() && running.load(Ordering::Acquire) {
            if self.available.wait_until(&mut tasks, deadline).timed_out() {
                break;
            }
        }
        tasks.pop_front()
    }

    /// Take the oldest task without waiting
    pub fn try_pop(&self) -> Option<FightTask> {
        self.tasks.lock().pop_front()
    }

    /// Wake every waiter so it can re-check the running flag
    pub fn wake_all(&self) {
        // Taking the lock orders this after any waiter's flag check
        let _tasks = self.tasks.lock();
        self.available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Remove and return everything still queued
    pub fn drain(&self) -> Vec<FightTask> {
        self.tasks.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn task(a: u32, d: u32) -> FightTask {
        FightTask::new(EntityId(a), EntityId(d))
    }

    #[test]
    fn test_fifo_order() {
        let queue = FightQueue::new();
        let running = AtomicBool::new(true);
        queue.push(task(1, 2));
        queue.push(task(2, 1));
        queue.push(task(3, 1));

        let wait = Duration::from_millis(10);
        assert_eq!(queue.pop_timeout(wait, &running), Some(task(1, 2)));
        assert_eq!(queue.pop_timeout(wait, &running), Some(task(2, 1)));
        assert_eq!(queue.try_pop(), Some(task(3, 1)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_pop_times_out() {
        let queue = FightQueue::new();
        let running = AtomicBool::new(true);
        let start = Instant::now();
        assert_eq!(queue.pop_timeout(Duration::from_millis(30), &running), None);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_stopped_queue_returns_immediately_when_empty() {
        let queue = FightQueue::new();
        let running = AtomicBool::new(false);
        let start = Instant::now();
        assert_eq!(queue.pop_timeout(Duration::from_secs(5), &running), None);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_push_wakes_waiter() {
        let queue = Arc::new(FightQueue::new());
        let running = Arc::new(AtomicBool::new(true));

        let consumer = {
            let queue = queue.clone();
            let running = running.clone();
            thread::spawn(move || queue.pop_timeout(Duration::from_secs(5), &running))
        };

        thread::sleep(Duration::from_millis(20));
        queue.push(task(7, 8));
        assert_eq!(consumer.join().unwrap(), Some(task(7, 8)));
    }

    #[test]
    fn test_wake_all_releases_waiter_on_shutdown() {
        let queue = Arc::new(FightQueue::new());
        let running = Arc::new(AtomicBool::new(true));

        let consumer = {
            let queue = queue.clone();
            let running = running.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let task = queue.pop_timeout(Duration::from_secs(10), &running);
                (task, start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Release);
        queue.wake_all();

        let (task, waited) = consumer.join().unwrap();
        assert_eq!(task, None);
        assert!(waited < Duration::from_secs(5));
    }

    #[test]
    fn test_drain() {
        let queue = FightQueue::new();
        queue.push(task(1, 2));
        queue.push(task(2, 1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![task(1, 2), task(2, 1)]);
        assert!(queue.is_empty());
    }
}
