//! Recalculation task queue
//!
//! At most one task runs at a time and at most one waits behind it. A task added
//! while another is running replaces whatever was already waiting, so a burst of
//! triggers collapses into a single follow-up pass.

use crate::models::RecalculationTask;

/// Two-slot queue: the running task and the next one
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskQueue {
    current: Option<RecalculationTask>,
    next: Option<RecalculationTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task.
    ///
    /// Returns the task when the queue was idle: the caller owns the run and must
    /// call [`TaskQueue::finish`] when it completes. Otherwise the task becomes the
    /// pending one and `None` is returned.
    pub fn add(&mut self, task: RecalculationTask) -> Option<RecalculationTask> {
        if self.current.is_none() {
            self.current = Some(task);
            return Some(task);
        }

        if let Some(replaced) = self.next.replace(task) {
            log::debug!("queue: pending {:?} superseded by {:?}", replaced, task);
        }
        None
    }

    /// Mark the running task complete and promote the pending one, if any
    pub fn finish(&mut self) -> Option<RecalculationTask> {
        self.current = self.next.take();
        self.current
    }

    /// Drop the pending task. A running task is left alone.
    pub fn clear(&mut self) {
        if let Some(dropped) = self.next.take() {
            log::debug!("queue: cleared pending {:?}", dropped);
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<RecalculationTask> {
        self.current
    }

    pub fn pending(&self) -> Option<RecalculationTask> {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_queue_hands_task_back() {
        let mut queue = TaskQueue::new();
        let task = RecalculationTask::full();
        assert_eq!(queue.add(task), Some(task));
        assert!(queue.is_running());
        assert_eq!(queue.pending(), None);
        assert_eq!(queue.finish(), None);
        assert!(!queue.is_running());
    }

    #[test]
    fn burst_collapses_to_last_task() {
        let mut queue = TaskQueue::new();
        queue.add(RecalculationTask::full());
        assert_eq!(queue.add(RecalculationTask::provisional()), None);
        assert_eq!(queue.add(RecalculationTask::new(true, false)), None);

        assert_eq!(queue.finish(), Some(RecalculationTask::new(true, false)));
        assert_eq!(queue.finish(), None);
    }

    #[test]
    fn clear_leaves_running_task() {
        let mut queue = TaskQueue::new();
        queue.add(RecalculationTask::full());
        queue.add(RecalculationTask::provisional());
        queue.clear();

        assert_eq!(queue.current(), Some(RecalculationTask::full()));
        assert_eq!(queue.pending(), None);
        assert_eq!(queue.finish(), None);
    }
}
