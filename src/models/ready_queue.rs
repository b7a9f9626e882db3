//! Ready queue: arrived processes waiting for the processor.
//!
//! Insertion is FIFO, which fixes the tie-break order policies rely on,
//! but selection is not restricted to the head: policies may inspect
//! the entire sequence. The currently running process is never in the
//! queue; the engine removes a selection on dispatch and re-inserts a
//! preempted occupant at the back.

use super::Pid;
use std::collections::VecDeque;

/// FIFO-insertion ordered sequence of ready process ids.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    queue: VecDeque<Pid>,
}

impl ReadyQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a process at the back.
    pub(crate) fn push_back(&mut self, pid: Pid) {
        self.queue.push_back(pid);
    }

    /// Removes the given process, wherever it sits in the queue.
    ///
    /// Returns whether it was present.
    pub(crate) fn remove(&mut self, pid: Pid) -> bool {
        if let Some(pos) = self.queue.iter().position(|&p| p == pid) {
            self.queue.remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }

    /// Head of the queue (earliest insertion), if any.
    pub fn front(&self) -> Option<Pid> {
        self.queue.front().copied()
    }

    /// Iterates in insertion order, head first.
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.queue.iter().copied()
    }

    /// Whether the given process is queued.
    pub fn contains(&self, pid: Pid) -> bool {
        self.queue.contains(&pid)
    }

    /// Number of queued processes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
