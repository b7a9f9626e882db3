//! Completion history.
//!
//! Append-only record of finished processes, their finish times, and
//! the metrics computed at completion. One entry per process per run.

use super::{Pid, Process, Tick};
use crate::metrics::ProcessMetrics;

/// A finished process with its completion data.
#[derive(Debug, Clone)]
pub struct CompletedProcess {
    /// The process in its final state (remaining time zero).
    pub process: Process,
    /// Tick index immediately after its final unit of service.
    pub finish_time: Tick,
    /// Efficiency figures computed at completion.
    pub metrics: ProcessMetrics,
}

/// Ordered, append-only sequence of completed processes.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<CompletedProcess>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completion record.
    pub(crate) fn record(&mut self, process: Process, finish_time: Tick, metrics: ProcessMetrics) {
        self.entries.push(CompletedProcess {
            process,
            finish_time,
            metrics,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Completion records in completion order.
    pub fn entries(&self) -> &[CompletedProcess] {
        &self.entries
    }

    /// Whether the given process has completed.
    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|e| e.process.pid() == pid)
    }

    /// Number of completed processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has completed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The completion with the highest efficiency index, if any.
    pub fn most_efficient(&self) -> Option<&CompletedProcess> {
        self.entries.iter().max_by(|a, b| {
            a.metrics
                .efficiency
                .partial_cmp(&b.metrics.efficiency)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
