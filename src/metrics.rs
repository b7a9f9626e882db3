//! Per-process efficiency metrics.
//!
//! Computed once per completion event from the finished process and its
//! finish time. Pure with respect to the process and the history.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Finish time (tf) | Tick index immediately after the final service unit |
//! | Turnaround (Tr) | tf - arrival |
//! | Waiting (Te) | Tr - service_time |
//! | Efficiency (Is) | service_time / Tr, in (0, 1] |
//!
//! Is = 1 exactly when the process ran uninterrupted from its arrival.

use serde::{Deserialize, Serialize};

use crate::models::{Pid, Process, Tick};

/// Efficiency figures for one completed process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub pid: Pid,
    /// Tick index immediately after the final unit of service.
    pub finish_time: Tick,
    /// Time from arrival to completion.
    pub turnaround: u64,
    /// Turnaround spent not executing.
    pub waiting: u64,
    /// Service fraction of turnaround, in (0, 1].
    pub efficiency: f64,
}

impl ProcessMetrics {
    /// Computes the metrics record for a completed process.
    ///
    /// `finish_time` is strictly greater than the process arrival
    /// because service time is at least one unit.
    pub fn calculate(process: &Process, finish_time: Tick) -> Self {
        let turnaround = finish_time - process.arrival();
        let waiting = turnaround - process.service_time();
        let efficiency = process.service_time() as f64 / turnaround as f64;

        Self {
            pid: process.pid(),
            finish_time,
            turnaround,
            waiting,
            efficiency,
        }
    }
}

/// Running average of the efficiency index across completions.
///
/// Maintained incrementally by the engine: one [`record`](Self::record)
/// call per completed process.
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    efficiency_sum: f64,
    completed: usize,
}

impl MetricsSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one completion into the running average.
    pub(crate) fn record(&mut self, metrics: &ProcessMetrics) {
        self.efficiency_sum += metrics.efficiency;
        self.completed += 1;
    }

    /// Number of completions recorded.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Average efficiency index, 0.0 when nothing has completed.
    pub fn average_efficiency(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.efficiency_sum / self.completed as f64
        }
    }

    pub(crate) fn clear(&mut self) {
        self.efficiency_sum = 0.0;
        self.completed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProcessSpec, ProcessTable};

    fn completed_process(service: u64, arrival: Tick) -> (ProcessTable, Pid) {
        let mut table = ProcessTable::new();
        let pid = table.register(ProcessSpec::new(service).with_arrival(arrival));
        for _ in 0..service {
            table.get_mut(pid).execute_unit();
        }
        (table, pid)
    }

    #[test]
    fn test_uninterrupted_run() {
        let (table, pid) = completed_process(5, 0);
        let m = ProcessMetrics::calculate(table.get(pid), 5);

        assert_eq!(m.turnaround, 5);
        assert_eq!(m.waiting, 0);
        assert!((m.efficiency - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_delayed_completion() {
        // Arrives at 1, finishes at 8: waited 4 of its 7-unit turnaround.
        let (table, pid) = completed_process(3, 1);
        let m = ProcessMetrics::calculate(table.get(pid), 8);

        assert_eq!(m.turnaround, 7);
        assert_eq!(m.waiting, 4);
        assert!((m.efficiency - 3.0 / 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_efficiency_bounds() {
        let (table, pid) = completed_process(2, 0);
        let m = ProcessMetrics::calculate(table.get(pid), 9);

        assert!(m.efficiency > 0.0);
        assert!(m.efficiency <= 1.0);
    }

    #[test]
    fn test_summary_running_average() {
        let mut summary = MetricsSummary::new();
        assert!((summary.average_efficiency() - 0.0).abs() < 1e-10);

        let (table, pid) = completed_process(4, 0);
        summary.record(&ProcessMetrics::calculate(table.get(pid), 4)); // Is = 1.0
        summary.record(&ProcessMetrics::calculate(table.get(pid), 8)); // Is = 0.5

        assert_eq!(summary.completed(), 2);
        assert!((summary.average_efficiency() - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_summary_clear() {
        let mut summary = MetricsSummary::new();
        let (table, pid) = completed_process(1, 0);
        summary.record(&ProcessMetrics::calculate(table.get(pid), 1));

        summary.clear();
        assert_eq!(summary.completed(), 0);
        assert!((summary.average_efficiency() - 0.0).abs() < 1e-10);
    }
}
