//! Scheduling policies and the selection contract.
//!
//! Each tick the engine asks the configured policy which process should
//! occupy the processor for the next unit, given the ready queue, the
//! clock, and the current occupant. Policies decide *who runs next*;
//! the structural consequences of that decision (removing the selection
//! from the queue, returning a preempted occupant to the back) belong
//! to the engine.
//!
//! # Usage
//!
//! ```
//! use cpusim::policy::PolicyKind;
//!
//! let kind = PolicyKind::parse_or_default("Round Robin");
//! let policy = kind.build(4);
//! assert_eq!(policy.name(), "Round Robin");
//! ```

mod variants;

pub use variants::{Fcfs, RoundRobin, Sjf, Srtf};

use crate::models::{Pid, Process, ProcessTable, ReadyQueue, Tick};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only scheduling state passed to a policy's select call.
///
/// The context exposes the whole ready sequence, not just its head:
/// SJF and SRTF scan it, FCFS and Round Robin only look at the front.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Ready processes in insertion order, head first.
    pub queue: &'a ReadyQueue,
    /// Registry holding the state of every process.
    pub table: &'a ProcessTable,
    /// Current clock value.
    pub now: Tick,
    /// Process currently occupying the processor, if any.
    pub running: Option<Pid>,
}

impl<'a> SelectionContext<'a> {
    /// The current occupant's state, if the processor is busy.
    pub fn running_process(&self) -> Option<&'a Process> {
        self.running.map(|pid| self.table.get(pid))
    }

    /// Ready processes in insertion order.
    pub fn ready_processes(&self) -> impl Iterator<Item = &'a Process> + '_ {
        self.queue.iter().map(|pid| self.table.get(pid))
    }
}

/// A scheduling policy: a selection function over the ready set and the
/// current occupant.
///
/// # Contract
/// - Pure with respect to the clock and the history; reads remaining
///   service state, never mutates it.
/// - Total: returns `None` only when the ready queue is empty and
///   nothing is running.
/// - Policy-internal bookkeeping (Round Robin's consecutive-run
///   counters) lives in the policy value, never in the processes.
pub trait SchedulingPolicy: Send + fmt::Debug {
    /// Policy name (e.g., "FCFS", "SRTF").
    fn name(&self) -> &'static str;

    /// Chooses the process to run for the next unit.
    fn select(&mut self, ctx: &SelectionContext<'_>) -> Option<Pid>;

    /// Called by the engine after a unit of service is executed.
    fn note_executed(&mut self, _pid: Pid) {}

    /// Drops any policy-internal bookkeeping for a fresh run.
    fn reset(&mut self) {}

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// The closed set of selectable policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicyKind {
    /// First-come, first-served (non-preemptive).
    #[default]
    Fcfs,
    /// Shortest job first (non-preemptive).
    Sjf,
    /// Shortest remaining time first (preemptive).
    Srtf,
    /// Round Robin with a time quantum (preemptive).
    RoundRobin,
}

impl PolicyKind {
    /// Parses a case-sensitive policy name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FCFS" => Some(Self::Fcfs),
            "SJF" => Some(Self::Sjf),
            "SRTF" => Some(Self::Srtf),
            "Round Robin" => Some(Self::RoundRobin),
            _ => None,
        }
    }

    /// Parses a policy name, falling back to FCFS for unknown names.
    ///
    /// The fallback is a recovered configuration error, logged and not
    /// fatal.
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!("Unknown scheduling policy '{name}', falling back to FCFS");
            Self::Fcfs
        })
    }

    /// Canonical configuration-surface name.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Srtf => "SRTF",
            Self::RoundRobin => "Round Robin",
        }
    }

    /// Instantiates the policy.
    ///
    /// `quantum` applies to Round Robin only and is clamped to >= 1.
    pub fn build(self, quantum: u64) -> Box<dyn SchedulingPolicy> {
        match self {
            Self::Fcfs => Box::new(Fcfs),
            Self::Sjf => Box::new(Sjf),
            Self::Srtf => Box::new(Srtf),
            Self::RoundRobin => Box::new(RoundRobin::new(quantum)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(PolicyKind::from_name("FCFS"), Some(PolicyKind::Fcfs));
        assert_eq!(PolicyKind::from_name("SJF"), Some(PolicyKind::Sjf));
        assert_eq!(PolicyKind::from_name("SRTF"), Some(PolicyKind::Srtf));
        assert_eq!(
            PolicyKind::from_name("Round Robin"),
            Some(PolicyKind::RoundRobin)
        );
        assert_eq!(PolicyKind::from_name("fcfs"), None);
        assert_eq!(PolicyKind::from_name("round robin"), None);
    }

    #[test]
    fn test_unknown_name_falls_back_to_fcfs() {
        assert_eq!(PolicyKind::parse_or_default("LOTTERY"), PolicyKind::Fcfs);
        assert_eq!(PolicyKind::parse_or_default(""), PolicyKind::Fcfs);
    }

    #[test]
    fn test_build_names() {
        assert_eq!(PolicyKind::Fcfs.build(1).name(), "FCFS");
        assert_eq!(PolicyKind::Sjf.build(1).name(), "SJF");
        assert_eq!(PolicyKind::Srtf.build(1).name(), "SRTF");
        assert_eq!(PolicyKind::RoundRobin.build(3).name(), "Round Robin");
    }

    #[test]
    fn test_display_matches_configuration_surface() {
        assert_eq!(PolicyKind::RoundRobin.to_string(), "Round Robin");
        assert_eq!(PolicyKind::Fcfs.to_string(), "FCFS");
    }
}
