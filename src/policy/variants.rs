//! Built-in scheduling policies.
//!
//! # Variants
//!
//! - **FCFS**: first-come, first-served (non-preemptive)
//! - **SJF**: shortest job first (non-preemptive)
//! - **SRTF**: shortest remaining time first (preemptive)
//! - **Round Robin**: time-quantum based (preemptive)
//!
//! # Tie-Breaking
//! Ready candidates tie-break by earliest arrival, then by insertion
//! order (queue position). SRTF additionally keeps the current occupant
//! on strict remaining-time ties, which avoids context switches that
//! change nothing.

use super::{SchedulingPolicy, SelectionContext};
use crate::models::{Pid, Process};
use std::collections::HashMap;

/// First match wins on ties, so scanning in queue order and replacing
/// only on a strictly smaller key yields the insertion-order tie-break.
fn min_ready_by<'a, K: Ord>(
    ctx: &SelectionContext<'a>,
    key: impl Fn(&Process) -> K,
) -> Option<&'a Process> {
    let mut best: Option<(&Process, K)> = None;
    for p in ctx.ready_processes() {
        let k = key(p);
        let better = match &best {
            None => true,
            Some((_, bk)) => k < *bk,
        };
        if better {
            best = Some((p, k));
        }
    }
    best.map(|(p, _)| p)
}

/// First-come, first-served.
///
/// Never preempts: a running process with remaining service is kept.
/// Otherwise the head of the ready queue (earliest insertion) runs.
#[derive(Debug, Clone, Copy)]
pub struct Fcfs;

impl SchedulingPolicy for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Option<Pid> {
        if let Some(running) = ctx.running_process() {
            if running.remaining() > 0 {
                return Some(running.pid());
            }
        }
        ctx.queue.front()
    }

    fn description(&self) -> &'static str {
        "First-Come, First-Served"
    }
}

/// Shortest job first.
///
/// Never preempts. When the processor is free, picks the ready process
/// with the smallest total service time; ties break by earliest
/// arrival, then insertion order.
#[derive(Debug, Clone, Copy)]
pub struct Sjf;

impl SchedulingPolicy for Sjf {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Option<Pid> {
        if let Some(running) = ctx.running_process() {
            if running.remaining() > 0 {
                return Some(running.pid());
            }
        }
        min_ready_by(ctx, |p| (p.service_time(), p.arrival())).map(|p| p.pid())
    }

    fn description(&self) -> &'static str {
        "Shortest Job First"
    }
}

/// Shortest remaining time first.
///
/// Evaluated every tick over the ready queue plus the current occupant.
/// The occupant is preempted only by a strictly smaller remaining time;
/// on ties it keeps the processor. Among ready candidates, ties break
/// by earliest arrival, then insertion order.
#[derive(Debug, Clone, Copy)]
pub struct Srtf;

impl SchedulingPolicy for Srtf {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Option<Pid> {
        let best_ready = min_ready_by(ctx, |p| (p.remaining(), p.arrival()));

        match (ctx.running_process(), best_ready) {
            (Some(running), Some(ready)) => {
                if ready.remaining() < running.remaining() {
                    Some(ready.pid())
                } else {
                    Some(running.pid())
                }
            }
            (Some(running), None) => Some(running.pid()),
            (None, Some(ready)) => Some(ready.pid()),
            (None, None) => None,
        }
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time First"
    }
}

/// Round Robin with a time quantum.
///
/// Tracks how many consecutive units the occupant has run since its
/// last dispatch. The counters are simulation-session state keyed by
/// [`Pid`], owned here and never stored in the processes: a process's
/// quantum usage restarts whenever it regains the processor.
///
/// A process with a quantum override uses it in place of the configured
/// quantum; other policies ignore overrides entirely.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: u64,
    run_lengths: HashMap<Pid, u64>,
}

impl RoundRobin {
    /// Creates the policy with the configured quantum, clamped to >= 1.
    pub fn new(quantum: u64) -> Self {
        Self {
            quantum: quantum.max(1),
            run_lengths: HashMap::new(),
        }
    }

    /// The configured quantum.
    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    fn effective_quantum(&self, process: &Process) -> u64 {
        process.quantum_override().unwrap_or(self.quantum)
    }

    fn dispatch(&mut self, pid: Pid) -> Option<Pid> {
        self.run_lengths.insert(pid, 0);
        Some(pid)
    }
}

impl SchedulingPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn select(&mut self, ctx: &SelectionContext<'_>) -> Option<Pid> {
        let Some(pid) = ctx.running else {
            return match ctx.queue.front() {
                Some(head) => self.dispatch(head),
                None => None,
            };
        };

        let used = self.run_lengths.get(&pid).copied().unwrap_or(0);
        if used >= self.effective_quantum(ctx.table.get(pid)) {
            // Quantum exhausted: hand the processor to the queue head.
            // With nobody waiting the occupant continues on a fresh quantum.
            let next = ctx.queue.front().unwrap_or(pid);
            self.dispatch(next)
        } else {
            Some(pid)
        }
    }

    fn note_executed(&mut self, pid: Pid) {
        *self.run_lengths.entry(pid).or_insert(0) += 1;
    }

    fn reset(&mut self) {
        self.run_lengths.clear();
    }

    fn description(&self) -> &'static str {
        "Round Robin (time quantum)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProcessSpec, ProcessTable, ReadyQueue, Tick};
    use crate::policy::SelectionContext;

    fn setup(specs: &[(u64, Tick)]) -> (ProcessTable, ReadyQueue, Vec<Pid>) {
        let mut table = ProcessTable::new();
        let mut queue = ReadyQueue::new();
        let pids = specs
            .iter()
            .map(|&(service, arrival)| {
                let pid = table.register(ProcessSpec::new(service).with_arrival(arrival));
                queue.push_back(pid);
                pid
            })
            .collect();
        (table, queue, pids)
    }

    fn ctx<'a>(
        queue: &'a ReadyQueue,
        table: &'a ProcessTable,
        running: Option<Pid>,
    ) -> SelectionContext<'a> {
        SelectionContext {
            queue,
            table,
            now: 0,
            running,
        }
    }

    #[test]
    fn test_fcfs_selects_head() {
        let (table, queue, pids) = setup(&[(5, 0), (1, 0)]);
        let mut policy = Fcfs;
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[0]));
    }

    #[test]
    fn test_fcfs_keeps_running() {
        let (table, mut queue, pids) = setup(&[(5, 0), (1, 0)]);
        queue.remove(pids[0]);
        let mut policy = Fcfs;
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }

    #[test]
    fn test_fcfs_empty() {
        let table = ProcessTable::new();
        let queue = ReadyQueue::new();
        assert_eq!(Fcfs.select(&ctx(&queue, &table, None)), None);
    }

    #[test]
    fn test_sjf_picks_shortest_total() {
        let (table, queue, pids) = setup(&[(5, 0), (2, 1), (4, 0)]);
        let mut policy = Sjf;
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[1]));
    }

    #[test]
    fn test_sjf_tie_breaks_by_arrival() {
        let (table, queue, pids) = setup(&[(3, 4), (3, 1)]);
        let mut policy = Sjf;
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[1]));
    }

    #[test]
    fn test_sjf_full_tie_breaks_by_insertion() {
        let (table, queue, pids) = setup(&[(3, 2), (3, 2)]);
        let mut policy = Sjf;
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[0]));
    }

    #[test]
    fn test_sjf_never_preempts() {
        // A shorter job waits while the occupant still has work.
        let (mut table, mut queue, pids) = setup(&[(9, 0), (1, 0)]);
        queue.remove(pids[0]);
        table.get_mut(pids[0]).execute_unit();
        let mut policy = Sjf;
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }

    #[test]
    fn test_srtf_preempts_on_strictly_smaller() {
        let (mut table, mut queue, pids) = setup(&[(5, 0), (2, 2)]);
        queue.remove(pids[0]);
        // Occupant has 3 remaining, the newcomer 2.
        table.get_mut(pids[0]).execute_unit();
        table.get_mut(pids[0]).execute_unit();
        let mut policy = Srtf;
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[1])
        );
    }

    #[test]
    fn test_srtf_running_wins_ties() {
        let (mut table, mut queue, pids) = setup(&[(4, 0), (2, 2)]);
        queue.remove(pids[0]);
        // Both at 2 remaining: the occupant keeps the processor.
        table.get_mut(pids[0]).execute_unit();
        table.get_mut(pids[0]).execute_unit();
        let mut policy = Srtf;
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }

    #[test]
    fn test_srtf_ready_ties_break_by_arrival() {
        let (table, queue, pids) = setup(&[(3, 5), (3, 1)]);
        let mut policy = Srtf;
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[1]));
    }

    #[test]
    fn test_srtf_idle_empty() {
        let table = ProcessTable::new();
        let queue = ReadyQueue::new();
        assert_eq!(Srtf.select(&ctx(&queue, &table, None)), None);
    }

    #[test]
    fn test_rr_clamps_quantum() {
        assert_eq!(RoundRobin::new(0).quantum(), 1);
        assert_eq!(RoundRobin::new(3).quantum(), 3);
    }

    #[test]
    fn test_rr_selects_head_when_idle() {
        let (table, queue, pids) = setup(&[(4, 0), (4, 0)]);
        let mut policy = RoundRobin::new(2);
        assert_eq!(policy.select(&ctx(&queue, &table, None)), Some(pids[0]));
    }

    #[test]
    fn test_rr_keeps_running_within_quantum() {
        let (table, mut queue, pids) = setup(&[(4, 0), (4, 0)]);
        queue.remove(pids[0]);
        let mut policy = RoundRobin::new(2);
        policy.select(&ctx(&queue, &table, None));
        policy.note_executed(pids[0]);
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }

    #[test]
    fn test_rr_preempts_at_quantum_expiry() {
        let (table, mut queue, pids) = setup(&[(4, 0), (4, 0)]);
        queue.remove(pids[0]);
        let mut policy = RoundRobin::new(2);
        policy.select(&ctx(&queue, &table, None));
        policy.note_executed(pids[0]);
        policy.note_executed(pids[0]);
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[1])
        );
    }

    #[test]
    fn test_rr_alone_continues_with_fresh_quantum() {
        let (table, mut queue, pids) = setup(&[(6, 0)]);
        queue.remove(pids[0]);
        let mut policy = RoundRobin::new(2);
        policy.select(&ctx(&queue, &table, None));
        policy.note_executed(pids[0]);
        policy.note_executed(pids[0]);

        // Queue is empty at expiry: same process, counter back to zero.
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
        policy.note_executed(pids[0]);
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }

    #[test]
    fn test_rr_honors_quantum_override() {
        let mut table = ProcessTable::new();
        let mut queue = ReadyQueue::new();
        let long = table.register(ProcessSpec::new(6).with_quantum_override(3));
        let other = table.register(ProcessSpec::new(6));
        queue.push_back(other);

        let mut policy = RoundRobin::new(1);
        assert_eq!(policy.dispatch(long), Some(long));
        policy.note_executed(long);
        // Configured quantum is 1, but the override grants 3 units.
        assert_eq!(policy.select(&ctx(&queue, &table, Some(long))), Some(long));
        policy.note_executed(long);
        policy.note_executed(long);
        assert_eq!(policy.select(&ctx(&queue, &table, Some(long))), Some(other));
    }

    #[test]
    fn test_rr_reset_clears_counters() {
        let (table, mut queue, pids) = setup(&[(4, 0), (4, 0)]);
        queue.remove(pids[0]);
        let mut policy = RoundRobin::new(2);
        policy.select(&ctx(&queue, &table, None));
        policy.note_executed(pids[0]);
        policy.note_executed(pids[0]);

        policy.reset();
        // Counter gone: the occupant keeps the processor again.
        assert_eq!(
            policy.select(&ctx(&queue, &table, Some(pids[0]))),
            Some(pids[0])
        );
    }
}
