//! Simulation engine: the clock and tick loop.
//!
//! The engine owns all simulation state and mutates it exclusively
//! inside `tick`, one logical time unit per invocation. Each tick:
//!
//! 1. Admits every pending process whose arrival equals the clock.
//! 2. Asks the policy to select the next occupant.
//! 3. Applies the structural consequences: a selection leaves the ready
//!    queue, a preempted occupant with remaining work returns to the
//!    back. Returning the previous occupant is centralized here because
//!    it follows from preemption itself, not from any policy decision.
//! 4. Executes one unit on the occupant.
//! 5. On completion, computes metrics and appends to the history with
//!    finish time = clock + 1.
//! 6. Advances the clock.
//! 7. Stops itself when nothing is running, ready, or still to arrive.
//!
//! # Concurrency
//! Single logical thread: ticks never overlap, never get cancelled, and
//! need no locks. The external driver (a timer or an explicit loop)
//! owns wall-clock pacing and calls [`Simulation::step`] once per unit.
//! Observers receive already-mutated snapshot data; stopping from
//! inside a callback goes through [`StopHandle`].

mod observer;

pub use observer::{SimulationObserver, StopHandle};

use crate::metrics::{MetricsSummary, ProcessMetrics};
use crate::models::{
    History, Pid, Process, ProcessSnapshot, ProcessSpec, ProcessTable, ReadyQueue, Tick,
};
use crate::policy::{PolicyKind, SchedulingPolicy, SelectionContext};
use crate::validation::{validate_spec, ValidationError};
use log::{debug, info};
use thiserror::Error;

/// Lifecycle state of a simulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Accepting process registrations; the clock is at zero.
    Idle,
    /// Advancing one unit per step.
    Running,
    /// Halted mid-run without discarding state.
    Paused,
    /// Terminated: every registered process is in the history.
    Finished,
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Engine misuse, reported synchronously at the offending call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `start` was called while the clock is already advancing.
    #[error("simulation is already running")]
    AlreadyRunning,
    /// `start` was called on a finished session.
    #[error("simulation has finished; reset it before running again")]
    SessionFinished,
    /// `add_process` was called mid-run.
    #[error("processes can be registered only before or between runs")]
    RegistrationWhileActive,
    /// `configure` was called while the clock is advancing.
    #[error("the policy can be configured only while the clock is stopped")]
    ConfigureWhileRunning,
    /// The process definition failed validation.
    #[error("invalid process definition: {}", join_messages(.0))]
    InvalidProcess(Vec<ValidationError>),
}

/// The simulation session: clock, ready queue, occupant, history.
///
/// # Example
/// ```
/// use cpusim::{PolicyKind, ProcessSpec, Simulation};
///
/// let mut sim = Simulation::with_policy(PolicyKind::Srtf, 1);
/// sim.add_process(ProcessSpec::new(5).with_name("A")).unwrap();
/// sim.add_process(ProcessSpec::new(2).with_name("B").with_arrival(2)).unwrap();
/// sim.run_to_completion().unwrap();
///
/// let finishes: Vec<_> = sim.history().entries().iter().map(|e| e.finish_time).collect();
/// assert_eq!(finishes, vec![4, 7]);
/// ```
pub struct Simulation {
    table: ProcessTable,
    /// Registered but not yet admitted, in registration order.
    pending: Vec<Pid>,
    ready: ReadyQueue,
    current: Option<Pid>,
    history: History,
    summary: MetricsSummary,
    policy: Box<dyn SchedulingPolicy>,
    policy_kind: PolicyKind,
    quantum: u64,
    clock: Tick,
    state: SimulationState,
    stop: StopHandle,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl Simulation {
    /// Creates a session with the default policy (FCFS).
    pub fn new() -> Self {
        Self::with_policy(PolicyKind::default(), 1)
    }

    /// Creates a session with the given policy and quantum.
    ///
    /// The quantum applies to Round Robin only and is clamped to >= 1.
    pub fn with_policy(kind: PolicyKind, quantum: u64) -> Self {
        let quantum = quantum.max(1);
        info!("Simulation configured: policy={kind}, quantum={quantum}");
        Self {
            table: ProcessTable::new(),
            pending: Vec::new(),
            ready: ReadyQueue::new(),
            current: None,
            history: History::new(),
            summary: MetricsSummary::new(),
            policy: kind.build(quantum),
            policy_kind: kind,
            quantum,
            clock: 0,
            state: SimulationState::Idle,
            stop: StopHandle::new(),
            observers: Vec::new(),
        }
    }

    /// Selects the policy variant for the next run.
    pub fn configure(&mut self, kind: PolicyKind, quantum: u64) -> Result<(), EngineError> {
        if self.state == SimulationState::Running {
            return Err(EngineError::ConfigureWhileRunning);
        }
        self.quantum = quantum.max(1);
        self.policy_kind = kind;
        self.policy = kind.build(self.quantum);
        info!("Policy configured: {kind}, quantum={}", self.quantum);
        Ok(())
    }

    /// Like [`configure`](Self::configure), taking the policy's
    /// configuration-surface name. Unknown names fall back to FCFS.
    pub fn configure_by_name(&mut self, name: &str, quantum: u64) -> Result<(), EngineError> {
        self.configure(PolicyKind::parse_or_default(name), quantum)
    }

    /// Registers a process for future arrival.
    ///
    /// Legal only before or between runs. The spec is validated first;
    /// the engine never holds a malformed process.
    pub fn add_process(&mut self, spec: ProcessSpec) -> Result<Pid, EngineError> {
        match self.state {
            SimulationState::Idle | SimulationState::Finished => {}
            _ => return Err(EngineError::RegistrationWhileActive),
        }
        validate_spec(&spec).map_err(EngineError::InvalidProcess)?;
        let pid = self.table.register(spec);
        let p = self.table.get(pid);
        debug!(
            "{pid} registered: name={}, service={}, arrival={}",
            p.name(),
            p.service_time(),
            p.arrival()
        );
        Ok(pid)
    }

    /// Registers an observer for state-change notifications.
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// A cloneable handle that halts the clock at the next step
    /// boundary, safe to use from inside an observer callback.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Begins advancing the clock, one unit per [`step`](Self::step).
    ///
    /// Restarting a running session is an error; a finished session
    /// must be reset first. Resuming a paused session is allowed.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            SimulationState::Running => Err(EngineError::AlreadyRunning),
            SimulationState::Finished => Err(EngineError::SessionFinished),
            SimulationState::Idle => {
                self.pending = self.table.iter().map(|p| p.pid()).collect();
                self.stop.take();
                self.state = SimulationState::Running;
                info!(
                    "Simulation started: policy={}, {} processes",
                    self.policy_kind,
                    self.table.len()
                );
                Ok(())
            }
            SimulationState::Paused => {
                self.stop.take();
                self.state = SimulationState::Running;
                info!("Simulation resumed at t={}", self.clock);
                Ok(())
            }
        }
    }

    /// Halts clock advancement without discarding state.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Running {
            self.state = SimulationState::Paused;
            info!("Simulation paused at t={}", self.clock);
        }
    }

    /// The external driver's trigger: runs exactly one tick when the
    /// session is running, honoring a pending stop request first.
    ///
    /// Returns the state after the step.
    pub fn step(&mut self) -> SimulationState {
        if self.stop.take() && self.state == SimulationState::Running {
            self.state = SimulationState::Paused;
            info!("Simulation paused at t={}", self.clock);
        }
        if self.state == SimulationState::Running {
            self.tick();
        }
        self.state
    }

    /// Convenience driver: starts and steps until the session is no
    /// longer running (finished, or paused via a stop handle).
    pub fn run_to_completion(&mut self) -> Result<(), EngineError> {
        self.start()?;
        while self.state == SimulationState::Running {
            self.step();
        }
        Ok(())
    }

    /// Re-runs the same workload under a different policy: clears the
    /// clock, ready queue, history, occupant, and metrics; restores
    /// every process's remaining time from its profile; reconfigures.
    pub fn reset_keeping_processes(&mut self, kind: PolicyKind, quantum: u64) {
        self.clock = 0;
        self.ready.clear();
        self.history.clear();
        self.summary.clear();
        self.current = None;
        self.pending.clear();
        self.stop.take();
        self.table.reset_all();
        self.quantum = quantum.max(1);
        self.policy_kind = kind;
        self.policy = kind.build(self.quantum);
        self.state = SimulationState::Idle;
        info!(
            "Simulation reset: policy={kind}, quantum={}, {} processes kept",
            self.quantum,
            self.table.len()
        );
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Current clock value.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Configured policy variant.
    pub fn policy(&self) -> PolicyKind {
        self.policy_kind
    }

    /// Configured quantum (clamped).
    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    /// The process currently occupying the processor.
    pub fn running(&self) -> Option<&Process> {
        self.current.map(|pid| self.table.get(pid))
    }

    /// Ready processes in queue order.
    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    /// Completion history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Running average of the efficiency index.
    pub fn metrics(&self) -> &MetricsSummary {
        &self.summary
    }

    /// Registry of all registered processes.
    pub fn processes(&self) -> &ProcessTable {
        &self.table
    }

    /// One unit of simulated time. Runs to completion atomically with
    /// respect to observers; all notifications carry post-mutation
    /// snapshots.
    fn tick(&mut self) {
        let now = self.clock;
        let mut queue_changed = false;

        // 1) Admission: each pending process arrives exactly once.
        let mut arrived = Vec::new();
        {
            let table = &self.table;
            self.pending.retain(|&pid| {
                if table.get(pid).arrival() == now {
                    arrived.push(pid);
                    false
                } else {
                    true
                }
            });
        }
        for pid in arrived {
            self.ready.push_back(pid);
            queue_changed = true;
            debug!("{pid} arrived at t={now}");
            let snap = self.table.get(pid).snapshot();
            for obs in &mut self.observers {
                obs.on_process_arrived(&snap);
            }
        }

        // 2) Selection.
        let previous = self.current;
        let selected = {
            let ctx = SelectionContext {
                queue: &self.ready,
                table: &self.table,
                now,
                running: self.current,
            };
            self.policy.select(&ctx)
        };

        // 3) Preemption handling and dispatch.
        match selected {
            Some(pid) => {
                if previous != Some(pid) {
                    queue_changed |= self.ready.remove(pid);
                    if let Some(prev) = previous {
                        if self.table.get(prev).remaining() > 0 {
                            self.ready.push_back(prev);
                            queue_changed = true;
                            debug!("{prev} preempted at t={now}");
                        }
                    }
                    self.current = Some(pid);
                    debug!("{pid} dispatched at t={now}");
                    let snap = self.table.get(pid).snapshot();
                    for obs in &mut self.observers {
                        obs.on_process_dispatched(&snap);
                    }
                }
            }
            None => {
                // Policies return None only when nothing is runnable.
                debug_assert!(previous.is_none() && self.ready.is_empty());
                self.current = None;
                for obs in &mut self.observers {
                    obs.on_processor_idle();
                }
            }
        }

        // 4) Execution, 5) completion.
        if let Some(pid) = self.current {
            let remaining = self.table.get_mut(pid).execute_unit();
            self.policy.note_executed(pid);
            let snap = self.table.get(pid).snapshot();
            for obs in &mut self.observers {
                obs.on_unit_executed(&snap, remaining);
            }

            if remaining == 0 {
                let finish = now + 1;
                let process = self.table.get(pid).clone();
                let metrics = ProcessMetrics::calculate(&process, finish);
                self.summary.record(&metrics);
                debug!(
                    "{pid} completed at t={finish} (turnaround={}, efficiency={:.2})",
                    metrics.turnaround, metrics.efficiency
                );
                for obs in &mut self.observers {
                    obs.on_process_completed(&snap, finish, &metrics);
                }
                self.history.record(process, finish, metrics);
                self.current = None;
            }
        }

        // 6) Ready-queue snapshot, when contents changed this tick.
        if queue_changed {
            let snapshot: Vec<ProcessSnapshot> = self
                .ready
                .iter()
                .map(|pid| self.table.get(pid).snapshot())
                .collect();
            for obs in &mut self.observers {
                obs.on_ready_queue_changed(&snapshot);
            }
        }

        // 7) Clock advance.
        self.clock += 1;
        for obs in &mut self.observers {
            obs.on_clock_advanced(self.clock);
        }

        // 8) Termination: idle processor, empty queue, nothing pending.
        if self.current.is_none() && self.ready.is_empty() && self.pending.is_empty() {
            self.state = SimulationState::Finished;
            info!(
                "Simulation finished at t={} ({} completed, avg efficiency {:.2})",
                self.clock,
                self.history.len(),
                self.summary.average_efficiency()
            );
            for obs in &mut self.observers {
                obs.on_simulation_finished();
            }
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("policy", &self.policy_kind)
            .field("quantum", &self.quantum)
            .field("clock", &self.clock)
            .field("state", &self.state)
            .field("ready", &self.ready.len())
            .field("completed", &self.history.len())
            .finish()
    }
}
