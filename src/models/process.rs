//! Process model.
//!
//! A process is a unit of CPU demand: an immutable service profile
//! (total service time, arrival instant, optional Round Robin quantum
//! override) plus the one piece of runtime state the engine mutates,
//! the remaining service time.
//!
//! # Time Representation
//! All times are non-negative integers in logical clock units. The
//! engine advances the clock one unit per tick; at most one process
//! executes for exactly one unit per tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical clock value, in whole units.
pub type Tick = u64;

/// Process identifier.
///
/// Unique within a simulation session, assigned monotonically starting
/// at 1 in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid(u32);

impl Pid {
    /// Zero-based index into the owning [`ProcessTable`].
    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Raw numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Process definition supplied by the caller before a run.
///
/// A spec is inert data: it carries no runtime state and is validated
/// by [`crate::validation::validate_spec`] before the engine registers
/// it. Builder-style setters mirror the creation form of the
/// configuration surface.
///
/// # Example
/// ```
/// use cpusim::ProcessSpec;
///
/// let spec = ProcessSpec::new(5).with_name("editor").with_arrival(2);
/// assert_eq!(spec.service_time, 5);
/// assert_eq!(spec.arrival, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Display name. Empty means "use the default name at registration".
    #[serde(default)]
    pub name: String,
    /// Total required service time, in units. Must be >= 1.
    pub service_time: u64,
    /// Clock value at which the process becomes eligible to run.
    #[serde(default)]
    pub arrival: Tick,
    /// Per-process quantum, consulted only under Round Robin.
    /// Must be >= 1 when present.
    #[serde(default)]
    pub quantum_override: Option<u64>,
}

impl ProcessSpec {
    /// Creates a spec with the given total service time.
    pub fn new(service_time: u64) -> Self {
        Self {
            name: String::new(),
            service_time,
            arrival: 0,
            quantum_override: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the arrival instant.
    pub fn with_arrival(mut self, arrival: Tick) -> Self {
        self.arrival = arrival;
        self
    }

    /// Sets the Round Robin quantum override.
    pub fn with_quantum_override(mut self, quantum: u64) -> Self {
        self.quantum_override = Some(quantum);
        self
    }
}

/// The immutable half of a process: identity-independent service demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProfile {
    /// Total required service time, in units.
    pub service_time: u64,
    /// Arrival instant.
    pub arrival: Tick,
    /// Per-process Round Robin quantum.
    pub quantum_override: Option<u64>,
}

/// A registered process: fixed profile plus remaining service time.
///
/// Only the engine mutates `remaining`; it is decremented one unit at a
/// time, floored at zero, and restored from the profile on reuse.
/// `remaining` is non-increasing for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    name: String,
    profile: ServiceProfile,
    remaining: u64,
}

impl Process {
    fn new(pid: Pid, name: String, profile: ServiceProfile) -> Self {
        let remaining = profile.service_time;
        Self {
            pid,
            name,
            profile,
            remaining,
        }
    }

    /// Process identifier.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total required service time.
    pub fn service_time(&self) -> u64 {
        self.profile.service_time
    }

    /// Arrival instant.
    pub fn arrival(&self) -> Tick {
        self.profile.arrival
    }

    /// Round Robin quantum override, if any.
    pub fn quantum_override(&self) -> Option<u64> {
        self.profile.quantum_override
    }

    /// Immutable service profile.
    pub fn profile(&self) -> &ServiceProfile {
        &self.profile
    }

    /// Remaining service time.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Whether the process has received all of its required service.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Consumes one unit of service. Returns the remaining time after.
    pub(crate) fn execute_unit(&mut self) -> u64 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// Restores the runtime state from the profile for a fresh run.
    pub(crate) fn reset(&mut self) {
        self.remaining = self.profile.service_time;
    }

    /// Immutable copy of the externally visible state.
    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: self.pid,
            name: self.name.clone(),
            service_time: self.profile.service_time,
            arrival: self.profile.arrival,
            remaining: self.remaining,
        }
    }
}

/// Point-in-time view of a process, handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    /// Process identifier.
    pub pid: Pid,
    /// Display name.
    pub name: String,
    /// Total required service time.
    pub service_time: u64,
    /// Arrival instant.
    pub arrival: Tick,
    /// Remaining service time at snapshot instant.
    pub remaining: u64,
}

/// Display name assigned when a spec leaves the name empty.
const DEFAULT_NAME: &str = "Proc";

/// Owner of all registered processes, indexed by [`Pid`].
///
/// The table is the single point of ownership: the ready queue, the
/// running slot, and the history all refer to processes by `Pid`.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    entries: Vec<Process>,
}

impl ProcessTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validated spec and assigns the next [`Pid`].
    pub(crate) fn register(&mut self, spec: ProcessSpec) -> Pid {
        let pid = Pid(self.entries.len() as u32 + 1);
        let name = if spec.name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            spec.name
        };
        let profile = ServiceProfile {
            service_time: spec.service_time,
            arrival: spec.arrival,
            quantum_override: spec.quantum_override,
        };
        self.entries.push(Process::new(pid, name, profile));
        pid
    }

    /// Looks up a process. A `Pid` handed out by [`register`](Self::register)
    /// is always present.
    pub fn get(&self, pid: Pid) -> &Process {
        &self.entries[pid.index()]
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> &mut Process {
        &mut self.entries[pid.index()]
    }

    /// Iterates over all registered processes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.entries.iter()
    }

    /// Number of registered processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restores every process's runtime state from its profile.
    pub(crate) fn reset_all(&mut self) {
        for p in &mut self.entries {
            p.reset();
        }
    }
}
