//! Discrete-time CPU scheduling simulator.
//!
//! Simulates preemptive and non-preemptive scheduling policies over a
//! logical clock: processes arrive at fixed instants, wait in a ready
//! queue, and are dispatched one unit at a time according to a
//! selectable policy. Completion yields per-process efficiency metrics.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Process`, `ProcessTable`, `ReadyQueue`,
//!   `History`
//! - **`policy`**: The `SchedulingPolicy` trait and its four variants —
//!   FCFS, SJF, SRTF, Round Robin
//! - **`engine`**: The `Simulation` clock/tick loop and the observer
//!   contract for the presentation layer
//! - **`metrics`**: Turnaround, waiting time, and the efficiency index
//! - **`validation`**: Process-definition integrity checks
//!
//! # Architecture
//!
//! All simulation state is owned by the engine and mutated only inside
//! its tick, one unit of simulated time per invocation. Policies are
//! pure selection functions over the ready set and the current
//! occupant; the structural consequences of a selection (dispatch,
//! preemption re-queue, completion) are applied by the engine.
//! Presentation is out of scope: observers receive snapshots after
//! each tick and never reach back in.
//!
//! # Example
//!
//! ```
//! use cpusim::{PolicyKind, ProcessSpec, Simulation};
//!
//! let mut sim = Simulation::with_policy(PolicyKind::RoundRobin, 2);
//! sim.add_process(ProcessSpec::new(4).with_name("A"))?;
//! sim.add_process(ProcessSpec::new(4).with_name("B"))?;
//! sim.run_to_completion()?;
//!
//! assert_eq!(sim.history().len(), 2);
//! assert_eq!(sim.clock(), 8);
//! # Ok::<(), cpusim::EngineError>(())
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin, Gagne (2018), "Operating System Concepts", ch. 5
//! - Tanenbaum, Bos (2015), "Modern Operating Systems", §2.4

pub mod engine;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod validation;

pub use engine::{EngineError, Simulation, SimulationObserver, SimulationState, StopHandle};
pub use metrics::{MetricsSummary, ProcessMetrics};
pub use models::{
    CompletedProcess, History, Pid, Process, ProcessSnapshot, ProcessSpec, ProcessTable,
    ReadyQueue, ServiceProfile, Tick,
};
pub use policy::{PolicyKind, SchedulingPolicy};
