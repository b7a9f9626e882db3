//! State-change notifications for the presentation layer.
//!
//! Observers are notified after a tick has mutated the simulation
//! state; every callback carries owned snapshot data, so an observer
//! can never reach back into the engine. Halting the clock from inside
//! a callback goes through [`StopHandle`], which flips an atomic flag
//! the engine consults at the next step boundary.

use crate::metrics::ProcessMetrics;
use crate::models::{ProcessSnapshot, Tick};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Event sink for simulation state transitions.
///
/// All methods default to no-ops so an observer implements only what it
/// renders.
pub trait SimulationObserver {
    /// A process was admitted to the ready queue. Emitted once per
    /// process per run, at the tick admitting it.
    fn on_process_arrived(&mut self, _process: &ProcessSnapshot) {}

    /// A process became the processor's occupant, including re-dispatch
    /// after preemption.
    fn on_process_dispatched(&mut self, _process: &ProcessSnapshot) {}

    /// No process occupies the processor after selection.
    fn on_processor_idle(&mut self) {}

    /// One unit of service was executed.
    fn on_unit_executed(&mut self, _process: &ProcessSnapshot, _remaining_after: u64) {}

    /// A process finished; its metrics were computed.
    fn on_process_completed(
        &mut self,
        _process: &ProcessSnapshot,
        _finish_time: Tick,
        _metrics: &ProcessMetrics,
    ) {
    }

    /// The ready queue's contents changed this tick.
    fn on_ready_queue_changed(&mut self, _queue: &[ProcessSnapshot]) {}

    /// The clock advanced to `now`.
    fn on_clock_advanced(&mut self, _now: Tick) {}

    /// The termination check succeeded. Emitted once per run.
    fn on_simulation_finished(&mut self) {}
}

/// Reentrancy-safe stop switch.
///
/// Cloneable and usable from inside an observer callback: setting the
/// flag never touches engine state directly, the engine pauses itself
/// at the next step boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Requests that the clock halt before the next tick.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Consumes a pending stop request.
    pub(crate) fn take(&self) -> bool {
        self.flag.swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_handle_latches_until_taken() {
        let handle = StopHandle::new();
        assert!(!handle.take());

        handle.stop();
        let clone = handle.clone();
        assert!(clone.take());
        assert!(!handle.take());
    }
}
