//! Engine phase driver
//!
//! The [`Engine`] owns the three phase-event tables every subsystem hangs off
//! of: initialize, process and deinitialize. [`Engine::start`] fires
//! initialize once, then the process event once per frame until the engine is
//! stopped, then deinitialize once. Listeners never hold a reference to the
//! engine itself; stopping goes through a cloneable [`StopSignal`] so a
//! handler can end the loop while the engine is borrowed by it.

use std::cell::Cell;
use std::rc::Rc;

use super::event::EventDispatcher;
use super::timer::Timer;

/// Payload of the initialize phase event.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitArg;

/// Payload of one process-phase tick.
#[derive(Debug, Clone, Copy)]
pub struct ProcessArg {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the run loop started.
    pub total: f32,
}

/// Payload of the deinitialize phase event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeinitArg;

/// Cloneable stop handle for the run loop.
///
/// All clones share one flag. The first `stop` call ends the loop after the
/// current tick; further calls are counted but otherwise inert.
#[derive(Clone)]
pub struct StopSignal {
    running: Rc<Cell<bool>>,
    requests: Rc<Cell<u32>>,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            running: Rc::new(Cell::new(true)),
            requests: Rc::new(Cell::new(0)),
        }
    }

    /// Request that the run loop end after the current tick.
    pub fn stop(&self) {
        self.requests.set(self.requests.get() + 1);
        if self.running.get() {
            log::info!("engine stop requested");
            self.running.set(false);
        }
    }

    /// Whether the run loop is still (or would still be) running.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Number of stop requests seen so far.
    pub fn requests(&self) -> u32 {
        self.requests.get()
    }
}

/// Top-level phase driver.
pub struct Engine {
    initialize: EventDispatcher<InitArg>,
    process: EventDispatcher<ProcessArg>,
    deinitialize: EventDispatcher<DeinitArg>,
    signal: StopSignal,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with empty listener tables.
    pub fn new() -> Self {
        Self {
            initialize: EventDispatcher::new(),
            process: EventDispatcher::new(),
            deinitialize: EventDispatcher::new(),
            signal: StopSignal::new(),
        }
    }

    /// Registration point for the initialize phase.
    pub fn initialize_event(&mut self) -> &mut EventDispatcher<InitArg> {
        &mut self.initialize
    }

    /// Registration point for the process phase.
    pub fn process_event(&mut self) -> &mut EventDispatcher<ProcessArg> {
        &mut self.process
    }

    /// Registration point for the deinitialize phase.
    pub fn deinitialize_event(&mut self) -> &mut EventDispatcher<DeinitArg> {
        &mut self.deinitialize
    }

    /// Cloneable handle that stops the run loop.
    pub fn signal(&self) -> StopSignal {
        self.signal.clone()
    }

    /// Request that the run loop end after the current tick.
    pub fn stop(&self) {
        self.signal.stop();
    }

    /// Drive the initialize -> process loop -> deinitialize protocol.
    ///
    /// Phase events fire synchronously on the calling thread, in listener
    /// attachment order. The loop runs until [`StopSignal::stop`] is called
    /// by some listener (or was called before `start`).
    pub fn start(&mut self) {
        log::info!("engine starting");
        self.initialize.notify(&InitArg);

        let mut timer = Timer::new();
        while self.signal.is_running() {
            timer.update();
            self.process.notify(&ProcessArg {
                delta: timer.delta_time(),
                total: timer.total_time(),
            });
        }

        self.deinitialize.notify(&DeinitArg);
        log::info!(
            "engine stopped after {} frames ({:.1} fps average)",
            timer.frame_count(),
            timer.average_fps()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Listener;
    use std::cell::RefCell;

    #[derive(Default)]
    struct PhaseLog {
        phases: Vec<&'static str>,
    }

    struct PhaseRecorder {
        log: Rc<RefCell<PhaseLog>>,
        phase: &'static str,
    }

    impl Listener<InitArg> for PhaseRecorder {
        fn handle(&mut self, _: &InitArg) {
            self.log.borrow_mut().phases.push(self.phase);
        }
    }

    impl Listener<DeinitArg> for PhaseRecorder {
        fn handle(&mut self, _: &DeinitArg) {
            self.log.borrow_mut().phases.push(self.phase);
        }
    }

    struct StopAfter {
        log: Rc<RefCell<PhaseLog>>,
        remaining: u32,
        signal: StopSignal,
    }

    impl Listener<ProcessArg> for StopAfter {
        fn handle(&mut self, _: &ProcessArg) {
            self.log.borrow_mut().phases.push("process");
            self.remaining -= 1;
            if self.remaining == 0 {
                self.signal.stop();
            }
        }
    }

    #[test]
    fn start_runs_phases_in_protocol_order() {
        let log = Rc::new(RefCell::new(PhaseLog::default()));
        let mut engine = Engine::new();

        engine.initialize_event().attach(Rc::new(RefCell::new(PhaseRecorder {
            log: log.clone(),
            phase: "initialize",
        })));
        let signal = engine.signal();
        engine.process_event().attach(Rc::new(RefCell::new(StopAfter {
            log: log.clone(),
            remaining: 3,
            signal,
        })));
        engine.deinitialize_event().attach(Rc::new(RefCell::new(PhaseRecorder {
            log: log.clone(),
            phase: "deinitialize",
        })));

        engine.start();

        assert_eq!(
            log.borrow().phases,
            vec!["initialize", "process", "process", "process", "deinitialize"]
        );
    }

    #[test]
    fn stop_before_start_skips_the_process_loop() {
        let log = Rc::new(RefCell::new(PhaseLog::default()));
        let mut engine = Engine::new();
        engine.initialize_event().attach(Rc::new(RefCell::new(PhaseRecorder {
            log: log.clone(),
            phase: "initialize",
        })));
        engine.deinitialize_event().attach(Rc::new(RefCell::new(PhaseRecorder {
            log: log.clone(),
            phase: "deinitialize",
        })));

        engine.stop();
        engine.start();

        assert_eq!(log.borrow().phases, vec!["initialize", "deinitialize"]);
    }

    #[test]
    fn stop_requests_are_counted() {
        let engine = Engine::new();
        let signal = engine.signal();
        assert!(signal.is_running());
        assert_eq!(signal.requests(), 0);

        signal.stop();
        signal.stop();

        assert!(!engine.signal().is_running());
        assert_eq!(engine.signal().requests(), 2);
    }
}
