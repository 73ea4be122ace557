//! Turn scheduler: the background loop that drives turns.
//!
//! ## State Machine
//!
//! ```text
//! Idle --start--> Running <--pause/resume--> Paused
//!                    \                        /
//!                     `-------stop-----------'--> Stopped (terminal)
//! ```
//!
//! Each iteration blocks while `Paused`, then increments the turn counter,
//! publishes `TurnStarted`, runs production for every capital, publishes
//! `TurnEnded`, calls the turn listeners and waits one tick. Only time
//! spent `Running` counts toward the tick. Pausing freezes the wait and
//! stopping ends it.
//!
//! Listeners run inline on the loop thread, so the next turn cannot begin
//! until every listener has returned.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::{lock_world, GameError, Result, SharedWorld};
use crate::events::{EventBus, GameEvent};

/// Lifecycle state of a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Created, not started.
    Idle,
    /// Turns are advancing.
    Running,
    /// No turn advances until resumed.
    Paused,
    /// Terminal.
    Stopped,
}

type StopHook = Box<dyn Fn() + Send + Sync>;

struct Control {
    state: Mutex<SchedulerState>,
    signal: Condvar,
    turn: AtomicU32,
    pauses: AtomicU32,
    resumes: AtomicU32,
    stop_hooks: Mutex<Vec<StopHook>>,
}

impl Control {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cross-thread control over a scheduler.
///
/// Cheap to clone; every clone controls the same loop.
#[derive(Clone)]
pub struct SchedulerHandle {
    control: Arc<Control>,
}

impl SchedulerHandle {
    fn new() -> Self {
        Self {
            control: Arc::new(Control {
                state: Mutex::new(SchedulerState::Idle),
                signal: Condvar::new(),
                turn: AtomicU32::new(0),
                pauses: AtomicU32::new(0),
                resumes: AtomicU32::new(0),
                stop_hooks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        *self.control.lock()
    }

    /// Last turn started, 0 before the first.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.control.turn.load(Ordering::SeqCst)
    }

    /// Check if the scheduler reached its terminal state.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state() == SchedulerState::Stopped
    }

    /// Number of `Running -> Paused` transitions so far.
    #[must_use]
    pub fn pause_count(&self) -> u32 {
        self.control.pauses.load(Ordering::SeqCst)
    }

    /// Number of `Paused -> Running` transitions so far.
    #[must_use]
    pub fn resume_count(&self) -> u32 {
        self.control.resumes.load(Ordering::SeqCst)
    }

    /// Pause a running scheduler. Returns true if this call paused it.
    pub fn pause(&self) -> bool {
        self.transition(
            SchedulerState::Running,
            SchedulerState::Paused,
            &self.control.pauses,
        )
    }

    /// Resume a paused scheduler. Returns true if this call resumed it.
    pub fn resume(&self) -> bool {
        self.transition(
            SchedulerState::Paused,
            SchedulerState::Running,
            &self.control.resumes,
        )
    }

    /// Stop the scheduler for good and wake every waiter.
    ///
    /// Stop hooks run once, on the first call, on the calling thread.
    pub fn stop(&self) {
        {
            let mut state = self.control.lock();
            if *state == SchedulerState::Stopped {
                return;
            }
            *state = SchedulerState::Stopped;
        }
        self.control.signal.notify_all();
        log::debug!("Turn scheduler stopped");
        self.run_stop_hooks();
    }

    /// Run `hook` when the scheduler stops. Runs immediately if it
    /// already has.
    pub fn on_stop(&self, hook: impl Fn() + Send + Sync + 'static) {
        if self.is_stopped() {
            hook();
            return;
        }
        self.control
            .stop_hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
        // Stop may have taken the hook list between the check and the push.
        if self.is_stopped() {
            self.run_stop_hooks();
        }
    }

    fn run_stop_hooks(&self) {
        let hooks = std::mem::take(
            &mut *self
                .control
                .stop_hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for hook in hooks {
            hook();
        }
    }

    fn transition(&self, from: SchedulerState, to: SchedulerState, counter: &AtomicU32) -> bool {
        let mut state = self.control.lock();
        if *state != from {
            return false;
        }
        *state = to;
        let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
        drop(state);
        self.control.signal.notify_all();
        log::debug!("Turn scheduler {from:?} -> {to:?} (#{count})");
        true
    }

    fn begin(&self) -> Result<()> {
        let mut state = self.control.lock();
        match *state {
            SchedulerState::Idle => {
                *state = SchedulerState::Running;
                Ok(())
            }
            SchedulerState::Stopped => Err(GameError::SchedulerStopped),
            SchedulerState::Running | SchedulerState::Paused => Err(GameError::AlreadyStarted),
        }
    }

    /// Block while paused. Returns false once stopped.
    fn wait_while_paused(&self) -> bool {
        let mut state = self.control.lock();
        loop {
            match *state {
                SchedulerState::Paused => {
                    state = self
                        .control
                        .signal
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                SchedulerState::Stopped => return false,
                SchedulerState::Idle | SchedulerState::Running => return true,
            }
        }
    }

    /// Wait until `interval` of running time has passed. Returns false
    /// once stopped.
    fn wait_running(&self, interval: Duration) -> bool {
        let mut remaining = interval;
        let mut state = self.control.lock();
        loop {
            match *state {
                SchedulerState::Stopped => return false,
                SchedulerState::Paused => {
                    state = self
                        .control
                        .signal
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                SchedulerState::Idle | SchedulerState::Running => {
                    if remaining.is_zero() {
                        return true;
                    }
                    let started = Instant::now();
                    let (guard, _) = self
                        .control
                        .signal
                        .wait_timeout(state, remaining)
                        .unwrap_or_else(PoisonError::into_inner);
                    state = guard;
                    remaining = remaining.saturating_sub(started.elapsed());
                }
            }
        }
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("state", &self.state())
            .field("turn", &self.current_turn())
            .field("pauses", &self.pause_count())
            .field("resumes", &self.resume_count())
            .finish()
    }
}

/// Hook called by the turn loop after each turn's `TurnEnded`.
///
/// Returning an error ends the loop; the error comes back from the loop's
/// join handle.
pub trait TurnListener: Send {
    /// Called on the loop thread once the turn's production finished.
    fn on_turn_ended(&mut self, turn: u32, scheduler: &SchedulerHandle) -> Result<()>;
}

/// Owns the turn loop.
pub struct TurnScheduler {
    handle: SchedulerHandle,
    world: SharedWorld,
    events: EventBus,
    listeners: Vec<Box<dyn TurnListener>>,
}

impl TurnScheduler {
    /// Create an idle scheduler over a world.
    #[must_use]
    pub fn new(world: SharedWorld, events: EventBus) -> Self {
        Self {
            handle: SchedulerHandle::new(),
            world,
            events,
            listeners: Vec::new(),
        }
    }

    /// Add a turn listener. Listeners run in insertion order.
    #[must_use]
    pub fn with_listener(mut self, listener: impl TurnListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Handle for pause, resume and stop.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.handle.state()
    }

    /// Last turn started.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.handle.current_turn()
    }

    /// Start the loop on a background thread named `turns`.
    ///
    /// The join handle yields the last turn started, or the listener error
    /// that ended the loop.
    pub fn start(&mut self, tick_interval: Duration) -> Result<JoinHandle<Result<u32>>> {
        self.handle.begin()?;
        let turn_loop = self.take_loop(tick_interval);

        let spawned = thread::Builder::new()
            .name("turns".to_string())
            .spawn(move || turn_loop.run());
        spawned.map_err(|e| {
            self.handle.stop();
            GameError::Io(e)
        })
    }

    /// Run the loop on the calling thread until stopped.
    pub fn run(&mut self, tick_interval: Duration) -> Result<u32> {
        self.handle.begin()?;
        self.take_loop(tick_interval).run()
    }

    fn take_loop(&mut self, tick_interval: Duration) -> TurnLoop {
        TurnLoop {
            handle: self.handle.clone(),
            world: Arc::clone(&self.world),
            events: self.events.clone(),
            listeners: std::mem::take(&mut self.listeners),
            tick_interval,
        }
    }
}

struct TurnLoop {
    handle: SchedulerHandle,
    world: SharedWorld,
    events: EventBus,
    listeners: Vec<Box<dyn TurnListener>>,
    tick_interval: Duration,
}

/// Marks the scheduler stopped when the loop exits, panics included.
struct StopOnExit<'a>(&'a SchedulerHandle);

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

impl TurnLoop {
    fn run(mut self) -> Result<u32> {
        let handle = self.handle.clone();
        let _stop = StopOnExit(&handle);
        log::info!("Turn loop started, {} ms per turn", self.tick_interval.as_millis());

        let result = self.turns();
        let last = handle.current_turn();
        match &result {
            Ok(()) => log::info!("Turn loop stopped after turn {last}"),
            Err(e) => log::error!("Turn loop failed at turn {last}: {e}"),
        }
        result.map(|()| last)
    }

    fn turns(&mut self) -> Result<()> {
        loop {
            if !self.handle.wait_while_paused() {
                return Ok(());
            }

            let turn = self.handle.control.turn.fetch_add(1, Ordering::SeqCst) + 1;
            self.events.publish(&GameEvent::TurnStarted { turn });

            let report = lock_world(&self.world).produce_turn();
            log::debug!("Turn {turn} produced {:?}", report.produced);

            if self.handle.is_stopped() {
                return Ok(());
            }
            self.events.publish(&GameEvent::TurnEnded { turn });

            for listener in &mut self.listeners {
                listener.on_turn_ended(turn, &self.handle)?;
            }

            if !self.handle.wait_running(self.tick_interval) {
                return Ok(());
            }
        }
    }
}
