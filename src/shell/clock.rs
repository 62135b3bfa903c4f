use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source used by the shell.
///
/// Scheduling only ever looks at [`Clock::now`], which must be monotonic so
/// that wall-clock adjustments cannot make refreshes drift or burst. The wall
/// time is only used for displayed timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn wall(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Local> {
        Local::now()
    }
}

struct ManualState {
    now: Instant,
    wall: DateTime<Local>,
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(wall: DateTime<Local>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: Instant::now(),
                wall,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now += by;
        let delta = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
        state.wall = state.wall + delta;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).now
    }

    fn wall(&self) -> DateTime<Local> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).wall
    }
}
