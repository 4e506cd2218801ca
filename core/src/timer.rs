use serde::{Deserialize, Serialize};

/// What a single [`RoundTimer::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running, nothing counted.
    Idle,
    Elapsed,
    /// This tick used up the time budget.
    Expired,
}

/// Elapsed-time counter for a round, advanced by an external scheduler.
///
/// Starting is a latch: the first call to `start` begins counting and later calls do
/// nothing. Once stopped the timer ignores ticks for good.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    started: bool,
    stopped: bool,
    elapsed: u32,
    budget: Option<u32>,
}

impl RoundTimer {
    pub const fn new(budget: Option<u32>) -> Self {
        Self {
            started: false,
            stopped: false,
            elapsed: 0,
            budget,
        }
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub const fn is_running(&self) -> bool {
        self.started && !self.stopped
    }

    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub const fn budget(&self) -> Option<u32> {
        self.budget
    }

    /// Ticks remaining before the budget runs out, `None` when unbounded.
    pub fn remaining(&self) -> Option<u32> {
        self.budget
            .map(|budget| budget.saturating_sub(self.elapsed))
    }

    pub fn start(&mut self) {
        if !self.started {
            log::debug!("timer started");
            self.started = true;
        }
    }

    pub fn stop(&mut self) {
        if !self.stopped {
            log::debug!("timer stopped at {}", self.elapsed);
            self.stopped = true;
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        match self.budget {
            Some(budget) if self.elapsed >= budget => TickOutcome::Expired,
            _ => TickOutcome::Elapsed,
        }
    }
}
