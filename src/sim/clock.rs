//! Round countdown clock
//!
//! `Idle -> Running -> Over`. One tick per second while running. Every start
//! hands out a fresh `TickTimer` token; ticks carrying any other token are
//! stale and ignored, so a late callback from a previous round can never
//! touch the new round's timer.

use serde::{Deserialize, Serialize};

use super::state::RoundPhase;

/// Token identifying the tick source of one running round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickTimer {
    generation: u64,
}

/// Result of delivering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Token was stale or the clock isn't running
    Ignored,
    /// One second elapsed
    Ticked { remaining: u32 },
    /// Reached zero; the timer is cancelled
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    phase: RoundPhase,
    remaining: u32,
    /// Milliseconds carried between `advance` calls
    carry_ms: u64,
    timer: Option<TickTimer>,
    next_generation: u64,
}

impl RoundClock {
    pub fn new(seconds: u32) -> Self {
        Self {
            phase: RoundPhase::Idle,
            remaining: seconds,
            carry_ms: 0,
            timer: None,
            next_generation: 1,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Token of the tick source that is currently allowed to fire
    pub fn active_timer(&self) -> Option<TickTimer> {
        self.timer
    }

    /// Begin (or restart) the countdown. Cancels any previous timer before
    /// resetting the remaining time.
    pub fn start(&mut self, seconds: u32) -> TickTimer {
        self.cancel();

        let timer = TickTimer {
            generation: self.next_generation,
        };
        self.next_generation += 1;

        self.remaining = seconds;
        self.carry_ms = 0;
        self.timer = Some(timer);
        self.phase = if seconds == 0 {
            self.timer = None;
            RoundPhase::Over
        } else {
            RoundPhase::Running
        };
        timer
    }

    /// Drop the active timer. Phase is left as-is.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            log::trace!("Clock timer {} cancelled", timer.generation);
        }
        self.carry_ms = 0;
    }

    /// Deliver one tick from the source identified by `timer`
    pub fn on_tick(&mut self, timer: TickTimer) -> TickOutcome {
        if self.phase != RoundPhase::Running || self.timer != Some(timer) {
            log::trace!("Ignoring stale tick from timer {}", timer.generation);
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = RoundPhase::Over;
            self.cancel();
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining: self.remaining,
            }
        }
    }

    /// Advance by `dt` seconds of wall time, firing whole-second ticks from
    /// the active timer. Returns the outcome of each fired tick.
    pub fn advance(&mut self, dt: f64) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        let Some(timer) = self.timer else {
            return outcomes;
        };
        if dt.is_nan() || dt <= 0.0 {
            return outcomes;
        }

        // Whole milliseconds, so repeated fractional steps sum exactly
        let dt_ms = (dt * 1000.0).round() as u64;
        self.carry_ms = self.carry_ms.saturating_add(dt_ms);
        while self.carry_ms >= 1000 {
            self.carry_ms -= 1000;
            let outcome = self.on_tick(timer);
            outcomes.push(outcome);
            if outcome == TickOutcome::Expired {
                break;
            }
        }
        outcomes
    }
}
