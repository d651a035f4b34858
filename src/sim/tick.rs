//! One simulation update
//!
//! Applies start requests, direction events and elapsed time to the round in
//! a fixed order: start, moves (each followed by an interaction pass), then
//! the clock.

use super::clock::{TickOutcome, TickTimer};
use super::interaction::resolve_interactions;
use super::movement::{Direction, autopilot_direction, move_player};
use super::state::{GameEvent, GameState, RoundPhase};

/// Input for a single update
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start (or restart) a round with this seed
    pub start: Option<u64>,
    /// Direction events received since the last update, in order
    pub moves: Vec<Direction>,
    /// Demo mode - steer toward the nearest target
    pub autopilot: bool,
}

/// Advance the round by `dt` seconds of wall time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    if let Some(seed) = input.start {
        state.start_round(seed);
        // Entities may spawn on top of the player
        resolve_interactions(state);
    }

    if !state.is_running() {
        return;
    }

    for &dir in &input.moves {
        apply_move(state, dir);
    }
    if input.autopilot {
        if let Some(dir) = autopilot_direction(state) {
            apply_move(state, dir);
        }
    }

    for outcome in state.clock.advance(dt) {
        record_clock_outcome(state, outcome);
    }
}

/// Move the player one step and resolve interactions. Ignored unless running.
pub fn apply_move(state: &mut GameState, dir: Direction) {
    if !state.is_running() {
        return;
    }
    state.player = move_player(state.player, dir, state.settings.move_step);
    resolve_interactions(state);
}

/// Deliver a tick from an external timer (browser interval callback)
pub fn deliver_clock_tick(state: &mut GameState, timer: TickTimer) -> TickOutcome {
    let outcome = state.clock.on_tick(timer);
    record_clock_outcome(state, outcome);
    outcome
}

fn record_clock_outcome(state: &mut GameState, outcome: TickOutcome) {
    match outcome {
        TickOutcome::Ignored => {}
        TickOutcome::Ticked { remaining } => {
            state.events.push(GameEvent::ClockTicked { remaining });
        }
        TickOutcome::Expired => {
            debug_assert_eq!(state.phase(), RoundPhase::Over);
            state.events.push(GameEvent::ClockTicked { remaining: 0 });
            state.events.push(GameEvent::RoundOver { score: state.score });
            log::info!(
                "Round over: score {} ({} caught, {} stops)",
                state.score,
                state.caught_count(),
                state.activated_count()
            );
        }
    }
}
