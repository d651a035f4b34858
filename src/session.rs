//! Round-session context
//!
//! Owns the round state and the session leaderboard. Every path that can end
//! a round goes through `after_update`, which records the score exactly once
//! per transition into `Over`.

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{
    Direction, GameEvent, GameState, MapSnapshot, RoundPhase, TickInput, TickOutcome, TickTimer,
    apply_move, deliver_clock_tick, tick,
};

pub struct Session {
    pub state: GameState,
    pub high_scores: HighScores,
    /// Leaderboard rank of the last finished round
    pub last_rank: Option<usize>,
    /// Demo mode toggle
    pub autopilot: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: GameState::new(0, settings),
            high_scores: HighScores::new(),
            last_rank: None,
            autopilot: false,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }

    /// Start or restart a round. Returns the tick token the caller's timer
    /// must present.
    pub fn start(&mut self, seed: u64, now_ms: f64) -> Option<TickTimer> {
        let input = TickInput {
            start: Some(seed),
            ..Default::default()
        };
        self.last_rank = None;
        self.update(&input, 0.0, now_ms);
        self.state.clock.active_timer()
    }

    /// One direction event from the input collaborator
    pub fn move_player(&mut self, dir: Direction, now_ms: f64) -> Vec<GameEvent> {
        apply_move(&mut self.state, dir);
        self.after_update(now_ms)
    }

    /// Advance by `dt` seconds (frame-driven shells and tests)
    pub fn update(&mut self, input: &TickInput, dt: f64, now_ms: f64) -> Vec<GameEvent> {
        let mut input = input.clone();
        input.autopilot |= self.autopilot;
        tick(&mut self.state, &input, dt);
        self.after_update(now_ms)
    }

    /// One tick from an interval timer
    pub fn clock_tick(&mut self, timer: TickTimer, now_ms: f64) -> (TickOutcome, Vec<GameEvent>) {
        let outcome = deliver_clock_tick(&mut self.state, timer);
        (outcome, self.after_update(now_ms))
    }

    /// Leaderboard rank the running score would take if the round ended now
    pub fn projected_rank(&self) -> Option<usize> {
        self.high_scores.potential_rank(self.state.score)
    }

    /// Best score this session, including a running round that beats the table
    pub fn best_score(&self) -> u64 {
        let table = self.high_scores.top_score().unwrap_or(0);
        table.max(self.state.score)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        self.state.snapshot()
    }

    fn after_update(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::RoundOver { score } = event {
                self.last_rank = self.high_scores.record_if_positive(*score, now_ms);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Creature, Rarity, origin};

    #[test]
    fn test_round_records_score_once() {
        let mut session = Session::new(Settings::default());
        session.start(11, 0.0);
        session.state.creatures = vec![Creature::new(0, origin(), Rarity::Epic)];
        session.state.stops.clear();
        session.state.energy = 100;
        session.state.score = 0;
        session.move_player(Direction::Up, 0.0);
        session.move_player(Direction::Down, 0.0);
        assert_eq!(session.state.score, 50);

        let events = session.update(&TickInput::default(), 200.0, 1_000.0);
        assert!(events.contains(&GameEvent::RoundOver { score: 50 }));
        assert_eq!(session.phase(), RoundPhase::Over);
        assert_eq!(session.high_scores.scores(), vec![50]);
        assert_eq!(session.high_scores.entries[0].timestamp, 1_000.0);
        assert_eq!(session.last_rank, Some(1));

        // Staying over doesn't record again
        session.update(&TickInput::default(), 10.0, 2_000.0);
        assert_eq!(session.high_scores.len(), 1);
    }

    #[test]
    fn test_zero_score_round_not_recorded() {
        let mut session = Session::new(Settings::default());
        session.start(4, 0.0);
        session.state.creatures.clear();
        session.state.score = 0;
        session.update(&TickInput::default(), 120.0, 0.0);
        assert_eq!(session.phase(), RoundPhase::Over);
        assert!(session.high_scores.is_empty());
        assert_eq!(session.last_rank, None);
    }

    #[test]
    fn test_scores_accumulate_across_rounds() {
        let mut session = Session::new(Settings::default());
        for (i, score) in [50u64, 200, 100, 200, 10, 30].into_iter().enumerate() {
            session.start(i as u64, 0.0);
            session.state.score = score;
            session.update(&TickInput::default(), 120.0, i as f64);
        }
        assert_eq!(session.high_scores.scores(), vec![200, 200, 100, 50, 30]);
        assert_eq!(session.high_scores.entries[0].timestamp, 1.0);
        assert_eq!(session.high_scores.entries[1].timestamp, 3.0);
    }

    #[test]
    fn test_restart_cancels_pending_tick() {
        let mut session = Session::new(Settings::default());
        let first = session.start(1, 0.0).unwrap();
        for _ in 0..10 {
            session.clock_tick(first, 0.0);
        }
        assert_eq!(session.state.remaining_seconds(), 110);

        let second = session.start(2, 0.0).unwrap();
        let (outcome, _) = session.clock_tick(first, 0.0);
        assert_eq!(outcome, TickOutcome::Ignored);
        assert_eq!(session.state.remaining_seconds(), 120);

        session.clock_tick(second, 0.0);
        assert_eq!(session.state.remaining_seconds(), 119);
    }

    #[test]
    fn test_moves_ignored_when_over() {
        let mut session = Session::new(Settings::default());
        session.start(8, 0.0);
        session.update(&TickInput::default(), 120.0, 0.0);
        let before = session.state.player;
        session.move_player(Direction::Left, 0.0);
        assert_eq!(session.state.player, before);
    }

    #[test]
    fn test_projected_rank_tracks_running_score() {
        let mut session = Session::new(Settings::default());
        for (i, score) in [300u64, 100].into_iter().enumerate() {
            session.start(i as u64, 0.0);
            session.state.score = score;
            session.update(&TickInput::default(), 120.0, i as f64);
        }
        assert_eq!(session.best_score(), 300);

        session.start(9, 0.0);
        assert_eq!(session.projected_rank(), None);
        session.state.score = 150;
        assert_eq!(session.projected_rank(), Some(2));
        session.state.score = 400;
        assert_eq!(session.projected_rank(), Some(1));
        assert_eq!(session.best_score(), 400);

        session.update(&TickInput::default(), 120.0, 5.0);
        assert_eq!(session.last_rank, Some(1));
        assert_eq!(session.high_scores.top_score(), Some(400));
    }
}
