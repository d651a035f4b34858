//! Capture and stop activation
//!
//! Run after every player move and every entity-set change while the round is
//! running. Entities are replaced by id (`into_caught` / `into_activated`)
//! rather than edited in place. Once caught or activated an entity never
//! triggers again.

use super::geo::within;
use super::state::{GameEvent, GameState};

/// What a resolver run changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub caught: usize,
    pub blocked: usize,
    pub activated: usize,
}

impl Resolution {
    pub fn changed(&self) -> bool {
        self.caught > 0 || self.activated > 0
    }
}

/// Scan creatures and stops against the player position and apply effects.
///
/// Passes repeat until one changes nothing, so a refill from a stop can pay
/// for a creature that was blocked earlier in the same run. Every changing
/// pass flips at least one entity to caught or activated, so this terminates.
/// Blocked captures are reported from the final pass only.
pub fn resolve_interactions(state: &mut GameState) -> Resolution {
    let mut result = Resolution::default();
    if !state.is_running() {
        return result;
    }

    loop {
        let (pass, blocked_ids) = scan(state);
        result.caught += pass.caught;
        result.activated += pass.activated;
        if !pass.changed() {
            result.blocked = pass.blocked;
            state
                .events
                .extend(blocked_ids.into_iter().map(|id| GameEvent::CaptureBlocked { id }));
            return result;
        }
    }
}

/// One pass over creatures then stops. Returns the counts and the ids of
/// creatures in range that energy couldn't pay for.
fn scan(state: &mut GameState) -> (Resolution, Vec<u32>) {
    let mut result = Resolution::default();
    let mut blocked_ids = Vec::new();
    let player = state.player;
    let threshold = state.settings.proximity_threshold;
    let cost = state.settings.capture_cost;

    let creatures = std::mem::take(&mut state.creatures);
    state.creatures = creatures
        .into_iter()
        .map(|creature| {
            if creature.caught || !within(player, creature.position, threshold) {
                return creature;
            }
            if state.energy < cost {
                result.blocked += 1;
                blocked_ids.push(creature.id);
                return creature;
            }

            state.energy -= cost;
            state.score += creature.points;
            result.caught += 1;
            log::debug!(
                "Caught {} creature {} (+{}, energy {})",
                creature.rarity.as_str(),
                creature.id,
                creature.points,
                state.energy
            );
            state.events.push(GameEvent::CreatureCaught {
                id: creature.id,
                rarity: creature.rarity,
                points: creature.points,
            });
            creature.into_caught()
        })
        .collect();

    let max_energy = state.settings.max_energy;
    let refill = state.settings.stop_refill;
    let stops = std::mem::take(&mut state.stops);
    state.stops = stops
        .into_iter()
        .map(|stop| {
            if stop.activated || !within(player, stop.position, threshold) {
                return stop;
            }

            state.energy = state.energy.saturating_add(refill).min(max_energy);
            result.activated += 1;
            log::debug!("Activated stop {} (energy {})", stop.id, state.energy);
            state.events.push(GameEvent::StopActivated {
                id: stop.id,
                energy: state.energy,
            });
            stop.into_activated()
        })
        .collect();

    (result, blocked_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::geo::origin;
    use crate::sim::state::{Creature, Rarity, RoundPhase, Stop};
    use glam::DVec2;

    /// Running round with a hand-placed layout
    fn running_state(creatures: Vec<Creature>, stops: Vec<Stop>) -> GameState {
        let mut state = GameState::new(1, Settings::default());
        state.start_round(1);
        state.creatures = creatures;
        state.stops = stops;
        state.drain_events();
        state
    }

    fn far() -> DVec2 {
        DVec2::new(0.5, 0.5)
    }

    #[test]
    fn test_capture_on_exact_position() {
        let pos = origin() + DVec2::new(0.003, 0.001);
        let mut state = running_state(vec![Creature::new(0, pos, Rarity::Epic)], vec![]);
        state.player = pos;

        let r = resolve_interactions(&mut state);
        assert_eq!(r.caught, 1);
        assert!(state.creatures[0].caught);
        assert_eq!(state.energy, 80);
        assert_eq!(state.score, 50);

        // Standing still doesn't re-trigger
        let r = resolve_interactions(&mut state);
        assert!(!r.changed());
        assert_eq!(state.energy, 80);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_capture_blocked_without_energy() {
        let pos = origin();
        let mut state = running_state(vec![Creature::new(0, pos, Rarity::Legendary)], vec![]);
        state.energy = 10;

        let r = resolve_interactions(&mut state);
        assert_eq!(r.blocked, 1);
        assert!(!state.creatures[0].caught);
        assert_eq!(state.energy, 10);
        assert_eq!(state.score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::CaptureBlocked { id: 0 }]);
    }

    #[test]
    fn test_energy_can_reach_zero_but_not_below() {
        let pos = origin();
        let creatures = (0..6).map(|i| Creature::new(i, pos, Rarity::Normal)).collect();
        let mut state = running_state(creatures, vec![]);

        let r = resolve_interactions(&mut state);
        assert_eq!(r.caught, 5);
        assert_eq!(r.blocked, 1);
        assert_eq!(state.energy, 0);
        assert_eq!(state.score, 50);
        assert!(!state.creatures[5].caught);
    }

    #[test]
    fn test_stop_activation_refills() {
        let pos = origin() + DVec2::new(-0.002, 0.004);
        let mut state = running_state(vec![], vec![Stop::new(3, pos)]);
        state.player = pos;
        state.energy = 40;

        let r = resolve_interactions(&mut state);
        assert_eq!(r.activated, 1);
        assert!(state.stops[0].activated);
        assert_eq!(state.energy, 90);

        // Already activated
        resolve_interactions(&mut state);
        assert_eq!(state.energy, 90);
    }

    #[test]
    fn test_stop_refill_caps_at_max() {
        let mut state = running_state(vec![], vec![Stop::new(0, origin())]);
        state.energy = 80;
        resolve_interactions(&mut state);
        assert_eq!(state.energy, 100);
    }

    #[test]
    fn test_out_of_range_untouched() {
        let mut state = running_state(
            vec![Creature::new(0, origin() + DVec2::new(0.0006, 0.0), Rarity::Rare)],
            vec![Stop::new(0, origin() + DVec2::new(0.0, 0.0006))],
        );
        state.energy = 50;
        let r = resolve_interactions(&mut state);
        assert_eq!(r, Resolution::default());
        assert_eq!(state.energy, 50);
    }

    #[test]
    fn test_capture_and_activation_same_pass() {
        let pos = origin();
        let mut state = running_state(
            vec![Creature::new(0, pos, Rarity::Rare)],
            vec![Stop::new(0, pos + DVec2::new(0.0001, 0.0))],
        );
        state.energy = 20;

        let r = resolve_interactions(&mut state);
        assert_eq!(r.caught, 1);
        assert_eq!(r.activated, 1);
        assert_eq!(state.energy, 50);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_refill_unlocks_blocked_capture() {
        let pos = origin();
        let mut state = running_state(
            vec![Creature::new(0, pos, Rarity::Rare)],
            vec![Stop::new(0, pos)],
        );
        state.energy = 10;

        let r = resolve_interactions(&mut state);
        assert_eq!(r.caught, 1);
        assert_eq!(r.activated, 1);
        assert_eq!(r.blocked, 0);
        assert!(state.creatures[0].caught);
        assert!(state.stops[0].activated);
        assert_eq!(state.energy, 40);
        assert_eq!(state.score, 30);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::StopActivated { id: 0, energy: 60 },
                GameEvent::CreatureCaught {
                    id: 0,
                    rarity: Rarity::Rare,
                    points: 30
                },
            ]
        );
    }

    #[test]
    fn test_still_blocked_after_refill_is_reported_once() {
        let pos = origin();
        let creatures = (0..4).map(|i| Creature::new(i, pos, Rarity::Normal)).collect();
        let mut state = running_state(creatures, vec![Stop::new(0, pos)]);
        state.energy = 0;

        // 50 refill pays for two captures, the other two stay blocked
        let r = resolve_interactions(&mut state);
        assert_eq!(r.caught, 2);
        assert_eq!(r.blocked, 2);
        assert_eq!(state.energy, 10);
        let blocked: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::CaptureBlocked { .. }))
            .collect();
        assert_eq!(
            blocked,
            vec![
                GameEvent::CaptureBlocked { id: 2 },
                GameEvent::CaptureBlocked { id: 3 },
            ]
        );
    }

    #[test]
    fn test_refill_saturates_near_u32_max() {
        let mut state = running_state(vec![], vec![Stop::new(0, origin())]);
        state.settings.max_energy = u32::MAX;
        state.settings.stop_refill = u32::MAX - 5;
        state.energy = 100;
        resolve_interactions(&mut state);
        assert_eq!(state.energy, u32::MAX);
    }

    #[test]
    fn test_only_nearby_entity_changes() {
        let mut state = running_state(
            vec![
                Creature::new(0, origin() + far(), Rarity::Normal),
                Creature::new(1, origin(), Rarity::Normal),
            ],
            vec![],
        );
        let before = state.creatures[0].clone();
        resolve_interactions(&mut state);
        assert_eq!(state.creatures[0], before);
        assert!(state.creatures[1].caught);
        assert_eq!(state.creatures[1].id, 1);
    }

    #[test]
    fn test_inactive_round_does_nothing() {
        let mut state = GameState::new(1, Settings::default());
        state.creatures = vec![Creature::new(0, origin(), Rarity::Normal)];
        assert_eq!(state.phase(), RoundPhase::Idle);
        resolve_interactions(&mut state);
        assert!(!state.creatures[0].caught);
        assert_eq!(state.energy, 100);
    }
}
