//! Player movement
//!
//! A direction event moves the player one fixed step along a single axis.
//! Up/down change latitude, left/right change longitude.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geo::{LatLng, proximity};
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse a direction name (`up|down|left|right`)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Map a keyboard `key` value (arrows or WASD)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Key name the on-screen button for this direction reports
    pub fn button_key(&self) -> &'static str {
        match self {
            Direction::Up => "arrowup",
            Direction::Down => "arrowdown",
            Direction::Left => "arrowleft",
            Direction::Right => "arrowright",
        }
    }

    /// Unit offset in (lat, lng)
    pub fn unit(&self) -> DVec2 {
        match self {
            Direction::Up => DVec2::X,
            Direction::Down => DVec2::NEG_X,
            Direction::Left => DVec2::NEG_Y,
            Direction::Right => DVec2::Y,
        }
    }
}

/// Move `position` one `step` toward `direction`
#[inline]
pub fn move_player(position: LatLng, direction: Direction, step: f64) -> LatLng {
    position + direction.unit() * step
}

/// Move by direction name; unknown names leave the position unchanged
pub fn move_by_name(position: LatLng, direction: &str, step: f64) -> LatLng {
    match Direction::from_str(direction) {
        Some(dir) => move_player(position, dir, step),
        None => position,
    }
}

/// Keys currently held down by the player (keyboard keys or on-screen buttons).
/// A direction stays active while any key mapped to it is held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<String>,
}

impl HeldKeys {
    /// Mark `key` as held. Returns true if nothing was held before.
    /// Keys that don't map to a direction are ignored.
    pub fn press(&mut self, key: &str) -> bool {
        if Direction::from_key(key).is_none() {
            return false;
        }
        let was_empty = self.is_empty();
        self.keys.insert(key.to_lowercase());
        was_empty
    }

    /// Release `key`. Returns true if nothing is held any more.
    pub fn release(&mut self, key: &str) -> bool {
        self.keys.remove(&key.to_lowercase());
        self.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.keys
            .iter()
            .any(|k| Direction::from_key(k) == Some(dir))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Held directions in up, down, left, right order (one repeat's worth of moves)
    pub fn directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.is_held(*d))
            .collect()
    }
}

fn nearest(from: LatLng, points: impl Iterator<Item = LatLng>) -> Option<LatLng> {
    points.min_by(|a, b| {
        proximity(from, *a)
            .partial_cmp(&proximity(from, *b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Demo mode: pick the single step that brings the player closest to the
/// nearest useful target. Creatures are targets only while energy covers a
/// capture; otherwise head for an unactivated stop.
pub fn autopilot_direction(state: &GameState) -> Option<Direction> {
    let player = state.player;
    let can_capture = state.energy >= state.settings.capture_cost;

    let creature = if can_capture {
        nearest(player, state.creatures.iter().filter(|c| !c.caught).map(|c| c.position))
    } else {
        None
    };
    let target = creature.or_else(|| {
        nearest(player, state.stops.iter().filter(|s| !s.activated).map(|s| s.position))
    })?;

    let step = state.settings.move_step;
    let current = proximity(player, target);
    Direction::ALL
        .into_iter()
        .map(|d| (d, proximity(move_player(player, d, step), target)))
        .filter(|(_, dist)| *dist < current)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(d, _)| d)
}
