//! Game tuning
//!
//! Every gameplay number in one serializable struct. Defaults match
//! `crate::consts`. The browser shell can override them from an inline JSON
//! block; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geo::{LatLng, origin};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Map ===
    /// Where the player starts and entities are scattered around
    pub origin: LatLng,

    // === Round ===
    /// Countdown length in seconds
    pub round_seconds: u32,

    // === Spawning ===
    pub creature_count: usize,
    /// Side of the placement box for creatures
    pub creature_radius: f64,
    pub stop_count: usize,
    /// Side of the placement box for stops
    pub stop_radius: f64,

    // === Movement ===
    pub move_step: f64,
    /// Repeat interval while a direction is held (ms)
    pub move_repeat_ms: u32,

    // === Interaction ===
    pub proximity_threshold: f64,
    pub max_energy: u32,
    pub capture_cost: u32,
    pub stop_refill: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: origin(),

            round_seconds: ROUND_SECONDS,

            creature_count: CREATURE_COUNT,
            creature_radius: CREATURE_RADIUS,
            stop_count: STOP_COUNT,
            stop_radius: STOP_RADIUS,

            move_step: MOVE_STEP,
            move_repeat_ms: MOVE_REPEAT_MS,

            proximity_threshold: PROXIMITY_THRESHOLD,
            max_energy: MAX_ENERGY,
            capture_cost: CAPTURE_COST,
            stop_refill: STOP_REFILL,
        }
    }
}

impl Settings {
    /// Replace unusable values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.origin.is_finite() {
            self.origin = defaults.origin;
        }
        if self.round_seconds == 0 {
            self.round_seconds = defaults.round_seconds;
        }
        if !positive(self.creature_radius) {
            self.creature_radius = defaults.creature_radius;
        }
        if !positive(self.stop_radius) {
            self.stop_radius = defaults.stop_radius;
        }
        if !positive(self.move_step) {
            self.move_step = defaults.move_step;
        }
        if self.move_repeat_ms == 0 {
            self.move_repeat_ms = defaults.move_repeat_ms;
        }
        if !positive(self.proximity_threshold) {
            self.proximity_threshold = defaults.proximity_threshold;
        }
        if self.max_energy == 0 {
            self.max_energy = defaults.max_energy;
        }
        self.capture_cost = self.capture_cost.min(self.max_energy);
        self.stop_refill = self.stop_refill.min(self.max_energy);
        self
    }

    /// Parse settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
