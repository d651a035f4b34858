//! Geo Catch - A location-based creature catching game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (clock, movement, captures, stops)
//! - `highscores`: Session leaderboard
//! - `hud`: HUD formatting contract (timer, energy bands)
//! - `session`: Round-session context owning state and leaderboard
//! - `settings`: Data-driven game tuning

pub mod highscores;
pub mod hud;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Map origin (Singapore), latitude then longitude
    pub const ORIGIN_LAT: f64 = 1.3521;
    pub const ORIGIN_LNG: f64 = 103.8198;

    /// Round length in seconds
    pub const ROUND_SECONDS: u32 = 120;
    /// Clock period (one tick per second)
    pub const CLOCK_PERIOD_MS: u32 = 1000;

    /// Creatures spawned per round and their placement box size
    pub const CREATURE_COUNT: usize = 10;
    pub const CREATURE_RADIUS: f64 = 0.02;

    /// Stops spawned per round (tighter box than creatures)
    pub const STOP_COUNT: usize = 5;
    pub const STOP_RADIUS: f64 = 0.015;

    /// Player step per direction event (coordinate units)
    pub const MOVE_STEP: f64 = 0.0008;
    /// Repeat interval while a direction is held
    pub const MOVE_REPEAT_MS: u32 = 100;

    /// Capture/activation distance (strictly less than)
    pub const PROXIMITY_THRESHOLD: f64 = 0.0005;

    /// Energy economy
    pub const MAX_ENERGY: u32 = 100;
    pub const CAPTURE_COST: u32 = 20;
    pub const STOP_REFILL: u32 = 50;
}
