//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time enters only through `tick` / `deliver_clock_tick`
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod geo;
pub mod interaction;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{RoundClock, TickOutcome, TickTimer};
pub use geo::{LatLng, lat_lng, origin, proximity};
pub use interaction::{Resolution, resolve_interactions};
pub use movement::{Direction, HeldKeys, autopilot_direction, move_by_name, move_player};
pub use spawn::{generate_creatures, generate_stops};
pub use state::{Creature, GameEvent, GameState, MapSnapshot, Rarity, RoundPhase, Stop};
pub use tick::{TickInput, apply_move, deliver_clock_tick, tick};
