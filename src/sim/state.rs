//! Round state and entity types
//!
//! Everything the presentation layer reads lives here. Entities are owned by
//! `GameState` and only changed through the interaction resolver.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::RoundClock;
use super::geo::LatLng;
use crate::settings::Settings;

/// Creature rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Normal,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, in ascending value
    pub const ALL: [Rarity; 4] = [Rarity::Normal, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    /// Fixed point value for this tier
    pub fn points(&self) -> u64 {
        match self {
            Rarity::Normal => 10,
            Rarity::Rare => 30,
            Rarity::Epic => 50,
            Rarity::Legendary => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Normal => "normal",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// A collectible creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub position: LatLng,
    pub rarity: Rarity,
    pub points: u64,
    pub caught: bool,
}

impl Creature {
    pub fn new(id: u32, position: LatLng, rarity: Rarity) -> Self {
        Self {
            id,
            position,
            rarity,
            points: rarity.points(),
            caught: false,
        }
    }

    /// Copy of this creature marked as caught
    pub fn into_caught(self) -> Self {
        Self { caught: true, ..self }
    }
}

/// An energy stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: u32,
    pub position: LatLng,
    pub activated: bool,
}

impl Stop {
    pub fn new(id: u32, position: LatLng) -> Self {
        Self {
            id,
            position,
            activated: false,
        }
    }

    /// Copy of this stop marked as activated
    pub fn into_activated(self) -> Self {
        Self {
            activated: true,
            ..self
        }
    }
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Before the first start
    #[default]
    Idle,
    /// Clock is counting down, input accepted
    Running,
    /// Clock expired
    Over,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { seed: u64 },
    CreatureCaught { id: u32, rarity: Rarity, points: u64 },
    /// In range but not enough energy
    CaptureBlocked { id: u32 },
    StopActivated { id: u32, energy: u32 },
    ClockTicked { remaining: u32 },
    RoundOver { score: u64 },
}

/// What the map view needs to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub player_position: LatLng,
    pub creatures: Vec<Creature>,
    pub stops: Vec<Stop>,
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the current round's placement RNG
    pub seed: u64,
    pub settings: Settings,
    pub clock: RoundClock,
    pub player: LatLng,
    /// 0..=max_energy
    pub energy: u32,
    /// Never decreases within a round
    pub score: u64,
    pub creatures: Vec<Creature>,
    pub stops: Vec<Stop>,
    /// Events since last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Create an idle round. Nothing is spawned until `start_round`.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        Self {
            seed,
            player: settings.origin,
            energy: settings.max_energy,
            score: 0,
            clock: RoundClock::new(settings.round_seconds),
            settings,
            creatures: Vec::new(),
            stops: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.clock.phase()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == RoundPhase::Running
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining()
    }

    /// Reset everything and begin a new round seeded with `seed`.
    /// Any pending clock tick from the previous round is cancelled first.
    pub fn start_round(&mut self, seed: u64) {
        self.clock.cancel();

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.player = self.settings.origin;
        self.energy = self.settings.max_energy;
        self.score = 0;
        self.creatures = super::spawn::generate_creatures(
            &mut self.rng,
            self.settings.origin,
            self.settings.creature_count,
            self.settings.creature_radius,
        );
        self.stops = super::spawn::generate_stops(
            &mut self.rng,
            self.settings.origin,
            self.settings.stop_count,
            self.settings.stop_radius,
        );

        self.clock.start(self.settings.round_seconds);
        self.events.push(GameEvent::RoundStarted { seed });
        log::info!(
            "Round started (seed {}, {} creatures, {} stops)",
            seed,
            self.creatures.len(),
            self.stops.len()
        );
    }

    /// Number of creatures caught this round
    pub fn caught_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.caught).count()
    }

    /// Number of stops activated this round
    pub fn activated_count(&self) -> usize {
        self.stops.iter().filter(|s| s.activated).count()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            player_position: self.player,
            creatures: self.creatures.clone(),
            stops: self.stops.clone(),
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
