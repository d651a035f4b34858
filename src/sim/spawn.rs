//! Round-start entity placement
//!
//! Each entity gets two independent uniform offsets in `[-radius/2, radius/2]`
//! around the origin. Ids are the spawn index.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::geo::{LatLng, lat_lng};
use super::state::{Creature, Rarity, Stop};

/// Uniform offset of a box of side `radius` around `origin`
fn scatter<R: Rng + ?Sized>(rng: &mut R, origin: LatLng, radius: f64) -> LatLng {
    let dlat = (rng.random::<f64>() - 0.5) * radius;
    let dlng = (rng.random::<f64>() - 0.5) * radius;
    lat_lng(origin.x + dlat, origin.y + dlng)
}

/// Spawn `count` uncaught creatures with uniformly chosen rarity
pub fn generate_creatures<R: Rng + ?Sized>(
    rng: &mut R,
    origin: LatLng,
    count: usize,
    radius: f64,
) -> Vec<Creature> {
    (0..count)
        .map(|i| {
            let position = scatter(rng, origin, radius);
            let rarity = *Rarity::ALL.choose(rng).unwrap_or(&Rarity::Normal);
            Creature::new(i as u32, position, rarity)
        })
        .collect()
}

/// Spawn `count` inactive stops
pub fn generate_stops<R: Rng + ?Sized>(
    rng: &mut R,
    origin: LatLng,
    count: usize,
    radius: f64,
) -> Vec<Stop> {
    (0..count)
        .map(|i| Stop::new(i as u32, scatter(rng, origin, radius)))
        .collect()
}
