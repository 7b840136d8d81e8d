//! Decorative ships
//!
//! A handful of wireframe fighters drifting through the star field. They share
//! the star pool's depth recycling and only add a little banking motion.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::field::{DepthEntity, FieldBounds, advance_entity};
use crate::consts::*;

/// Silhouette to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipKind {
    /// Long body with crossed wings
    Interceptor,
    /// Ball cockpit between two wing panels
    TwinWing,
}

/// A decorative ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub kind: ShipKind,
    pub pos: Vec3,
    /// Bank angle around z (radians)
    pub roll: f32,
    /// Phase offset for the banking wave
    pub phase: f32,
    /// Sway radius; 20 gives the reference sway
    pub orbit: f32,
}

impl DepthEntity for Ship {
    fn depth(&self) -> f32 {
        self.pos.z
    }

    fn move_depth(&mut self, dz: f32) {
        self.pos.z += dz;
    }

    fn recycle(&mut self, bounds: &FieldBounds, rng: &mut Pcg32) {
        let (x, y) = bounds.random_lateral(rng);
        self.pos = Vec3::new(x, y, bounds.far);
    }
}

/// The ships currently in flight
#[derive(Debug, Clone)]
pub struct ShipSquadron {
    ships: Vec<Ship>,
    bounds: FieldBounds,
    rng: Pcg32,
}

impl ShipSquadron {
    /// Volume ships fly through
    pub const fn bounds() -> FieldBounds {
        FieldBounds {
            half_width: SHIP_HALF_WIDTH,
            half_height: SHIP_HALF_HEIGHT,
            far: SHIP_FAR_PLANE,
            near: SHIP_NEAR_THRESHOLD,
        }
    }

    /// Spawn `count` ships staggered 40 units apart in depth
    pub fn spawn(count: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ships = (0..count)
            .map(|i| Ship {
                kind: if i % 2 == 0 {
                    ShipKind::Interceptor
                } else {
                    ShipKind::TwinWing
                },
                pos: Vec3::new(
                    rng.random_range(-25.0..=25.0),
                    rng.random_range(-10.0..=10.0),
                    -100.0 - i as f32 * 40.0,
                ),
                roll: 0.0,
                phase: rng.random_range(0.0..100.0),
                orbit: rng.random_range(10.0..30.0),
            })
            .collect();

        Self {
            ships,
            bounds: Self::bounds(),
            rng,
        }
    }

    /// Fly forward at `speed * SHIP_SPEED_FACTOR` and bank with wall-clock time
    pub fn advance(&mut self, speed: f32, ticks: f32, time_ms: f64) {
        let ticks = ticks.max(0.0);
        let dz = speed.max(0.0) * SHIP_SPEED_FACTOR * ticks;
        let bounds = self.bounds;

        for ship in &mut self.ships {
            // Wrap wall-clock time so f32 keeps its precision on long sessions
            let t = ((time_ms * 0.001) % 10_000.0) as f32;
            let wave = (t + ship.phase).sin();
            ship.pos.x += wave * 0.02 * (ship.orbit / 20.0) * ticks;
            ship.roll = wave * 0.1;
            advance_entity(ship, dz, &bounds, &mut self.rng);
        }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_alternates_kinds_and_staggers_depth() {
        let squadron = ShipSquadron::spawn(SHIP_COUNT, 1);
        let ships = squadron.ships();
        assert_eq!(ships.len(), SHIP_COUNT);
        assert_eq!(ships[0].kind, ShipKind::Interceptor);
        assert_eq!(ships[1].kind, ShipKind::TwinWing);
        for pair in ships.windows(2) {
            assert!((pair[0].pos.z - pair[1].pos.z - 40.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ships_recycle_past_threshold() {
        let mut squadron = ShipSquadron::spawn(2, 4);
        // Far enough to push every ship past the threshold in one step
        squadron.advance(100.0, 3.0, 0.0);
        let bounds = ShipSquadron::bounds();
        for ship in squadron.ships() {
            assert!(ship.pos.z <= bounds.near);
        }
        assert_eq!(squadron.len(), 2);
    }

    #[test]
    fn test_roll_is_bounded() {
        let mut squadron = ShipSquadron::spawn(SHIP_COUNT, 8);
        for frame in 0..600 {
            squadron.advance(0.2, 1.0, frame as f64 * 16.7);
            for ship in squadron.ships() {
                assert!(ship.roll.abs() <= 0.1 + f32::EPSILON);
            }
        }
    }
}
