//! Star pool
//!
//! A fixed number of stars fly toward the camera along +z. Stars that pass
//! the near threshold are recycled in place at the far plane, so the pool
//! never grows and the flight never ends.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::StarStyle;

/// Box the pool lives in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    /// Lateral extent: x in [-half_width, half_width]
    pub half_width: f32,
    /// Lateral extent: y in [-half_height, half_height]
    pub half_height: f32,
    /// Depth entities respawn at
    pub far: f32,
    /// Depth past which entities are recycled
    pub near: f32,
}

impl FieldBounds {
    /// Volume used by the background stars
    pub const fn stars() -> Self {
        Self {
            half_width: STAR_HALF_EXTENT,
            half_height: STAR_HALF_EXTENT,
            far: STAR_FAR_PLANE,
            near: STAR_NEAR_THRESHOLD,
        }
    }

    /// Whether a point lies inside the volume (bounds inclusive)
    pub fn contains(&self, p: Vec3) -> bool {
        p.x.abs() <= self.half_width
            && p.y.abs() <= self.half_height
            && p.z >= self.far
            && p.z <= self.near
    }

    /// Random (x, y) inside the lateral bounds
    pub fn random_lateral(&self, rng: &mut Pcg32) -> (f32, f32) {
        (
            rng.random_range(-self.half_width..=self.half_width),
            rng.random_range(-self.half_height..=self.half_height),
        )
    }
}

/// Something that travels along the depth axis and gets recycled
pub trait DepthEntity {
    fn depth(&self) -> f32;
    fn move_depth(&mut self, dz: f32);
    /// Respawn at the far plane with fresh lateral coordinates
    fn recycle(&mut self, bounds: &FieldBounds, rng: &mut Pcg32);
}

/// Move an entity `dz` toward the camera, recycling it if it passes the near threshold
///
/// An entity sitting exactly on the threshold is still visible this frame.
/// Returns true if the entity was recycled.
#[inline]
pub fn advance_entity<E: DepthEntity>(
    entity: &mut E,
    dz: f32,
    bounds: &FieldBounds,
    rng: &mut Pcg32,
) -> bool {
    entity.move_depth(dz);
    if entity.depth() > bounds.near {
        entity.recycle(bounds, rng);
        true
    } else {
        false
    }
}

/// A single star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec3,
    /// Per-star speed, scaled by the global flight speed
    pub base_speed: f32,
    /// Depth of the streak tail (equals `pos.z` for point stars)
    pub tail_z: f32,
}

impl Star {
    /// Tail end of the streak
    pub fn tail(&self) -> Vec3 {
        Vec3::new(self.pos.x, self.pos.y, self.tail_z)
    }

    /// Current streak length
    pub fn stretch(&self) -> f32 {
        self.pos.z - self.tail_z
    }
}

impl DepthEntity for Star {
    fn depth(&self) -> f32 {
        self.pos.z
    }

    fn move_depth(&mut self, dz: f32) {
        self.pos.z += dz;
    }

    fn recycle(&mut self, bounds: &FieldBounds, rng: &mut Pcg32) {
        let (x, y) = bounds.random_lateral(rng);
        self.pos = Vec3::new(x, y, bounds.far);
        self.tail_z = bounds.far;
    }
}

/// Streak length for a given per-tick step, capped so warp streaks stay readable
#[inline]
pub fn stretch_for_step(step: f32) -> f32 {
    (step * STRETCH_GAIN).clamp(0.0, MAX_STRETCH)
}

/// Fixed-size pool of stars
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
    bounds: FieldBounds,
    style: StarStyle,
    rng: Pcg32,
    recycled_total: u64,
}

impl StarField {
    /// Allocate `count` stars spread through the volume
    pub fn initialize(count: usize, bounds: FieldBounds, style: StarStyle, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_near = bounds.near.min(0.0).max(bounds.far);

        let stars = (0..count)
            .map(|_| {
                let (x, y) = bounds.random_lateral(&mut rng);
                let z = rng.random_range(bounds.far..=spawn_near);
                Star {
                    pos: Vec3::new(x, y, z),
                    base_speed: rng.random_range(STAR_MIN_SPEED..STAR_MAX_SPEED),
                    tail_z: z,
                }
            })
            .collect();

        Self {
            stars,
            bounds,
            style,
            rng,
            recycled_total: 0,
        }
    }

    /// Fly every star forward by `base_speed * multiplier * ticks`
    ///
    /// `ticks` is elapsed time in reference frames (1.0 at 60 Hz).
    /// Returns how many stars were recycled.
    pub fn advance(&mut self, multiplier: f32, ticks: f32) -> usize {
        let multiplier = multiplier.max(0.0);
        let ticks = ticks.max(0.0);
        let bounds = self.bounds;
        let mut recycled = 0;

        for star in &mut self.stars {
            let step = star.base_speed * multiplier;
            if advance_entity(star, step * ticks, &bounds, &mut self.rng) {
                recycled += 1;
            }
            star.tail_z = match self.style {
                StarStyle::Points => star.pos.z,
                StarStyle::Streaks => (star.pos.z - stretch_for_step(step)).max(bounds.far),
            };
        }

        self.recycled_total += recycled as u64;
        recycled
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Direct access for tests and tooling; the pool size cannot change through it
    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    pub fn style(&self) -> StarStyle {
        self.style
    }

    /// Stars recycled since initialization
    pub fn recycled_total(&self) -> u64 {
        self.recycled_total
    }
}
