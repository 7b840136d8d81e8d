//! Everything the renderer draws, advanced one frame at a time

use glam::Vec3;

use super::camera::Camera;
use super::field::{FieldBounds, StarField};
use super::ships::ShipSquadron;
use crate::consts::*;
use crate::settings::Settings;

/// Planet lateral position
pub const PLANET_CENTER_XY: (f32, f32) = (15.0, -10.0);
pub const PLANET_RADIUS: f32 = 6.0;

/// Signals sampled at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Smoothed scroll progress [0, 1]
    pub progress: f32,
    /// Smoothed scroll velocity (>= 0)
    pub velocity: f32,
    /// Warp intensity [0, MAX_WARP_INTENSITY]
    pub intensity: f32,
    /// Wall-clock time (ms)
    pub time_ms: f64,
    /// Elapsed time in reference frames (1.0 at 60 Hz)
    pub ticks: f32,
}

/// Wireframe planet approached as the page scrolls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    pub center: Vec3,
    pub radius: f32,
    /// Accumulated spin around y (radians)
    pub spin: f32,
    pub opacity: f32,
}

impl Planet {
    pub fn new() -> Self {
        let mut planet = Self {
            center: Vec3::ZERO,
            radius: PLANET_RADIUS,
            spin: 0.0,
            opacity: 0.0,
        };
        planet.update(0.0, 0.0);
        planet
    }

    /// Slide in with scroll progress and keep turning
    pub fn update(&mut self, progress: f32, ticks: f32) {
        let (x, y) = PLANET_CENTER_XY;
        self.center = Vec3::new(x, y, PLANET_START_Z + progress * PLANET_TRAVEL);
        self.spin = (self.spin + PLANET_SPIN_PER_TICK * ticks) % std::f32::consts::TAU;
        self.opacity = 0.1 + progress * 0.2;
    }
}

impl Default for Planet {
    fn default() -> Self {
        Self::new()
    }
}

/// Star field, decorative ships, planet and camera
#[derive(Debug, Clone)]
pub struct Scene {
    field: StarField,
    ships: Option<ShipSquadron>,
    planet: Option<Planet>,
    camera: Camera,
    star_size: f32,
    flight_speed: f32,
}

impl Scene {
    pub fn new(settings: &Settings, aspect: f32, seed: u64) -> Self {
        let field = StarField::initialize(
            settings.star_count(),
            FieldBounds::stars(),
            settings.star_style,
            seed,
        );
        let ships = settings
            .quality
            .ships_enabled()
            .then(|| ShipSquadron::spawn(SHIP_COUNT, seed.wrapping_add(1)));
        let planet = settings.quality.planet_enabled().then(Planet::new);

        log::debug!(
            "Scene: {} stars, ships: {}, planet: {}",
            field.len(),
            ships.is_some(),
            planet.is_some()
        );

        Self {
            field,
            ships,
            planet,
            camera: Camera::new(aspect),
            star_size: STAR_BASE_SIZE,
            flight_speed: BASE_FLIGHT_SPEED,
        }
    }

    /// Global speed multiplier for stars and ships
    pub fn flight_speed(intensity: f32, progress: f32) -> f32 {
        BASE_FLIGHT_SPEED
            + intensity.max(0.0) * WARP_SPEED_GAIN
            + progress.clamp(0.0, 1.0) * SCROLL_SPEED_GAIN
    }

    /// Advance one frame: stars, camera, ships, planet
    ///
    /// Returns the number of stars recycled this frame.
    pub fn step(&mut self, input: &FrameInput) -> usize {
        self.flight_speed = Self::flight_speed(input.intensity, input.progress);
        self.star_size = STAR_BASE_SIZE + input.intensity.max(0.0) * STAR_WARP_SIZE_GAIN;

        let recycled = self.field.advance(self.flight_speed, input.ticks);
        self.camera.apply_velocity(input.velocity);

        if let Some(ships) = &mut self.ships {
            ships.advance(self.flight_speed, input.ticks, input.time_ms);
        }
        if let Some(planet) = &mut self.planet {
            planet.update(input.progress.clamp(0.0, 1.0), input.ticks.max(0.0));
        }
        recycled
    }

    /// New surface size; takes effect on the very next draw
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    pub fn ships(&self) -> Option<&ShipSquadron> {
        self.ships.as_ref()
    }

    pub fn planet(&self) -> Option<&Planet> {
        self.planet.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Star sprite size in world units
    pub fn star_size(&self) -> f32 {
        self.star_size
    }
}
