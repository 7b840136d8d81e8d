//! Warpfield - animated starfield and warp transitions for the SMS // Studio site
//!
//! Core modules:
//! - `sim`: Pure simulation (star pools, motion signals, warp and page transitions)
//! - `app`: Top-level controller owning every per-mount signal
//! - `driver`: Cancellable per-frame loop
//! - `renderer`: WebGPU starfield pipeline
//! - `platform`: Browser abstraction (frame scheduling, listeners, viewport)
//! - `chrome`: DOM-facing projection of controller state

pub mod app;
pub mod chrome;
pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::App;
pub use error::{Result, WarpError};
pub use settings::{QualityPreset, Settings, StarStyle};
pub use sim::PageId;

/// Engine configuration constants
pub mod consts {
    /// Reference frame rate that per-tick speeds are tuned for
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed integration step for springs (seconds)
    pub const SPRING_DT: f32 = 1.0 / 120.0;

    /// Star volume
    pub const STAR_HALF_EXTENT: f32 = 40.0;
    pub const STAR_FAR_PLANE: f32 = -100.0;
    pub const STAR_NEAR_THRESHOLD: f32 = 5.0;
    pub const STAR_MIN_SPEED: f32 = 0.05;
    pub const STAR_MAX_SPEED: f32 = 0.25;
    /// Streak length per unit of effective speed
    pub const STRETCH_GAIN: f32 = 6.0;
    /// Longest streak allowed (world units)
    pub const MAX_STRETCH: f32 = 12.0;

    /// Flight speed: base + intensity * gain + progress * gain
    pub const BASE_FLIGHT_SPEED: f32 = 0.2;
    pub const WARP_SPEED_GAIN: f32 = 4.0;
    pub const SCROLL_SPEED_GAIN: f32 = 2.0;
    /// Star sprite size: base + intensity * gain
    pub const STAR_BASE_SIZE: f32 = 0.1;
    pub const STAR_WARP_SIZE_GAIN: f32 = 0.2;

    /// Camera defaults
    pub const BASE_FOV_DEG: f32 = 75.0;
    pub const MAX_FOV_DEG: f32 = 120.0;
    /// Degrees of FOV added per unit of scroll velocity
    pub const FOV_VELOCITY_GAIN: f32 = 10.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
    pub const CAMERA_Z: f32 = 5.0;

    /// Decorative ships
    pub const SHIP_COUNT: usize = 4;
    pub const SHIP_HALF_WIDTH: f32 = 30.0;
    pub const SHIP_HALF_HEIGHT: f32 = 15.0;
    pub const SHIP_FAR_PLANE: f32 = -200.0;
    pub const SHIP_NEAR_THRESHOLD: f32 = 10.0;
    /// Ships fly slightly slower than the stars around them
    pub const SHIP_SPEED_FACTOR: f32 = 0.9;

    /// Planet approach
    pub const PLANET_START_Z: f32 = -120.0;
    pub const PLANET_TRAVEL: f32 = 150.0;
    pub const PLANET_SPIN_PER_TICK: f32 = 0.002;

    /// Scroll smoothing spring (stiffness, damping, mass)
    pub const PROGRESS_SPRING: (f32, f32, f32) = (80.0, 25.0, 1.0);
    /// Scale applied to per-frame progress deltas
    pub const VELOCITY_SCALE: f32 = 50.0;
    /// Per-frame blend toward the instantaneous velocity
    pub const VELOCITY_BLEND: f32 = 0.1;

    /// Warp intensity while jumping between pages
    pub const MAX_WARP_INTENSITY: f32 = 5.0;
    /// Canvas blur kicks in above this intensity
    pub const WARP_FILTER_THRESHOLD: f32 = 0.5;
    /// Outgoing content fade-out must finish before the swap (ms)
    pub const SWAP_DELAY_MS: f64 = 600.0;
    /// Incoming content fade-in must finish before the warp releases (ms)
    pub const SETTLE_DELAY_MS: f64 = 600.0;

    /// Content shake amplitude (px)
    pub const SHAKE_IDLE: f32 = 1.0;
    pub const SHAKE_WARP: f32 = 15.0;
    pub const SHAKE_FREQUENCY: f32 = 100.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
