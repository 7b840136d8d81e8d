//! Scroll-driven motion signals
//!
//! `progress` is the page scroll position in [0, 1], smoothed by a spring.
//! `velocity` is how fast progress is changing, smoothed again so the camera
//! and star stretch don't jitter. Both are owned here and read by everyone else.

use glam::Vec2;

use crate::consts::*;
use crate::lerp;

/// Damped spring (F = -kx - cv) integrated with semi-implicit Euler substeps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub target: f32,
    pub velocity: f32,
    stiffness: f32,
    damping: f32,
    mass: f32,
}

impl Spring {
    pub fn new(value: f32, stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            value,
            target: value,
            velocity: 0.0,
            stiffness: stiffness.max(0.0001),
            damping: damping.max(0.0),
            mass: mass.max(0.0001),
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value with no motion
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Largest substep that keeps explicit integration stable for this spring
    fn max_substep(&self) -> f32 {
        let omega = (self.stiffness / self.mass).sqrt();
        let damping_rate = self.damping / self.mass;
        let mut h = SPRING_DT.min(0.5 / omega);
        if damping_rate > 0.0 {
            h = h.min(1.0 / damping_rate);
        }
        h
    }

    /// Advance by `dt` seconds; returns the new value
    pub fn step(&mut self, dt: f32) -> f32 {
        let max_h = self.max_substep();
        let mut remaining = dt.clamp(0.0, MAX_FRAME_DT);
        while remaining > 0.0 {
            let h = remaining.min(max_h);
            let accel = (self.stiffness * (self.target - self.value) - self.damping * self.velocity)
                / self.mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        self.value
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.value).abs() < epsilon && self.velocity.abs() < epsilon
    }
}

/// Normalized scroll position, clamped to [0, 1]
///
/// Pages that do not scroll report 0. Overscroll (negative offsets, rubber
/// banding past the bottom) clamps to the nearest end.
pub fn raw_progress(scroll_y: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let scrollable = scroll_height - viewport_height;
    if !(scrollable > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable).clamp(0.0, 1.0)
}

/// Smoothed progress and velocity
#[derive(Debug, Clone)]
pub struct MotionSignals {
    spring: Spring,
    raw: f32,
    progress: f32,
    velocity: f32,
}

impl Default for MotionSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionSignals {
    pub fn new() -> Self {
        let (k, c, m) = PROGRESS_SPRING;
        Self {
            spring: Spring::new(0.0, k, c, m),
            raw: 0.0,
            progress: 0.0,
            velocity: 0.0,
        }
    }

    /// Feed the latest scroll metrics
    pub fn set_scroll(&mut self, scroll_y: f32, scroll_height: f32, viewport_height: f32) {
        self.raw = raw_progress(scroll_y, scroll_height, viewport_height);
        self.spring.set_target(self.raw);
    }

    /// Advance the filters by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let previous = self.progress;
        self.progress = self.spring.step(dt).clamp(0.0, 1.0);

        let instantaneous = (self.progress - previous).abs() * VELOCITY_SCALE;
        self.velocity = lerp(self.velocity, instantaneous, VELOCITY_BLEND).max(0.0);
    }

    /// Unsmoothed scroll position
    pub fn raw_progress(&self) -> f32 {
        self.raw
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

/// Content shake offset in pixels
///
/// A fast sine/cosine of progress: a faint tremor while cruising, a hard
/// rattle while warping.
pub fn shake_offset(progress: f32, warping: bool, enabled: bool) -> Vec2 {
    if !enabled {
        return Vec2::ZERO;
    }
    let amplitude = if warping { SHAKE_WARP } else { SHAKE_IDLE };
    let phase = progress * SHAKE_FREQUENCY;
    Vec2::new(phase.sin(), phase.cos()) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_raw_progress_edges() {
        assert_eq!(raw_progress(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(raw_progress(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(raw_progress(2000.0, 3000.0, 1000.0), 1.0);
        assert_eq!(raw_progress(-120.0, 3000.0, 1000.0), 0.0);
        assert_eq!(raw_progress(2600.0, 3000.0, 1000.0), 1.0);
        // Not scrollable
        assert_eq!(raw_progress(50.0, 800.0, 1000.0), 0.0);
        assert_eq!(raw_progress(f32::NAN, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_progress_converges_without_overshoot() {
        let mut signals = MotionSignals::new();
        signals.set_scroll(2000.0, 3000.0, 1000.0);
        let mut last = 0.0;
        for _ in 0..240 {
            signals.update(FRAME);
            assert!(signals.progress() >= last - 1e-6);
            assert!(signals.progress() <= 1.0);
            last = signals.progress();
        }
        assert!((signals.progress() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_velocity_rises_then_decays() {
        let mut signals = MotionSignals::new();
        signals.set_scroll(1500.0, 3000.0, 1000.0);
        let mut peak: f32 = 0.0;
        for _ in 0..30 {
            signals.update(FRAME);
            peak = peak.max(signals.velocity());
        }
        assert!(peak > 0.0);
        for _ in 0..600 {
            signals.update(FRAME);
        }
        assert!(signals.velocity() < peak * 0.1);
    }

    #[test]
    fn test_scrolling_up_still_positive_velocity() {
        let mut signals = MotionSignals::new();
        signals.set_scroll(2000.0, 3000.0, 1000.0);
        for _ in 0..120 {
            signals.update(FRAME);
        }
        signals.set_scroll(0.0, 3000.0, 1000.0);
        for _ in 0..10 {
            signals.update(FRAME);
            assert!(signals.velocity() > 0.0);
        }
    }

    #[test]
    fn test_stiff_light_spring_is_stable() {
        // Crosshair dot parameters: very light and heavily damped
        let mut spring = Spring::new(0.0, 600.0, 40.0, 0.1);
        spring.set_target(500.0);
        for _ in 0..120 {
            spring.step(FRAME);
            assert!(spring.value.is_finite());
            assert!(spring.value <= 500.0 * 1.05);
        }
        assert!(spring.is_settled(0.5));
    }

    #[test]
    fn test_shake() {
        assert_eq!(shake_offset(0.3, true, false), Vec2::ZERO);
        let idle = shake_offset(0.3, false, true);
        let warp = shake_offset(0.3, true, true);
        assert!((idle.length() - SHAKE_IDLE).abs() < 1e-4);
        assert!((warp.length() - SHAKE_WARP).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_progress_clamped_under_overscroll(
            samples in prop::collection::vec((-5000.0f32..10000.0, 0.0f32..0.25), 1..120),
        ) {
            let mut signals = MotionSignals::new();
            for (scroll_y, dt) in samples {
                signals.set_scroll(scroll_y, 4000.0, 900.0);
                signals.update(dt);
                prop_assert!((0.0..=1.0).contains(&signals.progress()));
                prop_assert!((0.0..=1.0).contains(&signals.raw_progress()));
            }
        }

        #[test]
        fn prop_velocity_non_negative(
            // Includes strictly decreasing scroll sequences
            start in 0.0f32..3100.0,
            deltas in prop::collection::vec(-400.0f32..400.0, 1..120),
        ) {
            let mut signals = MotionSignals::new();
            let mut y = start;
            for d in deltas {
                y += d;
                signals.set_scroll(y, 4000.0, 900.0);
                signals.update(FRAME);
                prop_assert!(signals.velocity() >= 0.0);
            }
        }
    }
}
