//! Pointer-driven HUD motion: the targeting crosshair and header parallax

use glam::Vec2;

use super::motion::Spring;

/// Ring spring (stiffness, damping, mass)
pub const RING_SPRING: (f32, f32, f32) = (350.0, 25.0, 0.3);
/// Center dot spring, snappier than the ring
pub const DOT_SPRING: (f32, f32, f32) = (600.0, 40.0, 0.1);
/// Ring scale while locked on a target
pub const LOCKED_SCALE: f32 = 0.75;
/// Ring rotation while locked on a target (degrees)
pub const LOCKED_ROTATION_DEG: f32 = 90.0;
/// Off-screen parking spot before the first pointer event
pub const PARKED: Vec2 = Vec2::new(-100.0, -100.0);
/// Peak header parallax offset in pixels, either direction
pub const PARALLAX_RANGE: f32 = 12.0;
/// Header panel moves this fraction of the parallax offset
pub const HEADER_PARALLAX_FACTOR: f32 = 0.3;
/// Readout shown beside a locked crosshair
pub const LOCK_READOUT: [&str; 2] = ["ANALIZA_CELU...", "STATUS: IDENTYFIKACJA"];

#[derive(Debug, Clone, Copy)]
struct Spring2 {
    x: Spring,
    y: Spring,
}

impl Spring2 {
    fn new(at: Vec2, (k, c, m): (f32, f32, f32)) -> Self {
        Self {
            x: Spring::new(at.x, k, c, m),
            y: Spring::new(at.y, k, c, m),
        }
    }

    fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    fn step(&mut self, dt: f32) -> Vec2 {
        Vec2::new(self.x.step(dt), self.y.step(dt))
    }

    fn value(&self) -> Vec2 {
        Vec2::new(self.x.value, self.y.value)
    }
}

/// Spring-followed crosshair that locks onto interactive elements
#[derive(Debug, Clone)]
pub struct Crosshair {
    pointer: Vec2,
    ring: Spring2,
    dot: Spring2,
    scale: Spring,
    rotation: Spring,
    locked: bool,
    /// A real pointer position has arrived
    tracking: bool,
}

impl Default for Crosshair {
    fn default() -> Self {
        Self::new()
    }
}

impl Crosshair {
    pub fn new() -> Self {
        let (k, c, m) = RING_SPRING;
        Self {
            pointer: PARKED,
            ring: Spring2::new(PARKED, RING_SPRING),
            dot: Spring2::new(PARKED, DOT_SPRING),
            scale: Spring::new(1.0, k, c, m),
            rotation: Spring::new(0.0, k, c, m),
            locked: false,
            tracking: false,
        }
    }

    /// Pointer moved to `(x, y)` client pixels; `over_target` when hovering
    /// a button, input, textarea or glass panel
    pub fn on_move(&mut self, x: f32, y: f32, over_target: bool) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.pointer = Vec2::new(x, y);
        self.tracking = true;
        self.ring.set_target(self.pointer);
        self.dot.set_target(self.pointer);
        self.locked = over_target;
        let (scale, rotation) = if over_target {
            (LOCKED_SCALE, LOCKED_ROTATION_DEG)
        } else {
            (1.0, 0.0)
        };
        self.scale.set_target(scale);
        self.rotation.set_target(rotation);
    }

    pub fn update(&mut self, dt: f32) {
        self.ring.step(dt);
        self.dot.step(dt);
        self.scale.step(dt);
        self.rotation.step(dt);
    }

    /// Latest raw pointer position
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn ring(&self) -> Vec2 {
        self.ring.value()
    }

    pub fn dot(&self) -> Vec2 {
        self.dot.value()
    }

    pub fn ring_scale(&self) -> f32 {
        self.scale.value
    }

    pub fn ring_rotation_deg(&self) -> f32 {
        self.rotation.value
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// False until the first pointer event; the pointer is parked off-screen until then
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }
}

/// Pointer parallax in pixels, zero at the viewport center, ±6 at the edges
pub fn hud_parallax(pointer: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    (pointer / viewport - Vec2::splat(0.5)) * PARALLAX_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_starts_parked() {
        let c = Crosshair::new();
        assert_eq!(c.ring(), PARKED);
        assert_eq!(c.dot(), PARKED);
        assert!(!c.locked());
        assert_eq!(c.ring_scale(), 1.0);
    }

    #[test]
    fn test_dot_leads_ring() {
        let mut c = Crosshair::new();
        c.on_move(400.0, 300.0, false);
        c.update(FRAME);
        let target = Vec2::new(400.0, 300.0);
        assert!(c.dot().distance(target) < c.ring().distance(target));

        for _ in 0..120 {
            c.update(FRAME);
        }
        assert!(c.ring().distance(target) < 1.0);
        assert!(c.dot().distance(target) < 1.0);
    }

    #[test]
    fn test_lock_shrinks_and_rotates() {
        let mut c = Crosshair::new();
        c.on_move(10.0, 10.0, true);
        assert!(c.locked());
        for _ in 0..120 {
            c.update(FRAME);
        }
        assert!((c.ring_scale() - LOCKED_SCALE).abs() < 0.01);
        assert!((c.ring_rotation_deg() - LOCKED_ROTATION_DEG).abs() < 0.5);

        c.on_move(12.0, 10.0, false);
        assert!(!c.locked());
    }

    #[test]
    fn test_ignores_non_finite_pointer() {
        let mut c = Crosshair::new();
        c.on_move(f32::NAN, 5.0, true);
        assert_eq!(c.pointer(), PARKED);
        assert!(!c.locked());
        assert!(!c.is_tracking());

        c.on_move(5.0, 5.0, false);
        assert!(c.is_tracking());
    }

    #[test]
    fn test_parallax() {
        let viewport = Vec2::new(1000.0, 500.0);
        assert_eq!(hud_parallax(Vec2::new(500.0, 250.0), viewport), Vec2::ZERO);
        assert_eq!(hud_parallax(Vec2::new(1000.0, 0.0), viewport), Vec2::new(6.0, -6.0));
        assert_eq!(hud_parallax(Vec2::new(5.0, 5.0), Vec2::ZERO), Vec2::ZERO);
    }
}
