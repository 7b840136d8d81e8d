//! Warp drive state
//!
//! Idle or Warping. Intensity steps straight to its maximum on engage (no easing)
//! and back to zero on release; it is never nonzero while idle.

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarpPhase {
    #[default]
    Idle,
    Warping,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WarpController {
    phase: WarpPhase,
    intensity: f32,
}

impl WarpController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Warping at full intensity
    pub fn engage(&mut self) {
        self.phase = WarpPhase::Warping;
        self.intensity = MAX_WARP_INTENSITY;
    }

    /// Warping -> Idle
    pub fn release(&mut self) {
        self.phase = WarpPhase::Idle;
        self.intensity = 0.0;
    }

    pub fn phase(&self) -> WarpPhase {
        self.phase
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn is_warping(&self) -> bool {
        self.phase == WarpPhase::Warping
    }

    /// HUD frame fades and blurs while jumping
    pub fn chrome_dimmed(&self) -> bool {
        self.is_warping()
    }

    /// Status readout in the HUD header
    pub fn status_label(&self) -> &'static str {
        match self.phase {
            WarpPhase::Idle => "ORBITA STABILNA",
            WarpPhase::Warping => "WARP DRIVE ACTIVE",
        }
    }

    /// CSS filter for the starfield canvas, None when no filter applies
    pub fn canvas_filter(&self, enabled: bool) -> Option<String> {
        if !enabled || self.intensity <= WARP_FILTER_THRESHOLD {
            return None;
        }
        Some(format!("blur({:.1}px) contrast(1.2)", self.intensity * 1.5))
    }
}
