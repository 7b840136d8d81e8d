//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, a manual queue elsewhere)
//! - Event listeners that unsubscribe when dropped
//! - Viewport measurement

use std::cell::{Cell, RefCell};

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Longest edge of the drawing surface in physical pixels
pub const MAX_SURFACE_DIMENSION: u32 = 4096;

/// CSS size of the viewport plus its pixel density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// CSS pixels
    pub width: f32,
    /// CSS pixels
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let clean = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            width: clean(width, 1.0),
            height: clean(height, 1.0),
            device_pixel_ratio: clean(device_pixel_ratio, 1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Drawing-surface size in physical pixels, never zero
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |css: f32| {
            ((css * self.device_pixel_ratio).round() as u32).clamp(1, MAX_SURFACE_DIMENSION)
        };
        (px(self.width), px(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Something that calls back once per display refresh
///
/// Callbacks receive a timestamp in milliseconds. A callback fires at most
/// once; loops re-request from inside their callback.
pub trait FrameScheduler {
    type Handle: Copy + 'static;

    /// Queue `callback` for the next frame; None if the platform refused
    fn request_frame(&self, callback: FrameCallback) -> Option<Self::Handle>;

    /// Forget a queued callback; a no-op if it already fired
    fn cancel_frame(&self, handle: Self::Handle);
}

/// Scheduler that only fires when told to
///
/// Drives headless runs and tests with exact frame timestamps.
#[derive(Default)]
pub struct ManualFrames {
    queue: RefCell<Vec<(u32, FrameCallback)>>,
    next_handle: Cell<u32>,
    fired: Cell<u64>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every callback queued before this call; returns how many ran
    ///
    /// Callbacks queued while firing wait for the next frame.
    pub fn run_frame(&self, time: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(time);
        }
        self.fired.set(self.fired.get() + count as u64);
        count
    }

    /// Callbacks waiting for a frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Callbacks fired so far
    pub fn fired(&self) -> u64 {
        self.fired.get()
    }
}

impl FrameScheduler for ManualFrames {
    type Handle = u32;

    fn request_frame(&self, callback: FrameCallback) -> Option<u32> {
        let handle = self.next_handle.get().wrapping_add(1);
        self.next_handle.set(handle);
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: u32) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// Ticket for one mount attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountTicket(u64);

/// Orders mount and unmount requests across async setup
///
/// Setup awaits the GPU before it installs anything, so an unmount (or a
/// newer mount) can arrive mid-setup. Each begin or invalidate bumps the
/// epoch; setup checks its ticket after every await and abandons itself if
/// the ticket went stale.
#[derive(Debug, Default)]
pub struct MountEpoch {
    current: Cell<u64>,
}

impl MountEpoch {
    pub const fn new() -> Self {
        Self {
            current: Cell::new(0),
        }
    }

    /// Start a mount attempt, superseding any attempt still in flight
    pub fn begin(&self) -> MountTicket {
        self.invalidate();
        MountTicket(self.current.get())
    }

    /// Cancel whatever attempt is in flight
    pub fn invalidate(&self) {
        self.current.set(self.current.get().wrapping_add(1));
    }

    pub fn is_current(&self, ticket: MountTicket) -> bool {
        self.current.get() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_viewport_pixel_size() {
        let vp = Viewport::new(1280.0, 720.0, 2.0);
        assert_eq!(vp.pixel_size(), (2560, 1440));
        assert!((vp.aspect() - 16.0 / 9.0).abs() < 1e-6);

        let huge = Viewport::new(5000.0, 10.0, 3.0);
        assert_eq!(huge.pixel_size(), (MAX_SURFACE_DIMENSION, 30));
    }

    #[test]
    fn test_viewport_rejects_degenerate() {
        let vp = Viewport::new(0.0, f32::NAN, -1.0);
        assert_eq!(vp.pixel_size(), (1, 1));
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn test_manual_frames_fire_once() {
        let frames = ManualFrames::new();
        let hits = Rc::new(Cell::new(0.0));
        let h = hits.clone();
        frames.request_frame(Box::new(move |t| h.set(t)));
        assert_eq!(frames.pending(), 1);

        assert_eq!(frames.run_frame(16.0), 1);
        assert_eq!(hits.get(), 16.0);
        assert_eq!(frames.run_frame(32.0), 0);
        assert_eq!(frames.fired(), 1);
    }

    #[test]
    fn test_manual_frames_cancel() {
        let frames = ManualFrames::new();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        let handle = frames.request_frame(Box::new(move |_| h.set(true)));
        frames.cancel_frame(handle.unwrap());
        frames.run_frame(16.0);
        assert!(!hit.get());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_unmount_during_setup_cancels_mount() {
        let epoch = MountEpoch::new();
        let ticket = epoch.begin();
        assert!(epoch.is_current(ticket));

        // unmount() lands while setup is awaiting the renderer
        epoch.invalidate();
        assert!(!epoch.is_current(ticket));

        // A later mount is unaffected
        let retry = epoch.begin();
        assert!(epoch.is_current(retry));
    }

    #[test]
    fn test_newer_mount_supersedes_older() {
        let epoch = MountEpoch::new();
        let first = epoch.begin();
        let second = epoch.begin();
        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
    }
}
