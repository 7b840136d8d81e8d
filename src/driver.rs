//! Per-frame loop
//!
//! Calls a tick function once per frame until stopped. Stopping cancels the
//! queued frame, and the tick is dropped with the loop, so nothing runs
//! against a torn-down view.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::platform::FrameScheduler;

struct LoopState<S: FrameScheduler> {
    scheduler: Rc<S>,
    running: Cell<bool>,
    pending: Cell<Option<S::Handle>>,
    frames: Cell<u64>,
    tick: RefCell<Box<dyn FnMut(f64)>>,
}

/// A running frame loop; dropping it stops the loop
pub struct RenderLoop<S: FrameScheduler + 'static> {
    state: Rc<LoopState<S>>,
}

impl<S: FrameScheduler + 'static> RenderLoop<S> {
    /// Start calling `tick(now_ms)` every frame
    pub fn start<F>(scheduler: Rc<S>, tick: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let state = Rc::new(LoopState {
            scheduler,
            running: Cell::new(true),
            pending: Cell::new(None),
            frames: Cell::new(0),
            tick: RefCell::new(Box::new(tick)),
        });
        schedule(&state);
        Self { state }
    }

    /// Cancel the queued frame; later frames never run
    pub fn stop(&self) {
        if !self.state.running.replace(false) {
            return;
        }
        if let Some(handle) = self.state.pending.take() {
            self.state.scheduler.cancel_frame(handle);
        }
        log::debug!("Frame loop stopped after {} frames", self.state.frames.get());
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Ticks run so far
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }
}

impl<S: FrameScheduler + 'static> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule<S: FrameScheduler + 'static>(state: &Rc<LoopState<S>>) {
    let weak: Weak<LoopState<S>> = Rc::downgrade(state);
    let handle = state.scheduler.request_frame(Box::new(move |time| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        state.pending.set(None);
        if !state.running.get() {
            return;
        }
        state.frames.set(state.frames.get() + 1);
        {
            let mut tick = state.tick.borrow_mut();
            (*tick)(time);
        }
        if state.running.get() {
            schedule(&state);
        }
    }));

    match handle {
        Some(handle) => state.pending.set(Some(handle)),
        None => {
            log::warn!("Frame scheduler refused a request; loop halted");
            state.running.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualFrames;

    #[test]
    fn test_ticks_every_frame_with_timestamps() {
        let frames = Rc::new(ManualFrames::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let render_loop = RenderLoop::start(frames.clone(), move |t| sink.borrow_mut().push(t));

        for i in 1..=3 {
            frames.run_frame(i as f64 * 16.0);
        }
        assert_eq!(*seen.borrow(), vec![16.0, 32.0, 48.0]);
        assert_eq!(render_loop.frames(), 3);
        assert_eq!(frames.pending(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let frames = Rc::new(ManualFrames::new());
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let render_loop = RenderLoop::start(frames.clone(), move |_| c.set(c.get() + 1));

        frames.run_frame(16.0);
        render_loop.stop();
        assert!(!render_loop.is_running());
        assert_eq!(frames.pending(), 0);

        for i in 2..10 {
            frames.run_frame(i as f64 * 16.0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_releases_tick() {
        let frames = Rc::new(ManualFrames::new());
        let owned = Rc::new(());
        let held = owned.clone();
        let render_loop = RenderLoop::start(frames.clone(), move |_| {
            let _ = Rc::strong_count(&held);
        });
        assert_eq!(Rc::strong_count(&owned), 2);

        drop(render_loop);
        assert_eq!(Rc::strong_count(&owned), 1);
        assert_eq!(frames.pending(), 0);
        assert_eq!(frames.run_frame(16.0), 0);
    }
}
