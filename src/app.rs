//! Top-level controller
//!
//! One `App` is created per mount. It owns every signal (scroll motion, warp,
//! active page, dialogue, pointer effects, scene) and advances them all from a
//! single `frame(now)` call, so stopping the frame loop stops everything.
//! Event handlers only feed inputs in; they never mutate signals directly.

use glam::Vec2;

use crate::consts::*;
use crate::error::Result;
use crate::platform::Viewport;
use crate::settings::Settings;
use crate::sim::{
    BootSequence, BootStatus, Crosshair, FrameInput, MotionSignals, NavigationOutcome, PageId,
    PageTransitions, Scene, TransitionEvent, TransitionStage, Typewriter, WarpController,
    dialogue_for, hud_parallax, shake_offset,
};

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Transition events in the order they fired
    pub events: Vec<TransitionEvent>,
    /// The page swapped; the viewport should jump back to the top
    pub scroll_reset: bool,
    /// Stars recycled this frame
    pub recycled: usize,
    /// Frame delta used for integration (seconds)
    pub dt: f32,
}

/// Controller state for a mounted view
pub struct App {
    settings: Settings,
    viewport: Viewport,
    motion: MotionSignals,
    transitions: PageTransitions,
    scene: Scene,
    typewriter: Typewriter,
    boot: BootSequence,
    crosshair: Crosshair,
    parallax: Vec2,
    /// Events raised between frames (navigation requests)
    queued: Vec<TransitionEvent>,
    last_frame_ms: Option<f64>,
    mounted: bool,
}

impl App {
    pub fn new(settings: Settings, viewport: Viewport, seed: u64, now: f64) -> Self {
        let scene = Scene::new(&settings, viewport.aspect(), seed);
        let initial = PageId::default();
        log::info!(
            "Warpfield mounted: {} stars, page '{}', seed {}",
            scene.field().len(),
            initial,
            seed
        );

        Self {
            settings,
            viewport,
            motion: MotionSignals::new(),
            transitions: PageTransitions::new(initial),
            scene,
            typewriter: Typewriter::new(dialogue_for(initial), now),
            boot: BootSequence::new(now),
            crosshair: Crosshair::new(),
            parallax: Vec2::ZERO,
            queued: Vec::new(),
            last_frame_ms: None,
            mounted: true,
        }
    }

    /// Latest scroll metrics (CSS pixels)
    pub fn on_scroll(&mut self, scroll_y: f32, scroll_height: f32, viewport_height: f32) {
        if !self.mounted {
            return;
        }
        self.motion.set_scroll(scroll_y, scroll_height, viewport_height);
    }

    /// Pointer moved; `over_target` when it hovers something clickable
    pub fn on_pointer(&mut self, x: f32, y: f32, over_target: bool) {
        if !self.mounted {
            return;
        }
        self.crosshair.on_move(x, y, over_target);
        self.parallax = hud_parallax(self.crosshair.pointer(), self.viewport.size());
    }

    /// Request a flight to `page`
    pub fn navigate(&mut self, page: PageId, now: f64) -> NavigationOutcome {
        if !self.mounted {
            log::debug!("Navigation to '{}' after teardown ignored", page);
            return NavigationOutcome::Busy;
        }
        let (outcome, event) = self.transitions.request(page, now);
        self.queued.extend(event);
        outcome
    }

    /// Request a flight by `data-nav` attribute value
    ///
    /// Unknown ids are logged and leave all state untouched.
    pub fn navigate_by_id(&mut self, id: &str, now: f64) -> Result<NavigationOutcome> {
        match id.parse::<PageId>() {
            Ok(page) => Ok(self.navigate(page, now)),
            Err(e) => {
                log::warn!("{}; navigation ignored", e);
                Err(e)
            }
        }
    }

    /// Apply a new viewport; returns the drawing-surface size in pixels
    ///
    /// The camera aspect changes here, not on the next frame.
    pub fn resize(&mut self, viewport: Viewport) -> (u32, u32) {
        self.viewport = viewport;
        self.scene.resize(viewport.width, viewport.height);
        // Parallax stays centered until the pointer has moved
        if self.crosshair.is_tracking() {
            self.parallax = hud_parallax(self.crosshair.pointer(), viewport.size());
        }
        viewport.pixel_size()
    }

    /// Advance every signal to `now` (ms)
    pub fn frame(&mut self, now: f64) -> FrameReport {
        if !self.mounted {
            return FrameReport::default();
        }

        let dt = match self.last_frame_ms {
            Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 1.0 / REFERENCE_FPS,
        };
        self.last_frame_ms = Some(now);

        let mut report = FrameReport {
            events: std::mem::take(&mut self.queued),
            dt,
            ..Default::default()
        };

        self.motion.update(dt);

        if let Some(event) = self.transitions.poll(now) {
            match event {
                TransitionEvent::PageSwapped { to, .. } => {
                    self.typewriter.restart(dialogue_for(to), now);
                    report.scroll_reset = true;
                    log::info!("Arrived at '{}'", to);
                }
                TransitionEvent::WarpReleased { .. } => log::debug!("Warp released"),
                TransitionEvent::WarpEngaged { .. } => {}
            }
            report.events.push(event);
        }

        self.typewriter.update(now);
        self.crosshair.update(dt);

        report.recycled = self.scene.step(&FrameInput {
            progress: self.motion.progress(),
            velocity: self.motion.velocity(),
            intensity: self.transitions.warp().intensity(),
            time_ms: now,
            ticks: dt * REFERENCE_FPS,
        });
        report
    }

    /// Drop pending transitions and ignore all further input
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.transitions.cancel();
        self.queued.clear();
        self.mounted = false;
        log::info!("Warpfield unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn progress(&self) -> f32 {
        self.motion.progress()
    }

    pub fn velocity(&self) -> f32 {
        self.motion.velocity()
    }

    pub fn warp(&self) -> &WarpController {
        self.transitions.warp()
    }

    pub fn warp_intensity(&self) -> f32 {
        self.transitions.warp().intensity()
    }

    pub fn is_warping(&self) -> bool {
        self.transitions.warp().is_warping()
    }

    pub fn active_page(&self) -> PageId {
        self.transitions.active_page()
    }

    pub fn transition_stage(&self) -> TransitionStage {
        self.transitions.stage()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn boot_status(&self, now: f64) -> BootStatus {
        self.boot.status(now)
    }

    pub fn crosshair(&self) -> &Crosshair {
        &self.crosshair
    }

    /// Pointer parallax offset for the HUD (px)
    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    /// Content shake offset (px)
    pub fn shake(&self) -> Vec2 {
        shake_offset(
            self.motion.progress(),
            self.is_warping(),
            self.settings.effective_screen_shake(),
        )
    }

    /// CSS filter for the canvas
    pub fn canvas_filter(&self) -> Option<String> {
        self.transitions
            .warp()
            .canvas_filter(self.settings.effective_warp_filter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WarpPhase;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn app() -> App {
        let settings = Settings::from_preset(crate::settings::QualityPreset::Low);
        App::new(settings, Viewport::new(1280.0, 720.0, 1.0), 42, 0.0)
    }

    /// Run frames every ~16.7 ms from `from` up to and including `to`,
    /// collecting (time, event) pairs
    fn run(app: &mut App, from: f64, to: f64) -> Vec<(f64, TransitionEvent)> {
        let mut out = Vec::new();
        let mut t = from;
        while t <= to {
            for e in app.frame(t).events {
                out.push((t, e));
            }
            t += FRAME_MS;
        }
        out
    }

    #[test]
    fn test_home_to_co_robimy_end_to_end() {
        let mut app = app();
        app.frame(0.0);

        assert_eq!(app.navigate(PageId::CoRobimy, 100.0), NavigationOutcome::Started);
        assert_eq!(app.warp().phase(), WarpPhase::Warping);
        assert_eq!(app.warp_intensity(), MAX_WARP_INTENSITY);
        assert!(app.canvas_filter().is_some());
        assert_eq!(app.active_page(), PageId::Home);

        let mut swap_report = None;
        let mut t = 100.0;
        while t < 800.0 {
            let report = app.frame(t);
            if t < 700.0 {
                assert_eq!(app.active_page(), PageId::Home);
            }
            if report.scroll_reset {
                swap_report = Some((t, report));
                break;
            }
            t += FRAME_MS;
        }
        let (swap_t, report) = swap_report.expect("page never swapped");
        assert!(swap_t >= 700.0 && swap_t < 700.0 + FRAME_MS);
        assert!(report.events.contains(&TransitionEvent::PageSwapped {
            from: PageId::Home,
            to: PageId::CoRobimy
        }));
        assert_eq!(app.active_page(), PageId::CoRobimy);
        assert!(app.is_warping());

        let events = run(&mut app, swap_t + FRAME_MS, swap_t + 700.0);
        let released: Vec<_> = events
            .iter()
            .filter(|(_, e)| matches!(e, TransitionEvent::WarpReleased { .. }))
            .collect();
        assert_eq!(released.len(), 1);
        assert!(released[0].0 >= swap_t + SETTLE_DELAY_MS);
        assert_eq!(app.warp().phase(), WarpPhase::Idle);
        assert_eq!(app.warp_intensity(), 0.0);
        assert_eq!(app.canvas_filter(), None);
    }

    #[test]
    fn test_navigation_event_reported_next_frame() {
        let mut app = app();
        app.navigate(PageId::Geneza, 0.0);
        let report = app.frame(10.0);
        assert_eq!(
            report.events,
            vec![TransitionEvent::WarpEngaged {
                from: PageId::Home,
                to: PageId::Geneza
            }]
        );
        assert!(app.frame(20.0).events.is_empty());
    }

    #[test]
    fn test_navigate_to_active_page_is_noop() {
        let mut app = app();
        app.frame(0.0);
        assert_eq!(app.navigate(PageId::Home, 10.0), NavigationOutcome::AlreadyActive);
        assert!(!app.is_warping());
        assert!(run(&mut app, 10.0, 2_000.0).is_empty());
        assert_eq!(app.transition_stage(), TransitionStage::Idle);
    }

    #[test]
    fn test_slow_frames_keep_every_stage() {
        let mut app = app();
        app.frame(0.0);
        app.navigate(PageId::Wspolpraca, 0.0);
        app.frame(1.0);

        // Tab hidden for ten seconds
        let report = app.frame(10_000.0);
        assert!(report.scroll_reset);
        assert!(app.is_warping());
        assert_eq!(app.active_page(), PageId::Wspolpraca);
        assert!(report.dt <= MAX_FRAME_DT);

        assert!(app.frame(10_016.0).events.is_empty());
        let report = app.frame(10_600.0);
        assert_eq!(
            report.events,
            vec![TransitionEvent::WarpReleased {
                page: PageId::Wspolpraca
            }]
        );
    }

    #[test]
    fn test_unknown_page_id_is_ignored() {
        let mut app = app();
        assert!(app.navigate_by_id("kontakt", 0.0).is_err());
        assert!(!app.is_warping());
        assert_eq!(app.active_page(), PageId::Home);
        assert_eq!(app.navigate_by_id("geneza", 0.0).unwrap(), NavigationOutcome::Started);
    }

    #[test]
    fn test_resize_is_synchronous() {
        let mut app = app();
        let size = app.resize(Viewport::new(800.0, 1000.0, 2.0));
        assert_eq!(size, (1600, 2000));
        assert!((app.scene().camera().aspect - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_teardown_freezes_state() {
        let mut app = app();
        app.frame(0.0);
        app.navigate(PageId::Dlaczego, 0.0);
        app.teardown();
        assert!(!app.is_mounted());
        assert!(!app.is_warping());

        let report = app.frame(5_000.0);
        assert_eq!(report, FrameReport::default());
        assert_eq!(app.active_page(), PageId::Home);
        assert_eq!(app.navigate(PageId::Geneza, 6_000.0), NavigationOutcome::Busy);
    }

    #[test]
    fn test_dialogue_restarts_on_arrival() {
        let mut app = app();
        app.frame(0.0);
        run(&mut app, 0.0, 5_000.0);
        assert!(app.typewriter().visible().starts_with("Masterze"));

        app.navigate(PageId::Geneza, 5_000.0);
        run(&mut app, 5_000.0, 5_700.0);
        assert_eq!(app.active_page(), PageId::Geneza);
        assert_eq!(app.typewriter().full_text(), dialogue_for(PageId::Geneza));
        assert!(!app.typewriter().is_complete());
    }

    #[test]
    fn test_overscroll_keeps_progress_bounded() {
        let mut app = app();
        let mut t = 0.0;
        for y in [-500.0, 9_000.0, 4_000.0, -20.0, 12_000.0] {
            app.on_scroll(y, 5_000.0, 720.0);
            for _ in 0..10 {
                app.frame(t);
                t += FRAME_MS;
                assert!((0.0..=1.0).contains(&app.progress()));
                assert!(app.velocity() >= 0.0);
            }
        }
    }

    #[test]
    fn test_pointer_parallax() {
        let mut app = app();
        app.on_pointer(1280.0, 360.0, false);
        assert_eq!(app.parallax(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_resize_before_pointer_keeps_parallax_centered() {
        let mut app = app();
        app.resize(Viewport::new(1280.0, 720.0, 1.0));
        assert_eq!(app.parallax(), Vec2::ZERO);
        app.resize(Viewport::new(800.0, 600.0, 2.0));
        assert_eq!(app.parallax(), Vec2::ZERO);

        app.on_pointer(640.0, 0.0, false);
        app.resize(Viewport::new(1280.0, 720.0, 1.0));
        assert_eq!(app.parallax(), Vec2::new(0.0, -6.0));
    }
}
