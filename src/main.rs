//! Warpfield entry point
//!
//! On the web this mounts the starfield onto the page and wires DOM events
//! into the controller. Natively it flies one headless transition and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod experience {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

    use warpfield::chrome::{ChromeFrame, ChromeUpdate, CrosshairView};
    use warpfield::driver::RenderLoop;
    use warpfield::platform::web::{
        AnimationFrames, EventListener, measure_viewport, now_ms, scroll_metrics, window,
    };
    use warpfield::platform::MountEpoch;
    use warpfield::renderer::StarfieldRenderer;
    use warpfield::sim::NavigationOutcome;
    use warpfield::{App, Result, Settings, WarpError};

    const CANVAS_ID: &str = "starfield";
    /// Hovering any of these locks the crosshair
    const POINTER_TARGETS: &str = "button, input, textarea, .glass-panel";

    /// Everything one mounted view owns
    struct Experience {
        app: App,
        renderer: Option<StarfieldRenderer>,
        window: Window,
        document: Document,
        canvas: HtmlCanvasElement,
        last_chrome: Option<ChromeFrame>,
    }

    impl Experience {
        fn frame(&mut self, now: f64) {
            let report = self.app.frame(now);
            for event in &report.events {
                log::debug!("{:?}", event);
            }
            if report.scroll_reset {
                self.window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            self.render(now);
            self.sync_chrome(now);
        }

        fn render(&mut self, now: f64) {
            let Some(renderer) = self.renderer.as_mut() else {
                return;
            };
            match renderer.render(self.app.scene(), self.app.warp_intensity(), now) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => renderer.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory; continuing without the starfield");
                    self.renderer = None;
                }
                Err(e) => log::warn!("Surface error: {:?}", e),
            }
        }

        fn resize(&mut self) {
            let (width, height) = self.app.resize(measure_viewport(&self.window));
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.resize(width, height);
            }
        }

        fn sync_chrome(&mut self, now: f64) {
            let frame = ChromeFrame::capture(&self.app, now);
            for update in frame.changes(self.last_chrome.as_ref()) {
                apply(&self.document, &self.canvas, update);
            }
            self.last_chrome = Some(frame);
        }
    }

    // ========================================================================
    // DOM WRITES
    // ========================================================================

    fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(el: &Element, class: &str, on: bool) {
        let _ = el.class_list().toggle_with_force(class, on);
    }

    fn set_transform(el: &HtmlElement, transform: &str) {
        let _ = el.style().set_property("transform", transform);
    }

    fn for_each(document: &Document, selector: &str, mut f: impl FnMut(&Element)) {
        let Ok(list) = document.query_selector_all(selector) else {
            return;
        };
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                f(&el);
            }
        }
    }

    fn apply_crosshair(document: &Document, view: &CrosshairView) {
        for (id, transform) in [
            ("crosshair-ring", &view.ring_transform),
            ("crosshair-dot", &view.dot_transform),
        ] {
            if let Some(el) = html_by_id(document, id) {
                set_transform(&el, transform);
                set_class(&el, "locked", view.locked);
            }
        }
        if let Some(el) = document.get_element_by_id("crosshair-readout") {
            if let Some(readout) = &view.readout {
                el.set_text_content(Some(readout));
            }
            set_class(&el, "hidden", view.readout.is_none());
        }
    }

    fn apply(document: &Document, canvas: &HtmlCanvasElement, update: ChromeUpdate) {
        match update {
            ChromeUpdate::ActivePage(page) => {
                for attr in ["data-page", "data-nav"] {
                    for_each(document, &format!("[{}]", attr), |el| {
                        let active = el.get_attribute(attr).as_deref() == Some(page.as_str());
                        set_class(el, "active", active);
                    });
                }
            }
            ChromeUpdate::Dimmed(dimmed) => {
                if let Some(el) = document.get_element_by_id("hud-frame") {
                    set_class(&el, "dimmed", dimmed);
                }
            }
            ChromeUpdate::Status(label) => set_text(document, "warp-status", label),
            ChromeUpdate::Sector(label) => set_text(document, "sector-label", &label),
            ChromeUpdate::ContentTransform(transform) => {
                if let Some(el) = html_by_id(document, "page-content") {
                    set_transform(&el, &transform);
                }
            }
            ChromeUpdate::HeaderTransform(transform) => {
                if let Some(el) = html_by_id(document, "hud-header") {
                    set_transform(&el, &transform);
                }
            }
            ChromeUpdate::CanvasFilter(filter) => {
                let style = canvas.style();
                let _ = match filter {
                    Some(filter) => style.set_property("filter", &filter),
                    None => style.remove_property("filter").map(|_| ()),
                };
            }
            ChromeUpdate::Dialogue(text) => set_text(document, "jedai-text", text),
            ChromeUpdate::BootLine(line) => set_text(document, "boot-line", line.unwrap_or("")),
            ChromeUpdate::BootDone(done) => {
                if let Some(el) = document.get_element_by_id("boot-screen") {
                    set_class(&el, "hidden", done);
                }
            }
            ChromeUpdate::Crosshair(view) => apply_crosshair(document, &view),
        }
    }

    // ========================================================================
    // MOUNT
    // ========================================================================

    /// A mounted view; dropping it stops the loop and unsubscribes everything
    struct Mount {
        experience: Rc<RefCell<Experience>>,
        listeners: Vec<EventListener>,
        frame_loop: RenderLoop<AnimationFrames>,
    }

    impl Drop for Mount {
        fn drop(&mut self) {
            self.frame_loop.stop();
            self.listeners.clear();
            if let Ok(mut exp) = self.experience.try_borrow_mut() {
                exp.app.teardown();
                exp.renderer = None;
            }
        }
    }

    thread_local! {
        static MOUNT: RefCell<Option<Mount>> = const { RefCell::new(None) };
        static EPOCH: MountEpoch = const { MountEpoch::new() };
    }

    /// Element under the event that matches `selector`
    fn event_closest(event: &Event, selector: &str) -> Option<Element> {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(selector).ok().flatten())
    }

    fn listen(
        exp: &Rc<RefCell<Experience>>,
        target: &web_sys::EventTarget,
        event: &'static str,
        mut handler: impl FnMut(&mut Experience, Event) + 'static,
    ) -> Result<EventListener> {
        let exp = exp.clone();
        EventListener::new(target, event, move |e| match exp.try_borrow_mut() {
            Ok(mut exp) => handler(&mut exp, e),
            Err(_) => log::debug!("'{}' arrived mid-frame; dropped", event),
        })
    }

    fn random_seed() -> u64 {
        let mut bytes = [0u8; 8];
        match getrandom::fill(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(e) => {
                log::warn!("getrandom failed ({}); seeding from the clock", e);
                js_sys::Date::now() as u64
            }
        }
    }

    async fn mount() -> Result<()> {
        let ticket = EPOCH.with(MountEpoch::begin);
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| WarpError::MissingElement("document".into()))?;
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| WarpError::MissingElement(format!("canvas#{}", CANVAS_ID)))?;

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(random_seed);
        let viewport = measure_viewport(&window);
        let mut app = App::new(settings, viewport, seed, now_ms());

        let (width, height) = app.resize(viewport);
        canvas.set_width(width);
        canvas.set_height(height);
        let (scroll_y, doc_h, view_h) = scroll_metrics(&window);
        app.on_scroll(scroll_y, doc_h, view_h);

        // The page keeps working without a GPU
        let renderer = match StarfieldRenderer::for_canvas(canvas.clone(), (width, height)).await {
            Ok(mut renderer) => {
                renderer.set_start_time(now_ms());
                Some(renderer)
            }
            Err(e) => {
                log::warn!("Starfield renderer unavailable: {}", e);
                None
            }
        };

        if !EPOCH.with(|epoch| epoch.is_current(ticket)) {
            log::info!("Unmounted during setup; not starting");
            return Ok(());
        }

        let experience = Rc::new(RefCell::new(Experience {
            app,
            renderer,
            window: window.clone(),
            document: document.clone(),
            canvas,
            last_chrome: None,
        }));

        let listeners = vec![
            listen(&experience, window.as_ref(), "scroll", |exp, _| {
                let (scroll_y, doc_h, view_h) = scroll_metrics(&exp.window);
                exp.app.on_scroll(scroll_y, doc_h, view_h);
            })?,
            listen(&experience, window.as_ref(), "resize", |exp, _| exp.resize())?,
            listen(&experience, window.as_ref(), "pointermove", |exp, e| {
                let over_target = event_closest(&e, POINTER_TARGETS).is_some();
                if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
                    exp.app
                        .on_pointer(mouse.client_x() as f32, mouse.client_y() as f32, over_target);
                }
            })?,
            listen(&experience, document.as_ref(), "click", |exp, e| {
                let Some(id) = event_closest(&e, "[data-nav]").and_then(|el| el.get_attribute("data-nav"))
                else {
                    return;
                };
                e.prevent_default();
                if let Ok(NavigationOutcome::Busy) = exp.app.navigate_by_id(&id, now_ms()) {
                    log::debug!("Still warping; '{}' ignored", id);
                }
            })?,
        ];

        let scheduler = Rc::new(AnimationFrames::new(window));
        let ticking = experience.clone();
        let frame_loop = RenderLoop::start(scheduler, move |now| {
            if let Ok(mut exp) = ticking.try_borrow_mut() {
                exp.frame(now);
            }
        });

        let previous = MOUNT.with(|slot| {
            slot.borrow_mut().replace(Mount {
                experience,
                listeners,
                frame_loop,
            })
        });
        if previous.is_some() {
            log::warn!("Replaced an existing mount");
        }
        Ok(())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Warpfield starting...");
        if let Err(e) = mount().await {
            log::error!("Warpfield failed to mount: {}", e);
        }
    }

    pub fn unmount() {
        EPOCH.with(MountEpoch::invalidate);
        if MOUNT.with(|slot| slot.borrow_mut().take()).is_none() {
            log::debug!("Nothing mounted");
        }
    }

    pub fn navigate(id: &str) -> bool {
        MOUNT.with(|slot| {
            let slot = slot.borrow();
            let Some(mount) = slot.as_ref() else {
                return false;
            };
            let Ok(mut exp) = mount.experience.try_borrow_mut() else {
                return false;
            };
            matches!(
                exp.app.navigate_by_id(id, now_ms()),
                Ok(NavigationOutcome::Started)
            )
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    experience::run().await;
}

/// Stop the frame loop, remove listeners and cancel any pending page swap
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    experience::unmount();
}

/// Warp to a page by id; true if a flight started
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn navigate(id: &str) -> bool {
    experience::navigate(id)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Warpfield (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to see the starfield");

    headless_flight();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Fly home -> co-robimy at 60 fps and log every transition event
#[cfg(not(target_arch = "wasm32"))]
fn headless_flight() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use warpfield::driver::RenderLoop;
    use warpfield::platform::{ManualFrames, Viewport};
    use warpfield::{App, PageId, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const NAVIGATE_AT_MS: f64 = 100.0;
    const RUN_MS: f64 = 2_000.0;

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(42);
    let app = Rc::new(RefCell::new(App::new(settings, Viewport::default(), seed, 0.0)));
    let frames = Rc::new(ManualFrames::new());

    let ticking = app.clone();
    let frame_loop = RenderLoop::start(frames.clone(), move |now| {
        let report = ticking.borrow_mut().frame(now);
        for event in report.events {
            log::info!("{:>7.1} ms  {:?}", now, event);
        }
    });

    let mut now = 0.0;
    let mut navigated = false;
    while now < RUN_MS {
        if !navigated && now >= NAVIGATE_AT_MS {
            let outcome = app.borrow_mut().navigate(PageId::CoRobimy, now);
            log::info!("{:>7.1} ms  navigate -> {:?}", now, outcome);
            navigated = true;
        }
        frames.run_frame(now);
        now += FRAME_MS;
    }
    frame_loop.stop();

    let app = app.borrow();
    log::info!(
        "Landed on '{}' after {} frames ({} stars, warp {:.2})",
        app.active_page(),
        frame_loop.frames(),
        app.scene().field().len(),
        app.warp_intensity()
    );
}
