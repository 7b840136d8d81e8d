//! DOM-facing projection of controller state
//!
//! `ChromeFrame::capture` turns the controller into plain values once per
//! frame; `changes` diffs two captures so the browser layer only touches
//! elements whose state moved. Nothing here talks to the DOM.
//!
//! Element contract (all optional; missing elements are skipped):
//!
//! | Selector                  | Driven by                                   |
//! |---------------------------|---------------------------------------------|
//! | `canvas#starfield`        | `style.filter` from the warp canvas filter  |
//! | `#hud-frame`              | class `dimmed` while warping                |
//! | `#warp-status`            | text: warp status label                     |
//! | `#sector-label`           | text: sector readout for the active page    |
//! | `#page-content`           | `style.transform`: scroll/warp shake        |
//! | `#hud-header`             | `style.transform`: pointer parallax         |
//! | `[data-page]`             | class `active` on the active page section   |
//! | `[data-nav]`              | class `active` on the active nav button     |
//! | `#jedai-text`             | text: typed dialogue                        |
//! | `#boot-line`              | text: current boot console line             |
//! | `#boot-screen`            | class `hidden` once boot is done            |
//! | `#crosshair-ring`         | `style.transform`, class `locked`           |
//! | `#crosshair-dot`          | `style.transform`, class `locked`           |
//! | `#crosshair-readout`      | text: lock readout, class `hidden` unless locked |

use crate::app::App;
use crate::sim::PageId;
use crate::sim::pointer::{HEADER_PARALLAX_FACTOR, LOCK_READOUT};

/// HUD sector readout for a page
pub fn sector_label(page: PageId) -> String {
    format!(
        "GLIWICE HQ // WEBFABRIKK // SEKTOR: {}",
        page.as_str().to_uppercase()
    )
}

fn translate(x: f32, y: f32) -> String {
    format!("translate({:.1}px, {:.1}px)", x, y)
}

/// Crosshair element transforms
#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairView {
    pub ring_transform: String,
    pub dot_transform: String,
    pub locked: bool,
    /// Target readout lines, only while locked
    pub readout: Option<String>,
}

/// Everything the page chrome shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeFrame {
    pub active_page: PageId,
    pub dimmed: bool,
    pub status_label: &'static str,
    pub sector_label: String,
    pub content_transform: String,
    pub header_transform: String,
    pub canvas_filter: Option<String>,
    pub dialogue: &'static str,
    pub boot_line: Option<&'static str>,
    pub boot_done: bool,
    pub crosshair: CrosshairView,
}

/// One element update
#[derive(Debug, Clone, PartialEq)]
pub enum ChromeUpdate {
    ActivePage(PageId),
    Dimmed(bool),
    Status(&'static str),
    Sector(String),
    ContentTransform(String),
    HeaderTransform(String),
    CanvasFilter(Option<String>),
    Dialogue(&'static str),
    BootLine(Option<&'static str>),
    BootDone(bool),
    Crosshair(CrosshairView),
}

impl ChromeFrame {
    pub fn capture(app: &App, now: f64) -> Self {
        let warp = app.warp();
        let shake = app.shake();
        let header = app.parallax() * HEADER_PARALLAX_FACTOR;
        let boot = app.boot_status(now);
        let crosshair = app.crosshair();
        let ring = crosshair.ring();
        let dot = crosshair.dot();

        Self {
            active_page: app.active_page(),
            dimmed: warp.chrome_dimmed(),
            status_label: warp.status_label(),
            sector_label: sector_label(app.active_page()),
            content_transform: translate(shake.x, shake.y),
            header_transform: translate(header.x, header.y),
            canvas_filter: app.canvas_filter(),
            dialogue: app.typewriter().visible(),
            boot_line: boot.line,
            boot_done: boot.done,
            crosshair: CrosshairView {
                ring_transform: format!(
                    "{} translate(-50%, -50%) scale({:.3}) rotate({:.1}deg)",
                    translate(ring.x, ring.y),
                    crosshair.ring_scale(),
                    crosshair.ring_rotation_deg()
                ),
                dot_transform: format!("{} translate(-50%, -50%)", translate(dot.x, dot.y)),
                locked: crosshair.locked(),
                readout: crosshair.locked().then(|| LOCK_READOUT.join("\n")),
            },
        }
    }

    /// Updates needed to go from `previous` to `self` (everything when None)
    pub fn changes(&self, previous: Option<&ChromeFrame>) -> Vec<ChromeUpdate> {
        let mut out = Vec::new();
        macro_rules! diff {
            ($field:ident, $variant:ident) => {
                if previous.is_none_or(|p| p.$field != self.$field) {
                    out.push(ChromeUpdate::$variant(self.$field.clone()));
                }
            };
        }
        diff!(active_page, ActivePage);
        diff!(dimmed, Dimmed);
        diff!(status_label, Status);
        diff!(sector_label, Sector);
        diff!(content_transform, ContentTransform);
        diff!(header_transform, HeaderTransform);
        diff!(canvas_filter, CanvasFilter);
        diff!(dialogue, Dialogue);
        diff!(boot_line, BootLine);
        diff!(boot_done, BootDone);
        diff!(crosshair, Crosshair);
        out
    }
}
