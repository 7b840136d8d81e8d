//! Scripted text: the boot console and the Jed-AI hologram
//!
//! Both reveal text on a fixed cadence measured from a start timestamp, so
//! they need no timers of their own and stop the moment the frame loop does.

use super::page::PageId;

/// Milliseconds per revealed character
pub const TYPE_INTERVAL_MS: f64 = 25.0;
/// Milliseconds between boot lines
pub const BOOT_LINE_INTERVAL_MS: f64 = 400.0;
/// Boot overlay lingers this long after the last line (ms)
pub const BOOT_EXIT_DELAY_MS: f64 = 800.0;

pub const BOOT_LINES: [&str; 6] = [
    "SYSTEM INIT: JED-AI V4.5...",
    "WEBFABRIKK PROTOKÓŁ ŁADOWANIE...",
    "POŁĄCZENIE SECURE: SOCIAL MEDIA STUDIO ESTABLISHED...",
    "MAPOWANIE SEKTORÓW: POLSKA / NORWEGIA...",
    "HYPER-DRIVE GOTOWY JEST.",
    "WITAJ, MASTERZE.",
];

/// Jed-AI line for a page
pub fn dialogue_for(page: PageId) -> &'static str {
    match page {
        PageId::Home => {
            "Masterze, Sektor Gliwice osiągnięty. W nadprzestrzeń cyfrową Polski i Norwegii wchodzimy. Cel podróży podaj, Ty."
        }
        PageId::CoRobimy => {
            "Potężne narzędzia tu widzę. Meta Ads i TikTok... Nie lajków szukaj, lecz mocy konwersji, Masterze. Strategia cierpliwości wymaga."
        }
        PageId::Webfabrikk => {
            "Webfabrikk silnikiem naszym jest. Solidność skandynawska z polską duszą tu połączona. Fundamenty silne, misję stabilną czynią, hm?"
        }
        PageId::Geneza => {
            "Z chaosu porządek wyłonić się musi. Systemy zamiast przypadku... Tak narodziło się Studio, by jasność w marketingu dać."
        }
        PageId::Dlaczego => {
            "Dlaczego to robimy, pytasz? Hałas usunąć chcemy. Ciszę i wzrost Masterom dać, by wizję swoją spełniać mogli, bez trosk zbędnych."
        }
        PageId::Wspolpraca => {
            "Nikt sam nie lata, Masterze. Sojusz siłę daje. Sygnał wyślij, partnerów godnych znajdziemy, by razem galaktykę podbijać."
        }
    }
}

/// Reveals a line one character at a time
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: &'static str,
    started_at: f64,
    /// Characters (not bytes) currently shown
    revealed: usize,
    total: usize,
}

impl Typewriter {
    pub fn new(text: &'static str, now: f64) -> Self {
        Self {
            text,
            started_at: now,
            revealed: 0,
            total: text.chars().count(),
        }
    }

    /// Start over with a new line
    pub fn restart(&mut self, text: &'static str, now: f64) {
        *self = Self::new(text, now);
    }

    /// Catch up to `now`; returns true if the visible text changed
    pub fn update(&mut self, now: f64) -> bool {
        let elapsed = (now - self.started_at).max(0.0);
        let target = ((elapsed / TYPE_INTERVAL_MS).floor() as usize).min(self.total);
        if target == self.revealed {
            return false;
        }
        self.revealed = target;
        true
    }

    /// Text typed so far, always cut on a char boundary
    pub fn visible(&self) -> &'static str {
        match self.text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &self.text[..byte],
            None => self.text,
        }
    }

    pub fn full_text(&self) -> &'static str {
        self.text
    }

    pub fn is_complete(&self) -> bool {
        self.revealed == self.total
    }
}

/// What the boot overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootStatus {
    /// Current console line (None before the first tick)
    pub line: Option<&'static str>,
    /// Overlay should be gone
    pub done: bool,
}

/// Boot console: one line every 400 ms, then a short hold before closing
#[derive(Debug, Clone, Copy)]
pub struct BootSequence {
    started_at: f64,
}

impl BootSequence {
    pub fn new(now: f64) -> Self {
        Self { started_at: now }
    }

    /// Moment the overlay closes, relative to start
    ///
    /// The interval notices it ran out of lines one tick after the last line,
    /// then holds for the exit delay.
    pub fn duration_ms() -> f64 {
        (BOOT_LINES.len() + 1) as f64 * BOOT_LINE_INTERVAL_MS + BOOT_EXIT_DELAY_MS
    }

    pub fn status(&self, now: f64) -> BootStatus {
        let elapsed = (now - self.started_at).max(0.0);
        let ticks = (elapsed / BOOT_LINE_INTERVAL_MS).floor() as usize;
        let line = match ticks {
            0 => None,
            n => Some(BOOT_LINES[(n - 1).min(BOOT_LINES.len() - 1)]),
        };
        BootStatus {
            line,
            done: elapsed >= Self::duration_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typewriter_cadence() {
        let mut tw = Typewriter::new("Masterze", 100.0);
        assert_eq!(tw.visible(), "");
        assert!(!tw.update(124.0));
        assert!(tw.update(125.0));
        assert_eq!(tw.visible(), "M");
        tw.update(175.0);
        assert_eq!(tw.visible(), "Mas");
        tw.update(10_000.0);
        assert!(tw.is_complete());
        assert_eq!(tw.visible(), "Masterze");
    }

    #[test]
    fn test_typewriter_never_splits_polish_chars() {
        let text = dialogue_for(PageId::Home);
        let mut tw = Typewriter::new(text, 0.0);
        for step in 0..=text.chars().count() + 2 {
            tw.update(step as f64 * TYPE_INTERVAL_MS);
            let visible = tw.visible();
            assert!(text.starts_with(visible));
            assert_eq!(visible.chars().count(), step.min(text.chars().count()));
        }
    }

    #[test]
    fn test_typewriter_restart() {
        let mut tw = Typewriter::new(dialogue_for(PageId::Home), 0.0);
        tw.update(5_000.0);
        tw.restart(dialogue_for(PageId::Geneza), 5_000.0);
        assert_eq!(tw.visible(), "");
        tw.update(5_050.0);
        assert_eq!(tw.visible(), "Z ");
    }

    #[test]
    fn test_every_page_has_dialogue() {
        for page in PageId::ALL {
            assert!(!dialogue_for(page).is_empty());
        }
    }

    #[test]
    fn test_boot_timeline() {
        let boot = BootSequence::new(1_000.0);
        assert_eq!(boot.status(1_000.0).line, None);
        assert_eq!(boot.status(1_399.0).line, None);
        assert_eq!(boot.status(1_400.0).line, Some(BOOT_LINES[0]));
        assert_eq!(boot.status(1_000.0 + 2_400.0).line, Some(BOOT_LINES[5]));
        assert_eq!(boot.status(1_000.0 + 3_000.0).line, Some(BOOT_LINES[5]));
        assert!(!boot.status(1_000.0 + 3_599.0).done);
        assert!(boot.status(1_000.0 + 3_600.0).done);
    }
}
