//! Page transitions
//!
//! Navigating between pages is a two-phase handoff timed against the content
//! fades:
//!
//! ```text
//! Idle --request--> Departing --swap_at--> Arriving --release_at--> Idle
//!      (warp on)              (page swap)             (warp off)
//! ```
//!
//! Deadlines are timestamps checked by `poll`, not timers, so cancelling is
//! just forgetting them. Requests while a transition is in flight are ignored.

use super::page::PageId;
use super::warp::WarpController;
use crate::consts::*;

/// Where the handoff currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStage {
    /// No transition in flight
    Idle,
    /// Warp engaged, outgoing content fading out
    Departing { target: PageId, swap_at: f64 },
    /// New page shown, incoming content fading in under warp
    Arriving { release_at: f64 },
}

/// Something that happened during `request` or `poll`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    WarpEngaged { from: PageId, to: PageId },
    /// Active page changed; the viewport should scroll back to the top
    PageSwapped { from: PageId, to: PageId },
    WarpReleased { page: PageId },
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Warp engaged, swap scheduled
    Started,
    /// Already on that page; nothing changed
    AlreadyActive,
    /// A transition is in flight; request dropped
    Busy,
}

/// Owns the active page and the warp drive
#[derive(Debug, Clone)]
pub struct PageTransitions {
    active: PageId,
    stage: TransitionStage,
    warp: WarpController,
    swap_delay_ms: f64,
    settle_delay_ms: f64,
}

impl PageTransitions {
    pub fn new(initial: PageId) -> Self {
        Self::with_delays(initial, SWAP_DELAY_MS, SETTLE_DELAY_MS)
    }

    /// Custom delays; each must cover the matching content fade
    pub fn with_delays(initial: PageId, swap_delay_ms: f64, settle_delay_ms: f64) -> Self {
        Self {
            active: initial,
            stage: TransitionStage::Idle,
            warp: WarpController::new(),
            swap_delay_ms: swap_delay_ms.max(0.0),
            settle_delay_ms: settle_delay_ms.max(0.0),
        }
    }

    /// Ask to fly to `target`
    pub fn request(
        &mut self,
        target: PageId,
        now: f64,
    ) -> (NavigationOutcome, Option<TransitionEvent>) {
        if target == self.active && self.stage == TransitionStage::Idle {
            return (NavigationOutcome::AlreadyActive, None);
        }
        if self.stage != TransitionStage::Idle {
            log::debug!("Navigation to '{}' ignored: transition in flight", target);
            return (NavigationOutcome::Busy, None);
        }

        self.warp.engage();
        self.stage = TransitionStage::Departing {
            target,
            swap_at: now + self.swap_delay_ms,
        };
        log::info!("Warping {} -> {}", self.active, target);
        (
            NavigationOutcome::Started,
            Some(TransitionEvent::WarpEngaged {
                from: self.active,
                to: target,
            }),
        )
    }

    /// Fire any deadline that has passed
    ///
    /// The settle delay counts from the poll that performed the swap, so a
    /// late frame never collapses both phases into one: the new page is
    /// always shown under warp for the full settle delay.
    pub fn poll(&mut self, now: f64) -> Option<TransitionEvent> {
        match self.stage {
            TransitionStage::Departing { target, swap_at } if now >= swap_at => {
                let from = self.active;
                self.active = target;
                self.stage = TransitionStage::Arriving {
                    release_at: now + self.settle_delay_ms,
                };
                Some(TransitionEvent::PageSwapped { from, to: target })
            }
            TransitionStage::Arriving { release_at } if now >= release_at => {
                self.warp.release();
                self.stage = TransitionStage::Idle;
                Some(TransitionEvent::WarpReleased { page: self.active })
            }
            _ => None,
        }
    }

    /// Drop any pending deadline without firing it
    pub fn cancel(&mut self) {
        if self.stage != TransitionStage::Idle {
            log::debug!("Cancelling transition in stage {:?}", self.stage);
        }
        self.stage = TransitionStage::Idle;
        self.warp.release();
    }

    pub fn active_page(&self) -> PageId {
        self.active
    }

    pub fn stage(&self) -> TransitionStage {
        self.stage
    }

    pub fn warp(&self) -> &WarpController {
        &self.warp
    }

    pub fn is_busy(&self) -> bool {
        self.stage != TransitionStage::Idle
    }

    /// Next timestamp at which `poll` will do something
    pub fn next_deadline(&self) -> Option<f64> {
        match self.stage {
            TransitionStage::Idle => None,
            TransitionStage::Departing { swap_at, .. } => Some(swap_at),
            TransitionStage::Arriving { release_at } => Some(release_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::warp::WarpPhase;

    #[test]
    fn test_same_page_is_noop() {
        let mut transitions = PageTransitions::new(PageId::Home);
        let (outcome, event) = transitions.request(PageId::Home, 0.0);
        assert_eq!(outcome, NavigationOutcome::AlreadyActive);
        assert_eq!(event, None);
        assert_eq!(transitions.stage(), TransitionStage::Idle);
        assert_eq!(transitions.warp().phase(), WarpPhase::Idle);
        assert_eq!(transitions.next_deadline(), None);
    }

    #[test]
    fn test_home_to_co_robimy_timeline() {
        let mut t = PageTransitions::new(PageId::Home);
        let start = 1_000.0;

        let (outcome, event) = t.request(PageId::CoRobimy, start);
        assert_eq!(outcome, NavigationOutcome::Started);
        assert_eq!(
            event,
            Some(TransitionEvent::WarpEngaged {
                from: PageId::Home,
                to: PageId::CoRobimy
            })
        );
        assert_eq!(t.warp().phase(), WarpPhase::Warping);
        assert_eq!(t.warp().intensity(), MAX_WARP_INTENSITY);
        assert_eq!(t.active_page(), PageId::Home);

        assert_eq!(t.poll(start + 599.0), None);
        assert_eq!(t.active_page(), PageId::Home);

        assert_eq!(
            t.poll(start + 600.0),
            Some(TransitionEvent::PageSwapped {
                from: PageId::Home,
                to: PageId::CoRobimy
            })
        );
        assert_eq!(t.active_page(), PageId::CoRobimy);
        assert!(t.warp().is_warping());

        assert_eq!(t.poll(start + 1199.0), None);
        assert!(t.warp().is_warping());

        assert_eq!(
            t.poll(start + 1200.0),
            Some(TransitionEvent::WarpReleased {
                page: PageId::CoRobimy
            })
        );
        assert_eq!(t.warp().phase(), WarpPhase::Idle);
        assert_eq!(t.warp().intensity(), 0.0);
        assert!(!t.is_busy());
    }

    #[test]
    fn test_slow_frame_does_not_skip_arrival() {
        let mut t = PageTransitions::new(PageId::Home);
        t.request(PageId::Geneza, 0.0);

        // One frame arrives 5 seconds late
        assert!(matches!(t.poll(5_000.0), Some(TransitionEvent::PageSwapped { .. })));
        assert!(t.warp().is_warping());
        assert_eq!(t.poll(5_000.0), None);

        assert!(matches!(t.poll(5_600.0), Some(TransitionEvent::WarpReleased { .. })));
    }

    #[test]
    fn test_busy_requests_are_dropped() {
        let mut t = PageTransitions::new(PageId::Home);
        t.request(PageId::Webfabrikk, 0.0);

        assert_eq!(t.request(PageId::Geneza, 100.0).0, NavigationOutcome::Busy);
        assert_eq!(t.request(PageId::Webfabrikk, 100.0).0, NavigationOutcome::Busy);
        assert_eq!(t.next_deadline(), Some(600.0));

        t.poll(600.0);
        assert_eq!(t.request(PageId::Geneza, 700.0).0, NavigationOutcome::Busy);
        assert_eq!(t.active_page(), PageId::Webfabrikk);

        t.poll(1_200.0);
        assert_eq!(t.request(PageId::Geneza, 1_300.0).0, NavigationOutcome::Started);
    }

    #[test]
    fn test_cancel_clears_deadlines() {
        let mut t = PageTransitions::new(PageId::Home);
        t.request(PageId::Dlaczego, 0.0);
        t.cancel();
        assert_eq!(t.next_deadline(), None);
        assert_eq!(t.poll(10_000.0), None);
        assert_eq!(t.active_page(), PageId::Home);
        assert_eq!(t.warp().intensity(), 0.0);
    }
}
