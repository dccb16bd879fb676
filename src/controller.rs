//! Auto-advance and page-transition state machine for the carousel.
//!
//! The controller owns the only copy of the settled page index. It listens to
//! the paged view's selection and scroll-state events, keeps at most one
//! advance event pending with the [`Scheduler`], and keeps the indicator row
//! in step with the settled page.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::Configuration;
use crate::error::Error;
use crate::events::{CarouselEvent, PageEvent, ScrollState};
use crate::indicators::IndicatorSet;
use crate::pager::{GestureSurface, PageHost};
use crate::scheduler::{AdvanceHandle, Scheduler};

/// Point-in-time view of the controller's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub item_count: usize,
    pub current_index: usize,
    pub mode: ScrollState,
    pub pending_advance: Option<AdvanceHandle>,
    pub rollover: bool,
    pub paused: bool,
    pub active: bool,
}

pub struct CarouselController<H, I, S> {
    host: H,
    indicators: I,
    scheduler: S,
    interval: Duration,
    item_count: usize,
    current_index: usize,
    pending_advance: Option<AdvanceHandle>,
    mode: ScrollState,
    /// Settled on the last page; the next advance goes straight to page 0.
    rollover: bool,
    /// The current interaction began with a drag.
    user_driven: bool,
    paused: bool,
    active: bool,
}

impl<H, I, S> fmt::Debug for CarouselController<H, I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselController")
            .field("item_count", &self.item_count)
            .field("current_index", &self.current_index)
            .field("mode", &self.mode)
            .field("pending_advance", &self.pending_advance)
            .field("paused", &self.paused)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<H, I, S> CarouselController<H, I, S>
where
    H: PageHost,
    I: IndicatorSet,
    S: Scheduler,
{
    /// Build the controller and arm the first advance.
    pub fn new(cfg: &Configuration, host: H, indicators: I, scheduler: S) -> Result<Self, Error> {
        let configured = cfg.item_count();
        if configured == 0 {
            return Err(Error::NoImages);
        }
        if cfg.advance_interval_ms == 0 {
            return Err(Error::ZeroInterval);
        }
        if cfg.initial_index >= configured {
            return Err(Error::InitialIndexOutOfRange {
                index: cfg.initial_index,
                count: configured,
            });
        }
        if host.item_count() != configured {
            return Err(Error::ItemCountMismatch {
                host: host.item_count(),
                configured,
            });
        }
        if indicators.len() != configured {
            return Err(Error::IndicatorCountMismatch {
                indicators: indicators.len(),
                pages: configured,
            });
        }

        let mut carousel = Self {
            host,
            indicators,
            scheduler,
            interval: cfg.advance_interval(),
            item_count: configured,
            current_index: 0,
            pending_advance: None,
            mode: ScrollState::Idle,
            rollover: false,
            user_driven: false,
            paused: false,
            active: true,
        };

        let reported = carousel.host.current_index();
        carousel.record_selection(reported);
        if carousel.host.current_index() != cfg.initial_index {
            carousel.host.set_index(cfg.initial_index, false);
        }
        carousel.arm();
        carousel.drain_host();

        info!(
            pages = carousel.item_count,
            interval_ms = cfg.advance_interval_ms,
            index = carousel.current_index,
            "carousel started"
        );
        Ok(carousel)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn mode(&self) -> ScrollState {
        self.mode
    }

    pub fn pending_advance(&self) -> Option<AdvanceHandle> {
        self.pending_advance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            item_count: self.item_count,
            current_index: self.current_index,
            mode: self.mode,
            pending_advance: self.pending_advance,
            rollover: self.rollover,
            paused: self.paused,
            active: self.active,
        }
    }

    /// Page the next automatic advance will move to.
    pub fn next_index(&self) -> usize {
        if self.rollover {
            0
        } else {
            (self.current_index + 1) % self.item_count
        }
    }

    /// Feed an event the host delivered out of band, then drain anything it queued.
    pub fn on_page_event(&mut self, event: PageEvent) {
        self.apply_page_event(event);
        self.drain_host();
    }

    /// A scheduled advance came due.
    ///
    /// Fires after teardown, for a handle that is no longer pending, or while
    /// the user is dragging are dropped without touching the page.
    pub fn on_advance(&mut self, handle: AdvanceHandle) {
        if !self.active {
            trace!(%handle, "advance after teardown ignored");
            return;
        }
        if self.pending_advance != Some(handle) {
            debug!(%handle, pending = ?self.pending_advance, "stale advance ignored");
            return;
        }
        self.pending_advance = None;
        if self.mode == ScrollState::Dragging || self.paused {
            debug!(%handle, mode = ?self.mode, paused = self.paused, "advance suppressed");
            return;
        }

        let next = self.next_index();
        debug!(from = self.current_index, to = next, "auto-advance");
        if next != self.current_index {
            self.host.set_index(next, true);
        }
        // Re-arm before the host settles so the interval runs advance-to-advance.
        self.arm();
        self.drain_host();
    }

    /// Stop auto-advancing until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if !self.active || self.paused {
            return;
        }
        self.paused = true;
        self.cancel_pending();
        info!(index = self.current_index, "carousel paused");
    }

    pub fn resume(&mut self) {
        if !self.active || !self.paused {
            return;
        }
        self.paused = false;
        if self.mode != ScrollState::Dragging {
            self.arm();
        }
        info!(index = self.current_index, "carousel resumed");
    }

    /// Cancel the pending advance and refuse every later event.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.cancel_pending();
        self.active = false;
        info!(index = self.current_index, "carousel torn down");
    }

    fn apply_page_event(&mut self, event: PageEvent) {
        if !self.active {
            trace!(?event, "page event after teardown ignored");
            return;
        }
        match event {
            PageEvent::SelectionChanged(index) => self.record_selection(index),
            PageEvent::ScrollStateChanged(state) => self.on_scroll_state(state),
        }
    }

    fn drain_host(&mut self) {
        while let Some(event) = self.host.next_event() {
            self.apply_page_event(event);
        }
    }

    fn record_selection(&mut self, reported: usize) {
        let last = self.item_count - 1;
        let index = if reported > last {
            warn!(reported, pages = self.item_count, "selection out of range; clamping");
            last
        } else {
            reported
        };
        self.current_index = index;
        self.rollover = index == last;
        self.indicators.activate(index);
        debug!(index, "page selected");
    }

    fn on_scroll_state(&mut self, state: ScrollState) {
        let previous = self.mode;
        trace!(?previous, ?state, "scroll state");
        match state {
            ScrollState::Dragging => {
                self.mode = ScrollState::Dragging;
                self.user_driven = true;
                self.cancel_pending();
            }
            ScrollState::Settling => {
                self.mode = ScrollState::Settling;
            }
            ScrollState::Idle => {
                self.mode = ScrollState::Idle;
                if previous == ScrollState::Dragging {
                    self.boundary_snap();
                }
                let user_driven = std::mem::take(&mut self.user_driven);
                if user_driven || self.pending_advance.is_none() {
                    self.arm();
                }
            }
        }
    }

    /// Jump between terminal pages after the user overscrolls an end.
    ///
    /// Returns the snap target, or `None` when not on a terminal page or the
    /// host is already there.
    fn boundary_snap(&mut self) -> Option<usize> {
        let last = self.item_count - 1;
        let target = if self.current_index == last {
            0
        } else if self.current_index == 0 {
            last
        } else {
            return None;
        };
        if target == self.current_index || self.host.current_index() == target {
            return None;
        }
        info!(from = self.current_index, to = target, "boundary snap");
        self.host.set_index(target, false);
        Some(target)
    }

    /// Replace any pending advance with a fresh one.
    fn arm(&mut self) {
        if !self.active || self.paused {
            return;
        }
        self.cancel_pending();
        let handle = self.scheduler.schedule(self.interval);
        trace!(%handle, interval = ?self.interval, "advance armed");
        self.pending_advance = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            self.scheduler.cancel(handle);
            trace!(%handle, "advance cancelled");
        }
    }
}

impl<H, I, S> CarouselController<H, I, S>
where
    H: PageHost + GestureSurface,
    I: IndicatorSet,
    S: Scheduler,
{
    /// Route touch input to the host and reconcile whatever it reports.
    pub fn apply_gesture(&mut self, gesture: crate::events::Gesture) {
        if !self.active {
            trace!(?gesture, "gesture after teardown ignored");
            return;
        }
        self.host.apply_gesture(gesture);
        self.drain_host();
    }

    pub fn handle(&mut self, event: CarouselEvent) {
        match event {
            CarouselEvent::Page(event) => self.on_page_event(event),
            CarouselEvent::AdvanceFired(handle) => self.on_advance(handle),
            CarouselEvent::Gesture(gesture) => self.apply_gesture(gesture),
            CarouselEvent::Pause => self.pause(),
            CarouselEvent::Resume => self.resume(),
        }
    }
}
