use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::events::{Gesture, PageEvent, ScrollState, Swipe};

/// The paged view the carousel drives.
///
/// Hosts report page changes through [`next_event`](Self::next_event); the
/// carousel drains it after every command it issues, which keeps host events
/// on the same queue as everything else.
pub trait PageHost {
    fn current_index(&self) -> usize;
    fn item_count(&self) -> usize;

    /// Move to page `index`. A request for the settled page is a no-op.
    fn set_index(&mut self, index: usize, animate: bool);

    /// Next queued selection or scroll-state event, if any.
    fn next_event(&mut self) -> Option<PageEvent>;
}

/// Hosts that turn touch input into scrolling.
pub trait GestureSurface {
    fn apply_gesture(&mut self, gesture: Gesture);
}

/// In-memory paged view with instant animations.
///
/// Animated moves report `Settling`, the selection, then `Idle`; jumps report
/// only the selection. A swipe that would leave the page range overscrolls:
/// the page stays put and the view goes straight from `Dragging` to `Idle`.
#[derive(Debug)]
pub struct PagerModel {
    count: usize,
    current: usize,
    scroll: ScrollState,
    outbox: VecDeque<PageEvent>,
}

impl PagerModel {
    pub fn new(count: usize) -> Self {
        Self::starting_at(count, 0)
    }

    pub fn starting_at(count: usize, index: usize) -> Self {
        Self {
            count,
            current: index.min(count.saturating_sub(1)),
            scroll: ScrollState::Idle,
            outbox: VecDeque::new(),
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    pub fn pending_events(&self) -> usize {
        self.outbox.len()
    }

    fn emit(&mut self, event: PageEvent) {
        if let PageEvent::ScrollStateChanged(state) = event {
            self.scroll = state;
        }
        trace!(?event, "pager event");
        self.outbox.push_back(event);
    }

    fn last(&self) -> usize {
        self.count.saturating_sub(1)
    }

    fn release(&mut self, swipe: Swipe) {
        if self.scroll != ScrollState::Dragging {
            trace!(?swipe, "release without an active drag");
            return;
        }
        let target = match swipe {
            Swipe::Forward if self.current >= self.last() => None,
            Swipe::Backward if self.current == 0 => None,
            Swipe::Forward => Some(self.current + 1),
            Swipe::Backward => Some(self.current - 1),
            Swipe::Cancel => Some(self.current),
        };
        match target {
            None => self.emit(PageEvent::ScrollStateChanged(ScrollState::Idle)),
            Some(target) => {
                self.emit(PageEvent::ScrollStateChanged(ScrollState::Settling));
                if target != self.current {
                    self.current = target;
                    self.emit(PageEvent::SelectionChanged(target));
                }
                self.emit(PageEvent::ScrollStateChanged(ScrollState::Idle));
            }
        }
    }
}

impl PageHost for PagerModel {
    fn current_index(&self) -> usize {
        self.current
    }

    fn item_count(&self) -> usize {
        self.count
    }

    fn set_index(&mut self, index: usize, animate: bool) {
        if self.count == 0 {
            return;
        }
        let target = if index > self.last() {
            warn!(index, count = self.count, "set_index beyond last page; clamping");
            self.last()
        } else {
            index
        };
        if target == self.current {
            return;
        }
        if animate {
            self.emit(PageEvent::ScrollStateChanged(ScrollState::Settling));
            self.current = target;
            self.emit(PageEvent::SelectionChanged(target));
            self.emit(PageEvent::ScrollStateChanged(ScrollState::Idle));
        } else {
            self.current = target;
            self.emit(PageEvent::SelectionChanged(target));
        }
    }

    fn next_event(&mut self) -> Option<PageEvent> {
        self.outbox.pop_front()
    }
}

impl GestureSurface for PagerModel {
    fn apply_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::DragStart => {
                if self.scroll != ScrollState::Dragging {
                    self.emit(PageEvent::ScrollStateChanged(ScrollState::Dragging));
                }
            }
            Gesture::Release(swipe) => self.release(swipe),
        }
    }
}
