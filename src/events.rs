use thiserror::Error;

use crate::scheduler::AdvanceHandle;

/// Scroll state reported by the paged view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Dragging,
    Settling,
}

/// Events emitted by a [`PageHost`](crate::pager::PageHost).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The view settled on a new page.
    SelectionChanged(usize),
    ScrollStateChanged(ScrollState),
}

/// Direction of a released swipe, relative to page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Forward,
    Backward,
    /// Released without enough travel; the page springs back.
    Cancel,
}

/// Raw touch input routed to the paged view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    DragStart,
    Release(Swipe),
}

/// Everything the carousel event loop consumes, in delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    Page(PageEvent),
    AdvanceFired(AdvanceHandle),
    Gesture(Gesture),
    Pause,
    Resume,
}

impl From<PageEvent> for CarouselEvent {
    fn from(event: PageEvent) -> Self {
        Self::Page(event)
    }
}

impl From<Gesture> for CarouselEvent {
    fn from(gesture: Gesture) -> Self {
        Self::Gesture(gesture)
    }
}

/// Unrecognised operator command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?} (expected drag, next, prev, cancel, pause or resume)")]
pub struct UnknownCommand(pub String);

/// Parses the line-oriented commands accepted on stdin by the binary.
///
/// `next` and `prev` expand to a full drag, so they are not single events;
/// callers receive the event sequence instead.
pub fn parse_command(line: &str) -> Result<Vec<CarouselEvent>, UnknownCommand> {
    let events = match line.trim().to_ascii_lowercase().as_str() {
        "drag" => vec![Gesture::DragStart.into()],
        "next" => vec![
            Gesture::DragStart.into(),
            Gesture::Release(Swipe::Forward).into(),
        ],
        "prev" => vec![
            Gesture::DragStart.into(),
            Gesture::Release(Swipe::Backward).into(),
        ],
        "cancel" => vec![Gesture::Release(Swipe::Cancel).into()],
        "pause" => vec![CarouselEvent::Pause],
        "resume" => vec![CarouselEvent::Resume],
        other => return Err(UnknownCommand(other.to_string())),
    };
    Ok(events)
}
