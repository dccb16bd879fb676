use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::controller::{CarouselController, CarouselSnapshot};
use crate::events::CarouselEvent;
use crate::indicators::IndicatorSet;
use crate::pager::{GestureSurface, PageHost};
use crate::scheduler::Scheduler;

/// Owns the carousel and processes its queue one event at a time.
///
/// Timer fires, gestures and pause/resume requests share `events`, so a drag
/// that arrives before a fire is always handled first. On cancellation any
/// operator input already queued is applied, pending timer fires are
/// dropped, and the carousel is torn down and its final state returned.
pub async fn run<H, I, S>(
    mut carousel: CarouselController<H, I, S>,
    mut events: UnboundedReceiver<CarouselEvent>,
    cancel: CancellationToken,
) -> CarouselSnapshot
where
    H: PageHost + GestureSurface,
    I: IndicatorSet,
    S: Scheduler,
{
    info!(pages = carousel.item_count(), "carousel loop running");
    loop {
        select! {
            biased;
            _ = cancel.cancelled() => break,

            maybe_ev = events.recv() => {
                match maybe_ev {
                    Some(ev) => carousel.handle(ev),
                    None => {
                        warn!("carousel event queue closed");
                        break;
                    }
                }
            }
        }
    }

    while let Ok(ev) = events.try_recv() {
        if !matches!(ev, CarouselEvent::AdvanceFired(_)) {
            carousel.handle(ev);
        }
    }
    carousel.teardown();
    carousel.snapshot()
}
