use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use image_carousel::config::Configuration;
use image_carousel::controller::CarouselController;
use image_carousel::events::{CarouselEvent, Gesture, Swipe};
use image_carousel::indicators::IndicatorSet;
use image_carousel::pager::PagerModel;
use image_carousel::scheduler::TokioScheduler;
use image_carousel::tasks::carousel;
use image_carousel::tasks::commands::{InputEnd, forward_commands};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Forwards every activation so the test can watch the carousel from outside.
struct ForwardingIndicators {
    count: usize,
    shown: mpsc::UnboundedSender<usize>,
}

impl IndicatorSet for ForwardingIndicators {
    fn len(&self) -> usize {
        self.count
    }

    fn activate(&mut self, index: usize) {
        let _ = self.shown.send(index);
    }
}

fn cfg(count: usize, interval_ms: u64) -> Configuration {
    Configuration {
        images: (0..count)
            .map(|i| PathBuf::from(format!("img{i}.jpg")))
            .collect(),
        advance_interval_ms: interval_ms,
        initial_index: 0,
    }
}

async fn next_shown(rx: &mut mpsc::UnboundedReceiver<usize>) -> usize {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timeout waiting for page")
        .expect("indicator channel closed")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn live_carousel_rotates_and_wraps() {
    let (events_tx, events_rx) = mpsc::unbounded_channel::<CarouselEvent>();
    let (shown_tx, mut shown_rx) = mpsc::unbounded_channel::<usize>();
    let cancel = CancellationToken::new();

    let controller = CarouselController::new(
        &cfg(3, 60),
        PagerModel::new(3),
        ForwardingIndicators {
            count: 3,
            shown: shown_tx,
        },
        TokioScheduler::new(events_tx.clone()),
    )
    .unwrap();
    let handle = tokio::spawn(carousel::run(controller, events_rx, cancel.clone()));

    assert_eq!(next_shown(&mut shown_rx).await, 0);
    let mut order = Vec::new();
    for _ in 0..4 {
        order.push(next_shown(&mut shown_rx).await);
    }
    assert_eq!(order, vec![1, 2, 0, 1]);

    cancel.cancel();
    let last = handle.await.unwrap();
    assert!(!last.active);
    assert_eq!(last.pending_advance, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn held_drag_blocks_advances_until_release() {
    let (events_tx, events_rx) = mpsc::unbounded_channel::<CarouselEvent>();
    let (shown_tx, mut shown_rx) = mpsc::unbounded_channel::<usize>();
    let cancel = CancellationToken::new();

    let controller = CarouselController::new(
        &cfg(4, 150),
        PagerModel::new(4),
        ForwardingIndicators {
            count: 4,
            shown: shown_tx,
        },
        TokioScheduler::new(events_tx.clone()),
    )
    .unwrap();
    let handle = tokio::spawn(carousel::run(controller, events_rx, cancel.clone()));
    assert_eq!(next_shown(&mut shown_rx).await, 0);

    events_tx
        .send(CarouselEvent::Gesture(Gesture::DragStart))
        .unwrap();

    let stray = tokio::time::timeout(Duration::from_millis(400), shown_rx.recv()).await;
    assert!(stray.is_err(), "carousel advanced while the user held the page");

    events_tx
        .send(CarouselEvent::Gesture(Gesture::Release(Swipe::Backward)))
        .unwrap();
    assert_eq!(next_shown(&mut shown_rx).await, 3, "overscroll should wrap to last");
    assert_eq!(next_shown(&mut shown_rx).await, 0, "auto-advance resumes after release");

    cancel.cancel();
    let _ = handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pause_suppresses_rotation() {
    let (events_tx, events_rx) = mpsc::unbounded_channel::<CarouselEvent>();
    let (shown_tx, mut shown_rx) = mpsc::unbounded_channel::<usize>();
    let cancel = CancellationToken::new();

    let controller = CarouselController::new(
        &cfg(2, 150),
        PagerModel::new(2),
        ForwardingIndicators {
            count: 2,
            shown: shown_tx,
        },
        TokioScheduler::new(events_tx.clone()),
    )
    .unwrap();
    let handle = tokio::spawn(carousel::run(controller, events_rx, cancel.clone()));
    assert_eq!(next_shown(&mut shown_rx).await, 0);

    events_tx.send(CarouselEvent::Pause).unwrap();
    let stray = tokio::time::timeout(Duration::from_millis(400), shown_rx.recv()).await;
    assert!(stray.is_err(), "paused carousel must not advance");

    events_tx.send(CarouselEvent::Resume).unwrap();
    assert_eq!(next_shown(&mut shown_rx).await, 1);

    cancel.cancel();
    let last = handle.await.unwrap();
    assert!(!last.paused);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn piped_commands_apply_and_eof_shuts_down() {
    let (events_tx, events_rx) = mpsc::unbounded_channel::<CarouselEvent>();
    let (shown_tx, mut shown_rx) = mpsc::unbounded_channel::<usize>();
    let cancel = CancellationToken::new();

    let controller = CarouselController::new(
        &cfg(4, 10_000),
        PagerModel::new(4),
        ForwardingIndicators {
            count: 4,
            shown: shown_tx,
        },
        TokioScheduler::new(events_tx.clone()),
    )
    .unwrap();
    let handle = tokio::spawn(carousel::run(controller, events_rx, cancel.clone()));
    assert_eq!(next_shown(&mut shown_rx).await, 0);

    let reader = {
        let cancel = cancel.clone();
        let events_tx = events_tx.clone();
        std::thread::spawn(move || {
            let end = forward_commands(Cursor::new("next\nnext\n"), &events_tx);
            cancel.cancel();
            end
        })
    };

    let last = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("carousel kept running after input ended")
        .unwrap();
    assert_eq!(reader.join().unwrap().unwrap(), InputEnd::Eof);
    assert_eq!(last.current_index, 2);
    assert!(!last.active);
    assert_eq!(next_shown(&mut shown_rx).await, 1);
    assert_eq!(next_shown(&mut shown_rx).await, 2);
}
