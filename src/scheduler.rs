use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::events::CarouselEvent;

/// Identifies one scheduled advance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdvanceHandle(u64);

impl fmt::Display for AdvanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "advance#{}", self.0)
    }
}

/// Posts and cancels delayed one-shot advance events.
///
/// Fires are delivered back to the owner of the carousel on its own event
/// queue. Implementations do not coalesce; the controller cancels its
/// outstanding handle before scheduling another.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> AdvanceHandle;

    /// Drop a pending event. Unknown, fired or already cancelled handles are ignored.
    fn cancel(&mut self, handle: AdvanceHandle);
}

/// Virtual-clock scheduler; nothing fires until [`advance_to`](Self::advance_to).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), AdvanceHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Move the clock forward and return the handles that came due, oldest first.
    ///
    /// The clock never moves backwards; an earlier `t` only collects overdue events.
    pub fn advance_to(&mut self, t: Duration) -> Vec<AdvanceHandle> {
        self.now = self.now.max(t);
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Pop only the earliest due event, moving the clock to its deadline.
    pub fn fire_next(&mut self) -> Option<(Duration, AdvanceHandle)> {
        let ((due, _), handle) = self.queue.pop_first()?;
        self.now = self.now.max(due);
        Some((due, handle))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> AdvanceHandle {
        let handle = AdvanceHandle(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now + delay, handle.0), handle);
        trace!(%handle, ?delay, "manual advance scheduled");
        handle
    }

    fn cancel(&mut self, handle: AdvanceHandle) {
        self.queue.retain(|_, pending| *pending != handle);
    }
}

/// Real-time scheduler: each advance is a tokio timer task that posts
/// [`CarouselEvent::AdvanceFired`] onto the carousel's queue.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    to_carousel: UnboundedSender<CarouselEvent>,
    next_id: u64,
    timers: HashMap<AdvanceHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(to_carousel: UnboundedSender<CarouselEvent>) -> Self {
        Self {
            to_carousel,
            next_id: 0,
            timers: HashMap::new(),
        }
    }

    /// Number of timer tasks that have neither fired nor been cancelled.
    pub fn outstanding(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.is_finished())
            .count()
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("next_id", &self.next_id)
            .field("timers", &self.timers.len())
            .finish()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> AdvanceHandle {
        self.timers.retain(|_, timer| !timer.is_finished());

        let handle = AdvanceHandle(self.next_id);
        self.next_id += 1;
        let tx = self.to_carousel.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(CarouselEvent::AdvanceFired(handle)).is_err() {
                debug!(%handle, "carousel queue closed before advance fired");
            }
        });
        self.timers.insert(handle, timer);
        handle
    }

    fn cancel(&mut self, handle: AdvanceHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            timer.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_fires_in_deadline_order() {
        let mut sched = ManualScheduler::new();
        let late = sched.schedule(Duration::from_millis(300));
        let early = sched.schedule(Duration::from_millis(100));
        assert_eq!(sched.next_due(), Some(Duration::from_millis(100)));

        assert!(sched.advance_to(Duration::from_millis(50)).is_empty());
        assert_eq!(sched.advance_to(Duration::from_millis(300)), vec![early, late]);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule(Duration::from_millis(10));
        sched.cancel(handle);
        sched.cancel(handle);
        assert!(sched.advance_to(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn manual_delays_are_relative_to_virtual_now() {
        let mut sched = ManualScheduler::new();
        sched.advance_to(Duration::from_millis(4000));
        sched.schedule(Duration::from_millis(4000));
        assert_eq!(sched.next_due(), Some(Duration::from_millis(8000)));
        let (due, _) = sched.fire_next().unwrap();
        assert_eq!(due, Duration::from_millis(8000));
        assert_eq!(sched.now(), Duration::from_millis(8000));
    }

    #[test]
    fn manual_accepts_delays_past_u64_millis() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_test_writer()
                .finish(),
        );
        let mut sched = ManualScheduler::new();
        let far = Duration::from_secs(u64::MAX);
        let handle = sched.schedule(far);
        assert_eq!(sched.next_due(), Some(far));
        assert_eq!(sched.fire_next(), Some((far, handle)));
    }

    #[tokio::test]
    async fn tokio_cancelled_timer_never_posts() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sched = TokioScheduler::new(tx);
        let cancelled = sched.schedule(Duration::from_millis(20));
        let kept = sched.schedule(Duration::from_millis(40));
        sched.cancel(cancelled);
        assert_eq!(sched.outstanding(), 1);

        let fired = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timeout waiting for advance")
            .expect("queue closed");
        assert_eq!(fired, CarouselEvent::AdvanceFired(kept));
        assert!(rx.try_recv().is_err());
    }
}
