use std::time::Duration;

use tracing::debug;

use crate::config::Configuration;
use crate::controller::CarouselController;
use crate::error::Error;
use crate::events::{CarouselEvent, Gesture, Swipe};
use crate::indicators::DotIndicators;
use crate::pager::PagerModel;
use crate::scheduler::ManualScheduler;

pub type SimulatedCarousel = CarouselController<PagerModel, DotIndicators, ManualScheduler>;

/// What moved the carousel onto a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCause {
    Start,
    Advance,
    Input,
}

/// A settled page change on the virtual clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub at: Duration,
    pub index: usize,
    pub indicators: String,
    pub cause: FrameCause,
}

/// Drives a carousel on a virtual clock and records every page it settles on.
#[derive(Debug)]
pub struct Simulation {
    carousel: SimulatedCarousel,
    timeline: Vec<Frame>,
}

impl Simulation {
    pub fn new(cfg: &Configuration) -> Result<Self, Error> {
        let count = cfg.item_count();
        let carousel = CarouselController::new(
            cfg,
            PagerModel::new(count),
            DotIndicators::new(count),
            ManualScheduler::new(),
        )?;
        let mut sim = Self {
            carousel,
            timeline: Vec::new(),
        };
        sim.push_frame(FrameCause::Start);
        Ok(sim)
    }

    pub fn now(&self) -> Duration {
        self.carousel.scheduler().now()
    }

    pub fn carousel(&self) -> &SimulatedCarousel {
        &self.carousel
    }

    pub fn timeline(&self) -> &[Frame] {
        &self.timeline
    }

    /// Fire every advance due up to and including `t`, then park the clock at `t`.
    pub fn run_until(&mut self, t: Duration) {
        loop {
            match self.carousel.scheduler().next_due() {
                Some(due) if due <= t => {}
                _ => break,
            }
            let Some((at, handle)) = self.carousel.scheduler_mut().fire_next() else {
                break;
            };
            debug!(?at, %handle, "simulated advance");
            self.carousel.on_advance(handle);
            self.record(FrameCause::Advance);
        }
        self.carousel.scheduler_mut().advance_to(t);
    }

    pub fn run_for(&mut self, span: Duration) {
        let until = self.now() + span;
        self.run_until(until);
    }

    pub fn send(&mut self, event: CarouselEvent) {
        self.carousel.handle(event);
        self.record(FrameCause::Input);
    }

    pub fn gesture(&mut self, gesture: Gesture) {
        self.send(CarouselEvent::Gesture(gesture));
    }

    /// A complete drag: press, then release in `direction`.
    pub fn swipe(&mut self, direction: Swipe) {
        self.gesture(Gesture::DragStart);
        self.gesture(Gesture::Release(direction));
    }

    /// Tear the carousel down and hand back the recorded timeline.
    pub fn finish(mut self) -> Vec<Frame> {
        self.carousel.teardown();
        self.timeline
    }

    fn record(&mut self, cause: FrameCause) {
        let index = self.carousel.current_index();
        if self.timeline.last().map(|frame| frame.index) != Some(index) {
            self.push_frame(cause);
        }
    }

    fn push_frame(&mut self, cause: FrameCause) {
        self.timeline.push(Frame {
            at: self.now(),
            index: self.carousel.current_index(),
            indicators: self.carousel.indicators().render(),
            cause,
        });
    }
}

/// Let the carousel run untouched for `span` and return its timeline.
pub fn dry_run(cfg: &Configuration, span: Duration) -> Result<Vec<Frame>, Error> {
    let mut sim = Simulation::new(cfg)?;
    sim.run_until(span);
    Ok(sim.finish())
}
