use tracing::warn;

/// Row of position indicators, one per page.
pub trait IndicatorSet {
    fn len(&self) -> usize;

    /// Highlight indicator `index` and clear every other one.
    fn activate(&mut self, index: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Indicator row held as one active flag per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotIndicators {
    dots: Vec<bool>,
}

impl DotIndicators {
    /// All indicators start inactive until the first `activate`.
    pub fn new(count: usize) -> Self {
        Self {
            dots: vec![false; count],
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.dots.iter().position(|on| *on)
    }

    pub fn active_count(&self) -> usize {
        self.dots.iter().filter(|on| **on).count()
    }

    /// `●○○○` style rendering used by the CLI timeline.
    pub fn render(&self) -> String {
        self.dots
            .iter()
            .map(|on| if *on { '●' } else { '○' })
            .collect()
    }
}

impl IndicatorSet for DotIndicators {
    fn len(&self) -> usize {
        self.dots.len()
    }

    fn activate(&mut self, index: usize) {
        if index >= self.dots.len() {
            warn!(index, count = self.dots.len(), "indicator index out of range");
            return;
        }
        for (i, dot) in self.dots.iter_mut().enumerate() {
            *dot = i == index;
        }
    }
}
