use std::time::Duration;

/// Rolling window of recent frame costs (wall time spent inside `Engine::frame`).
#[derive(Debug)]
pub struct FrameTimer {
    samples: Vec<Duration>,
    next: usize,
    wrapped: bool,
    last: Duration,
}

impl FrameTimer {
    /// Keep the last `window` frames (at least one).
    pub fn new(window: usize) -> Self {
        Self {
            samples: vec![Duration::ZERO; window.max(1)],
            next: 0,
            wrapped: false,
            last: Duration::ZERO,
        }
    }

    pub fn record(&mut self, cost: Duration) {
        self.samples[self.next] = cost;
        self.last = cost;
        self.next += 1;
        if self.next == self.samples.len() {
            self.next = 0;
            self.wrapped = true;
        }
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        self.samples.fill(Duration::ZERO);
        self.next = 0;
        self.wrapped = false;
        self.last = Duration::ZERO;
    }

    fn recorded(&self) -> &[Duration] {
        &self.samples[..self.count()]
    }

    pub fn count(&self) -> usize {
        if self.wrapped { self.samples.len() } else { self.next }
    }

    pub fn last(&self) -> Duration {
        self.last
    }

    pub fn average(&self) -> Duration {
        match self.recorded() {
            [] => Duration::ZERO,
            s => s.iter().sum::<Duration>() / s.len() as u32,
        }
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or_default()
    }

    /// Samples in the window that took longer than `budget`.
    pub fn over_budget(&self, budget: Duration) -> usize {
        self.recorded().iter().filter(|&&d| d > budget).count()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
