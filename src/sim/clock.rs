use super::types::{SOLVER_STEPS, STEP_MINUTES};

/// A 15-minute window of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepWindow {
    /// Step index (0 = 00:00).
    pub index: usize,
    /// First minute of the window (inclusive).
    pub start_minute: u32,
    /// Last minute of the window (exclusive).
    pub end_minute: u32,
}

impl StepWindow {
    /// Clock time at the start of the window in hours.
    pub fn time_hr(&self) -> f64 {
        f64::from(self.start_minute) / 60.0
    }
}

/// A simulation clock that walks the day one step window at a time.
///
/// # Examples
///
/// ```
/// use heatsim::sim::clock::StepClock;
///
/// let mut clock = StepClock::new(3);
/// let mut starts = Vec::new();
///
/// clock.run(|w| starts.push(w.start_minute));
/// assert_eq!(starts, vec![0, 15, 30]);
/// ```
pub struct StepClock {
    /// Next step to hand out
    current: usize,
    /// Total steps to run
    total: usize,
}

impl StepClock {
    /// Creates a clock over the first `total` windows of the day.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// A clock covering the whole day.
    pub fn day() -> Self {
        Self::new(SOLVER_STEPS)
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(window)` - The window for the current step before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<StepWindow> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            let start_minute = index as u32 * STEP_MINUTES;
            Some(StepWindow {
                index,
                start_minute,
                end_minute: start_minute + STEP_MINUTES,
            })
        } else {
            None
        }
    }

    /// Runs a function for each remaining window.
    pub fn run(&mut self, mut f: impl FnMut(StepWindow)) {
        while let Some(window) = self.tick() {
            f(window);
        }
    }
}
