use crate::scheduler::SpinLock;

struct ProgressState {
    current: usize,
    last_percent: usize,
}

/// Thread-safe percentage reporter.
///
/// Logs at info level each time progress advances by at least `step`
/// percent, and once when it reaches 100 %.
pub struct ProgressBar {
    total: usize,
    step: usize,
    state: SpinLock<ProgressState>,
}

impl ProgressBar {
    pub fn new(total: usize) -> Self {
        Self::with_step(total, 1)
    }

    pub fn with_step(total: usize, step: usize) -> Self {
        Self {
            total,
            step: step.max(1),
            state: SpinLock::new(ProgressState {
                current: 0,
                last_percent: 0,
            }),
        }
    }

    /// Record `count` finished units. Returns the percentage if it was reported.
    pub fn update(&self, count: usize) -> Option<usize> {
        let mut state = self.state.lock();
        state.current += count;

        let percent = if self.total == 0 {
            100
        } else {
            (state.current * 100 / self.total).min(100)
        };

        let finished = percent == 100 && state.last_percent < 100;
        if percent >= state.last_percent + self.step || finished {
            state.last_percent = percent;
            log::info!("{}%", percent);
            Some(percent)
        } else {
            None
        }
    }

    pub fn percent(&self) -> usize {
        self.state.lock().last_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_on_step() {
        let progress = ProgressBar::with_step(200, 10);
        assert_eq!(progress.update(10), None);
        assert_eq!(progress.update(10), Some(10));
        assert_eq!(progress.update(1), None);
        assert_eq!(progress.update(40), Some(30));
        assert_eq!(progress.percent(), 30);
    }

    #[test]
    fn test_completion_reported_once() {
        let progress = ProgressBar::with_step(10, 50);
        assert_eq!(progress.update(9), Some(90));
        assert_eq!(progress.update(1), Some(100));
        assert_eq!(progress.update(5), None);
    }
}
