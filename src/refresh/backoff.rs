use std::time::Duration;

use crate::render::DeviceView;

/// Floor applied to the refresh interval so a zero setting cannot spin.
const MIN_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The view was rendered from fresh data, or the device has no telemetry.
    Rendered,
    /// No data came back, or the readings could not be rendered.
    Failed,
}

impl CycleOutcome {
    #[must_use]
    pub fn of(view: &DeviceView) -> Self {
        match view {
            DeviceView::NoData { .. } => Self::Failed,
            DeviceView::NotActive { .. } | DeviceView::Active { .. } => Self::Rendered,
        }
    }
}

/// Delay between refresh cycles: the base interval while things work,
/// doubling per consecutive failure up to `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(MIN_INTERVAL);
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.current
    }

    /// Record a cycle and return the delay before the next one.
    pub fn record(&mut self, outcome: CycleOutcome) -> Duration {
        self.current = match outcome {
            CycleOutcome::Rendered => self.base,
            CycleOutcome::Failed => self.current.saturating_mul(2).min(self.max),
        };
        self.current
    }
}
