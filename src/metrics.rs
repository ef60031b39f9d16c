//! Live analysis metrics with randomized fluctuation.
//!
//! Each metric re-renders its base value with a small uniform jitter on an
//! independent timer whose period is itself re-randomized every firing.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::animation::ValueFormat;

/// Maximum fractional deviation from the base value (±5 %).
pub const JITTER_FRACTION: f64 = 0.05;

/// Bounds for the per-metric refresh period, in milliseconds. The period is
/// re-drawn from this range before every tick.
pub const PERIOD_MS: RangeInclusive<u64> = 2000..=5000;

/// A single fluctuating metric.
#[derive(Debug, Clone)]
pub struct LiveMetric {
    label: String,
    base: f64,
    current: f64,
}

impl LiveMetric {
    /// Create a metric resting at its base value.
    pub fn new(label: impl Into<String>, base: f64) -> Self {
        Self {
            label: label.into(),
            base,
            current: base,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The configured base value.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Re-draw the current value as `base × (1 + U)` with U uniform in
    /// [-JITTER_FRACTION, +JITTER_FRACTION].
    pub fn jitter<R: Rng>(&mut self, rng: &mut R) {
        let u = rng.random_range(-JITTER_FRACTION..=JITTER_FRACTION);
        self.current = self.base * (1.0 + u);
    }

    /// Render the current value: thousands-grouped integer for large bases,
    /// one decimal place otherwise.
    pub fn render(&self) -> String {
        self.format().render(self.current)
    }

    fn format(&self) -> ValueFormat {
        if self.base > 1000.0 {
            ValueFormat::Grouped
        } else {
            ValueFormat::Decimal1
        }
    }
}
