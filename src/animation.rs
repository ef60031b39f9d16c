//! Easing curves and eased value animations for the dashboard.
//!
//! Provides:
//! - Easing functions (linear, cubic ease-out)
//! - `Counter`, an eased numeric run from a start to a target value
//! - `FadeIn`, the panel reveal tween
//! - `ValueFormat`, typed formatting for rendered values

use std::time::{Duration, Instant};

/// Easing functions for smooth animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation (no easing)
    Linear,
    /// Cubic ease-out: fast start, slow finish
    CubicOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Typed value formatting for counters and metrics.
///
/// Replaces per-element formatter callbacks with an explicit enum so the
/// format travels with the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Rounded integer, e.g. `1287`
    #[default]
    Integer,
    /// Rounded integer with a percent sign, e.g. `37%`
    Percent,
    /// Rounded integer with a rank prefix, e.g. `#1`
    Ranked,
    /// Rounded integer with thousands separators, e.g. `2,847,293`
    Grouped,
    /// Fixed one decimal place, e.g. `41.8`
    Decimal1,
}

impl ValueFormat {
    /// Render a value in this format.
    pub fn render(&self, value: f64) -> String {
        match self {
            Self::Integer => format!("{}", value.round() as i64),
            Self::Percent => format!("{}%", value.round() as i64),
            Self::Ranked => format!("#{}", value.round() as i64),
            Self::Grouped => group_thousands(value.round() as i64),
            Self::Decimal1 => format!("{value:.1}"),
        }
    }
}

/// Format an integer with comma thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// An eased numeric animation from a start value to a target value.
///
/// The current value is a pure function of elapsed time, so a render loop
/// can sample it every frame without per-tick bookkeeping. At elapsed zero
/// the value is exactly `start`; at or past `duration` it is exactly `end`.
#[derive(Debug, Clone)]
pub struct Counter {
    /// Display label
    label: String,
    /// Starting value
    start: f64,
    /// Target value
    end: f64,
    /// Animation duration
    duration: Duration,
    /// Output format
    format: ValueFormat,
    /// Easing curve
    easing: Easing,
    /// When the animation started
    started_at: Option<Instant>,
}

impl Counter {
    /// Create a counter that runs from zero to `end`.
    pub fn new(
        label: impl Into<String>,
        end: f64,
        duration: Duration,
        format: ValueFormat,
    ) -> Self {
        Self {
            label: label.into(),
            start: 0.0,
            end,
            duration,
            format,
            easing: Easing::CubicOut,
            started_at: None,
        }
    }

    /// Override the starting value.
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Target value.
    pub fn target(&self) -> f64 {
        self.end
    }

    /// Start (or restart) the animation from now.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Whether the animation has started.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether the animation has reached its target.
    pub fn is_complete(&self) -> bool {
        self.started_at
            .map(|t| t.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    /// The eased value at a given elapsed time.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return self.end;
        }
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        if progress >= 1.0 {
            return self.end;
        }
        let eased = self.easing.apply(progress);
        self.start + (self.end - self.start) * eased
    }

    /// The eased value as of now; `start` until the animation begins.
    pub fn value(&self) -> f64 {
        match self.started_at {
            Some(t) => self.value_at(t.elapsed()),
            None => self.start,
        }
    }

    /// Render the value at a given elapsed time.
    pub fn render_at(&self, elapsed: Duration) -> String {
        self.format.render(self.value_at(elapsed))
    }

    /// Render the current value.
    pub fn render(&self) -> String {
        self.format.render(self.value())
    }
}

/// Linear interpolation between two RGB colors.
pub fn lerp_rgb(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    (
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Reveal animation for a freshly activated panel.
///
/// Ramps from a muted color to the full foreground over a fixed duration
/// with ease-out motion.
#[derive(Debug, Clone)]
pub struct FadeIn {
    duration: Duration,
    easing: Easing,
    started_at: Option<Instant>,
}

impl FadeIn {
    /// Standard panel reveal duration.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);

    /// Create an un-started fade.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::CubicOut,
            started_at: None,
        }
    }

    /// Restart the fade from now.
    pub fn restart(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Eased progress in [0, 1]; 1.0 when never started (fully visible).
    pub fn progress(&self) -> f64 {
        match self.started_at {
            None => 1.0,
            Some(t) => {
                if self.duration.is_zero() {
                    return 1.0;
                }
                let raw = (t.elapsed().as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
                self.easing.apply(raw)
            }
        }
    }

    /// Current color between the muted and full foreground endpoints.
    pub fn color(&self, muted: (u8, u8, u8), full: (u8, u8, u8)) -> (u8, u8, u8) {
        lerp_rgb(muted, full, self.progress())
    }
}

impl Default for FadeIn {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}
