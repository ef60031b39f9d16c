//! Traffic-light phase machine for the header signal and junction demos.
//!
//! One cycler advances a global 3-phase state on a per-phase dwell schedule;
//! secondary demo groups display the same cycle shifted by their index.

use std::time::Duration;

use ratatui::style::Color;

/// A traffic-light phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Red,
    Yellow,
    Green,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 3] = [Phase::Red, Phase::Yellow, Phase::Green];

    /// Position in the cycle (red = 0, yellow = 1, green = 2).
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
            Self::Green => 2,
        }
    }

    /// Phase at a cycle position, taken modulo 3.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 3]
    }

    /// The next phase in the cycle.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// How long the signal holds this phase before advancing.
    pub fn dwell(self) -> Duration {
        match self {
            Self::Red => Duration::from_millis(3000),
            Self::Yellow => Duration::from_millis(1000),
            Self::Green => Duration::from_millis(3000),
        }
    }

    /// Lamp color when lit.
    pub fn color(self) -> Color {
        match self {
            Self::Red => Color::Rgb(239, 68, 68),
            Self::Yellow => Color::Rgb(234, 179, 8),
            Self::Green => Color::Rgb(34, 197, 94),
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

/// The page-global traffic-light state.
///
/// Holds the primary phase and knows how many junction demo groups follow
/// it; each demo group shows the primary cycle offset by its own index.
#[derive(Debug, Clone)]
pub struct TrafficLight {
    phase: Phase,
    demo_groups: usize,
}

impl TrafficLight {
    /// Create a light starting at red with the given number of demo groups.
    pub fn new(demo_groups: usize) -> Self {
        Self {
            phase: Phase::Red,
            demo_groups,
        }
    }

    /// Current primary phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of junction demo groups.
    pub fn demo_groups(&self) -> usize {
        self.demo_groups
    }

    /// Advance to the next phase and return the new phase's dwell time.
    pub fn advance(&mut self) -> Duration {
        self.phase = self.phase.next();
        self.phase.dwell()
    }

    /// Phase shown by a demo group: the primary phase shifted by the
    /// group's index.
    pub fn phase_for_group(&self, group: usize) -> Phase {
        Phase::from_index(self.phase.index() + group)
    }
}
