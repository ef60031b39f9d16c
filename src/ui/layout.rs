//! Responsive layout selection.
//!
//! Narrow terminals get a single-column card stack instead of side-by-side
//! cards.

/// Widest terminal (in columns) that still uses the compact layout.
pub const COMPACT_MAX_WIDTH: u16 = 80;

/// Overall layout mode, derived from the terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Cards side by side
    #[default]
    Wide,
    /// Cards stacked in one column
    Compact,
}

impl LayoutMode {
    /// Pick the mode for a terminal width.
    pub fn for_width(width: u16) -> Self {
        if width <= COMPACT_MAX_WIDTH {
            Self::Compact
        } else {
            Self::Wide
        }
    }

    /// Whether cards stack vertically.
    pub fn is_compact(self) -> bool {
        self == Self::Compact
    }
}
