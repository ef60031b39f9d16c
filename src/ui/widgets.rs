//! Custom ratatui widgets for the dashboard.
//!
//! Provides:
//! - Tab bar with a single active highlight
//! - Stat card grids (header stats, improvements, training, live metrics)
//! - Traffic-light indicator with junction demo groups
//!
//! Every widget also renders to a plain string for the non-TTY snapshot
//! path and for tests.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tabs::TabId;
use crate::traffic::{Phase, TrafficLight};

pub mod colors {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(34, 211, 238);
    pub const GRAY: Color = Color::Rgb(107, 114, 128);
    pub const MUTED: Color = Color::Rgb(75, 85, 99);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Muted endpoint of the panel fade.
    pub const FADE_FROM: (u8, u8, u8) = (75, 85, 99);
    /// Full-brightness endpoint of the panel fade.
    pub const FADE_TO: (u8, u8, u8) = (255, 255, 255);
}

// ============================================================================
// Tab Bar
// ============================================================================

/// The tab bar; exactly the active tab is highlighted.
#[derive(Debug, Clone)]
pub struct TabBarWidget {
    active: Option<TabId>,
    color: bool,
}

impl TabBarWidget {
    /// Create a tab bar with the given active tab.
    pub fn new(active: Option<TabId>) -> Self {
        Self {
            active,
            color: true,
        }
    }

    /// Enable or disable colors; without them the active tab is bold only.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render as a plain string; the active tab is bracketed.
    pub fn render_string(&self) -> String {
        TabId::ALL
            .iter()
            .map(|tab| {
                if self.active == Some(*tab) {
                    format!("[{}]", tab.title())
                } else {
                    format!(" {} ", tab.title())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Widget for TabBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(TabId::ALL.len() * 2);
        for tab in TabId::ALL {
            let label = format!(" {} ", tab.title());
            let style = match (self.active == Some(tab), self.color) {
                (true, true) => Style::default()
                    .fg(Color::Black)
                    .bg(colors::CYAN)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(colors::GRAY),
                (false, false) => Style::default(),
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

// ============================================================================
// Stat Cards
// ============================================================================

/// One rendered stat: a value line over a label line.
#[derive(Debug, Clone)]
pub struct StatCard {
    /// Display label
    pub label: String,
    /// Already-formatted value
    pub value: String,
}

impl StatCard {
    /// Create a card.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A grid of stat cards, one bordered card per entry.
#[derive(Debug, Clone)]
pub struct StatGridWidget {
    cards: Vec<StatCard>,
    /// Foreground for the value lines (carries the fade-in color)
    value_fg: Color,
    /// Stack cards vertically instead of in a row
    compact: bool,
    color: bool,
}

impl StatGridWidget {
    /// Create a grid.
    pub fn new(cards: Vec<StatCard>) -> Self {
        Self {
            cards,
            value_fg: colors::WHITE,
            compact: false,
            color: true,
        }
    }

    /// Set the value foreground color.
    pub fn with_value_fg(mut self, fg: Color) -> Self {
        self.value_fg = fg;
        self
    }

    /// Enable or disable colors; without them values are bold only.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Stack cards vertically (narrow terminals).
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Render as plain `label: value` lines.
    pub fn render_string(&self) -> String {
        self.cards
            .iter()
            .map(|card| format!("{}: {}", card.label, card.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Widget for StatGridWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.cards.is_empty() || area.width < 10 || area.height < 3 {
            return;
        }

        let constraints: Vec<Constraint> = self
            .cards
            .iter()
            .map(|_| Constraint::Ratio(1, self.cards.len() as u32))
            .collect();
        let direction = if self.compact {
            Direction::Vertical
        } else {
            Direction::Horizontal
        };
        let chunks = Layout::default()
            .direction(direction)
            .constraints(constraints)
            .split(area);

        let border_style = if self.color {
            Style::default().fg(colors::MUTED)
        } else {
            Style::default()
        };
        let value_style = if self.color {
            Style::default()
                .fg(self.value_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let label_style = if self.color {
            Style::default().fg(colors::GRAY)
        } else {
            Style::default()
        };

        for (card, chunk) in self.cards.iter().zip(chunks.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style);
            let lines = vec![
                Line::from(Span::styled(card.value.clone(), value_style)),
                Line::from(Span::styled(card.label.clone(), label_style)),
            ];
            Paragraph::new(lines)
                .block(block)
                .centered()
                .render(*chunk, buf);
        }
    }
}

// ============================================================================
// Traffic Light
// ============================================================================

/// The header signal plus junction demo groups.
#[derive(Debug, Clone)]
pub struct TrafficLightWidget {
    primary: Phase,
    groups: Vec<Phase>,
    color: bool,
}

impl TrafficLightWidget {
    /// Snapshot the current light state.
    pub fn new(light: &TrafficLight) -> Self {
        let groups = (0..light.demo_groups())
            .map(|i| light.phase_for_group(i))
            .collect();
        Self {
            primary: light.phase(),
            groups,
            color: true,
        }
    }

    /// Just the header signal, without the junction demo groups.
    pub fn primary_only(light: &TrafficLight) -> Self {
        Self {
            primary: light.phase(),
            groups: Vec::new(),
            color: true,
        }
    }

    /// Enable or disable colors; without them the lamp glyphs alone carry
    /// the state.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn lamp_row(active: Phase) -> String {
        Phase::ALL
            .iter()
            .map(|slot| if *slot == active { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render as plain text, one line per light group.
    pub fn render_string(&self) -> String {
        let mut out = format!(
            "signal [{}] {}",
            Self::lamp_row(self.primary),
            self.primary.name()
        );
        for (i, phase) in self.groups.iter().enumerate() {
            out.push_str(&format!(
                "\njunction {} [{}] {}",
                i + 1,
                Self::lamp_row(*phase),
                phase.name()
            ));
        }
        out
    }

    fn lamp_line(&self, title: &str, active: Phase) -> Line<'static> {
        let title_style = if self.color {
            Style::default().fg(colors::GRAY)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(format!("{title:<12}"), title_style)];
        for slot in Phase::ALL {
            let style = match (slot == active, self.color) {
                (true, true) => Style::default().fg(slot.color()).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(colors::MUTED),
                (false, false) => Style::default(),
            };
            let lamp = if slot == active { "● " } else { "○ " };
            spans.push(Span::styled(lamp, style));
        }
        let name_style = if self.color {
            Style::default().fg(active.color())
        } else {
            Style::default()
        };
        spans.push(Span::styled(active.name(), name_style));
        Line::from(spans)
    }
}

impl Widget for TrafficLightWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        let mut lines = vec![self.lamp_line("signal", self.primary)];
        for (i, phase) in self.groups.iter().enumerate() {
            lines.push(self.lamp_line(&format!("junction {}", i + 1), *phase));
        }
        Paragraph::new(lines).render(area, buf);
    }
}
