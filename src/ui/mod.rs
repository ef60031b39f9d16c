//! Terminal UI module for the dashboard.
//!
//! Widgets and layout helpers; the frame composition lives on
//! [`crate::app::App`].

pub mod layout;
pub mod widgets;

pub use layout::{LayoutMode, COMPACT_MAX_WIDTH};
pub use widgets::{StatCard, StatGridWidget, TabBarWidget, TrafficLightWidget};
