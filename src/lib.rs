//! blinkboard - terminal dashboard for the BLINK adaptive traffic-signal
//! pilot.
//!
//! This library exposes the dashboard's internals for integration testing
//! and potential embedding.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod runner;
pub mod scheduler;
pub mod tabs;
pub mod traffic;
pub mod ui;
