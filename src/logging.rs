//! Logging setup.
//!
//! Logs go to stderr so the TUI keeps exclusive use of stdout. The level is
//! taken from `RUST_LOG` when set, otherwise from the CLI verbosity flags.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level selected by CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors and warnings only (`--quiet`)
    Warn,
    /// Default
    #[default]
    Info,
    /// `-v`
    Debug,
    /// `-vv` and beyond
    Trace,
}

impl LogLevel {
    /// Map quiet/verbosity flags to a level. Quiet wins.
    pub fn from_flags(quiet: bool, verbosity: u8) -> Self {
        if quiet {
            return Self::Warn;
        }
        match verbosity {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_logging(level: LogLevel) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.directive())
    };

    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
