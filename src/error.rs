//! Crate-wide error type.
//!
//! Only the setup surface is fallible: configuration loading and terminal
//! I/O. Animation-domain faults (missing targets, stale timer events) are
//! skipped or logged rather than raised, so nothing here is fatal to an
//! individual animator.

use thiserror::Error;

/// Errors that can occur while setting up or running the dashboard.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// The configuration could not be loaded or parsed.
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The configuration could not be rendered as TOML.
    #[error("failed to encode configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// Terminal or other I/O failure.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_display() {
        let err = Error::ConfigNotFound("/tmp/missing.toml".to_string());
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
