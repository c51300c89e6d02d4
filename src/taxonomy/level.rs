//! # Severity of a classified error.
//!
//! [`Level`] is orthogonal to [`Kind`](crate::Kind): it decides how loudly an
//! error is surfaced at the logging boundary, never whether it is fatal.

use std::fmt;

/// Logging severity carried by an [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => tracing::Level::ERROR,
            Level::Warn => tracing::Level::WARN,
            Level::Info => tracing::Level::INFO,
            Level::Debug => tracing::Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_error() {
        assert_eq!(Level::default(), Level::Error);
    }

    #[test]
    fn test_tracing_levels() {
        assert_eq!(tracing::Level::from(Level::Error), tracing::Level::ERROR);
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(Level::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(Level::Debug), tracing::Level::DEBUG);
    }
}
