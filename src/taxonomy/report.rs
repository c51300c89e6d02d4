//! # Logging boundary for classified errors.
//!
//! Intermediate layers wrap and return; only the outermost boundary calls
//! [`log_error`], once, so the whole provenance shows up in a single record:
//!
//! ```text
//! ERROR op="Server::serve" kind="internal" trail="Server::serve > Listener::accept" fields="port=8080" error=...
//! ```

use std::fmt;

use super::{chain, error::Error, level::Level};

/// Renders the operation trail as `outer > ... > inner`.
pub struct Trail<'a>(&'a Error);

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in chain::operation_trail(self.0).iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Renders the collected fields as space-separated `key=value` pairs.
pub struct Fields<'a>(&'a Error);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in chain::collected_fields(self.0).iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

pub fn trail(err: &Error) -> Trail<'_> {
    Trail(err)
}

pub fn fields(err: &Error) -> Fields<'_> {
    Fields(err)
}

/// Emits one `tracing` event for `err` at the level it carries.
pub fn log_error(err: &Error) {
    let kind = err.kind().as_label();
    let trail = trail(err);
    let fields = fields(err);

    macro_rules! emit {
        ($macro:ident) => {
            tracing::$macro!(
                kind,
                trail = %trail,
                fields = %fields,
                error = %err,
                "operation failed"
            )
        };
    }

    match err.level() {
        Level::Error => emit!(error),
        Level::Warn => emit!(warn),
        Level::Info => emit!(info),
        Level::Debug => emit!(debug),
    }
}
