//! # Classified error value.
//!
//! An [`Error`] is created at the point of failure and optionally wrapped by
//! callers higher in the stack. Each layer adds its own [`Op`] and fields and
//! keeps the original as its [`Cause`]; nothing mutates an error after
//! [`ErrorBuilder::build`](crate::ErrorBuilder) returns it.
//!
//! ```text
//! Error{op: "Supervisor::run", kind: Internal}
//!   └─ Cause::Classified ─► Error{op: "Listener::accept", fields: [port=8080]}
//!                             └─ Cause::Opaque ─► io::Error  (chain ends here)
//! ```
//!
//! ## Display
//! Layers are joined with `": "`: operation label, kind description (skipped
//! when the classified cause repeats the same kind) and then the cause.

use std::error::Error as StdError;
use std::fmt;

use super::{
    builder::{Empty, ErrorBuilder},
    chain::Chain,
    field::{Field, Op},
    kind::{Classification, Kind},
    level::Level,
};

/// Boxed third-party error that terminates a chain.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// What an [`Error`] wraps.
#[derive(Debug)]
pub enum Cause {
    /// Another classified error: the chain continues through it.
    Classified(Box<Error>),
    /// An external error: the chain ends here even if it has its own sources.
    Opaque(BoxError),
}

impl Cause {
    /// Normalizes any boxed error; a boxed [`Error`] becomes [`Cause::Classified`].
    pub fn from_boxed(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(classified) => Cause::Classified(classified),
            Err(other) => Cause::Opaque(other),
        }
    }

    /// The next classified layer, if any.
    pub fn as_classified(&self) -> Option<&Error> {
        match self {
            Cause::Classified(inner) => Some(inner),
            Cause::Opaque(_) => None,
        }
    }

    fn as_std(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Classified(inner) => inner.as_ref(),
            Cause::Opaque(other) => other.as_ref(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Classified(inner) => fmt::Display::fmt(inner, f),
            Cause::Opaque(other) => fmt::Display::fmt(other, f),
        }
    }
}

/// Classified, chain-walkable error.
///
/// # Example
/// ```
/// use runkit::{Error, Kind, Level};
///
/// let io = std::io::Error::other("connection reset");
/// let inner = Error::builder()
///     .op("Listener::accept")
///     .field("port", 8080)
///     .cause(io)
///     .build();
/// let outer = Error::builder()
///     .op("Server::serve")
///     .kind(Kind::Internal)
///     .level(Level::Warn)
///     .cause(inner)
///     .build();
///
/// let trail: Vec<&str> = outer.operation_trail().iter().map(|op| op.as_str()).collect();
/// assert_eq!(trail, ["Server::serve", "Listener::accept"]);
/// assert_eq!(outer.collected_fields()[0].value, "8080");
/// assert_eq!(outer.kind().http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Debug)]
pub struct Error {
    pub(super) op: Option<Op>,
    pub(super) kind: Kind,
    pub(super) level: Level,
    pub(super) fields: Vec<Field>,
    pub(super) cause: Option<Cause>,
}

impl Error {
    /// Starts a new error. At least one attribute must be set before `build()`.
    pub fn builder() -> ErrorBuilder<Empty> {
        ErrorBuilder::new()
    }

    pub fn op(&self) -> Option<&Op> {
        self.op.as_ref()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Fields attached at this layer only; see [`Error::collected_fields`].
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Description and wire statuses for this error's kind.
    pub fn classification(&self) -> Classification {
        self.kind.classify()
    }

    /// Iterates this error and every classified error below it, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Operation labels from the outermost layer inward.
    pub fn operation_trail(&self) -> Vec<&Op> {
        super::chain::operation_trail(self)
    }

    /// Fields of every classified layer, outermost first.
    pub fn collected_fields(&self) -> Vec<&Field> {
        super::chain::collected_fields(self)
    }

    /// The opaque error terminating the chain, if there is one.
    pub fn opaque_cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        let innermost = self.chain().last()?;
        match innermost.cause.as_ref()? {
            Cause::Opaque(other) => Some(other.as_ref()),
            Cause::Classified(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(op) = &self.op {
            write!(f, "{op}")?;
            sep = ": ";
        }

        let repeated = self
            .cause
            .as_ref()
            .and_then(Cause::as_classified)
            .is_some_and(|inner| inner.kind == self.kind);
        let quiet_unknown = self.kind == Kind::Unknown && self.cause.is_some();
        if !repeated && !quiet_unknown {
            write!(f, "{sep}{}", self.kind)?;
            sep = ": ";
        }

        if let Some(cause) = &self.cause {
            write!(f, "{sep}{cause}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(Cause::as_std)
    }
}
