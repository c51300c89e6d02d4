//! # Typestate builder for [`Error`].
//!
//! `Error::builder()` returns an `ErrorBuilder<Empty>`, which has no `build()`.
//! Setting any attribute moves it to `ErrorBuilder<Ready>`. An error with no
//! classifying information cannot be constructed:
//!
//! ```compile_fail
//! let err = runkit::Error::builder().build();
//! ```
//!
//! Defaults for unset attributes: kind [`Kind::Unknown`], level [`Level::Error`],
//! no op, no fields, no cause.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use super::{
    error::{BoxError, Cause, Error},
    field::{Field, Op},
    kind::Kind,
    level::Level,
};

/// Nothing set yet.
#[derive(Debug)]
pub struct Empty;

/// At least one attribute set; `build()` available.
#[derive(Debug)]
pub struct Ready;

/// Builder for [`Error`]. One method per attribute.
#[derive(Debug)]
pub struct ErrorBuilder<S> {
    op: Option<Op>,
    kind: Kind,
    level: Level,
    fields: Vec<Field>,
    cause: Option<Cause>,
    _state: PhantomData<S>,
}

impl ErrorBuilder<Empty> {
    pub(super) fn new() -> Self {
        Self {
            op: None,
            kind: Kind::default(),
            level: Level::default(),
            fields: Vec::new(),
            cause: None,
            _state: PhantomData,
        }
    }
}

impl<S> ErrorBuilder<S> {
    fn ready(self) -> ErrorBuilder<Ready> {
        ErrorBuilder {
            op: self.op,
            kind: self.kind,
            level: self.level,
            fields: self.fields,
            cause: self.cause,
            _state: PhantomData,
        }
    }

    /// Sets the operation label.
    pub fn op(mut self, op: impl Into<Op>) -> ErrorBuilder<Ready> {
        self.op = Some(op.into());
        self.ready()
    }

    pub fn kind(mut self, kind: Kind) -> ErrorBuilder<Ready> {
        self.kind = kind;
        self.ready()
    }

    pub fn level(mut self, level: Level) -> ErrorBuilder<Ready> {
        self.level = level;
        self.ready()
    }

    /// Appends a diagnostic field. Fields keep insertion order.
    pub fn field(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl fmt::Display,
    ) -> ErrorBuilder<Ready> {
        self.fields.push(Field::new(key, value));
        self.ready()
    }

    /// Wraps a cause.
    ///
    /// Accepts anything convertible into a boxed error (`Error`, `io::Error`,
    /// `String`, `&str`, ...). A classified [`Error`] keeps the chain going;
    /// everything else terminates it.
    pub fn cause(mut self, cause: impl Into<BoxError>) -> ErrorBuilder<Ready> {
        self.cause = Some(Cause::from_boxed(cause.into()));
        self.ready()
    }
}

impl ErrorBuilder<Ready> {
    pub fn build(self) -> Error {
        Error {
            op: self.op,
            kind: self.kind,
            level: self.level,
            fields: self.fields,
            cause: self.cause,
        }
    }
}

impl From<ErrorBuilder<Ready>> for Error {
    fn from(builder: ErrorBuilder<Ready>) -> Self {
        builder.build()
    }
}
