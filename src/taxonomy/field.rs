//! Diagnostic key/value pairs and operation labels attached to errors.

use std::borrow::Cow;
use std::fmt;

/// Label of the logical action that failed, e.g. `"Supervisor::run"`.
///
/// Used to build the operation trail, not shown to end users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Op(Cow<'static, str>);

impl Op {
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Op {
    fn from(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }
}

impl From<String> for Op {
    fn from(label: String) -> Self {
        Self(Cow::Owned(label))
    }
}

impl PartialEq<str> for Op {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Op {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// One diagnostic pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: String,
}

impl Field {
    /// Creates a field; the value is rendered with `Display`.
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
