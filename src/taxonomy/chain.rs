//! # Walking a wrapped-error chain.
//!
//! A chain is descended only through [`Cause::Classified`]; the first
//! [`Cause::Opaque`] (or a missing cause) ends it, whatever the opaque error
//! wraps internally. Both accessors report outermost-first.

use std::iter::FusedIterator;

use super::{
    error::{Cause, Error},
    field::{Field, Op},
};

/// Iterator over the classified layers of an error, outermost first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Chain<'a> {
    pub(super) fn new(head: &'a Error) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_ref().and_then(Cause::as_classified);
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Operation labels of every classified layer, outermost first.
///
/// Layers built without an op contribute nothing, so the trail can be shorter
/// than [`Error::chain`]. For a view aligned with the chain position by
/// position, use `err.chain().map(Error::op)`.
pub fn operation_trail(err: &Error) -> Vec<&Op> {
    err.chain().filter_map(Error::op).collect()
}

/// Fields of every classified layer concatenated, outermost first.
pub fn collected_fields(err: &Error) -> Vec<&Field> {
    err.chain().flat_map(|layer| layer.fields().iter()).collect()
}
