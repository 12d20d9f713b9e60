//! Ordered collection of matched records.

use std::slice;

use crate::record::EmailRecord;

/// Records accepted during a traversal, in traversal order.
///
/// Only the traversal engine appends; callers get a read-only view. The
/// sequence is never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    records: Vec<EmailRecord>,
}

impl Matches {
    pub(crate) const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = EmailRecord>) {
        self.records.extend(records);
    }

    pub(crate) fn append(&mut self, other: &mut Self) {
        self.records.append(&mut other.records);
    }

    /// Number of matched records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> slice::Iter<'_, EmailRecord> {
        self.records.iter()
    }

    /// The records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[EmailRecord] {
        &self.records
    }

    /// Consumes the collection, returning the records.
    #[must_use]
    pub fn into_records(self) -> Vec<EmailRecord> {
        self.records
    }
}

impl IntoIterator for Matches {
    type Item = EmailRecord;
    type IntoIter = std::vec::IntoIter<EmailRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a EmailRecord;
    type IntoIter = slice::Iter<'a, EmailRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
