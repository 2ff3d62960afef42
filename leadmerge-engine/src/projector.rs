use crate::contact_set::{ContactEntry, ContactSet};
use shared_types::{CanonicalContact, ExportRow, PLACEHOLDER};
use std::iter::FusedIterator;
use std::slice;

/// Lazy row sequence over a `ContactSet`.
///
/// Borrowing the set keeps it unmodified while rows are read; project again
/// (or clone the iterator) to restart.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    entries: slice::Iter<'a, ContactEntry>,
}

impl Iterator for Rows<'_> {
    type Item = ExportRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| to_row(&entry.contact))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.entries.nth(n).map(|entry| to_row(&entry.contact))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}

pub fn project(set: &ContactSet) -> Rows<'_> {
    Rows {
        entries: set.entries().iter(),
    }
}

pub fn to_row(contact: &CanonicalContact) -> ExportRow {
    ExportRow {
        name: cell(&contact.full_name),
        title: cell(&contact.title),
        email: cell(&contact.email),
        company: cell(&contact.company),
        location: cell(&contact.location),
        linkedin: cell(&contact.linkedin_url),
    }
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Number of pages needed for `len` rows; a page size of zero counts as one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Rows of one zero-based page; empty past the last page.
pub fn page(set: &ContactSet, page_index: usize, page_size: usize) -> Vec<ExportRow> {
    let page_size = page_size.max(1);
    match page_index.checked_mul(page_size) {
        Some(start) => project(set).skip(start).take(page_size).collect(),
        None => Vec::new(),
    }
}
