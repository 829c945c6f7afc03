//! One bounded slice of a listing.

use serde::{Deserialize, Serialize};

use nstor_core::Record;

use crate::cursor::Cursor;

/// Records plus the cursor to resume from.
///
/// `next == None` is the empty continuation token: stop. It is returned
/// both for a short last page and for a page that ends exactly on the last
/// record, and callers cannot tell those apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub next: Option<Cursor>,
}

impl<R> Page<R> {
    /// Page with an explicit continuation.
    pub fn new(records: Vec<R>, next: Option<Cursor>) -> Self {
        Self { records, next }
    }

    /// Final page.
    pub fn last(records: Vec<R>) -> Self {
        Self::new(records, None)
    }

    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    /// Wire form of `next`; empty when this is the last page.
    pub fn next_token(&self) -> String {
        self.next.as_ref().map(Cursor::to_token).unwrap_or_default()
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    pub fn into_parts(self) -> (Vec<R>, Option<Cursor>) {
        (self.records, self.next)
    }
}

impl<R: Record> Page<R> {
    /// Page whose continuation is the last record, when `more` remain.
    pub fn from_records(records: Vec<R>, more: bool) -> Self {
        let next = if more {
            records.last().map(|r| Cursor::after(r.path().clone()))
        } else {
            None
        };
        Self::new(records, next)
    }
}

impl<R> Default for Page<R> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nstor_core::ResourcePath;

    fn paths(names: &[&str]) -> Vec<ResourcePath> {
        names.iter().map(|n| ResourcePath::parse(*n).unwrap()).collect()
    }

    #[test]
    fn continuation_is_last_record() {
        let page = Page::from_records(paths(&["fs/a", "fs/b"]), true);
        assert_eq!(page.next_token(), "fs/b");
        assert!(!page.is_last());
    }

    #[test]
    fn no_more_means_empty_token() {
        let page = Page::from_records(paths(&["fs/a"]), false);
        assert_eq!(page.next_token(), "");
        assert!(page.is_last());
    }

    #[test]
    fn empty_page_has_no_continuation_even_if_more_claimed() {
        let page: Page<ResourcePath> = Page::from_records(Vec::new(), true);
        assert!(page.is_last());
        assert!(page.is_empty());
    }
}
