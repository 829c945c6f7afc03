//! The single-page list primitive the paginator composes over.

use std::num::NonZeroUsize;
use std::sync::Arc;

use nstor_core::{Record, ResourcePath};

use crate::cursor::Cursor;
use crate::page::Page;

/// Authoritative single-page fetch provided by a remote client.
///
/// ## Hard requirements on implementors
///
/// The cursor is a record identity, not an index, so correctness rests
/// entirely on ordering:
///
/// - records are returned in one stable, deterministic order of the
///   implementor's choosing (ascending `ResourcePath` is the usual one),
///   the same order on every call;
/// - with `start == After(p)`, only records strictly after `p` are returned,
///   and a `p` that is not (or no longer) present yields an empty page with
///   no continuation instead of an error;
/// - at most `limit` records are returned, and `next` is `After(last)` when
///   more records follow the page, `None` otherwise.
///
/// A store that cannot guarantee a stable order cannot back this protocol.
/// `CursorPaginator` never compares paths. It checks page size, that the
/// continuation is the last record, and that no record (the cursor record
/// included) comes back twice within one walk, and reports
/// `PaginationError::OrderViolation` otherwise.
///
/// Retries belong here, not in the paginator: errors are passed through
/// unchanged.
pub trait PageSource {
    type Record: Record;
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_page_raw(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: NonZeroUsize,
    ) -> Result<Page<Self::Record>, Self::Error>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    type Record = T::Record;
    type Error = T::Error;

    fn list_page_raw(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: NonZeroUsize,
    ) -> Result<Page<Self::Record>, Self::Error> {
        (**self).list_page_raw(parent, start, limit)
    }
}

impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    type Record = T::Record;
    type Error = T::Error;

    fn list_page_raw(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: NonZeroUsize,
    ) -> Result<Page<Self::Record>, Self::Error> {
        (**self).list_page_raw(parent, start, limit)
    }
}
