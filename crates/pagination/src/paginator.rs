//! Walking a token-paginated list endpoint.

use std::collections::HashSet;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use tracing::{debug, trace};

use nstor_core::{Record, ResourcePath};

use crate::config::PaginatorConfig;
use crate::cursor::Cursor;
use crate::error::PaginationError;
use crate::page::Page;
use crate::source::PageSource;

type PageResult<S> =
    Result<Page<<S as PageSource>::Record>, PaginationError<<S as PageSource>::Error>>;
type ListResult<S> =
    Result<Vec<<S as PageSource>::Record>, PaginationError<<S as PageSource>::Error>>;

/// Stateless composition layer over a [`PageSource`].
///
/// Pages are fetched one after another, never concurrently: each request
/// needs the previous page's cursor. Upstream errors are not retried.
///
/// A walk is only consistent if nothing creates or destroys children of
/// the same parent while it runs. That is on the caller.
#[derive(Debug, Clone)]
pub struct CursorPaginator<S> {
    source: S,
    config: PaginatorConfig,
}

impl<S: PageSource> CursorPaginator<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, PaginatorConfig::default())
    }

    pub fn with_config(source: S, config: PaginatorConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Internal page size of the multi-page walks.
    pub fn page_size(&self) -> NonZeroUsize {
        self.config.page_size
    }

    /// One page of at most `limit` records after `start`.
    ///
    /// `limit == 0` is rejected before any remote call; unbounded listings
    /// go through [`list_all`](Self::list_all) or
    /// [`list_with_token`](Self::list_with_token).
    pub fn list_page(&self, parent: &ResourcePath, start: &Cursor, limit: usize) -> PageResult<S> {
        let Some(limit) = NonZeroUsize::new(limit) else {
            return Err(PaginationError::InvalidLimit);
        };
        self.fetch(parent, start, limit, &mut HashSet::new())
    }

    /// Every child of `parent`, following cursors until exhaustion.
    ///
    /// Stops at the first failing page; records gathered so far are dropped.
    pub fn list_all(&self, parent: &ResourcePath) -> ListResult<S> {
        self.collect_from(parent, Cursor::Start)
    }

    /// Like [`list_page`](Self::list_page), except that `limit == 0`
    /// returns everything after `start` as a single final page.
    pub fn list_with_token(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: usize,
    ) -> PageResult<S> {
        match NonZeroUsize::new(limit) {
            Some(limit) => self.fetch(parent, start, limit, &mut HashSet::new()),
            None => self.collect_from(parent, start.clone()).map(Page::last),
        }
    }

    /// Offset-based convenience: skip `offset` records in source order,
    /// return at most `limit`.
    ///
    /// `offset` counts children only, so `offset == 0` starts at the first
    /// child; `parent` itself is never part of the listing. The remote side
    /// still only ever sees cursors; the offset is applied while walking.
    pub fn list_slice(&self, parent: &ResourcePath, limit: usize, offset: usize) -> ListResult<S> {
        if limit == 0 {
            return Err(PaginationError::InvalidLimit);
        }

        let mut skipped = 0;
        let mut records = Vec::new();
        for page in self.pages(parent, Cursor::Start) {
            for record in page?.into_records() {
                if skipped < offset {
                    skipped += 1;
                    continue;
                }
                records.push(record);
                if records.len() == limit {
                    return Ok(records);
                }
            }
        }
        Ok(records)
    }

    /// Lazy page-by-page walk starting at `start`.
    pub fn pages<'a>(&'a self, parent: &'a ResourcePath, start: Cursor) -> Pages<'a, S> {
        Pages {
            paginator: self,
            parent,
            next: Some(start),
            seen: HashSet::new(),
        }
    }

    fn collect_from(&self, parent: &ResourcePath, start: Cursor) -> ListResult<S> {
        let mut records = Vec::new();
        let mut pages = 0usize;
        for page in self.pages(parent, start) {
            records.extend(page?.into_records());
            pages += 1;
        }
        debug!(%parent, pages, records = records.len(), "listed all children");
        Ok(records)
    }

    /// One checked page. `seen` holds every record returned so far by the
    /// same walk.
    fn fetch(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: NonZeroUsize,
        seen: &mut HashSet<ResourcePath>,
    ) -> PageResult<S> {
        trace!(%parent, start = %start, limit = limit.get(), "fetching page");
        let page = self
            .source
            .list_page_raw(parent, start, limit)
            .map_err(PaginationError::Upstream)?;
        if let Err(detail) = check_page(start, limit, &page, seen) {
            return Err(PaginationError::order_violation(parent, detail));
        }
        Ok(page)
    }
}

/// Verify the paging contract on one page.
///
/// Only checks that hold for any stable order: the source picks the order,
/// the paginator never compares paths.
fn check_page<R: Record>(
    start: &Cursor,
    limit: NonZeroUsize,
    page: &Page<R>,
    seen: &mut HashSet<ResourcePath>,
) -> Result<(), String> {
    if page.len() > limit.get() {
        return Err(format!("{} records returned for limit {limit}", page.len()));
    }

    // The cursor record itself is never part of a page.
    if let Some(after) = start.after_path() {
        seen.insert(after.clone());
    }
    for record in page.records() {
        let path = record.path();
        if !seen.insert(path.clone()) {
            return Err(format!("'{path}' returned again after cursor '{start}'"));
        }
    }

    match (page.next(), page.records().last()) {
        (None, _) => Ok(()),
        (Some(Cursor::After(next)), Some(last)) if next == last.path() => Ok(()),
        (Some(next), _) => Err(format!(
            "continuation '{next}' is not the last record of the page"
        )),
    }
}

/// Iterator over the pages of one listing; see [`CursorPaginator::pages`].
///
/// Ends after the page without a continuation, or right after yielding an
/// error.
#[derive(Debug)]
pub struct Pages<'a, S> {
    paginator: &'a CursorPaginator<S>,
    parent: &'a ResourcePath,
    next: Option<Cursor>,
    seen: HashSet<ResourcePath>,
}

impl<S: PageSource> Iterator for Pages<'_, S> {
    type Item = PageResult<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next.take()?;
        let result = self.paginator.fetch(
            self.parent,
            &start,
            self.paginator.config.page_size,
            &mut self.seen,
        );
        if let Ok(page) = &result {
            self.next = page.next.clone();
        }
        Some(result)
    }
}

impl<S: PageSource> FusedIterator for Pages<'_, S> {}
