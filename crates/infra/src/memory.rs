use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use tracing::trace;

use nstor_core::ResourcePath;
use nstor_pagination::{Cursor, Page, PageSource};

use crate::client::{ClientError, Filesystem, ResourceClient};

/// In-memory filesystem tree.
///
/// Intended for tests/dev. Keys are kept in a `BTreeMap`, which gives the
/// stable lexicographic order the pagination protocol relies on.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    filesystems: RwLock<BTreeMap<ResourcePath, Filesystem>>,
    rejected: RwLock<HashMap<ResourcePath, String>>,
    list_calls: AtomicUsize,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create/destroy of `path` fail with `ClientError::Rejected`.
    pub fn reject(&self, path: &ResourcePath, reason: impl Into<String>) {
        self.rejected
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.clone(), reason.into());
    }

    /// Undo `reject`.
    pub fn allow(&self, path: &ResourcePath) {
        self.rejected
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }

    pub fn get(&self, path: &ResourcePath) -> Option<Filesystem> {
        self.filesystems
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn contains(&self, path: &ResourcePath) -> bool {
        self.get(path).is_some()
    }

    /// Number of filesystems at any depth.
    pub fn len(&self) -> usize {
        self.filesystems
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many pages have been served.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_rejected(&self, path: &ResourcePath) -> Result<(), ClientError> {
        let rejected = self.rejected.read().unwrap_or_else(PoisonError::into_inner);
        match rejected.get(path) {
            Some(reason) => Err(ClientError::Rejected {
                path: path.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn child_prefix(parent: &ResourcePath) -> String {
    format!("{parent}/")
}

impl PageSource for InMemoryResourceStore {
    type Record = Filesystem;
    type Error = ClientError;

    fn list_page_raw(
        &self,
        parent: &ResourcePath,
        start: &Cursor,
        limit: NonZeroUsize,
    ) -> Result<Page<Filesystem>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let filesystems = self.filesystems.read().unwrap_or_else(PoisonError::into_inner);

        if !filesystems.contains_key(parent) {
            return Err(ClientError::NotFound(parent.clone()));
        }

        let prefix = child_prefix(parent);
        let lower = match start.after_path() {
            None => Bound::Included(prefix.as_str()),
            // A cursor is only a position if it names a current child.
            Some(after) if after.is_child_of(parent) && filesystems.contains_key(after) => {
                Bound::Excluded(after.as_str())
            }
            Some(_) => return Ok(Page::empty()),
        };

        let mut records: Vec<Filesystem> = filesystems
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(|(path, _)| path.as_str().starts_with(&prefix))
            .filter(|(path, _)| path.is_child_of(parent))
            .take(limit.get() + 1)
            .map(|(_, fs)| fs.clone())
            .collect();

        let more = records.len() > limit.get();
        records.truncate(limit.get());
        trace!(%parent, start = %start, returned = records.len(), more, "served page");
        Ok(Page::from_records(records, more))
    }
}

impl ResourceClient for InMemoryResourceStore {
    fn create_filesystem(&self, path: &ResourcePath) -> Result<(), ClientError> {
        self.check_rejected(path)?;
        let mut filesystems = self.filesystems.write().unwrap_or_else(PoisonError::into_inner);

        if filesystems.contains_key(path) {
            return Err(ClientError::AlreadyExists(path.clone()));
        }
        if let Some(parent) = path.parent() {
            if !filesystems.contains_key(&parent) {
                return Err(ClientError::NotFound(parent));
            }
        }

        filesystems.insert(path.clone(), Filesystem::new(path.clone(), Utc::now()));
        Ok(())
    }

    fn destroy_filesystem(&self, path: &ResourcePath) -> Result<(), ClientError> {
        self.check_rejected(path)?;
        let mut filesystems = self.filesystems.write().unwrap_or_else(PoisonError::into_inner);

        if !filesystems.contains_key(path) {
            return Err(ClientError::NotFound(path.clone()));
        }
        let prefix = child_prefix(path);
        let has_children = filesystems
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|(child, _)| child.as_str().starts_with(&prefix));
        if has_children {
            return Err(ClientError::HasChildren(path.clone()));
        }

        filesystems.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path(s: &str) -> ResourcePath {
        ResourcePath::parse(s).unwrap()
    }

    fn store_with(paths: &[&str]) -> InMemoryResourceStore {
        let store = InMemoryResourceStore::new();
        for p in paths {
            store.create_filesystem(&path(p)).unwrap();
        }
        store
    }

    fn names(page: &Page<Filesystem>) -> Vec<&str> {
        page.records().iter().map(|fs| fs.path.name()).collect()
    }

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn create_requires_parent() {
        let store = InMemoryResourceStore::new();
        assert_eq!(
            store.create_filesystem(&path("pool/fs")),
            Err(ClientError::NotFound(path("pool")))
        );
        store.create_filesystem(&path("pool")).unwrap();
        store.create_filesystem(&path("pool/fs")).unwrap();
        assert_eq!(
            store.create_filesystem(&path("pool/fs")),
            Err(ClientError::AlreadyExists(path("pool/fs")))
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn destroy_refuses_parents() {
        let store = store_with(&["pool", "pool/fs", "pool/fs/a"]);
        assert_eq!(
            store.destroy_filesystem(&path("pool/fs")),
            Err(ClientError::HasChildren(path("pool/fs")))
        );
        store.destroy_filesystem(&path("pool/fs/a")).unwrap();
        store.destroy_filesystem(&path("pool/fs")).unwrap();
        assert_eq!(
            store.destroy_filesystem(&path("pool/fs")),
            Err(ClientError::NotFound(path("pool/fs")))
        );
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_a_child() {
        let store = store_with(&["pool", "pool/fs", "pool/fs-b", "pool/fs-b/x"]);
        store.destroy_filesystem(&path("pool/fs")).unwrap();
        assert!(store.contains(&path("pool/fs-b/x")));
    }

    #[test]
    fn lists_direct_children_only_in_order() {
        let store = store_with(&[
            "pool",
            "pool/fs",
            "pool/fs/b",
            "pool/fs/a",
            "pool/fs/a/nested",
            "pool/fs-sibling",
            "pool/fs/c",
        ]);

        let page = store
            .list_page_raw(&path("pool/fs"), &Cursor::Start, limit(10))
            .unwrap();

        assert_eq!(names(&page), vec!["a", "b", "c"]);
        assert!(page.is_last());
    }

    #[test]
    fn cursor_resumes_strictly_after() {
        let store = store_with(&["pool", "pool/a", "pool/b", "pool/c", "pool/d"]);

        let page = store
            .list_page_raw(&path("pool"), &Cursor::after(path("pool/b")), limit(1))
            .unwrap();

        assert_eq!(names(&page), vec!["c"]);
        assert_eq!(page.next_token(), "pool/c");
    }

    #[test]
    fn unknown_cursor_yields_empty_last_page() {
        let store = store_with(&["pool", "pool/a"]);
        let page = store
            .list_page_raw(&path("pool"), &Cursor::from_token("NOT_EXISTING").unwrap(), limit(1))
            .unwrap();
        assert!(page.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn listing_unknown_parent_fails() {
        let store = InMemoryResourceStore::new();
        assert_eq!(
            store
                .list_page_raw(&path("pool"), &Cursor::Start, limit(1))
                .unwrap_err(),
            ClientError::NotFound(path("pool"))
        );
        assert_eq!(store.list_calls(), 1);
    }

    #[test]
    fn rejected_paths_fail_until_allowed() {
        let store = store_with(&["pool"]);
        store.reject(&path("pool/fs"), "quota exceeded");

        let err = store.create_filesystem(&path("pool/fs")).unwrap_err();
        assert_eq!(err.to_string(), "request rejected for pool/fs: quota exceeded");

        store.allow(&path("pool/fs"));
        store.create_filesystem(&path("pool/fs")).unwrap();
    }

    proptest! {
        /// Property: walking any child set page by page yields it sorted,
        /// complete and without duplicates.
        #[test]
        fn page_walk_is_sorted_and_complete(
            names in prop::collection::btree_set("[a-z]{1,6}", 0..40),
            page_size in 1usize..8,
        ) {
            let store = store_with(&["pool"]);
            for name in &names {
                store.create_filesystem(&path("pool").join(name).unwrap()).unwrap();
            }

            let mut seen = Vec::new();
            let mut start = Cursor::Start;
            loop {
                let page = store.list_page_raw(&path("pool"), &start, limit(page_size)).unwrap();
                prop_assert!(page.len() <= page_size);
                let (records, next) = page.into_parts();
                seen.extend(records.into_iter().map(|fs| fs.path.name().to_string()));
                match next {
                    Some(cursor) => start = cursor,
                    None => break,
                }
            }

            prop_assert_eq!(seen, names.into_iter().collect::<Vec<_>>());
        }
    }
}
