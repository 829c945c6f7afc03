//! Paginator configuration.

use std::num::NonZeroUsize;

use tracing::warn;

/// Environment variable overriding the internal page size.
pub const PAGE_SIZE_ENV: &str = "NSTOR_PAGE_SIZE";

/// Page size used by `list_all` and the other multi-page walks.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorConfig {
    pub page_size: NonZeroUsize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config = Self::default();
        let Some(raw) = lookup(PAGE_SIZE_ENV) else {
            return config;
        };
        match raw.trim().parse::<NonZeroUsize>() {
            Ok(page_size) => Self { page_size },
            Err(e) => {
                warn!(
                    var = PAGE_SIZE_ENV,
                    value = %raw,
                    error = %e,
                    default = DEFAULT_PAGE_SIZE.get(),
                    "invalid page size; using default"
                );
                config
            }
        }
    }

    /// Set the page size; zero is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = NonZeroUsize::new(page_size).unwrap_or(NonZeroUsize::MIN);
        self
    }
}
