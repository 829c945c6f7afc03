//! Cursor-based pagination over a paged list API.
//!
//! A listing is walked with an opaque continuation token: the path of the
//! last record seen. Offsets are never sent to the remote side, so a walk
//! does not drift when records before the current position change, and the
//! remote side never has to count past a large offset.
//!
//! The protocol only works if the collaborator returns children in one
//! stable order on every call. Which order is up to the collaborator; the
//! in-memory store uses ascending `ResourcePath`. See [`PageSource`].

pub mod config;
pub mod cursor;
pub mod error;
pub mod page;
pub mod paginator;
pub mod source;

pub use config::PaginatorConfig;
pub use cursor::Cursor;
pub use error::PaginationError;
pub use page::Page;
pub use paginator::{CursorPaginator, Pages};
pub use source::PageSource;
