//! Feed-index reader: paginated entry-list pages → document stubs.
//!
//! One call parses one page. Pagination, the page-count safety ceiling, and
//! cross-page deduplication are the caller's concern; [`Catalog`] is the
//! first-seen-wins dedup helper for that caller.

mod atom;
mod catalog;

use thiserror::Error;

pub use atom::{FeedPage, parse_page};
pub use catalog::Catalog;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml error: {0}")]
  Xml(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
