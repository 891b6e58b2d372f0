//! Akoma-Ntoso-style legislative markup ingestion for Lexref.
//!
//! Pipeline:
//!   raw markup &str
//!     └─ flatten::flatten_inline()  → inline elements collapsed to text
//!          └─ tree::parse()         → owned element tree
//!               └─ walk::walk_body() → Vec<ProvisionRecord>
//!
//! Pure and synchronous; no I/O. One malformed document is one error — batch
//! callers log and continue.

pub mod flatten;
pub mod tree;
pub mod walk;

use thiserror::Error;

pub use flatten::flatten_inline;
pub use walk::WalkedDocument;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml error: {0}")]
  Xml(String),

  #[error("document has no root element")]
  NoRoot,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Run the full pipeline over one document's raw markup.
///
/// Flattens inline elements, parses the tree, locates the document body,
/// and walks it into provision records in document order.
pub fn extract_provisions(markup: &str) -> Result<WalkedDocument> {
  let flat = flatten::flatten_inline(markup);
  let root = tree::parse(&flat)?;
  let body = tree::find_descendant(&root, "body")
    .or_else(|| tree::find_descendant(&root, "mainBody"))
    .unwrap_or(&root);
  Ok(walk::walk_body(body))
}
