//! Document-level types: catalog stubs and persisted document metadata.
//!
//! A document is one statute or statutory instrument, identified by its
//! `<collection>/<year>/<number>` path (e.g. `ukpga/2018/12`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry discovered in a feed-index page.
///
/// Stubs schedule content fetches; they carry no body text. Deduplication
/// across pages is by [`DocumentStub::key`], first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStub {
  /// Collection code from the document path (e.g. `ukpga`, `uksi`).
  pub collection: String,
  pub year:       i32,
  pub number:     u32,
  pub title:      String,
  /// Canonical URL of the document, as given by the feed entry.
  pub url:        String,
  /// Last-updated timestamp from the feed entry, when present.
  pub updated:    Option<DateTime<Utc>>,
}

impl DocumentStub {
  /// The dedup key: `(year, number)`.
  pub fn key(&self) -> (i32, u32) { (self.year, self.number) }

  /// Render the stable document identifier, e.g. `ukpga/2018/12`.
  pub fn doc_id(&self) -> String {
    format!("{}/{}/{}", self.collection, self.year, self.number)
  }
}

/// The persisted catalog record for a document.
///
/// This is what citation validation resolves against; `status` carries the
/// in-force state (e.g. `repealed`) when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
  /// Stable identifier, `<collection>/<year>/<number>`.
  pub doc_id:     String,
  pub collection: String,
  pub year:       i32,
  pub number:     u32,
  pub title:      String,
  pub status:     Option<String>,
  pub url:        Option<String>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentMeta {
  /// Build metadata from a feed stub, with no status yet.
  pub fn from_stub(stub: &DocumentStub) -> Self {
    Self {
      doc_id:     stub.doc_id(),
      collection: stub.collection.clone(),
      year:       stub.year,
      number:     stub.number,
      title:      stub.title.clone(),
      status:     None,
      url:        Some(stub.url.clone()),
      updated_at: stub.updated,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn doc_id_renders_path() {
    let stub = DocumentStub {
      collection: "ukpga".into(),
      year:       2018,
      number:     12,
      title:      "Data Protection Act 2018".into(),
      url:        "https://www.legislation.gov.uk/ukpga/2018/12".into(),
      updated:    None,
    };
    assert_eq!(stub.doc_id(), "ukpga/2018/12");
    assert_eq!(stub.key(), (2018, 12));
  }
}
