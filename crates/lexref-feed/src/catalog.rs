//! Cross-page catalog deduplication.

use std::collections::HashSet;

use lexref_core::document::DocumentStub;

/// A deduplicated catalog of document stubs accumulated across feed pages.
///
/// Keyed by `(year, number)`; the first-seen entry wins and later entries
/// for an existing key are discarded. Insertion order is preserved.
#[derive(Debug, Default)]
pub struct Catalog {
  seen:  HashSet<(i32, u32)>,
  stubs: Vec<DocumentStub>,
}

impl Catalog {
  pub fn new() -> Self { Self::default() }

  /// Insert one stub. Returns `false` when the key was already present and
  /// the stub was discarded.
  pub fn insert(&mut self, stub: DocumentStub) -> bool {
    if !self.seen.insert(stub.key()) {
      return false;
    }
    self.stubs.push(stub);
    true
  }

  /// Insert every entry of a page, in page order.
  pub fn extend_from_page(&mut self, entries: Vec<DocumentStub>) {
    for stub in entries {
      self.insert(stub);
    }
  }

  pub fn len(&self) -> usize { self.stubs.len() }

  pub fn is_empty(&self) -> bool { self.stubs.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &DocumentStub> {
    self.stubs.iter()
  }

  /// Consume the catalog, yielding stubs in first-seen order.
  pub fn into_stubs(self) -> Vec<DocumentStub> { self.stubs }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stub(year: i32, number: u32, title: &str) -> DocumentStub {
    DocumentStub {
      collection: "ukpga".into(),
      year,
      number,
      title: title.into(),
      url: format!("http://www.legislation.gov.uk/ukpga/{year}/{number}"),
      updated: None,
    }
  }

  #[test]
  fn first_seen_wins() {
    let mut catalog = Catalog::new();
    assert!(catalog.insert(stub(2018, 12, "first title")));
    assert!(!catalog.insert(stub(2018, 12, "second title")));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.iter().next().unwrap().title, "first title");
  }

  #[test]
  fn insertion_order_preserved() {
    let mut catalog = Catalog::new();
    catalog.extend_from_page(vec![
      stub(2018, 12, "a"),
      stub(2017, 30, "b"),
      stub(2018, 12, "dup"),
      stub(2019, 1, "c"),
    ]);
    let numbers: Vec<u32> = catalog.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![12, 30, 1]);
  }
}
