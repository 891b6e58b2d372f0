//! Atom-style feed page parser.
//!
//! Event-driven over `quick-xml`; entry order within a page is preserved.
//! Entries that lack a usable title or a `/<collection>/<year>/<number>`
//! identifier are not valid catalog members and are silently dropped.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use lexref_core::document::DocumentStub;
use quick_xml::events::Event;
use regex::Regex;

use crate::{Error, Result};

/// Document path pattern inside an entry id or link.
static DOC_PATH: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"/([a-z]+)/(\d{4})/(\d+)").unwrap());

/// One parsed page of the feed index.
#[derive(Debug, Default)]
pub struct FeedPage {
  /// Valid entries, in page order.
  pub entries:       Vec<DocumentStub>,
  /// True only when a next-page link is present *and* the page had entries;
  /// an empty page is authoritative end-of-feed regardless of stale links.
  pub has_next_page: bool,
  /// Total-count hint from the feed, when the element is present.
  pub total_count:   Option<u64>,
}

#[derive(Default)]
struct EntryAccum {
  title:   Option<String>,
  id:      Option<String>,
  link:    Option<String>,
  updated: Option<DateTime<Utc>>,
}

impl EntryAccum {
  /// Promote to a stub, or `None` when title or identifier are unusable.
  ///
  /// The link is preferred for the URL, but either the link or the id may
  /// carry the document path; the first that matches wins.
  fn flush(self) -> Option<DocumentStub> {
    let title = self
      .title
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())?;
    for url in [self.link, self.id].into_iter().flatten() {
      let Some(caps) = DOC_PATH.captures(&url) else {
        continue;
      };
      let (Ok(year), Ok(number)) = (caps[2].parse(), caps[3].parse()) else {
        continue;
      };
      let collection = caps[1].to_string();
      return Some(DocumentStub {
        collection,
        year,
        number,
        title,
        url,
        updated: self.updated,
      });
    }
    None
  }
}

/// Which text element inside an entry we are currently reading.
enum TextField {
  None,
  Title,
  Id,
  Updated,
  TotalCount,
}

/// Parse one feed page.
pub fn parse_page(xml: &str) -> Result<FeedPage> {
  let mut reader = quick_xml::Reader::from_str(xml);
  reader.config_mut().trim_text(true);

  let mut page = FeedPage::default();
  let mut entry: Option<EntryAccum> = None;
  let mut field = TextField::None;
  let mut next_link = false;

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
        let name_buf = e.name();
        let local = local_name(name_buf.as_ref());
        match local {
          b"entry" => entry = Some(EntryAccum::default()),
          b"title" if entry.is_some() => field = TextField::Title,
          b"id" if entry.is_some() => field = TextField::Id,
          b"updated" if entry.is_some() => field = TextField::Updated,
          b"totalResults" if entry.is_none() => field = TextField::TotalCount,
          b"link" => {
            let rel = attr(e, b"rel");
            let href = attr(e, b"href");
            match entry.as_mut() {
              Some(acc) => {
                // Prefer the alternate/self link over the id for the URL.
                if acc.link.is_none()
                  && matches!(rel.as_deref(), None | Some("alternate") | Some("self"))
                {
                  acc.link = href;
                }
              }
              None => {
                if rel.as_deref() == Some("next") && href.is_some() {
                  next_link = true;
                }
              }
            }
          }
          _ => {}
        }
      }
      Ok(Event::Text(ref e)) => {
        let text = e.unescape().unwrap_or_default().into_owned();
        match (&field, entry.as_mut()) {
          (TextField::Title, Some(acc)) => acc.title = Some(text),
          (TextField::Id, Some(acc)) => acc.id = Some(text),
          (TextField::Updated, Some(acc)) => {
            acc.updated = DateTime::parse_from_rfc3339(text.trim())
              .ok()
              .map(|dt| dt.with_timezone(&Utc));
          }
          (TextField::TotalCount, None) => {
            page.total_count = text.trim().parse().ok();
          }
          _ => {}
        }
        field = TextField::None;
      }
      Ok(Event::End(ref e)) => {
        let name_buf = e.name();
        if local_name(name_buf.as_ref()) == b"entry"
          && let Some(acc) = entry.take()
          && let Some(stub) = acc.flush()
        {
          page.entries.push(stub);
        }
        field = TextField::None;
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
  }

  // Zero entries is authoritative: ignore any stale next link.
  page.has_next_page = next_link && !page.entries.is_empty();
  Ok(page)
}

fn local_name(name: &[u8]) -> &[u8] {
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

fn attr(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
  for a in e.attributes().flatten() {
    if local_name(a.key.as_ref()) == key {
      return a.unescape_value().ok().map(|v| v.into_owned());
    }
  }
  None
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn feed(body: &str) -> String {
    format!(
      r#"<?xml version="1.0" encoding="UTF-8"?>
      <feed xmlns="http://www.w3.org/2005/Atom"
            xmlns:openSearch="http://a9.com/-/spec/opensearch/1.1/">
        {body}
      </feed>"#
    )
  }

  const ENTRY_DPA: &str = r#"<entry>
    <id>http://www.legislation.gov.uk/id/ukpga/2018/12</id>
    <title>Data Protection Act 2018</title>
    <updated>2020-01-06T09:00:00Z</updated>
    <link rel="self" href="http://www.legislation.gov.uk/ukpga/2018/12"/>
  </entry>"#;

  #[test]
  fn entry_becomes_stub() {
    let page = parse_page(&feed(ENTRY_DPA)).unwrap();
    assert_eq!(page.entries.len(), 1);
    let stub = &page.entries[0];
    assert_eq!(stub.collection, "ukpga");
    assert_eq!(stub.year, 2018);
    assert_eq!(stub.number, 12);
    assert_eq!(stub.title, "Data Protection Act 2018");
    assert_eq!(stub.url, "http://www.legislation.gov.uk/ukpga/2018/12");
    assert!(stub.updated.is_some());
    assert!(!page.has_next_page);
  }

  #[test]
  fn entry_without_title_dropped() {
    let body = r#"<entry>
      <id>http://www.legislation.gov.uk/id/ukpga/2018/12</id>
      <title>   </title>
    </entry>"#;
    let page = parse_page(&feed(body)).unwrap();
    assert!(page.entries.is_empty());
  }

  #[test]
  fn entry_with_unrecognized_path_dropped() {
    let body = r#"<entry>
      <id>http://example.org/not/a/document</id>
      <title>Something Else</title>
    </entry>"#;
    let page = parse_page(&feed(body)).unwrap();
    assert!(page.entries.is_empty());
  }

  #[test]
  fn id_used_when_no_link() {
    let body = r#"<entry>
      <id>http://www.legislation.gov.uk/id/uksi/2019/419</id>
      <title>Some Regulations 2019</title>
    </entry>"#;
    let page = parse_page(&feed(body)).unwrap();
    assert_eq!(page.entries[0].collection, "uksi");
    assert_eq!(page.entries[0].number, 419);
  }

  #[test]
  fn id_pattern_used_when_link_lacks_doc_path() {
    // The link resolves nowhere useful; the id still carries the path.
    let body = r#"<entry>
      <id>http://www.legislation.gov.uk/id/ukpga/2018/12</id>
      <title>Data Protection Act 2018</title>
      <link rel="self" href="http://www.legislation.gov.uk/about"/>
    </entry>"#;
    let page = parse_page(&feed(body)).unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].collection, "ukpga");
    assert_eq!(page.entries[0].number, 12);
    assert_eq!(
      page.entries[0].url,
      "http://www.legislation.gov.uk/id/ukpga/2018/12"
    );
  }

  #[test]
  fn next_link_sets_has_next_page() {
    let body = format!(
      r#"<link rel="next" href="http://example.org/feed?page=2"/>{ENTRY_DPA}"#
    );
    let page = parse_page(&feed(&body)).unwrap();
    assert!(page.has_next_page);
  }

  #[test]
  fn zero_entries_overrides_stale_next_link() {
    let body = r#"<link rel="next" href="http://example.org/feed?page=99"/>"#;
    let page = parse_page(&feed(body)).unwrap();
    assert!(page.entries.is_empty());
    assert!(!page.has_next_page);
  }

  #[test]
  fn total_count_hint_read() {
    let body =
      format!("<openSearch:totalResults>347</openSearch:totalResults>{ENTRY_DPA}");
    let page = parse_page(&feed(&body)).unwrap();
    assert_eq!(page.total_count, Some(347));
  }

  #[test]
  fn entry_order_preserved() {
    let body = r#"
      <entry><id>/ukpga/2018/12</id><title>B Act 2018</title></entry>
      <entry><id>/ukpga/2018/11</id><title>A Act 2018</title></entry>
    "#;
    let page = parse_page(&feed(body)).unwrap();
    let numbers: Vec<u32> = page.entries.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![12, 11]);
  }
}
