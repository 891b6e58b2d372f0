//! Owned element tree over `quick-xml`'s event reader.
//!
//! The markup tree has no cycles, so it is modelled as plain owned nodes and
//! walked with pure recursive functions — no shared mutation, trivially
//! parallelizable per document.

use quick_xml::events::Event;

use crate::{Error, Result};

/// A node in the parsed markup tree.
#[derive(Debug, Clone)]
pub enum Node {
  Element(Element),
  Text(String),
}

/// One markup element: local name, optional stable identifier, children in
/// document order.
#[derive(Debug, Clone)]
pub struct Element {
  /// Local element name with any namespace prefix stripped.
  pub name:     String,
  /// The `eId` (or legacy `id`) attribute, when present.
  pub eid:      Option<String>,
  pub children: Vec<Node>,
}

impl Element {
  fn new(name: String, eid: Option<String>) -> Self {
    Self {
      name,
      eid,
      children: Vec::new(),
    }
  }

  /// Child elements in document order.
  pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
    self.children.iter().filter_map(|n| match n {
      Node::Element(e) => Some(e),
      Node::Text(_) => None,
    })
  }

  /// First child element with the given local name.
  pub fn find_child(&self, name: &str) -> Option<&Element> {
    self.child_elements().find(|e| e.name == name)
  }

  /// All descendant text, whitespace-normalized (runs collapsed, trimmed).
  pub fn text(&self) -> String {
    let mut out = String::new();
    self.push_text(&mut out);
    normalize_ws(&out)
  }

  /// Append all descendant text to `out`, space-separated.
  pub fn push_text(&self, out: &mut String) {
    for child in &self.children {
      match child {
        Node::Text(t) => {
          out.push(' ');
          out.push_str(t);
        }
        Node::Element(e) => e.push_text(out),
      }
    }
  }
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Depth-first search for the first descendant element named `name`.
pub fn find_descendant<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
  if el.name == name {
    return Some(el);
  }
  el.child_elements().find_map(|c| find_descendant(c, name))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse `xml` into an owned element tree rooted at the document element.
///
/// Comments, processing instructions, and the XML declaration are dropped.
/// Ill-formed XML (mismatched or unclosed tags) is an error: a document that
/// cannot be parsed at all is skipped by batch callers, not repaired.
pub fn parse(xml: &str) -> Result<Element> {
  let mut reader = quick_xml::Reader::from_str(xml);

  let mut stack: Vec<Element> = Vec::new();
  let mut root: Option<Element> = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e)) => {
        let name = local_name_str(e.name().as_ref());
        let eid = id_attr(e);
        stack.push(Element::new(name, eid));
      }
      Ok(Event::Empty(ref e)) => {
        let name = local_name_str(e.name().as_ref());
        let eid = id_attr(e);
        attach(&mut stack, &mut root, Node::Element(Element::new(name, eid)))?;
      }
      Ok(Event::End(_)) => {
        let done = stack
          .pop()
          .ok_or_else(|| Error::Xml("unmatched end tag".into()))?;
        attach(&mut stack, &mut root, Node::Element(done))?;
      }
      Ok(Event::Text(ref e)) => {
        let text = e.unescape().unwrap_or_default().into_owned();
        if let Some(top) = stack.last_mut() {
          top.children.push(Node::Text(text));
        }
      }
      Ok(Event::CData(ref e)) => {
        let text = String::from_utf8_lossy(e).into_owned();
        if let Some(top) = stack.last_mut() {
          top.children.push(Node::Text(text));
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
  }

  if !stack.is_empty() {
    return Err(Error::Xml("unclosed element at end of input".into()));
  }
  root.ok_or(Error::NoRoot)
}

/// Attach a completed node to the element under construction, or record it
/// as the document root at top level. Trailing top-level nodes after the
/// root are ignored.
fn attach(
  stack: &mut [Element],
  root: &mut Option<Element>,
  node: Node,
) -> Result<()> {
  if let Some(top) = stack.last_mut() {
    top.children.push(node);
  } else if root.is_none() {
    if let Node::Element(e) = node {
      *root = Some(e);
    }
  }
  Ok(())
}

/// Strip a `prefix:` namespace qualifier if present.
fn local_name_str(name: &[u8]) -> String {
  let local = if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  };
  String::from_utf8_lossy(local).into_owned()
}

/// Read the `eId` attribute, falling back to `id`.
fn id_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
  let mut fallback = None;
  for attr in e.attributes().flatten() {
    let key = local_name_str(attr.key.as_ref());
    let Ok(value) = attr.unescape_value() else {
      continue;
    };
    match key.as_str() {
      "eId" => return Some(value.into_owned()),
      "id" => fallback = Some(value.into_owned()),
      _ => {}
    }
  }
  fallback
}
