//! Markup tree walker: containment structure → flat provision records.
//!
//! Pre-order traversal of the containment node kinds. Each section-like node
//! with non-empty normalized own text emits one record; each numbered
//! sub-unit with its own text emits one more, labelled `parent(sub)`. The
//! parent's introductory text stays with the parent's record.

use std::{collections::HashSet, sync::LazyLock};

use lexref_core::provision::ProvisionRecord;
use regex::Regex;

use crate::tree::{Element, normalize_ws};

/// Identifier pattern: `<kind>-<n>` or `<kind>-<n>-<m>`.
static EID: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^([A-Za-z]+)-([0-9]+[A-Za-z]*)(?:-([0-9]+[A-Za-z]*))?$").unwrap()
});

/// The walker's output for one document.
#[derive(Debug, Default)]
pub struct WalkedDocument {
  /// Provision records in document order (parent before its sub-units).
  pub provisions:     Vec<ProvisionRecord>,
  /// References that appeared more than once. Collisions are emitted *and*
  /// reported — a conflict is a defect to surface, not to suppress.
  pub duplicate_refs: Vec<String>,
}

// ─── Node-kind tables ────────────────────────────────────────────────────────

/// Containment kinds: descended into, never emitted themselves.
fn is_container(name: &str) -> bool {
  matches!(
    name,
    "body" | "mainBody" | "book" | "title" | "part" | "chapter" | "hcontainer"
      | "schedule"
  )
}

/// Section-like kinds: emit one record each. `paragraph` is section-like
/// only when reached through a container (schedule paragraphs); paragraphs
/// nested in section text are never reached here.
fn is_section_like(name: &str) -> bool {
  matches!(
    name,
    "section" | "article" | "regulation" | "rule" | "paragraph"
  )
}

/// Numbered sub-units of a section-like node.
fn is_sub_unit(name: &str) -> bool {
  matches!(name, "subsection" | "subparagraph")
}

/// Text-bearing or label kinds: never descended into from container level.
fn is_text_kind(name: &str) -> bool {
  matches!(
    name,
    "num" | "heading" | "subheading" | "content" | "p" | "block" | "intro"
      | "wrapUp"
  ) || is_sub_unit(name)
}

/// Short node-kind code used as a reference prefix.
fn kind_code(name: &str) -> Option<&'static str> {
  match name {
    "section" => Some("s"),
    "article" => Some("art"),
    "regulation" => Some("reg"),
    "rule" => Some("r"),
    "paragraph" => Some("para"),
    "part" => Some("pt"),
    "chapter" => Some("ch"),
    "schedule" => Some("sch"),
    "hcontainer" => Some("hc"),
    _ => None,
  }
}

// ─── Walk ────────────────────────────────────────────────────────────────────

/// Walk the tree rooted at `body`, emitting provisions in document order.
pub fn walk_body(body: &Element) -> WalkedDocument {
  let mut walked = WalkedDocument::default();
  let mut seen: HashSet<String> = HashSet::new();
  recurse(body, &mut walked, &mut seen);
  walked
}

fn recurse(el: &Element, out: &mut WalkedDocument, seen: &mut HashSet<String>) {
  for child in el.child_elements() {
    if is_section_like(&child.name) {
      emit_section(child, out, seen);
    } else if is_text_kind(&child.name) {
      // Loose prose at container level is not an addressable provision.
    } else {
      // Containers and unknown wrappers alike: emit nothing, but their
      // descendants are still visited.
      recurse(child, out, seen);
    }
  }
}

/// Emit a section-like node and then its numbered sub-units.
fn emit_section(
  section: &Element,
  out: &mut WalkedDocument,
  seen: &mut HashSet<String>,
) {
  let num_label = section
    .find_child("num")
    .map(|n| clean_label(&n.text()))
    .filter(|l| !l.is_empty());

  let (provision_ref, section_label) =
    derive_reference(section, num_label.as_deref());

  let heading = section
    .find_child("heading")
    .map(|h| h.text())
    .filter(|h| !h.is_empty());

  let body_text = own_text(section);
  if !body_text.is_empty() {
    push_record(
      out,
      seen,
      ProvisionRecord {
        provision_ref: provision_ref.clone(),
        section_label: section_label.clone(),
        heading,
        body_text,
      },
    );
  }

  for sub in section.child_elements().filter(|c| is_sub_unit(&c.name)) {
    emit_sub_unit(sub, &provision_ref, &section_label, out, seen);
  }
}

/// Emit one numbered sub-unit, labelled `parent(sub)`. Blank sub-units
/// contribute no record.
fn emit_sub_unit(
  sub: &Element,
  parent_ref: &str,
  parent_label: &str,
  out: &mut WalkedDocument,
  seen: &mut HashSet<String>,
) {
  let sub_num = sub
    .find_child("num")
    .map(|n| clean_label(&n.text()))
    .filter(|l| !l.is_empty());

  // Identifier first (e.g. `section-1-2` → `s1(2)`), then composition from
  // the parent's reference.
  let (provision_ref, section_label) = match eid_reference(sub) {
    Some(pair) => pair,
    None => {
      let Some(n) = sub_num else {
        // A sub-unit with neither identifier nor number is not addressable;
        // skip it and keep walking its siblings.
        return;
      };
      (
        format!("{parent_ref}({n})"),
        format!("{parent_label}({n})"),
      )
    }
  };

  let heading = sub
    .find_child("heading")
    .map(|h| h.text())
    .filter(|h| !h.is_empty());

  let body_text = sub_unit_text(sub);
  if body_text.is_empty() {
    return;
  }

  push_record(
    out,
    seen,
    ProvisionRecord {
      provision_ref,
      section_label,
      heading,
      body_text,
    },
  );
}

fn push_record(
  out: &mut WalkedDocument,
  seen: &mut HashSet<String>,
  record: ProvisionRecord,
) {
  if !seen.insert(record.provision_ref.clone()) {
    tracing::warn!(
      provision_ref = %record.provision_ref,
      "duplicate provision reference"
    );
    out.duplicate_refs.push(record.provision_ref.clone());
  }
  out.provisions.push(record);
}

// ─── Text extraction ─────────────────────────────────────────────────────────

/// A section-like node's own text: direct text plus everything under its
/// non-sub-unit children (content, p, block, intro, wrapUp, …), normalized.
/// Sub-unit subtrees are excluded — they get their own records.
fn own_text(section: &Element) -> String {
  let mut out = String::new();
  for child in &section.children {
    match child {
      crate::tree::Node::Text(t) => {
        out.push(' ');
        out.push_str(t);
      }
      crate::tree::Node::Element(e) => {
        if is_sub_unit(&e.name) || e.name == "num" || e.name == "heading"
          || e.name == "subheading"
        {
          continue;
        }
        e.push_text(&mut out);
      }
    }
  }
  normalize_ws(&out)
}

/// A sub-unit's text is everything it contains except its own num/heading;
/// deeper numbered items ((a), (i), …) are part of the sub-unit's body.
fn sub_unit_text(sub: &Element) -> String {
  let mut out = String::new();
  for child in &sub.children {
    match child {
      crate::tree::Node::Text(t) => {
        out.push(' ');
        out.push_str(t);
      }
      crate::tree::Node::Element(e) => {
        if e.name == "num" || e.name == "heading" || e.name == "subheading" {
          continue;
        }
        e.push_text(&mut out);
      }
    }
  }
  normalize_ws(&out)
}

// ─── Reference derivation ────────────────────────────────────────────────────

/// Derive `(provision_ref, section_label)` for a section-like node.
///
/// Priority: identifier pattern, then cleaned `num` label with a kind-code
/// prefix, then the lowercase kind name as a placeholder. When identifier
/// and `num` disagree, the identifier wins.
fn derive_reference(
  el: &Element,
  num_label: Option<&str>,
) -> (String, String) {
  if let Some(pair) = eid_reference(el) {
    return pair;
  }

  if let Some(label) = num_label {
    let code = kind_code(&el.name).unwrap_or("");
    let reference = if code.is_empty() {
      format!("{}-{label}", el.name.to_lowercase())
    } else {
      format!("{code}{label}")
    };
    return (reference, label.to_string());
  }

  let placeholder = el.name.to_lowercase();
  (placeholder.clone(), placeholder)
}

/// `section-3` → (`s3`, `3`); `section-1-2` → (`s1(2)`, `1(2)`).
/// `None` when the identifier is absent, malformed, or of an unknown kind.
fn eid_reference(el: &Element) -> Option<(String, String)> {
  let eid = el.eid.as_deref()?;
  let caps = EID.captures(eid)?;
  let code = kind_code(&caps[1].to_lowercase())?;
  let n = &caps[2];
  match caps.get(3) {
    Some(m) => {
      let m = m.as_str();
      (format!("{code}{n}({m})"), format!("{n}({m})")).into()
    }
    None => (format!("{code}{n}"), n.to_string()).into(),
  }
}

/// Strip punctuation and whitespace from a `num` label: `1.` → `1`,
/// `(2)` → `2`.
fn clean_label(raw: &str) -> String {
  raw.chars().filter(|c| c.is_alphanumeric()).collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
