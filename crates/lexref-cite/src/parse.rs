//! Citation string parser.
//!
//! A two-stage grammar:
//!   1. whole-citation surface forms, tried in a fixed priority order,
//!      first match wins;
//!   2. a finer pattern that splits a matched section token into
//!      section/subsection/paragraph.
//!
//! Stage 2 failing is *not* an error: the token is kept verbatim as the
//! section. Only stage 1 failing makes the citation invalid.

use std::sync::LazyLock;

use lexref_core::citation::{Citation, CitationKind, ParsedCitation};
use regex::Regex;

/// A section token: `3`, `12A`, `1(1)`, `1(1)(a)`.
const TOKEN: &str = r"[0-9]+[A-Za-z]*(?:\([0-9A-Za-z]+\))*";

/// Title-first form: `Section 3, Data Protection Act 2018`.
static TITLE_FIRST: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"(?i)^section\s+({TOKEN})\s*,\s*(.+?)\s+(\d{{4}})$"))
    .unwrap()
});

/// Abbreviation-first form: `s. 1(1)(a) Data Protection Act 2018`.
static ABBREV_FIRST: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"^s\.?\s*({TOKEN})\s+(.+?)\s+(\d{{4}})$")).unwrap()
});

/// Bare pinpoint: `s. 1(1)(a)` — what the pinpoint formatter emits.
static BARE_PINPOINT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(&format!(r"^s\.?\s*({TOKEN})$")).unwrap());

/// Finer decomposition of a section token.
static FINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^([0-9]+[A-Za-z]*)\(([0-9A-Za-z]+)\)(?:\(([0-9A-Za-z]+)\))?$")
    .unwrap()
});

/// Parse a free-text citation string.
///
/// Never panics and never guesses: input matching no surface form yields
/// [`ParsedCitation::Invalid`] with a reason naming the original input.
pub fn parse(input: &str) -> ParsedCitation {
  let trimmed = input.trim();

  if let Some(caps) = TITLE_FIRST.captures(trimmed) {
    return build(&caps[1], Some(&caps[2]), Some(&caps[3]));
  }
  if let Some(caps) = ABBREV_FIRST.captures(trimmed) {
    return build(&caps[1], Some(&caps[2]), Some(&caps[3]));
  }
  if let Some(caps) = BARE_PINPOINT.captures(trimmed) {
    return build(&caps[1], None, None);
  }

  ParsedCitation::Invalid {
    reason: format!("unrecognized citation: {input}"),
  }
}

fn build(token: &str, title: Option<&str>, year: Option<&str>) -> ParsedCitation {
  let (section, subsection, paragraph) = split_token(token);
  let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
  let kind = title.as_deref().map_or(CitationKind::Unknown, infer_kind);

  ParsedCitation::Valid(Citation {
    kind,
    title,
    // The surface forms constrain the year to four digits.
    year: year.and_then(|y| y.parse().ok()),
    section: Some(section),
    subsection,
    paragraph,
  })
}

/// Split `1(1)(a)` into section/subsection/paragraph. A token the finer
/// pattern cannot decompose is kept verbatim as the section — a valid
/// outcome, not an error.
fn split_token(token: &str) -> (String, Option<String>, Option<String>) {
  match FINE.captures(token) {
    Some(caps) => (
      caps[1].to_string(),
      Some(caps[2].to_string()),
      caps.get(3).map(|m| m.as_str().to_string()),
    ),
    None => (token.to_string(), None, None),
  }
}

/// Infer the instrument class from the title wording.
fn infer_kind(title: &str) -> CitationKind {
  let mut words = title.split_whitespace();
  if words.clone().any(|w| w == "Act") {
    CitationKind::Statute
  } else if words.any(|w| matches!(w, "Regulations" | "Order" | "Rules")) {
    CitationKind::StatutoryInstrument
  } else {
    CitationKind::Unknown
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
