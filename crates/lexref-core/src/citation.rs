//! Citation types shared between the grammar, formatter, and validator.
//!
//! A citation is a human-written string naming a statute and optionally a
//! provision within it. Parsing never panics and never guesses: anything
//! outside the documented grammar is an explicit [`ParsedCitation::Invalid`].

use serde::{Deserialize, Serialize};

/// The class of instrument a citation names, inferred from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
  Statute,
  StatutoryInstrument,
  Unknown,
}

/// The structured fields of a successfully parsed citation.
///
/// `section`/`subsection`/`paragraph` are strings, not integers: legal
/// numbering includes letters and composite forms (`12A`, `3ZA`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
  pub kind:       CitationKind,
  pub title:      Option<String>,
  pub year:       Option<i32>,
  pub section:    Option<String>,
  pub subsection: Option<String>,
  pub paragraph:  Option<String>,
}

impl Citation {
  /// The pinpoint portion: `3`, `1(1)`, `1(1)(a)`. `None` with no section.
  pub fn pinpoint(&self) -> Option<String> {
    let section = self.section.as_ref()?;
    let mut pin = section.clone();
    if let Some(sub) = &self.subsection {
      pin.push_str(&format!("({sub})"));
      if let Some(para) = &self.paragraph {
        pin.push_str(&format!("({para})"));
      }
    }
    Some(pin)
  }

  /// The section label a provision lookup uses: pinpoint without the
  /// paragraph level, since paragraphs are not separately addressable.
  pub fn section_label(&self) -> Option<String> {
    let section = self.section.as_ref()?;
    match &self.subsection {
      Some(sub) => Some(format!("{section}({sub})")),
      None => Some(section.clone()),
    }
  }
}

/// The outcome of running a citation string through the grammar.
///
/// A tagged union rather than a bag of optionals, so callers are forced to
/// handle the invalid case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ParsedCitation {
  Valid(Citation),
  Invalid { reason: String },
}

impl ParsedCitation {
  pub fn is_valid(&self) -> bool { matches!(self, ParsedCitation::Valid(_)) }

  pub fn as_valid(&self) -> Option<&Citation> {
    match self {
      ParsedCitation::Valid(c) => Some(c),
      ParsedCitation::Invalid { .. } => None,
    }
  }
}

/// Output convention for the citation formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiteStyle {
  /// `Section <pinpoint>, <title> <year>`
  Full,
  /// `s. <pinpoint> <title> <year>`
  Short,
  /// `s. <pinpoint>`
  Pinpoint,
}

/// The result of validating a parsed citation against the provision store.
///
/// Never persisted; always freshly computed against current store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
  pub citation:         ParsedCitation,
  pub document_exists:  bool,
  /// Only meaningful when a section was cited; stays `false` otherwise.
  pub provision_exists: bool,
  /// Title of the resolved document, when one matched.
  pub document_title:   Option<String>,
  /// In-force status of the resolved document, when known.
  pub status:           Option<String>,
  /// Human-readable warnings, in the order they were detected.
  pub warnings:         Vec<String>,
}
