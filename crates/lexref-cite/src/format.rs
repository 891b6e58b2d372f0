//! Deterministic citation formatter.

use lexref_core::citation::{Citation, CiteStyle, ParsedCitation};

use crate::error::{Error, Result};

/// Render a parsed citation in the requested output convention.
///
/// Formatting an invalid citation — or `Full`/`Short` without a title and
/// year — is an explicit error, never a best-guess string.
pub fn format(parsed: &ParsedCitation, style: CiteStyle) -> Result<String> {
  let citation = match parsed {
    ParsedCitation::Valid(c) => c,
    ParsedCitation::Invalid { reason } => {
      return Err(Error::InvalidCitation(reason.clone()));
    }
  };

  let pinpoint = citation
    .pinpoint()
    .ok_or(Error::MissingField("section"))?;

  match style {
    CiteStyle::Pinpoint => Ok(format!("s. {pinpoint}")),
    CiteStyle::Full => {
      let (title, year) = title_and_year(citation)?;
      Ok(format!("Section {pinpoint}, {title} {year}"))
    }
    CiteStyle::Short => {
      let (title, year) = title_and_year(citation)?;
      Ok(format!("s. {pinpoint} {title} {year}"))
    }
  }
}

fn title_and_year(citation: &Citation) -> Result<(&str, i32)> {
  let title = citation
    .title
    .as_deref()
    .ok_or(Error::MissingField("title"))?;
  let year = citation.year.ok_or(Error::MissingField("year"))?;
  Ok((title, year))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
