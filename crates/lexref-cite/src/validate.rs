//! Citation validation against the provision store.
//!
//! Missing referents are structured results with warnings, not errors; only
//! a failing store (a broken integration) propagates as `Err`.

use lexref_core::{
  citation::{ParsedCitation, ValidationResult},
  store::ProvisionStore,
};

use crate::error::{Error, Result};

/// Check a parsed citation against the current store state.
///
/// The result is freshly computed per call and never persisted.
/// Title resolution is exact-first with a fuzzy containment fallback, both
/// delegated to [`ProvisionStore::find_document`].
pub async fn validate<S: ProvisionStore>(
  parsed: &ParsedCitation,
  store: &S,
) -> Result<ValidationResult> {
  let mut result = ValidationResult {
    citation:         parsed.clone(),
    document_exists:  false,
    provision_exists: false,
    document_title:   None,
    status:           None,
    warnings:         Vec::new(),
  };

  let citation = match parsed {
    ParsedCitation::Valid(c) => c,
    ParsedCitation::Invalid { reason } => {
      result
        .warnings
        .push(format!("cannot validate an invalid citation: {reason}"));
      return Ok(result);
    }
  };

  let Some(title) = citation.title.as_deref() else {
    result
      .warnings
      .push("citation names no document title to resolve".to_string());
    return Ok(result);
  };

  let document = store
    .find_document(title, citation.year)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let Some(document) = document else {
    let cited = match citation.year {
      Some(year) => format!("{title} {year}"),
      None => title.to_string(),
    };
    result.warnings.push(format!("no document found for \"{cited}\""));
    return Ok(result);
  };

  result.document_exists = true;
  result.document_title = Some(document.title.clone());
  result.status = document.status.clone();

  if document.status.as_deref() == Some("repealed") {
    result
      .warnings
      .push(format!("{} is repealed", document.title));
  }

  if let Some(label) = citation.section_label() {
    let exists = store
      .provision_exists(&document.doc_id, &label)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    result.provision_exists = exists;
    if !exists {
      result.warnings.push(format!(
        "section {label} not found in {}",
        document.title
      ));
    }
  }

  Ok(result)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
