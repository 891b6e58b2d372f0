//! Provision types — the fundamental unit of the Lexref store.
//!
//! A provision is the smallest addressable unit of statutory text: a section,
//! or one numbered sub-unit of a section. Records are regenerated wholesale
//! on re-ingestion; the same markup always yields the same references and
//! bodies.

use serde::{Deserialize, Serialize};

/// One addressable unit of legislative text.
///
/// Invariants the producer (the tree walker) upholds:
/// - `body_text` is non-empty after whitespace normalization; nodes yielding
///   only whitespace are dropped, not emitted empty.
/// - `provision_ref` is unique within one document's output; collisions are
///   surfaced, never silently overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRecord {
  /// Short stable code identifying the provision, e.g. `s3` or `s1(2)`.
  pub provision_ref: String,
  /// Human-facing number, e.g. `3` or `1(2)`. Legal numbering includes
  /// letters and composite forms (`12A`), so this is a string.
  pub section_label: String,
  /// Heading text, when the source carries one. Absence is not an error.
  pub heading:       Option<String>,
  /// Normalized body text: whitespace runs collapsed, trimmed.
  pub body_text:     String,
}
