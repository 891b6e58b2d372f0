//! Error types for `lexref-core`.

use thiserror::Error;

/// Domain errors raised by store backends on invariant violations.
#[derive(Debug, Error)]
pub enum Error {
  /// A provision batch carried the same reference twice. Collisions are a
  /// defect in the input to surface, never a silent overwrite.
  #[error("duplicate provision reference in {doc_id}: {provision_ref}")]
  DuplicateProvisionRef {
    doc_id:        String,
    provision_ref: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
