//! Error types for `lexref-cite`.
//!
//! Bad citation *input* is never an error here — the parser returns
//! [`lexref_core::citation::ParsedCitation::Invalid`] for that. These errors
//! cover caller misuse (formatting an invalid citation) and broken store
//! integrations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot format an invalid citation: {0}")]
  InvalidCitation(String),

  #[error("citation is missing a required field for this style: {0}")]
  MissingField(&'static str),

  #[error("provision store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
