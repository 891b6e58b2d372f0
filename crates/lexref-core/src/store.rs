//! The `ProvisionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `lexref-store-sqlite`).
//! Higher layers (`lexref-cite`, `lexref-api`, `lexref-cli`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  document::DocumentMeta,
  provision::ProvisionRecord,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`ProvisionStore::search`].
///
/// `text` is the raw user query; the backend is responsible for running it
/// through [`crate::search::normalize_query`] and applying the fallback.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  pub text:   String,
  /// Restrict hits to one document.
  pub doc_id: Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// One full-text search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
  pub doc_id:         String,
  pub document_title: String,
  pub provision_ref:  String,
  pub section_label:  String,
  pub heading:        Option<String>,
  /// Extract of the matching body text with match markers.
  pub snippet:        String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Lexref provision store backend.
///
/// Documents and provisions are regenerated wholesale on re-ingestion;
/// [`ProvisionStore::replace_provisions`] is the idempotent write path.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProvisionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Insert or update a document's catalog record.
  fn upsert_document(
    &self,
    meta: &DocumentMeta,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a document by identifier. Returns `None` if not found.
  fn get_document<'a>(
    &'a self,
    doc_id: &'a str,
  ) -> impl Future<Output = Result<Option<DocumentMeta>, Self::Error>> + Send + 'a;

  /// Resolve a cited title (and optional year) to a document.
  ///
  /// Exact case-insensitive title match first; fuzzy containment match when
  /// that fails. Returns `None` when neither matches.
  fn find_document<'a>(
    &'a self,
    title: &'a str,
    year: Option<i32>,
  ) -> impl Future<Output = Result<Option<DocumentMeta>, Self::Error>> + Send + 'a;

  /// List all documents in the catalog.
  fn list_documents(
    &self,
  ) -> impl Future<Output = Result<Vec<DocumentMeta>, Self::Error>> + Send + '_;

  // ── Provisions ────────────────────────────────────────────────────────

  /// Replace all provisions for `doc_id` with `provisions`, atomically.
  ///
  /// A duplicate `provision_ref` within `provisions` is an error, not a
  /// silent overwrite.
  fn replace_provisions<'a>(
    &'a self,
    doc_id: &'a str,
    provisions: &'a [ProvisionRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Fetch one provision by reference. Returns `None` if not found.
  fn get_provision<'a>(
    &'a self,
    doc_id: &'a str,
    provision_ref: &'a str,
  ) -> impl Future<Output = Result<Option<ProvisionRecord>, Self::Error>> + Send + 'a;

  /// Does a provision with this exact section label exist under `doc_id`?
  fn provision_exists<'a>(
    &'a self,
    doc_id: &'a str,
    section_label: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Search ────────────────────────────────────────────────────────────

  /// Full-text search over provision bodies.
  fn search<'a>(
    &'a self,
    query: &'a SearchQuery,
  ) -> impl Future<Output = Result<Vec<SearchHit>, Self::Error>> + Send + 'a;
}
