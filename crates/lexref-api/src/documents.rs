//! Handlers for `/documents` routes.
//!
//! Document identifiers are `<collection>/<year>/<number>` paths, so the
//! routes take the three components as separate path segments.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use lexref_core::{
  document::DocumentMeta,
  provision::ProvisionRecord,
  store::ProvisionStore,
};

use crate::error::ApiError;

fn doc_id(collection: &str, year: i32, number: u32) -> String {
  format!("{collection}/{year}/{number}")
}

/// `GET /documents`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DocumentMeta>>, ApiError>
where
  S: ProvisionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let docs = store
    .list_documents()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(docs))
}

/// `GET /documents/{collection}/{year}/{number}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((collection, year, number)): Path<(String, i32, u32)>,
) -> Result<Json<DocumentMeta>, ApiError>
where
  S: ProvisionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = doc_id(&collection, year, number);
  let doc = store
    .get_document(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  doc
    .map(Json)
    .ok_or(ApiError::DocumentNotFound { doc_id: id })
}

/// `GET /documents/{collection}/{year}/{number}/provisions/{provision_ref}`
pub async fn get_provision<S>(
  State(store): State<Arc<S>>,
  Path((collection, year, number, provision_ref)): Path<(
    String,
    i32,
    u32,
    String,
  )>,
) -> Result<Json<ProvisionRecord>, ApiError>
where
  S: ProvisionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = doc_id(&collection, year, number);
  let provision = store
    .get_provision(&id, &provision_ref)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  provision.map(Json).ok_or(ApiError::ProvisionNotFound {
    doc_id: id,
    provision_ref,
  })
}
