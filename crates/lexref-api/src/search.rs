//! Handler for `GET /search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use lexref_core::store::{ProvisionStore, SearchHit, SearchQuery};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Free-text query; normalized into an FTS expression by the store.
  pub q:      String,
  /// Restrict hits to one document, `<collection>/<year>/<number>`.
  pub doc_id: Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /search?q=...[&doc_id=...][&limit=...][&offset=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError>
where
  S: ProvisionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if params.q.trim().is_empty() {
    return Err(ApiError::BadRequest("query must not be empty".into()));
  }

  let query = SearchQuery {
    text:   params.q,
    doc_id: params.doc_id,
    limit:  params.limit,
    offset: params.offset,
  };

  let hits = store
    .search(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(hits))
}
