//! Error type shared by the Lexref API handlers.
//!
//! Missing documents and provisions carry their identifiers so responses
//! name exactly what failed to resolve.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("document not found: {doc_id}")]
  DocumentNotFound { doc_id: String },

  #[error("provision not found: {provision_ref} in {doc_id}")]
  ProvisionNotFound {
    doc_id:        String,
    provision_ref: String,
  },

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::DocumentNotFound { .. }
      | ApiError::ProvisionNotFound { .. } => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = Json(json!({ "error": self.to_string() }));
    (self.status(), body).into_response()
  }
}
