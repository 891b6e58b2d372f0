//! Handlers for `/cite` routes: parse, format, validate.
//!
//! Parsing never fails at the HTTP level — an unparseable string comes back
//! as a structured `invalid` result. Formatting an invalid or incomplete
//! citation is a 400.

use std::sync::Arc;

use axum::{Json, extract::State};
use lexref_core::{
  citation::{CiteStyle, ParsedCitation, ValidationResult},
  store::ProvisionStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
  pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
  pub text:  String,
  pub style: CiteStyle,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
  pub formatted: String,
}

/// `POST /cite/parse`
pub async fn parse(
  Json(req): Json<ParseRequest>,
) -> Json<ParsedCitation> {
  Json(lexref_cite::parse(&req.text))
}

/// `POST /cite/format`
pub async fn format(
  Json(req): Json<FormatRequest>,
) -> Result<Json<FormatResponse>, ApiError> {
  let parsed = lexref_cite::parse(&req.text);
  let formatted = lexref_cite::format(&parsed, req.style)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok(Json(FormatResponse { formatted }))
}

/// `POST /cite/validate`
pub async fn validate<S>(
  State(store): State<Arc<S>>,
  Json(req): Json<ParseRequest>,
) -> Result<Json<ValidationResult>, ApiError>
where
  S: ProvisionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let parsed = lexref_cite::parse(&req.text);
  let result = lexref_cite::validate(&parsed, &*store)
    .await
    .map_err(|e| match e {
      lexref_cite::Error::Store(inner) => ApiError::Store(inner),
      other => ApiError::BadRequest(other.to_string()),
    })?;
  Ok(Json(result))
}
