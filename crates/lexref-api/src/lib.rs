//! JSON REST API for Lexref.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lexref_core::store::ProvisionStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lexref_api::api_router(store.clone()))
//! ```

pub mod cite;
pub mod documents;
pub mod error;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lexref_core::store::ProvisionStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ProvisionStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Documents
    .route("/documents", get(documents::list::<S>))
    .route(
      "/documents/{collection}/{year}/{number}",
      get(documents::get_one::<S>),
    )
    .route(
      "/documents/{collection}/{year}/{number}/provisions/{provision_ref}",
      get(documents::get_provision::<S>),
    )
    // Citations
    .route("/cite/parse", post(cite::parse))
    .route("/cite/format", post(cite::format))
    .route("/cite/validate", post(cite::validate::<S>))
    // Search
    .route("/search", get(search::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use lexref_core::{document::DocumentMeta, provision::ProvisionRecord};
  use lexref_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn seeded_router() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .upsert_document(&DocumentMeta {
        doc_id:     "ukpga/2018/12".into(),
        collection: "ukpga".into(),
        year:       2018,
        number:     12,
        title:      "Data Protection Act 2018".into(),
        status:     None,
        url:        None,
        updated_at: None,
      })
      .await
      .unwrap();
    store
      .replace_provisions(
        "ukpga/2018/12",
        &[ProvisionRecord {
          provision_ref: "s3".into(),
          section_label: "3".into(),
          heading:       Some("Terms".into()),
          body_text:     "Personal data means any information relating to \
                          an identified or identifiable living individual."
            .into(),
        }],
      )
      .await
      .unwrap();
    api_router(Arc::new(store))
  }

  async fn get_json(
    router: Router<()>,
    uri: &str,
  ) -> (StatusCode, serde_json::Value) {
    let resp = router
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  async fn post_json(
    router: Router<()>,
    uri: &str,
    body: serde_json::Value,
  ) -> (StatusCode, serde_json::Value) {
    let resp = router
      .oneshot(
        Request::builder()
          .method("POST")
          .uri(uri)
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(body.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn list_and_get_documents() {
    let router = seeded_router().await;
    let (status, body) = get_json(router.clone(), "/documents").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) =
      get_json(router, "/documents/ukpga/2018/12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Data Protection Act 2018");
  }

  #[tokio::test]
  async fn missing_document_is_404() {
    let router = seeded_router().await;
    let (status, body) = get_json(router, "/documents/ukpga/1999/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ukpga/1999/1"));
  }

  #[tokio::test]
  async fn missing_provision_names_document_and_reference() {
    let router = seeded_router().await;
    let (status, body) =
      get_json(router, "/documents/ukpga/2018/12/provisions/s99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("provision"));
    assert!(message.contains("s99"));
    assert!(message.contains("ukpga/2018/12"));
  }

  #[tokio::test]
  async fn get_provision_by_reference() {
    let router = seeded_router().await;
    let (status, body) =
      get_json(router, "/documents/ukpga/2018/12/provisions/s3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section_label"], "3");
  }

  #[tokio::test]
  async fn search_returns_hits() {
    let router = seeded_router().await;
    let (status, body) = get_json(router, "/search?q=personal%20data").await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["provision_ref"], "s3");
  }

  #[tokio::test]
  async fn empty_search_query_is_400() {
    let router = seeded_router().await;
    let (status, _) = get_json(router, "/search?q=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn cite_parse_returns_structured_citation() {
    let router = seeded_router().await;
    let (status, body) = post_json(
      router,
      "/cite/parse",
      serde_json::json!({ "text": "Section 3, Data Protection Act 2018" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "valid");
    assert_eq!(body["section"], "3");
  }

  #[tokio::test]
  async fn cite_format_invalid_is_400() {
    let router = seeded_router().await;
    let (status, _) = post_json(
      router,
      "/cite/format",
      serde_json::json!({ "text": "gibberish", "style": "full" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn cite_validate_resolves_against_store() {
    let router = seeded_router().await;
    let (status, body) = post_json(
      router,
      "/cite/validate",
      serde_json::json!({ "text": "Section 3, Data Protection Act 2018" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_exists"], true);
    assert_eq!(body["provision_exists"], true);
  }
}
