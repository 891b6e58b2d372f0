//! [`SqliteStore`] — the SQLite implementation of [`ProvisionStore`].

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use lexref_core::{
  document::DocumentMeta,
  provision::ProvisionRecord,
  search::normalize_query,
  store::{ProvisionStore, SearchHit, SearchQuery},
};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

// ─── Row decoding ────────────────────────────────────────────────────────────

const DOCUMENT_COLUMNS: &str =
  "doc_id, collection, year, number, title, status, url, updated_at";

/// A `documents` row before timestamp decoding.
struct RawDocument {
  doc_id:     String,
  collection: String,
  year:       i64,
  number:     i64,
  title:      String,
  status:     Option<String>,
  url:        Option<String>,
  updated_at: Option<String>,
}

impl RawDocument {
  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      doc_id:     row.get(0)?,
      collection: row.get(1)?,
      year:       row.get(2)?,
      number:     row.get(3)?,
      title:      row.get(4)?,
      status:     row.get(5)?,
      url:        row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  fn decode(self) -> Result<DocumentMeta> {
    let updated_at = self
      .updated_at
      .map(|s| decode_dt(&s))
      .transpose()?;
    Ok(DocumentMeta {
      doc_id: self.doc_id,
      collection: self.collection,
      year: self.year as i32,
      number: self.number as u32,
      title: self.title,
      status: self.status,
      url: self.url,
      updated_at,
    })
  }
}

fn encode_dt(dt: &DateTime<Utc>) -> String { dt.to_rfc3339() }

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s}: {e}")))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lexref provision store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run one FTS expression and decode hits in rank order.
  async fn run_fts(
    &self,
    expression: String,
    doc_id: Option<String>,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<SearchHit>> {
    let hits = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT provisions_fts.doc_id,
                  d.title,
                  provisions_fts.provision_ref,
                  p.section_label,
                  p.heading,
                  snippet(provisions_fts, 0, '[', ']', '…', 12)
           FROM provisions_fts
           JOIN documents d ON d.doc_id = provisions_fts.doc_id
           JOIN provisions p ON p.doc_id = provisions_fts.doc_id
                            AND p.provision_ref = provisions_fts.provision_ref
           WHERE provisions_fts MATCH ?1
             AND (?2 IS NULL OR provisions_fts.doc_id = ?2)
           ORDER BY rank
           LIMIT ?3 OFFSET ?4",
        )?;
        let rows = stmt.query_map(
          rusqlite::params![expression, doc_id, limit, offset],
          |row| {
            Ok(SearchHit {
              doc_id:         row.get(0)?,
              document_title: row.get(1)?,
              provision_ref:  row.get(2)?,
              section_label:  row.get(3)?,
              heading:        row.get(4)?,
              snippet:        row.get(5)?,
            })
          },
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await?;
    Ok(hits)
  }
}

// ─── ProvisionStore impl ─────────────────────────────────────────────────────

impl ProvisionStore for SqliteStore {
  type Error = Error;

  // ── Documents ─────────────────────────────────────────────────────────────

  fn upsert_document(
    &self,
    meta: &DocumentMeta,
  ) -> impl Future<Output = Result<()>> + Send + '_ {
    let meta = meta.clone();
    let updated_at = meta.updated_at.as_ref().map(encode_dt);
    async move {
      self
        .conn
        .call(move |conn| {
        conn.execute(
          "INSERT INTO documents
             (doc_id, collection, year, number, title, status, url, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(doc_id) DO UPDATE SET
             title      = excluded.title,
             status     = excluded.status,
             url        = excluded.url,
             updated_at = excluded.updated_at",
          rusqlite::params![
            meta.doc_id,
            meta.collection,
            meta.year,
            meta.number,
            meta.title,
            meta.status,
            meta.url,
            updated_at,
          ],
        )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn get_document(&self, doc_id: &str) -> Result<Option<DocumentMeta>> {
    let doc_id = doc_id.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE doc_id = ?1"
              ),
              rusqlite::params![doc_id],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDocument::decode).transpose()
  }

  async fn find_document(
    &self,
    title: &str,
    year: Option<i32>,
  ) -> Result<Option<DocumentMeta>> {
    let title = title.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        // Exact case-insensitive match first.
        let exact = conn
          .query_row(
            &format!(
              "SELECT {DOCUMENT_COLUMNS} FROM documents
               WHERE lower(title) = lower(?1)
                 AND (?2 IS NULL OR year = ?2)"
            ),
            rusqlite::params![title, year],
            RawDocument::from_row,
          )
          .optional()?;
        if exact.is_some() {
          return Ok(exact);
        }

        // Fuzzy containment, either direction.
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents
                 WHERE (instr(lower(title), lower(?1)) > 0
                        OR instr(lower(?1), lower(title)) > 0)
                   AND (?2 IS NULL OR year = ?2)
                 ORDER BY year DESC, number ASC
                 LIMIT 1"
              ),
              rusqlite::params![title, year],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDocument::decode).transpose()
  }

  async fn list_documents(&self) -> Result<Vec<DocumentMeta>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents
           ORDER BY year, number"
        ))?;
        let rows = stmt.query_map([], RawDocument::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await?;
    raws.into_iter().map(RawDocument::decode).collect()
  }

  // ── Provisions ────────────────────────────────────────────────────────────

  async fn replace_provisions(
    &self,
    doc_id: &str,
    provisions: &[ProvisionRecord],
  ) -> Result<()> {
    let mut seen = HashSet::new();
    for p in provisions {
      if !seen.insert(p.provision_ref.as_str()) {
        return Err(
          lexref_core::Error::DuplicateProvisionRef {
            doc_id:        doc_id.to_string(),
            provision_ref: p.provision_ref.clone(),
          }
          .into(),
        );
      }
    }

    let doc_id = doc_id.to_string();
    let provisions = provisions.to_vec();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM provisions_fts WHERE doc_id = ?1",
          rusqlite::params![doc_id],
        )?;
        tx.execute(
          "DELETE FROM provisions WHERE doc_id = ?1",
          rusqlite::params![doc_id],
        )?;
        for (position, p) in provisions.iter().enumerate() {
          // Duplicates were rejected above; the composite primary key is
          // the backstop.
          tx.execute(
            "INSERT INTO provisions
               (doc_id, provision_ref, section_label, heading, body_text,
                position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              doc_id,
              p.provision_ref,
              p.section_label,
              p.heading,
              p.body_text,
              position as i64,
            ],
          )?;
          tx.execute(
            "INSERT INTO provisions_fts
               (body_text, heading, doc_id, provision_ref)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              p.body_text,
              p.heading,
              doc_id,
              p.provision_ref,
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_provision(
    &self,
    doc_id: &str,
    provision_ref: &str,
  ) -> Result<Option<ProvisionRecord>> {
    let doc_id = doc_id.to_string();
    let provision_ref = provision_ref.to_string();
    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT provision_ref, section_label, heading, body_text
               FROM provisions
               WHERE doc_id = ?1 AND provision_ref = ?2",
              rusqlite::params![doc_id, provision_ref],
              |row| {
                Ok(ProvisionRecord {
                  provision_ref: row.get(0)?,
                  section_label: row.get(1)?,
                  heading:       row.get(2)?,
                  body_text:     row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(record)
  }

  async fn provision_exists(
    &self,
    doc_id: &str,
    section_label: &str,
  ) -> Result<bool> {
    let doc_id = doc_id.to_string();
    let section_label = section_label.to_string();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM provisions
               WHERE doc_id = ?1 AND section_label = ?2",
              rusqlite::params![doc_id, section_label],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
    let variants = normalize_query(&query.text);
    let limit = query.limit.unwrap_or(50) as i64;
    let offset = query.offset.unwrap_or(0) as i64;

    let hits = self
      .run_fts(variants.primary, query.doc_id.clone(), limit, offset)
      .await?;
    if !hits.is_empty() {
      return Ok(hits);
    }

    // Strict expression found nothing; try the loose variant when present.
    match variants.fallback {
      Some(fallback) => {
        self
          .run_fts(fallback, query.doc_id.clone(), limit, offset)
          .await
      }
      None => Ok(hits),
    }
  }
}
