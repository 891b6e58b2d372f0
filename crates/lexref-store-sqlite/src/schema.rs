//! SQL schema for the Lexref SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS documents (
    doc_id      TEXT PRIMARY KEY,  -- '<collection>/<year>/<number>'
    collection  TEXT NOT NULL,
    year        INTEGER NOT NULL,
    number      INTEGER NOT NULL,
    title       TEXT NOT NULL,
    status      TEXT,              -- e.g. 'in-force' | 'repealed'
    url         TEXT,
    updated_at  TEXT,              -- ISO 8601 UTC from the feed
    UNIQUE (collection, year, number)
);

-- Provisions are regenerated wholesale on re-ingestion.
-- The composite primary key rejects duplicate references loudly rather
-- than letting a collision overwrite an earlier record.
CREATE TABLE IF NOT EXISTS provisions (
    doc_id        TEXT NOT NULL REFERENCES documents(doc_id),
    provision_ref TEXT NOT NULL,   -- e.g. 's3', 's1(2)'
    section_label TEXT NOT NULL,   -- e.g. '3', '1(2)'
    heading       TEXT,
    body_text     TEXT NOT NULL,
    position      INTEGER NOT NULL, -- document order
    PRIMARY KEY (doc_id, provision_ref)
);

CREATE INDEX IF NOT EXISTS provisions_label_idx
    ON provisions(doc_id, section_label);

-- Kept in sync manually inside replace_provisions' transaction.
CREATE VIRTUAL TABLE IF NOT EXISTS provisions_fts USING fts5(
    body_text,
    heading,
    doc_id        UNINDEXED,
    provision_ref UNINDEXED
);

PRAGMA user_version = 1;
";
