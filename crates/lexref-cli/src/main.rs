//! `lexref` command-line binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and exposes ingestion, citation, search, and an
//! HTTP API server as subcommands.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lexref_core::{
  citation::CiteStyle,
  document::DocumentMeta,
  store::{ProvisionStore, SearchQuery},
};
use lexref_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Legislation structuring and citation tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest one legislative markup document into the store.
  Ingest {
    /// Document identifier, `<collection>/<year>/<number>`.
    #[arg(long)]
    doc_id: String,

    /// Document title, e.g. "Data Protection Act 2018".
    #[arg(long)]
    title: String,

    /// Path to the markup file.
    path: PathBuf,
  },

  /// Load feed-index pages into the document catalog.
  Feed {
    /// Paths to saved feed-index XML pages, in order.
    paths: Vec<PathBuf>,
  },

  /// Parse, format, or validate a citation string.
  Cite {
    #[command(subcommand)]
    command: CiteCommand,
  },

  /// Full-text search over ingested provisions.
  Search {
    /// The query text.
    query: String,

    /// Restrict hits to one document, `<collection>/<year>/<number>`.
    #[arg(long)]
    doc_id: Option<String>,

    #[arg(long)]
    limit: Option<usize>,
  },

  /// Serve the JSON API over HTTP.
  Serve,
}

#[derive(Subcommand)]
enum CiteCommand {
  /// Parse a citation and print its structured form.
  Parse { text: String },

  /// Parse a citation and re-render it in a given style.
  Format {
    text: String,

    /// Output style: full, short, or pinpoint.
    #[arg(long, default_value = "full")]
    style: String,
  },

  /// Parse a citation and check it against the store.
  Validate { text: String },
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and the `LEXREF_`
/// environment.
#[derive(Debug, Clone, Deserialize)]
struct AppConfig {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
}

fn default_store_path() -> PathBuf { PathBuf::from("lexref.db") }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("LEXREF"))
    .build()
    .context("failed to read config file")?;
  settings
    .try_deserialize()
    .context("failed to deserialise configuration")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Ingest { doc_id, title, path } => {
      ingest(&store, &doc_id, &title, &path).await
    }
    Command::Feed { paths } => feed(&store, &paths).await,
    Command::Cite { command } => cite(&store, command).await,
    Command::Search { query, doc_id, limit } => {
      search(&store, query, doc_id, limit).await
    }
    Command::Serve => serve(store, &cfg).await,
  }
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

async fn ingest(
  store: &SqliteStore,
  doc_id: &str,
  title: &str,
  path: &Path,
) -> anyhow::Result<()> {
  let (collection, year, number) = split_doc_id(doc_id)?;
  let markup = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read {path:?}"))?;

  let walked = lexref_akn::extract_provisions(&markup)
    .with_context(|| format!("failed to parse markup in {path:?}"))?;
  for dup in &walked.duplicate_refs {
    tracing::warn!(provision_ref = %dup, "duplicate provision reference");
  }

  store
    .upsert_document(&DocumentMeta {
      doc_id: doc_id.to_string(),
      collection,
      year,
      number,
      title: title.to_string(),
      status: None,
      url: None,
      updated_at: None,
    })
    .await?;
  store.replace_provisions(doc_id, &walked.provisions).await?;

  tracing::info!(
    doc_id,
    provisions = walked.provisions.len(),
    "document ingested"
  );
  Ok(())
}

async fn feed(store: &SqliteStore, paths: &[PathBuf]) -> anyhow::Result<()> {
  let mut catalog = lexref_feed::Catalog::default();
  for path in paths {
    // One bad page never aborts the catalog run: log and move on.
    let xml = match tokio::fs::read_to_string(path).await {
      Ok(xml) => xml,
      Err(e) => {
        tracing::error!(
          path = %path.display(),
          error = %e,
          "skipping unreadable feed page"
        );
        continue;
      }
    };
    let page = match lexref_feed::parse_page(&xml) {
      Ok(page) => page,
      Err(e) => {
        tracing::error!(
          path = %path.display(),
          error = %e,
          "skipping malformed feed page"
        );
        continue;
      }
    };
    tracing::info!(
      path = %path.display(),
      entries = page.entries.len(),
      has_next_page = page.has_next_page,
      "feed page read"
    );
    catalog.extend_from_page(page.entries);
  }

  let stubs = catalog.into_stubs();
  let count = stubs.len();
  for stub in stubs {
    store.upsert_document(&DocumentMeta::from_stub(&stub)).await?;
  }
  tracing::info!(documents = count, "catalog updated");
  Ok(())
}

async fn cite(store: &SqliteStore, command: CiteCommand) -> anyhow::Result<()> {
  match command {
    CiteCommand::Parse { text } => {
      let parsed = lexref_cite::parse(&text);
      println!("{}", serde_json::to_string_pretty(&parsed)?);
    }
    CiteCommand::Format { text, style } => {
      let style = parse_style(&style)?;
      let parsed = lexref_cite::parse(&text);
      println!("{}", lexref_cite::format(&parsed, style)?);
    }
    CiteCommand::Validate { text } => {
      let parsed = lexref_cite::parse(&text);
      let result = lexref_cite::validate(&parsed, store).await?;
      println!("{}", serde_json::to_string_pretty(&result)?);
    }
  }
  Ok(())
}

async fn search(
  store: &SqliteStore,
  query: String,
  doc_id: Option<String>,
  limit: Option<usize>,
) -> anyhow::Result<()> {
  let hits = store
    .search(&SearchQuery { text: query, doc_id, limit, offset: None })
    .await?;
  if hits.is_empty() {
    println!("no matches");
    return Ok(());
  }
  for hit in hits {
    println!(
      "{} {} — {}\n  {}",
      hit.doc_id, hit.provision_ref, hit.document_title, hit.snippet
    );
  }
  Ok(())
}

async fn serve(store: SqliteStore, cfg: &AppConfig) -> anyhow::Result<()> {
  let app = axum::Router::new()
    .nest("/api", lexref_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Split `<collection>/<year>/<number>` into its typed components.
fn split_doc_id(doc_id: &str) -> anyhow::Result<(String, i32, u32)> {
  let mut parts = doc_id.splitn(3, '/');
  let (Some(collection), Some(year), Some(number)) =
    (parts.next(), parts.next(), parts.next())
  else {
    anyhow::bail!("doc id must be <collection>/<year>/<number>: {doc_id}");
  };
  let year = year
    .parse()
    .with_context(|| format!("bad year in doc id: {doc_id}"))?;
  let number = number
    .parse()
    .with_context(|| format!("bad number in doc id: {doc_id}"))?;
  Ok((collection.to_string(), year, number))
}

fn parse_style(s: &str) -> anyhow::Result<CiteStyle> {
  match s {
    "full" => Ok(CiteStyle::Full),
    "short" => Ok(CiteStyle::Short),
    "pinpoint" => Ok(CiteStyle::Pinpoint),
    other => anyhow::bail!("unknown style {other:?} (full, short, pinpoint)"),
  }
}
