use chrono::{TimeZone, Utc};
use lexref_core::{
  document::DocumentMeta,
  provision::ProvisionRecord,
  store::{ProvisionStore, SearchQuery},
};

use crate::SqliteStore;

fn dpa_meta() -> DocumentMeta {
  DocumentMeta {
    doc_id:     "ukpga/2018/12".into(),
    collection: "ukpga".into(),
    year:       2018,
    number:     12,
    title:      "Data Protection Act 2018".into(),
    status:     Some("in-force".into()),
    url:        Some("https://www.legislation.gov.uk/ukpga/2018/12".into()),
    updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
  }
}

fn dpa_provisions() -> Vec<ProvisionRecord> {
  vec![
    ProvisionRecord {
      provision_ref: "s1".into(),
      section_label: "1".into(),
      heading:       Some("Overview".into()),
      body_text:     "This Act makes provision about the processing of \
                      personal data."
        .into(),
    },
    ProvisionRecord {
      provision_ref: "s3".into(),
      section_label: "3".into(),
      heading:       Some("Terms relating to the processing of personal \
                           data"
        .into()),
      body_text:     "In this Act, personal data means any information \
                      relating to an identified or identifiable living \
                      individual."
        .into(),
    },
    ProvisionRecord {
      provision_ref: "s3(2)".into(),
      section_label: "3(2)".into(),
      heading:       None,
      body_text:     "Identifiable living individual means a living \
                      individual who can be identified."
        .into(),
    },
  ]
}

async fn seeded_store() -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.upsert_document(&dpa_meta()).await.unwrap();
  store
    .replace_provisions("ukpga/2018/12", &dpa_provisions())
    .await
    .unwrap();
  store
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_then_get_round_trips_metadata() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let meta = dpa_meta();
  store.upsert_document(&meta).await.unwrap();

  let got = store.get_document("ukpga/2018/12").await.unwrap().unwrap();
  assert_eq!(got, meta);
}

#[tokio::test]
async fn get_document_missing_is_none() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  assert!(store.get_document("ukpga/1999/1").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_is_an_update_on_conflict() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.upsert_document(&dpa_meta()).await.unwrap();

  let mut revised = dpa_meta();
  revised.status = Some("repealed".into());
  store.upsert_document(&revised).await.unwrap();

  let docs = store.list_documents().await.unwrap();
  assert_eq!(docs.len(), 1);
  assert_eq!(docs[0].status.as_deref(), Some("repealed"));
}

#[tokio::test]
async fn find_document_exact_title_case_insensitive() {
  let store = seeded_store().await;
  let found = store
    .find_document("data protection act 2018", None)
    .await
    .unwrap();
  assert_eq!(found.unwrap().doc_id, "ukpga/2018/12");
}

#[tokio::test]
async fn find_document_fuzzy_containment() {
  let store = seeded_store().await;
  // Cited title omits the trailing year carried by the stored title.
  let found = store
    .find_document("Data Protection Act", Some(2018))
    .await
    .unwrap();
  assert_eq!(found.unwrap().doc_id, "ukpga/2018/12");
}

#[tokio::test]
async fn find_document_respects_year_filter() {
  let store = seeded_store().await;
  let found = store
    .find_document("Data Protection Act", Some(1998))
    .await
    .unwrap();
  assert!(found.is_none());
}

// ─── Provisions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_then_get_provision() {
  let store = seeded_store().await;
  let p = store
    .get_provision("ukpga/2018/12", "s3")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(p.section_label, "3");
  assert_eq!(
    p.heading.as_deref(),
    Some("Terms relating to the processing of personal data")
  );
}

#[tokio::test]
async fn replace_provisions_is_idempotent() {
  let store = seeded_store().await;
  // Re-ingesting the same document must not duplicate or error.
  store
    .replace_provisions("ukpga/2018/12", &dpa_provisions())
    .await
    .unwrap();

  assert!(
    store
      .get_provision("ukpga/2018/12", "s1")
      .await
      .unwrap()
      .is_some()
  );
  let hits = store
    .search(&SearchQuery {
      text: "personal data".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  let s3 = hits.iter().filter(|h| h.provision_ref == "s3").count();
  assert_eq!(s3, 1, "re-ingestion must not duplicate FTS rows");
}

#[tokio::test]
async fn duplicate_provision_ref_is_rejected() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.upsert_document(&dpa_meta()).await.unwrap();

  let mut provisions = dpa_provisions();
  provisions.push(provisions[0].clone());
  let err = store
    .replace_provisions("ukpga/2018/12", &provisions)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(lexref_core::Error::DuplicateProvisionRef {
      ref doc_id,
      ref provision_ref,
    }) if doc_id == "ukpga/2018/12" && provision_ref == "s1"
  ));

  // The batch was rejected whole; nothing was written.
  assert!(
    store
      .get_provision("ukpga/2018/12", "s1")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn provision_exists_matches_section_label() {
  let store = seeded_store().await;
  assert!(store.provision_exists("ukpga/2018/12", "3").await.unwrap());
  assert!(
    store
      .provision_exists("ukpga/2018/12", "3(2)")
      .await
      .unwrap()
  );
  assert!(!store.provision_exists("ukpga/2018/12", "99").await.unwrap());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_finds_body_text_matches() {
  let store = seeded_store().await;
  let hits = store
    .search(&SearchQuery {
      text: "identifiable living individual".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!hits.is_empty());
  assert_eq!(hits[0].doc_id, "ukpga/2018/12");
  assert_eq!(hits[0].document_title, "Data Protection Act 2018");
  assert!(hits[0].snippet.contains('['));
}

#[tokio::test]
async fn search_matches_headings_too() {
  let store = seeded_store().await;
  let hits = store
    .search(&SearchQuery { text: "Overview".into(), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].provision_ref, "s1");
}

#[tokio::test]
async fn search_falls_back_to_any_term_when_all_terms_miss() {
  let store = seeded_store().await;
  // "framework" appears nowhere, so requiring every term yields nothing;
  // the OR fallback still surfaces the "processing" hits.
  let hits = store
    .search(&SearchQuery {
      text: "processing framework".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!hits.is_empty());
  assert!(hits.iter().any(|h| h.provision_ref == "s1"));
}

#[tokio::test]
async fn search_scoped_to_doc_id() {
  let store = seeded_store().await;
  let other = DocumentMeta {
    doc_id: "ukpga/2000/36".into(),
    collection: "ukpga".into(),
    year: 2000,
    number: 36,
    title: "Freedom of Information Act 2000".into(),
    status: None,
    url: None,
    updated_at: None,
  };
  store.upsert_document(&other).await.unwrap();
  store
    .replace_provisions(
      "ukpga/2000/36",
      &[ProvisionRecord {
        provision_ref: "s1".into(),
        section_label: "1".into(),
        heading:       None,
        body_text:     "General right of access to information held by \
                        public authorities, including personal data held."
          .into(),
      }],
    )
    .await
    .unwrap();

  let hits = store
    .search(&SearchQuery {
      text:   "personal data".into(),
      doc_id: Some("ukpga/2018/12".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!hits.is_empty());
  assert!(hits.iter().all(|h| h.doc_id == "ukpga/2018/12"));
}

#[tokio::test]
async fn search_honors_limit_and_offset() {
  let store = seeded_store().await;
  let all = store
    .search(&SearchQuery { text: "living".into(), ..Default::default() })
    .await
    .unwrap();
  assert!(all.len() >= 2);

  let first = store
    .search(&SearchQuery {
      text: "living".into(),
      limit: Some(1),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(first.len(), 1);

  let second = store
    .search(&SearchQuery {
      text: "living".into(),
      limit: Some(1),
      offset: Some(1),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(second.len(), 1);
  assert_ne!(first[0].provision_ref, second[0].provision_ref);
}

#[tokio::test]
async fn search_with_explicit_fts_syntax_passes_through() {
  let store = seeded_store().await;
  let hits = store
    .search(&SearchQuery {
      text: "\"personal data\"".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!hits.is_empty());
}

// ─── End-to-end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_markup_then_search_and_validate() {
  let markup = r##"<akomaNtoso><act><body>
    <section eId="section-3">
      <num>3</num>
      <heading>Terms relating to the processing of <ref href="#d">personal
      data</ref></heading>
      <intro><p>In this Act—</p></intro>
      <subsection eId="section-3-2">
        <num>(2)</num>
        <content><p>Personal data means any information relating to an
        identified or identifiable living individual.</p></content>
      </subsection>
    </section>
  </body></act></akomaNtoso>"##;

  let walked = lexref_akn::extract_provisions(markup).unwrap();
  assert!(walked.duplicate_refs.is_empty());

  let store = SqliteStore::open_in_memory().await.unwrap();
  store.upsert_document(&dpa_meta()).await.unwrap();
  store
    .replace_provisions("ukpga/2018/12", &walked.provisions)
    .await
    .unwrap();

  let hits = store
    .search(&SearchQuery {
      text: "identifiable living individual".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(hits.iter().any(|h| h.provision_ref == "s3(2)"));

  let parsed = lexref_cite::parse("Section 3, Data Protection Act 2018");
  let checked = lexref_cite::validate(&parsed, &store).await.unwrap();
  assert!(checked.document_exists);
  assert!(checked.provision_exists);
}
