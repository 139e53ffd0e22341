use curate_core::EvidenceValue;
use curate_session::{Draft, DraftStore, FileDraftStore};
use serde_json::json;
use uuid::Uuid;

fn draft(schema_id: &str, saved_at: &str, gene: &str) -> Draft {
    Draft {
        session_id: Uuid::new_v4(),
        schema_id: Some(schema_id.to_string()),
        generation: 3,
        saved_at: saved_at.parse().unwrap(),
        evidence_data: EvidenceValue::from(json!({ "gene": gene })),
    }
}

#[tokio::test]
async fn save_load_and_discard() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path().join("drafts"));
    let saved = draft("gene-disease-validity", "2026-03-01T10:00:00Z", "HGNC:1100");

    assert_eq!(store.load(saved.session_id).await.unwrap(), None);

    store.save(saved.clone()).await.unwrap();
    assert_eq!(store.load(saved.session_id).await.unwrap(), Some(saved.clone()));

    // No temporary file is left behind.
    let names: Vec<String> = std::fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, [format!("{}.json", saved.session_id)]);

    store.discard(saved.session_id).await.unwrap();
    assert_eq!(store.load(saved.session_id).await.unwrap(), None);
    store.discard(saved.session_id).await.unwrap();
}

#[tokio::test]
async fn saving_again_replaces_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path());
    let mut saved = draft("gene-disease-validity", "2026-03-01T10:00:00Z", "HGNC:1");

    store.save(saved.clone()).await.unwrap();
    saved.evidence_data = EvidenceValue::from(json!({ "gene": "HGNC:1100" }));
    saved.generation = 4;
    store.save(saved.clone()).await.unwrap();

    let loaded = store.load(saved.session_id).await.unwrap().unwrap();
    assert_eq!(loaded.generation, 4);
    assert_eq!(loaded.evidence_data.to_json(), json!({ "gene": "HGNC:1100" }));
}

#[tokio::test]
async fn latest_draft_per_schema() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path());

    let older = draft("gene-disease-validity", "2026-03-01T10:00:00Z", "HGNC:1");
    let newer = draft("gene-disease-validity", "2026-03-02T09:00:00Z", "HGNC:2");
    let other = draft("variant-pathogenicity", "2026-03-03T09:00:00Z", "HGNC:3");
    for d in [&older, &newer, &other] {
        store.save(d.clone()).await.unwrap();
    }
    std::fs::write(dir.path().join("corrupt.json"), b"{ not json").unwrap();

    let latest = store
        .latest_for_schema(Some("gene-disease-validity"))
        .unwrap()
        .unwrap();
    assert_eq!(latest.session_id, newer.session_id);
    assert_eq!(store.latest_for_schema(Some("unknown")).unwrap(), None);
}
