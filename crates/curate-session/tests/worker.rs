use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use curate_core::models::authoritative::{AuthoritativeRequest, AuthoritativeResponse};
use curate_core::{EvidenceValue, FieldPath, Schema};
use curate_session::{
    AuthoritativeValidator, DraftStore, FileDraftStore, FormSession, ValidatorError,
    spawn_authoritative_worker,
};
use tokio::sync::Mutex;

const GENE_DISEASE: &str = include_str!("../../../fixtures/gene_disease_schema.json");
const QUIET: Duration = Duration::from_millis(300);

type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Records every request and answers after `latency` with a fixed error on
/// `gene` and a fixed total score.
struct FakeBackend {
    latency: Duration,
    fail: bool,
    requests: std::sync::Mutex<Vec<AuthoritativeRequest>>,
}

impl FakeBackend {
    fn new(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            fail: false,
            requests: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            latency: Duration::ZERO,
            fail: true,
            requests: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<AuthoritativeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AuthoritativeValidator for FakeBackend {
    fn validate(
        &self,
        request: AuthoritativeRequest,
    ) -> BoxFuture<'_, Result<AuthoritativeResponse, ValidatorError>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            tokio::time::sleep(self.latency).await;
            if self.fail {
                return Err(ValidatorError::Unavailable("connection refused".to_string()));
            }
            Ok(AuthoritativeResponse {
                is_valid: false,
                errors: BTreeMap::from([(
                    "gene".to_string(),
                    "Gene symbol withdrawn".to_string(),
                )]),
                score_calculations: Some(BTreeMap::from([(
                    "total_score".to_string(),
                    serde_json::json!(7.5),
                )])),
            })
        })
    }
}

fn session() -> Arc<Mutex<FormSession>> {
    let schema = Arc::new(Schema::from_json(GENE_DISEASE).unwrap());
    Arc::new(Mutex::new(FormSession::new(schema)))
}

fn gene(value: &str) -> impl FnOnce(&mut FormSession) {
    let value = EvidenceValue::from(value);
    move |s: &mut FormSession| s.set(&FieldPath::parse("gene"), value)
}

#[tokio::test(start_paused = true)]
async fn edits_inside_the_quiet_period_coalesce() {
    let backend = FakeBackend::new(Duration::ZERO);
    let worker = spawn_authoritative_worker(session(), backend.clone(), None, QUIET);

    worker.edit(gene("HGNC:1")).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    worker.edit(gene("HGNC:11")).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    worker.edit(gene("HGNC:1100")).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(backend.requests().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].evidence_data.to_json()["gene"], "HGNC:1100");

    let mut session = worker.session().lock().await;
    assert_eq!(session.validation().error_for("gene"), Some("Gene symbol withdrawn"));
    assert_eq!(session.score().classification.as_deref(), Some("Strong"));
    drop(session);

    worker.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn answers_for_superseded_evidence_are_discarded() {
    let backend = FakeBackend::new(Duration::from_millis(1000));
    let worker = spawn_authoritative_worker(session(), backend.clone(), None, QUIET);

    // First check starts at 300ms and answers at 1300ms.
    worker.edit(gene("HGNC:1")).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    worker.edit(gene("HGNC:1100")).await;

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(backend.requests().len(), 1);
    {
        let session = worker.session().lock().await;
        assert!(session.server_errors().is_empty());
        assert!(session.score_state().score_calculations.is_none());
    }

    // The edit made during the first check gets its own check afterwards.
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].evidence_data.to_json()["gene"], "HGNC:1100");
    let session = worker.session().lock().await;
    assert_eq!(session.server_errors().len(), 1);
    drop(session);

    worker.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn validator_failure_keeps_local_state() {
    let backend = FakeBackend::failing();
    let worker = spawn_authoritative_worker(session(), backend.clone(), None, QUIET);

    worker.edit(gene("HGNC:1100")).await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(backend.requests().len(), 1);
    let mut session = worker.session().lock().await;
    assert!(session.server_errors().is_empty());
    assert_eq!(session.validation().error_for("gene"), None);
    assert_eq!(session.generation(), 1);
    drop(session);

    worker.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn quiet_period_saves_a_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path()));
    let backend = FakeBackend::new(Duration::ZERO);
    let shared = session();
    let session_id = shared.lock().await.id();

    let drafts: Arc<dyn DraftStore> = store.clone();
    let worker = spawn_authoritative_worker(shared, backend, Some(drafts), QUIET);
    worker.edit(gene("HGNC:1100")).await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    let draft = store.load(session_id).await.unwrap().expect("draft written");
    assert_eq!(draft.generation, 1);
    assert_eq!(draft.evidence_data.to_json()["gene"], "HGNC:1100");

    worker.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_flushes_edits_still_in_the_quiet_period() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path()));
    let backend = FakeBackend::new(Duration::ZERO);
    let shared = session();
    let session_id = shared.lock().await.id();

    let drafts: Arc<dyn DraftStore> = store.clone();
    let worker = spawn_authoritative_worker(Arc::clone(&shared), backend.clone(), Some(drafts), QUIET);
    worker.edit(gene("HGNC:1100")).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(backend.requests().is_empty());

    worker.shutdown().await;

    let draft = store.load(session_id).await.unwrap().expect("draft written on shutdown");
    assert_eq!(draft.evidence_data.to_json()["gene"], "HGNC:1100");
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(shared.lock().await.server_errors().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_with_nothing_pending_sends_nothing() {
    let backend = FakeBackend::new(Duration::ZERO);
    let worker = spawn_authoritative_worker(session(), backend.clone(), None, QUIET);

    worker.edit(gene("HGNC:1100")).await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(backend.requests().len(), 1);

    worker.shutdown().await;
    assert_eq!(backend.requests().len(), 1);
}
