//! The debounced authoritative check.
//!
//! Edits go through [`AuthoritativeWorker::edit`], which applies them to the
//! session and wakes the background task. After a quiet period the task
//! saves a draft (when a store is configured), sends the full evidence to
//! the validator and applies the answer unless the evidence has moved on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::debounce::Debouncer;
use crate::draft::DraftStore;
use crate::session::{Applied, FormSession};
use crate::validator::AuthoritativeValidator;

pub struct AuthoritativeWorker {
    session: Arc<Mutex<FormSession>>,
    edits: watch::Sender<u64>,
    task: JoinHandle<()>,
}

impl AuthoritativeWorker {
    pub fn session(&self) -> &Arc<Mutex<FormSession>> {
        &self.session
    }

    /// Apply an edit and restart the quiet period.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut FormSession) -> R) -> R {
        let mut session = self.session.lock().await;
        let result = f(&mut session);
        let generation = session.generation();
        drop(session);
        self.edits.send_replace(generation);
        result
    }

    /// Stop the task. A check that is in flight is allowed to finish, and
    /// edits still inside their quiet period are checked and saved first.
    pub async fn shutdown(self) {
        drop(self.edits);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "authoritative worker ended abnormally");
        }
    }
}

pub fn spawn_authoritative_worker(
    session: Arc<Mutex<FormSession>>,
    validator: Arc<dyn AuthoritativeValidator>,
    drafts: Option<Arc<dyn DraftStore>>,
    quiet: Duration,
) -> AuthoritativeWorker {
    let (edits, rx) = watch::channel(0);
    let task = tokio::spawn(run(Arc::clone(&session), validator, drafts, rx, quiet));
    AuthoritativeWorker {
        session,
        edits,
        task,
    }
}

async fn run(
    session: Arc<Mutex<FormSession>>,
    validator: Arc<dyn AuthoritativeValidator>,
    drafts: Option<Arc<dyn DraftStore>>,
    mut edits: watch::Receiver<u64>,
    quiet: Duration,
) {
    let mut debouncer = Debouncer::new(quiet);

    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            changed = edits.changed() => {
                if changed.is_err() {
                    if debouncer.is_pending() {
                        tracing::debug!("flushing pending edits before stopping");
                        check(&session, validator.as_ref(), drafts.as_deref()).await;
                    }
                    break;
                }
                debouncer.poke(Instant::now());
            }
            _ = sleep_until(deadline), if deadline.is_some() => {
                if debouncer.fire(Instant::now()) {
                    check(&session, validator.as_ref(), drafts.as_deref()).await;
                }
            }
        }
    }

    tracing::debug!("authoritative worker stopped");
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}

async fn check(
    session: &Mutex<FormSession>,
    validator: &dyn AuthoritativeValidator,
    drafts: Option<&dyn DraftStore>,
) {
    let (generation, request, draft) = {
        let session = session.lock().await;
        let (generation, request) = session.authoritative_request();
        (generation, request, session.draft())
    };

    if let Some(store) = drafts
        && let Err(e) = store.save(draft).await
    {
        tracing::warn!(error = %e, "failed to save draft");
    }

    tracing::debug!(generation, "sending evidence for authoritative validation");
    match validator.validate(request).await {
        Ok(response) => {
            let mut session = session.lock().await;
            if session.apply_authoritative(generation, response) == Applied::Stale {
                tracing::debug!(generation, "evidence changed while validating");
            }
        }
        Err(e) => session.lock().await.authoritative_failed(generation, &e),
    }
}
