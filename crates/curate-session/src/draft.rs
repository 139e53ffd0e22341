//! Draft recovery: the in-progress evidence, saved on every debounced edit
//! so a crashed or closed form can be resumed.

use std::path::{Path, PathBuf};

use curate_core::EvidenceValue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BoxFuture;
use crate::error::DraftError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub session_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    pub generation: u64,
    pub saved_at: jiff::Timestamp,
    pub evidence_data: EvidenceValue,
}

/// Where drafts live. Methods return boxed futures for dyn compatibility.
pub trait DraftStore: Send + Sync {
    fn save(&self, draft: Draft) -> BoxFuture<'_, Result<(), DraftError>>;

    /// `Ok(None)` when no draft exists for the session.
    fn load(&self, session_id: Uuid) -> BoxFuture<'_, Result<Option<Draft>, DraftError>>;

    /// Forget a session's draft, typically after a successful save.
    fn discard(&self, session_id: Uuid) -> BoxFuture<'_, Result<(), DraftError>>;
}

/// One JSON file per session in a directory.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    /// Write atomically: tmp file, then rename over the old draft.
    fn write(&self, draft: &Draft) -> Result<(), DraftError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(draft.session_id);
        let json = serde_json::to_vec_pretty(draft)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(
            path = %path.display(),
            generation = draft.generation,
            "draft saved"
        );
        Ok(())
    }

    fn read(&self, session_id: Uuid) -> Result<Option<Draft>, DraftError> {
        let path = self.path_for(session_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read(&path)?;
        let draft: Draft = serde_json::from_slice(&json)?;
        tracing::debug!(path = %path.display(), "draft loaded");
        Ok(Some(draft))
    }

    /// The most recently saved draft for a schema, across all sessions.
    pub fn latest_for_schema(&self, schema_id: Option<&str>) -> Result<Option<Draft>, DraftError> {
        if !self.dir.exists() {
            return Ok(None);
        }
        let mut latest: Option<Draft> = None;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let draft: Draft = match std::fs::read(&path)
                .map_err(DraftError::from)
                .and_then(|bytes| serde_json::from_slice(&bytes).map_err(DraftError::from))
            {
                Ok(draft) => draft,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable draft");
                    continue;
                }
            };
            if draft.schema_id.as_deref() != schema_id {
                continue;
            }
            if latest.as_ref().is_none_or(|l| draft.saved_at > l.saved_at) {
                latest = Some(draft);
            }
        }
        Ok(latest)
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, draft: Draft) -> BoxFuture<'_, Result<(), DraftError>> {
        Box::pin(async move { self.write(&draft) })
    }

    fn load(&self, session_id: Uuid) -> BoxFuture<'_, Result<Option<Draft>, DraftError>> {
        Box::pin(async move { self.read(session_id) })
    }

    fn discard(&self, session_id: Uuid) -> BoxFuture<'_, Result<(), DraftError>> {
        Box::pin(async move {
            let path = self.path_for(session_id);
            if path.exists() {
                std::fs::remove_file(&path)?;
                tracing::debug!(path = %path.display(), "draft discarded");
            }
            Ok(())
        })
    }
}
