//! curate-session
//!
//! A live evidence form: one schema, the evidence being edited, and the
//! validation, score, layout and render tree derived from them on read.
//! Edits apply synchronously; the backend's authoritative check runs on a
//! debounced background task and its answers are discarded when stale.

pub mod debounce;
pub mod draft;
pub mod error;
pub mod session;
pub mod validator;
pub mod worker;

pub use crate::debounce::Debouncer;
pub use crate::draft::{Draft, DraftStore, FileDraftStore};
pub use crate::error::{DraftError, SessionError, ValidatorError};
pub use crate::session::{Applied, FormSession};
pub use crate::validator::AuthoritativeValidator;
pub use crate::worker::{AuthoritativeWorker, spawn_authoritative_worker};

pub(crate) type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
