use curate_core::models::authoritative::{AuthoritativeRequest, AuthoritativeResponse};

use crate::BoxFuture;
use crate::error::ValidatorError;

/// The backend endpoint that validates and scores a full evidence payload.
///
/// Methods return boxed futures for dyn compatibility.
pub trait AuthoritativeValidator: Send + Sync {
    fn validate(
        &self,
        request: AuthoritativeRequest,
    ) -> BoxFuture<'_, Result<AuthoritativeResponse, ValidatorError>>;
}
