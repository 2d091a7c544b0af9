use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use folio_http::error::AppError;

use super::models::ApiClient;
use super::registry::ClientRegistry;

/// Extractor that admits only requests carrying a registered bearer token.
///
/// The registry is reread on every request, so tokens issued by another
/// process sharing the same storage are accepted without a restart.
#[derive(Debug, Clone)]
pub struct Authenticated(pub ApiClient);

impl<S> FromRequestParts<S> for Authenticated
where
    Arc<ClientRegistry>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let registry = Arc::<ClientRegistry>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let client = folio_authz::authenticate(registry.as_ref(), header).await?;
        Ok(Authenticated(client))
    }
}
