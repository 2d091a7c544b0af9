//! Bearer-token authentication.
//!
//! The HTTP layer hands the raw `Authorization` header value to [`authenticate`],
//! which parses the bearer credential and asks an [`Authenticator`] to resolve
//! it into a principal.

use async_trait::async_trait;
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization header required.")]
    MissingCredentials,

    #[error("Invalid or missing token.")]
    InvalidToken,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Resolves a bearer token into the principal it identifies.
#[async_trait]
pub trait Authenticator: Send + Sync {
    type Principal: Send;

    /// Returns `Ok(None)` when the token is unknown.
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<Self::Principal>>;
}

/// Extract the credential from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-sensitively. Surrounding whitespace around the
/// token is ignored; an empty token is returned as-is and fails resolution.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingCredentials)
}

/// Parse the header and resolve the token with `authenticator`.
pub async fn authenticate<A>(
    authenticator: &A,
    header: Option<&str>,
) -> Result<A::Principal, AuthError>
where
    A: Authenticator + ?Sized,
{
    let token = bearer_token(header)?;

    match authenticator.resolve(token).await? {
        Some(principal) => Ok(principal),
        None => {
            tracing::warn!(target: "folio-authz", "rejected unknown bearer token");
            Err(AuthError::InvalidToken)
        }
    }
}
