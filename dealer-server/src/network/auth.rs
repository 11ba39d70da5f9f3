//! Basic Authentication Gate
//!
//! Admits a request only when its `Authorization` header carries a Basic
//! credential pair that verifies against the credential store. The
//! username is the player id returned at registration.
//!
//! Every rejection produces the same 401 response. The `AuthError` variant
//! is only ever logged, so clients cannot tell an unknown player from a
//! wrong password.

use std::fmt;
use std::sync::Arc;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::debug;

use crate::dealer::credentials::CredentialStore;
use crate::dealer::player::PlayerId;
use crate::network::context::DealerContext;
use crate::network::protocol::ApiError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header.
    #[error("missing authorization header")]
    MissingHeader,
    /// Scheme other than Basic.
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    /// Payload is not base64 `user:password`.
    #[error("malformed credentials")]
    MalformedCredentials,
    /// Username is not a registered player.
    #[error("unknown identity")]
    UnknownIdentity,
    /// Password does not match.
    #[error("invalid password")]
    InvalidPassword,
}

/// Proof that the gate admitted a request, carried in request extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admitted {
    /// The authenticated player.
    pub player_id: PlayerId,
}

/// Decoded Basic credentials.
pub struct BasicCredentials {
    /// Username part.
    pub username: String,
    /// Password part.
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Parse an `Authorization` header value into Basic credentials.
pub fn parse_basic(value: &str) -> Result<BasicCredentials, AuthError> {
    let mut tokens = value.split_whitespace();
    let scheme = tokens.next().ok_or(AuthError::UnsupportedScheme)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::UnsupportedScheme);
    }

    let payload = tokens.next().ok_or(AuthError::MalformedCredentials)?;
    if tokens.next().is_some() {
        return Err(AuthError::MalformedCredentials);
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Run the gate over a request's headers.
pub async fn admit(headers: &HeaderMap, credentials: &CredentialStore) -> Result<Admitted, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedCredentials)?;

    let basic = parse_basic(value)?;

    let player_id: PlayerId = basic
        .username
        .parse()
        .map_err(|_| AuthError::UnknownIdentity)?;
    if !credentials.contains(&player_id).await {
        return Err(AuthError::UnknownIdentity);
    }

    if !credentials.verify(&player_id, &basic.password).await {
        return Err(AuthError::InvalidPassword);
    }

    Ok(Admitted { player_id })
}

/// Middleware guarding protected routes.
///
/// On success the `Admitted` value is inserted into the request extensions.
pub async fn require_auth(
    State(ctx): State<Arc<DealerContext>>,
    mut request: Request,
    next: Next,
) -> Response {
    let result = admit(request.headers(), &ctx.credentials).await;
    match result {
        Ok(admitted) => {
            request.extensions_mut().insert(admitted);
            next.run(request).await
        }
        Err(err) => {
            debug!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %err,
                "request denied"
            );
            ApiError::Unauthorized.into_response()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
