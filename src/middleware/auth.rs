use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{check_permissions, AuthError, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Bearer-token authentication middleware.
///
/// Verifies the Authorization header against the provider's signing keys
/// and injects the resulting [`Claims`] into request extensions for the
/// permission guards downstream.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = state.verifier.verify(&token).await?;

    tracing::debug!("Authenticated subject {:?}", claims.sub);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme comparison is case-insensitive; anything other than exactly
/// two whitespace-separated parts is rejected.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split_whitespace();

    let scheme = parts.next().ok_or(AuthError::MissingHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let token = parts.next().ok_or(AuthError::MissingToken)?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token.to_string())
}

/// Permission guard. Runs after [`authenticate`] and rejects requests whose
/// token does not grant `required`.
pub async fn authorize(
    required: &'static str,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ApiError::unauthorized("authentication is required"))?;

    check_permissions(required, claims)?;

    Ok(next.run(request).await)
}
