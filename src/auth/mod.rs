// Bearer-token verification against the identity provider's published keys
pub mod claims;
pub mod jwks;
pub mod verifier;

pub use claims::{check_permissions, Claims};
pub use jwks::{Jwk, Jwks};
pub use verifier::TokenVerifier;

use thiserror::Error;

/// Faults raised while authenticating or authorizing a request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,

    #[error("authorization header must start with Bearer")]
    InvalidScheme,

    #[error("token not found")]
    MissingToken,

    #[error("authorization header must be a bearer token")]
    MalformedHeader,

    #[error("unable to find the appropriate key")]
    UnknownKey,

    #[error("token is expired")]
    TokenExpired,

    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("unable to parse authentication token")]
    InvalidToken,

    #[error("permissions not included in token")]
    MissingPermissions,

    #[error("permission {0} not found")]
    PermissionDenied(String),

    #[error("identity provider is not configured")]
    NotConfigured,

    #[error("failed to fetch signing keys: {0}")]
    JwksFetch(#[from] reqwest::Error),
}

impl AuthError {
    /// HTTP status the fault maps to: 403 for scope failures on a valid
    /// token, 500 for faults on our side, 401 for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingPermissions | AuthError::PermissionDenied(_) => 403,
            AuthError::NotConfigured | AuthError::JwksFetch(_) => 500,
            _ => 401,
        }
    }
}
