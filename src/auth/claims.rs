use serde::{Deserialize, Serialize};

use super::AuthError;

/// Claims carried by a verified access token.
///
/// Only the fields the API reads are kept; audience, issuer and expiry are
/// checked during signature verification and never consulted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Check that a token grants the `required` permission.
pub fn check_permissions(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissions)?;

    if !permissions.iter().any(|granted| granted == required) {
        return Err(AuthError::PermissionDenied(required.to_string()));
    }

    Ok(())
}
