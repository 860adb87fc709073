use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;

use crate::config::AuthConfig;

use super::{AuthError, Claims, Jwks};

struct CachedJwks {
    jwks: Jwks,
    fetched_at: Instant,
}

/// Verifies bearer tokens against the provider's RSA signing keys.
///
/// The key set is fetched lazily from the JWKS endpoint and cached for
/// `cache_ttl`. A token whose `kid` is absent from the cached set is
/// rejected without a refetch, so a stream of forged tokens cannot turn
/// into a stream of outbound requests to the provider.
pub struct TokenVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
    cache_ttl: Duration,
    cached: RwLock<Option<CachedJwks>>,
}

impl TokenVerifier {
    /// Build a verifier from auth configuration.
    ///
    /// Fails when the provider domain or audience is missing, or when none
    /// of the configured algorithm names parse.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let jwks_url = config.jwks_url().ok_or(AuthError::NotConfigured)?;
        let issuer = config.issuer().ok_or(AuthError::NotConfigured)?;
        let audience = config.audience.clone().ok_or(AuthError::NotConfigured)?;

        let mut algorithms = Vec::new();
        for name in &config.algorithms {
            match name.parse::<Algorithm>() {
                Ok(alg) => algorithms.push(alg),
                Err(_) => tracing::warn!("Ignoring unsupported signing algorithm: {}", name),
            }
        }
        if algorithms.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            jwks_url,
            issuer,
            audience,
            algorithms,
            cache_ttl: Duration::from_secs(config.jwks_cache_secs),
            cached: RwLock::new(None),
        })
    }

    /// Verify a bearer token and return its claims.
    ///
    /// The token header is parsed before any key-set work, so a malformed
    /// token never costs a provider round trip.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|err| {
            tracing::debug!("Unparseable token header: {}", err);
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or(AuthError::UnknownKey)?;

        let jwks = self.current_jwks().await?;
        let key = jwks.find(&kid).ok_or(AuthError::UnknownKey)?;

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|err| {
            tracing::debug!("Unusable signing key {}: {}", kid, err);
            AuthError::UnknownKey
        })?;

        // The seed algorithm is immediately replaced by the configured
        // list; from_config guarantees the list is non-empty.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = self.algorithms.clone();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                _ => {
                    tracing::debug!("Token rejected: {}", err);
                    AuthError::InvalidToken
                }
            }
        })?;

        Ok(data.claims)
    }

    /// Return the cached key set, refreshing from the provider when the TTL
    /// has lapsed. A TTL of zero disables caching entirely.
    async fn current_jwks(&self) -> Result<Jwks, AuthError> {
        if self.cache_ttl.is_zero() {
            return self.fetch_jwks().await;
        }

        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        let mut cached = self.cached.write().await;
        *cached = Some(CachedJwks {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });

        Ok(jwks)
    }

    async fn fetch_jwks(&self) -> Result<Jwks, AuthError> {
        let jwks: Jwks = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!("Fetched {} signing keys from {}", jwks.keys.len(), self.jwks_url);
        Ok(jwks)
    }

    /// Verifier with a pre-seeded key set, for exercising verification
    /// without a live provider.
    #[cfg(test)]
    pub(crate) fn with_fixed_keys(issuer: &str, audience: &str, jwks: Jwks) -> Self {
        Self {
            client: reqwest::Client::new(),
            jwks_url: format!("{}.well-known/jwks.json", issuer),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            algorithms: vec![Algorithm::RS256],
            cache_ttl: Duration::from_secs(3600),
            cached: RwLock::new(Some(CachedJwks {
                jwks,
                fetched_at: Instant::now(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::routing::get;
    use axum::{Json, Router};

    use super::*;
    use crate::testing::{
        mint_expired_token, mint_token, mint_token_no_kid, mint_token_unknown_kid,
        mint_token_wrong_audience, mint_token_wrong_issuer, test_jwks, TEST_AUDIENCE, TEST_ISSUER,
        TEST_SUBJECT,
    };

    fn verifier() -> TokenVerifier {
        TokenVerifier::with_fixed_keys(TEST_ISSUER, TEST_AUDIENCE, test_jwks())
    }

    /// Serve the fixture key set on a loopback port, counting fetches.
    async fn serve_jwks() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let route_hits = hits.clone();
        let app = Router::new().route(
            "/.well-known/jwks.json",
            get(move || {
                let hits = route_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(test_jwks())
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        (format!("http://{}/.well-known/jwks.json", addr), hits)
    }

    /// Verifier with an empty cache pointed at a local key-set server.
    fn fetching_verifier(jwks_url: String, cache_ttl: Duration) -> TokenVerifier {
        TokenVerifier {
            client: reqwest::Client::new(),
            jwks_url,
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            algorithms: vec![Algorithm::RS256],
            cache_ttl,
            cached: RwLock::new(None),
        }
    }

    #[tokio::test]
    async fn test_verify_round_trip() {
        let token = mint_token(&["get:actors", "post:movies"]);
        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.sub.as_deref(), Some(TEST_SUBJECT));
        let permissions = claims.permissions.unwrap();
        assert!(permissions.contains(&"get:actors".to_string()));
        assert!(permissions.contains(&"post:movies".to_string()));
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let token = mint_expired_token(&["get:actors"]);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_audience() {
        let token = mint_token_wrong_audience(&["get:actors"]);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_issuer() {
        let token = mint_token_wrong_issuer(&["get:actors"]);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_kid() {
        let token = mint_token_unknown_kid(&["get:actors"]);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey));
    }

    #[tokio::test]
    async fn test_verify_rejects_token_without_kid() {
        let token = mint_token_no_kid(&["get:actors"]);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey));
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_key_set_fetched_once_within_ttl() {
        let (url, hits) = serve_jwks().await;
        let verifier = fetching_verifier(url, Duration::from_secs(300));

        let token = mint_token(&["get:actors"]);
        verifier.verify(&token).await.unwrap();
        verifier.verify(&token).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_fetches_every_time() {
        let (url, hits) = serve_jwks().await;
        let verifier = fetching_verifier(url, Duration::ZERO);

        let token = mint_token(&["get:actors"]);
        verifier.verify(&token).await.unwrap();
        verifier.verify(&token).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lapsed_cache_entry_is_refreshed() {
        let (url, hits) = serve_jwks().await;
        let verifier = fetching_verifier(url, Duration::from_millis(50));

        let token = mint_token(&["get:actors"]);
        verifier.verify(&token).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        verifier.verify(&token).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_requires_provider_settings() {
        let mut config = AuthConfig {
            domain: Some("casting.us.auth0.com".to_string()),
            client_id: None,
            algorithms: vec!["RS256".to_string()],
            audience: Some("casting".to_string()),
            jwks_cache_secs: 300,
        };
        assert!(TokenVerifier::from_config(&config).is_ok());

        config.domain = None;
        assert!(matches!(
            TokenVerifier::from_config(&config),
            Err(AuthError::NotConfigured)
        ));

        config.domain = Some("casting.us.auth0.com".to_string());
        config.audience = None;
        assert!(matches!(
            TokenVerifier::from_config(&config),
            Err(AuthError::NotConfigured)
        ));

        config.audience = Some("casting".to_string());
        config.algorithms = vec!["NOPE256".to_string()];
        assert!(matches!(
            TokenVerifier::from_config(&config),
            Err(AuthError::NotConfigured)
        ));
    }
}
