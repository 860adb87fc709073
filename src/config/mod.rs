use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub excited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub algorithms: Vec<String>,
    pub audience: Option<String>,
    pub jwks_cache_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl AuthConfig {
    /// Token issuer derived from the tenant domain, e.g. `https://tenant.auth0.com/`.
    pub fn issuer(&self) -> Option<String> {
        self.domain.as_ref().map(|d| format!("https://{}/", d))
    }

    /// Location of the tenant's published signing keys.
    pub fn jwks_url(&self) -> Option<String> {
        self.domain
            .as_ref()
            .map(|d| format!("https://{}/.well-known/jwks.json", d))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides - CASTING_API_PORT wins over the generic PORT
        if let Ok(v) = env::var("CASTING_API_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        } else if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("EXCITED") {
            self.server.excited = v.parse().unwrap_or(self.server.excited);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH0_DOMAIN") {
            self.auth.domain = Some(v);
        }
        if let Ok(v) = env::var("AUTH0_CLIENT_ID") {
            self.auth.client_id = Some(v);
        }
        if let Ok(v) = env::var("ALGORITHMS") {
            let algorithms: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !algorithms.is_empty() {
                self.auth.algorithms = algorithms;
            }
        }
        if let Ok(v) = env::var("API_AUDIENCE") {
            self.auth.audience = Some(v);
        }
        if let Ok(v) = env::var("JWKS_CACHE_SECS") {
            self.auth.jwks_cache_secs = v.parse().unwrap_or(self.auth.jwks_cache_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        self
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                excited: false,
            },
            auth: AuthConfig {
                domain: None,
                client_id: None,
                algorithms: vec!["RS256".to_string()],
                audience: None,
                jwks_cache_secs: 300,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connect_timeout_secs: 30,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
