/// Configuration management for the API server
///
/// Configuration is loaded from environment variables once at startup into
/// an immutable value. The token-signing secret is process-wide: it is
/// injected explicitly where needed and never fetched ad hoc inside request
/// handling, and the process refuses to start without it.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `TOKEN_SECRET`: secret key for session-token signing (required, ≥ 32 bytes)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `RUST_LOG`: log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use inkpost_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session-token configuration
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Session-token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session-token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub token_secret: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails fast if `DATABASE_URL` or `TOKEN_SECRET` are missing, or if
    /// `TOKEN_SECRET` is shorter than 32 bytes — the server must never sign
    /// tokens with an empty or weak secret.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let token_secret = env::var("TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("TOKEN_SECRET environment variable is required"))?;

        if token_secret.len() < 32 {
            anyhow::bail!("TOKEN_SECRET must be at least 32 characters long");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig { token_secret },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // from_env tests mutate process environment; serialize them
    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                token_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_from_env_rejects_short_secret() {
        let _guard = env_lock().lock().unwrap();

        env::set_var("DATABASE_URL", "postgresql://localhost/test");
        env::set_var("TOKEN_SECRET", "too-short");

        let result = Config::from_env();

        env::remove_var("TOKEN_SECRET");
        env::remove_var("DATABASE_URL");

        let err = result.expect_err("a short TOKEN_SECRET must refuse startup");
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_from_env_requires_token_secret() {
        let _guard = env_lock().lock().unwrap();

        env::set_var("DATABASE_URL", "postgresql://localhost/test");
        env::remove_var("TOKEN_SECRET");

        let result = Config::from_env();

        env::remove_var("DATABASE_URL");

        let err = result.expect_err("a missing TOKEN_SECRET must refuse startup");
        assert!(err.to_string().contains("TOKEN_SECRET"));
    }

    #[test]
    fn test_from_env_accepts_valid_secret() {
        let _guard = env_lock().lock().unwrap();

        env::set_var("DATABASE_URL", "postgresql://localhost/test");
        env::set_var("TOKEN_SECRET", "test-secret-key-at-least-32-bytes-long");

        let result = Config::from_env();

        env::remove_var("TOKEN_SECRET");
        env::remove_var("DATABASE_URL");

        let config = result.expect("a 32-byte secret must load");
        assert_eq!(config.auth.token_secret.len(), 38);
    }
}
