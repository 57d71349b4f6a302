use crate::auth::jwt::JwtConfig;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development; override via environment in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Shared secret the upload provider signs completion callbacks with.
    pub upload_callback_secret: String,
    /// Lifetime of cached read results in seconds (default: `60`).
    pub cache_ttl_secs: u64,
    /// Require the anchored text to still match before applying a suggestion.
    pub verify_anchor_text: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `UPLOAD_CALLBACK_SECRET`        | required                |
    /// | `CACHE_TTL_SECS`                | `60`                    |
    /// | `SUGGESTION_VERIFY_ANCHOR_TEXT` | `false`                 |
    /// | `LOG_FORMAT`                    | `text`                  |
    ///
    /// # Panics
    ///
    /// Panics on missing required values or unparsable numbers/flags.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_callback_secret = std::env::var("UPLOAD_CALLBACK_SECRET")
            .expect("UPLOAD_CALLBACK_SECRET must be set in the environment");
        assert!(
            !upload_callback_secret.is_empty(),
            "UPLOAD_CALLBACK_SECRET must not be empty"
        );

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let verify_anchor_text: bool = std::env::var("SUGGESTION_VERIFY_ANCHOR_TEXT")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SUGGESTION_VERIFY_ANCHOR_TEXT must be true or false");

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => panic!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            upload_callback_secret,
            cache_ttl_secs,
            verify_anchor_text,
            log_format,
        }
    }
}
