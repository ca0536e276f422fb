use std::path::PathBuf;

use verde_core::storage::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the database and auth-provider settings has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Access-token validation settings.
    pub jwt: JwtConfig,
    pub supabase: SupabaseConfig,
    /// Where password-recovery emails send the user back to.
    pub auth_redirect_url: Option<String>,
    pub storage: StorageConfig,
    pub geocoder: GeocoderConfig,
    pub log_format: LogFormat,
}

/// Hosted auth/storage project settings.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Elevated key; storage uses it instead of the anon key when set.
    pub service_role_key: Option<String>,
}

impl SupabaseConfig {
    /// Key used for storage requests.
    pub fn storage_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }
}

/// Which [`verde_cloud::storage::ObjectStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Supabase,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend (default: `./storage`).
    pub local_root: PathBuf,
    /// Upload size limit in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Sent as the `From` header when set.
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Read an env var, treating an empty value as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_env(name: &str) -> String {
    optional_env(name).unwrap_or_else(|| panic!("{name} must be set in the environment"))
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                |
    /// |-----------------------------|----------------------------------------|
    /// | `HOST`                      | `0.0.0.0`                              |
    /// | `PORT`                      | `3000`                                 |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`                |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                                   |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                                   |
    /// | `SUPABASE_URL`              | **required**                           |
    /// | `SUPABASE_ANON_KEY`         | **required**                           |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | --                                     |
    /// | `SUPABASE_JWT_SECRET`       | **required**                           |
    /// | `AUTH_REDIRECT_URL`         | --                                     |
    /// | `STORAGE_BACKEND`           | `supabase`                             |
    /// | `LOCAL_STORAGE_ROOT`        | `./storage`                            |
    /// | `MAX_UPLOAD_BYTES`          | `10485760`                             |
    /// | `GEOCODER_BASE_URL`         | `https://nominatim.openstreetmap.org`  |
    /// | `GEOCODER_USER_AGENT`       | `VerdePM/0.1`                          |
    /// | `GEOCODER_CONTACT_EMAIL`    | --                                     |
    /// | `LOG_FORMAT`                | `pretty`                               |
    ///
    /// # Panics
    ///
    /// Panics on a missing required variable or an unparsable value, so
    /// misconfiguration fails at startup.
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let supabase = SupabaseConfig {
            url: required_env("SUPABASE_URL"),
            anon_key: required_env("SUPABASE_ANON_KEY"),
            service_role_key: optional_env("SUPABASE_SERVICE_ROLE_KEY"),
        };

        let backend = match optional_env("STORAGE_BACKEND").as_deref() {
            None | Some("supabase") => StorageBackend::Supabase,
            Some("local") => StorageBackend::Local,
            Some(other) => panic!("STORAGE_BACKEND must be 'supabase' or 'local', got '{other}'"),
        };

        let storage = StorageConfig {
            backend,
            local_root: optional_env("LOCAL_STORAGE_ROOT")
                .unwrap_or_else(|| "./storage".into())
                .into(),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let geocoder = GeocoderConfig {
            base_url: optional_env("GEOCODER_BASE_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org".into()),
            user_agent: optional_env("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| "VerdePM/0.1".into()),
            contact_email: optional_env("GEOCODER_CONTACT_EMAIL"),
        };

        let log_format = match optional_env("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            supabase,
            auth_redirect_url: optional_env("AUTH_REDIRECT_URL"),
            storage,
            geocoder,
            log_format,
        }
    }
}
