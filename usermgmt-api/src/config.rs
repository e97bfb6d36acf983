/// Configuration management for the API server
///
/// Configuration is read from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any
///   (default: http://localhost:3000)
/// - `USER_DELETE_MODE`: `hard` or `soft` (default: hard)
/// - `USER_NAME_LENGTH_CHECK`: Enforce name length bounds (default: true)
/// - `USER_NAME_MIN_LENGTH` / `USER_NAME_MAX_LENGTH`: Bounds (default: 2 / 50)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use usermgmt_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;
use usermgmt_shared::{
    models::user::{NameLengthPolicy, NAME_MAX_CHARS},
    service::DeletePolicy,
};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// User rules
    pub users: UserRulesConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Origins allowed by CORS; a single `*` means any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Business rule switches for the user service
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRulesConfig {
    pub delete_policy: DeletePolicy,

    pub name_policy: NameLengthPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a variable has an
    /// invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = ApiConfig::default();

        let host = env::var("API_HOST").unwrap_or(defaults.host);
        let port = parse_var("API_PORT", defaults.port)?;
        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.cors_origins,
        };

        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 10u32)?;

        let delete_policy = parse_var("USER_DELETE_MODE", DeletePolicy::default())?;
        let name_policy = if parse_var("USER_NAME_LENGTH_CHECK", true)? {
            bounded_name_policy(
                parse_var("USER_NAME_MIN_LENGTH", 2usize)?,
                parse_var("USER_NAME_MAX_LENGTH", 50usize)?,
            )?
        } else {
            NameLengthPolicy::Unbounded
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            users: UserRulesConfig {
                delete_policy,
                name_policy,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Reads and parses `name`, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Name bounds must be ordered and fit the `users` name columns
fn bounded_name_policy(min: usize, max: usize) -> anyhow::Result<NameLengthPolicy> {
    if min > max {
        anyhow::bail!("USER_NAME_MIN_LENGTH ({min}) exceeds USER_NAME_MAX_LENGTH ({max})");
    }
    if max > NAME_MAX_CHARS {
        anyhow::bail!("USER_NAME_MAX_LENGTH ({max}) exceeds the column limit of {NAME_MAX_CHARS}");
    }
    Ok(NameLengthPolicy::Bounded { min, max })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
