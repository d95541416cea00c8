//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use publisher_infra::DatabaseConfig;

/// Default request body limit, large enough for inline images in post markup.
const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub body_limit: usize,
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 1),
            connect_timeout: Duration::from_secs(env_or("DB_CONNECT_TIMEOUT_SECS", 10)),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 3000),
            body_limit: env_or("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT),
            database,
        }
    }
}

/// Read and parse an environment variable, falling back on absence or garbage.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or::<u16>(None, 3000), 3000);
        assert_eq!(parse_or::<u16>(Some("not-a-port"), 3000), 3000);
        assert_eq!(parse_or::<u16>(Some(" 8080 "), 3000), 8080);
    }
}
