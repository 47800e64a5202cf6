//! User service configuration.

use std::env;

use common::{env_or, CacheConfig, DatabaseConfig, ServiceConfig};

const SERVICE_NAME: &str = "user-service";
const DEFAULT_PORT: u16 = 8081;

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Bind address and service identity
    pub service: ServiceConfig,
    /// Postgres connection settings
    pub database: DatabaseConfig,
    /// Redis cache settings; `None` runs the service without a cache
    pub cache: Option<CacheConfig>,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_defaults = DatabaseConfig::default();
        let cache_defaults = CacheConfig::default();

        Self {
            service: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                host: env::var("USER_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("USER_SERVICE_PORT", DEFAULT_PORT),
            },
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(database_defaults.url),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    database_defaults.max_connections,
                ),
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    database_defaults.min_connections,
                ),
            },
            cache: env::var("USER_SERVICE_REDIS_URL")
                .or_else(|_| env::var("REDIS_URL"))
                .ok()
                .map(|url| CacheConfig {
                    url,
                    default_ttl_seconds: env_or(
                        "CACHE_TTL_SECONDS",
                        cache_defaults.default_ttl_seconds,
                    ),
                }),
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig::default(),
            cache: None,
        }
    }
}
