//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP bind address
    pub http_host: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory for rolling log files; console only when unset
    pub log_dir: Option<String>,
    /// sqlx pool size
    pub db_max_connections: u32,
    /// How many fresh product codes to try before giving up
    pub product_code_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            http_port: 5000,
            http_host: "0.0.0.0".into(),
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            db_max_connections: 10,
            product_code_attempts: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: parse_var("HTTP_PORT")?.unwrap_or(defaults.http_port),
            http_host: std::env::var("HTTP_HOST").unwrap_or(defaults.http_host),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.db_max_connections),
            product_code_attempts: parse_var("PRODUCT_CODE_ATTEMPTS")?
                .unwrap_or(defaults.product_code_attempts)
                .max(1),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Parse an optional numeric variable; a present but malformed value is an error
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, BoxError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{name} has an invalid value: {raw}").into()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert!(!config.is_production());
        assert_eq!(config.product_code_attempts, 5);
    }
}
