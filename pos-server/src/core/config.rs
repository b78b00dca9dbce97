use crate::auth::JwtConfig;

/// Issuing business identity and customer fallbacks.
///
/// Copied onto every invoice at issuance time; changing these values
/// never touches already-issued documents.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub name: String,
    pub nit: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Name used when no customer can be identified
    pub default_customer_name: String,
    /// Generic consumer tax id used when no NIT is known
    pub default_customer_nit: String,
}

impl BusinessConfig {
    pub fn from_env() -> Self {
        Self {
            name: std::env::var("BUSINESS_NAME").unwrap_or_else(|_| "Mi Restaurante".into()),
            nit: std::env::var("BUSINESS_NIT").unwrap_or_else(|_| "900000000-0".into()),
            address: std::env::var("BUSINESS_ADDRESS")
                .unwrap_or_else(|_| "Dirección no configurada".into()),
            phone: std::env::var("BUSINESS_PHONE").ok(),
            email: std::env::var("BUSINESS_EMAIL").ok(),
            default_customer_name: std::env::var("DEFAULT_CUSTOMER_NAME")
                .unwrap_or_else(|_| "CONSUMIDOR FINAL".into()),
            default_customer_nit: std::env::var("DEFAULT_CUSTOMER_NIT")
                .unwrap_or_else(|_| "222222222222".into()),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | tracing filter |
/// | JWT_SECRET | (dev default) | HS256 signing secret |
/// | BUSINESS_NAME | Mi Restaurante | issuer name on invoices |
/// | BUSINESS_NIT | 900000000-0 | issuer tax id |
/// | BUSINESS_ADDRESS | Dirección no configurada | issuer address |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, holds the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT auth configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Tracing filter, e.g. "info" or "pos_server=debug"
    pub log_level: String,
    /// Issuer identity stamped on invoices
    pub business: BusinessConfig,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            business: BusinessConfig::from_env(),
        }
    }

    /// Override the paths and port, used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Database path inside the working directory
    pub fn db_path(&self) -> String {
        format!("{}/pos.db", self.work_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
