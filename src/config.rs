use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
}

/// Where payment screenshots are written
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files on local disk, served back under `public_base_url`
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    /// Object-storage REST endpoint (`PUT {endpoint}/object/{bucket}/{key}`)
    Http {
        endpoint: String,
        bucket: String,
        token: String,
    },
}

/// SMTP settings for confirmation emails
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    /// `None` means confirmations are only logged
    pub smtp: Option<SmtpConfig>,
    pub log_level: String,
    pub log_format: String,
    pub http_port: u16,
    pub environment: String,
    pub max_upload_bytes: usize,
    pub registration_timeout_secs: u64,
    pub default_pass_id: String,
    pub catalog_path: Option<PathBuf>,
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required")?;

        let max_connections = parse_env::<u32>("DATABASE_MAX_CONNECTIONS").unwrap_or(10);
        let acquire_timeout_secs = parse_env::<u64>("DATABASE_ACQUIRE_TIMEOUT_SECS").unwrap_or(30);
        let idle_timeout_secs = parse_env::<u64>("DATABASE_IDLE_TIMEOUT_SECS").unwrap_or(600); // 10 minutes
        let max_lifetime_secs = parse_env::<u64>("DATABASE_MAX_LIFETIME_SECS").unwrap_or(1800); // 30 minutes
        let test_before_acquire = parse_env::<bool>("DATABASE_TEST_BEFORE_ACQUIRE").unwrap_or(true);

        if max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            test_before_acquire,
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/gusto".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
        }
    }
}

impl StorageConfig {
    /// Create storage config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());

        match backend.to_lowercase().as_str() {
            "local" => Ok(StorageConfig::Local {
                root: env::var("STORAGE_LOCAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./uploads")),
                public_base_url: env::var("STORAGE_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/uploads".to_string()),
            }),
            "http" => {
                let endpoint = env::var("STORAGE_ENDPOINT")
                    .map_err(|_| "STORAGE_ENDPOINT is required when STORAGE_BACKEND=http")?;
                let bucket = env::var("STORAGE_BUCKET")
                    .map_err(|_| "STORAGE_BUCKET is required when STORAGE_BACKEND=http")?;
                let token = env::var("STORAGE_TOKEN")
                    .map_err(|_| "STORAGE_TOKEN is required when STORAGE_BACKEND=http")?;
                Ok(StorageConfig::Http {
                    endpoint: endpoint.trim_end_matches('/').to_string(),
                    bucket,
                    token,
                })
            }
            other => Err(format!(
                "Invalid STORAGE_BACKEND: {}. Must be one of: [\"local\", \"http\"]",
                other
            )),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            root: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8080/uploads".to_string(),
        }
    }
}

impl SmtpConfig {
    /// Returns `Ok(None)` when `SMTP_HOST` is not set
    pub fn from_env() -> Result<Option<Self>, String> {
        let host = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => host,
            _ => return Ok(None),
        };

        let port = parse_env::<u16>("SMTP_PORT").unwrap_or(587);
        let username = env::var("SMTP_USERNAME")
            .map_err(|_| "SMTP_USERNAME is required when SMTP_HOST is set")?;
        let password = env::var("SMTP_PASSWORD")
            .map_err(|_| "SMTP_PASSWORD is required when SMTP_HOST is set")?;
        let from_email = env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| username.clone());
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Gusto".to_string());

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            from_email,
            from_name,
        }))
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        let smtp = SmtpConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
        let http_port = parse_env::<u16>("HTTP_PORT").unwrap_or(8080);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let max_upload_bytes = parse_env::<usize>("MAX_UPLOAD_BYTES").unwrap_or(5 * 1024 * 1024);
        let registration_timeout_secs = parse_env::<u64>("REGISTRATION_TIMEOUT_SECS").unwrap_or(30);
        let default_pass_id = env::var("DEFAULT_PASS_ID").unwrap_or_else(|_| "all-access".to_string());
        let catalog_path = env::var("CATALOG_PATH").ok().map(PathBuf::from);

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&log_format.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_FORMAT: {}. Must be one of: {:?}",
                log_format, valid_log_formats
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        if registration_timeout_secs == 0 {
            return Err("REGISTRATION_TIMEOUT_SECS must be greater than 0".to_string());
        }

        if max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }

        Ok(Self {
            database,
            storage,
            smtp,
            log_level: log_level.to_lowercase(),
            log_format: log_format.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
            max_upload_bytes,
            registration_timeout_secs,
            default_pass_id,
            catalog_path,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration_timeout_secs)
    }

    pub fn is_json_logging(&self) -> bool {
        self.log_format == "json"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            smtp: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            http_port: 8080,
            environment: "development".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            registration_timeout_secs: 30,
            default_pass_id: "all-access".to_string(),
            catalog_path: None,
        }
    }
}
