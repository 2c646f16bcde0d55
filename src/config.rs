use std::env;

use time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub mongodb_url: String,
    pub mongodb_database: String,

    // JWT
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,

    // Password hashing (Argon2 cost)
    pub password_hash_cost: u32,
    pub password_hash_memory_kib: u32,

    // Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    pub max_upload_bytes: usize,

    // Media host
    pub cloudinary: CloudinaryConfig,

    // Mail (disabled when EMAIL_HOST is unset)
    pub email: Option<EmailConfig>,
    pub contact_notify_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let jwt_expires_in = env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "7d".to_string());

        Ok(Self {
            // Database
            mongodb_url: env::var("MONGODB_URL")
                .map_err(|_| ConfigError::Missing("MONGODB_URL"))?,
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "portfolio".to_string()),

            // JWT
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expires_in: parse_duration(&jwt_expires_in)
                .ok_or(ConfigError::Invalid("JWT_EXPIRES_IN"))?,

            password_hash_cost: parse_or("PASSWORD_HASH_COST", 2)?,
            password_hash_memory_kib: parse_or("PASSWORD_HASH_MEMORY_KIB", 19_456)?,

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000)?,
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            rate_limit_max: parse_or("RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 900)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,

            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: env::var("CLOUDINARY_API_KEY")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: env::var("CLOUDINARY_API_SECRET")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            },

            email: EmailConfig::from_env()?,
            contact_notify_email: env::var("CONTACT_NOTIFY_EMAIL").ok(),
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(host) = env::var("EMAIL_HOST") else {
            return Ok(None);
        };
        let username = env::var("EMAIL_USER").ok();
        let from = env::var("EMAIL_FROM")
            .ok()
            .or_else(|| username.clone())
            .ok_or(ConfigError::Missing("EMAIL_FROM"))?;

        Ok(Some(Self {
            host,
            port: parse_or("EMAIL_PORT", 587)?,
            username,
            password: env::var("EMAIL_PASS").ok(),
            from,
        }))
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

/// Parse a lifetime such as `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount.parse().ok()?;

    let duration = match unit.trim() {
        "" | "s" => Duration::seconds(amount),
        "m" => Duration::minutes(amount),
        "h" => Duration::hours(amount),
        "d" => Duration::days(amount),
        "w" => Duration::weeks(amount),
        _ => return None,
    };

    (duration.is_positive()).then_some(duration)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
