use std::env;

/// Non-secret application settings loaded from the environment
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: String,
    /// Registrations with this email are assigned the Administrator role
    pub admin_email: Option<String>,
    pub mail_sender: String,
    pub mail_subject_prefix: String,
    /// Validity of confirmation / reset / email-change links, in seconds
    pub token_ttl_secs: i64,
}

impl AppSettings {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://inkpost.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let admin_email = env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty());

        let mail_sender =
            env::var("MAIL_SENDER").unwrap_or_else(|_| "Inkpost <noreply@inkpost.dev>".to_string());

        let mail_subject_prefix =
            env::var("MAIL_SUBJECT_PREFIX").unwrap_or_else(|_| "[Inkpost]".to_string());

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Self {
            database_url,
            bind_addr,
            admin_email,
            mail_sender,
            mail_subject_prefix,
            token_ttl_secs,
        }
    }
}
