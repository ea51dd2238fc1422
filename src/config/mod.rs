use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use rand::{TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// Prefix of every environment variable read into [`AppConfig`].
pub const ENV_PREFIX: &str = "STICKER_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Shared administrator password (plain text)
    pub password: String,
    /// JWT signing secret; a random per-process key is used when absent
    pub auth_key: Option<String>,
    /// Location of the registration table
    pub table_path: PathBuf,
    /// TrueType font used for sticker text
    pub font_path: PathBuf,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Sender address of sticker emails
    pub mail_from: String,
    /// Upper bound for one email delivery
    pub mail_timeout_secs: u64,
    /// Lifetime of an admin session token
    pub session_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            password: "admin".to_string(),
            auth_key: None,
            table_path: PathBuf::from("./db/records.csv"),
            font_path: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            mail_from: "your_email@example.com".to_string(),
            mail_timeout_secs: 30,
            session_ttl_secs: 8 * 60 * 60,
        }
    }
}

static FALLBACK_SECRET_KEY: LazyLock<Vec<u8>> = LazyLock::new(|| {
    let mut secret = vec![0u8; 32];
    OsRng
        .try_fill_bytes(&mut secret)
        .expect("Failed to generate random secret key");
    secret
});

impl AppConfig {
    /// Read `.env` (if any) and the `STICKER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<AppConfig>()
            .context("failed to read STICKER_* configuration from the environment")?;
        info!(
            "Configuration loaded: table {:?}, font {:?}, smtp {}:{}",
            config.table_path, config.font_path, config.smtp_host, config.smtp_port
        );
        Ok(config)
    }

    pub fn get_jwt_secret_key(&self) -> Vec<u8> {
        match self.auth_key.as_ref() {
            Some(auth_key) => auth_key.as_bytes().to_vec(),
            None => FALLBACK_SECRET_KEY.clone(),
        }
    }

    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
