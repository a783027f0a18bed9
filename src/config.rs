use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub registration: RegistrationMode,
    pub company_email_domain: String,
    pub backup_dir: PathBuf,
    pub media_dir: PathBuf,
    pub backup_retention_days: i64,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    pub admin_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("ASSETDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_HOST: {e}"))?;

        let port: u16 = env_or("ASSETDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_PORT: {e}"))?;

        let base_url = env_or("ASSETDESK_BASE_URL", &format!("http://{host}:{port}"));

        let registration = match env_or("ASSETDESK_REGISTRATION", "open").as_str() {
            "closed" => RegistrationMode::Closed,
            _ => RegistrationMode::Open,
        };

        let company_email_domain = env_or("ASSETDESK_EMAIL_DOMAIN", "example.com");

        let backup_dir = PathBuf::from(env_or("ASSETDESK_BACKUP_DIR", "backups"));
        let media_dir = PathBuf::from(env_or("ASSETDESK_MEDIA_DIR", "media"));

        let backup_retention_days: i64 = env_or("ASSETDESK_BACKUP_RETENTION_DAYS", "30")
            .parse()
            .map_err(|e| format!("Invalid ASSETDESK_BACKUP_RETENTION_DAYS: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("ASSETDESK_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid ASSETDESK_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("ASSETDESK_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("ASSETDESK_SMTP_HOST").ok(),
            std::env::var("ASSETDESK_SMTP_PORT").ok(),
            std::env::var("ASSETDESK_SMTP_USER").ok(),
            std::env::var("ASSETDESK_SMTP_PASS").ok(),
            std::env::var("ASSETDESK_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid ASSETDESK_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        let admin_email = std::env::var("ASSETDESK_ADMIN_EMAIL").ok();

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            base_url,
            registration,
            company_email_domain,
            backup_dir,
            media_dir,
            backup_retention_days,
            trusted_proxies,
            log_level,
            smtp,
            admin_email,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
