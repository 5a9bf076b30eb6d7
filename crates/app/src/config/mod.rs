use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::{
    commands::Command,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/bankdesk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub email: String,
    /// Only ever read from the config file or `BANKDESK_PASSWORD`.
    pub password: String,
    pub timezone: String,
    pub level: String,
    pub per_page: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            email: String::new(),
            password: String::new(),
            timezone: "Europe/Rome".to_string(),
            level: "info".to_string(),
            per_page: 10,
        }
    }
}

impl AppConfig {
    pub fn has_credentials(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))?;
        Ok(chrono::Utc::now().with_timezone(&tz).date_naive())
    }
}

#[derive(Debug, Parser)]
#[command(name = "bankdesk", version, about = "Personal banking administration")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override API root (e.g. http://localhost:8000/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override login email (password is never read from CLI).
    #[arg(long)]
    email: Option<String>,
    /// Override timezone (IANA name) used to resolve "today".
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BANKDESK"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_need_both_fields() {
        let mut config = AppConfig::default();
        assert!(!config.has_credentials());
        config.email = "me@example.com".to_string();
        assert!(!config.has_credentials());
        config.password = "pw".to_string();
        assert!(config.has_credentials());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.today(), Err(AppError::Timezone(_))));
        assert!(AppConfig::default().today().is_ok());
    }
}
