use std::env;

use crate::error::StartupError;

const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DEFAULT_DATABASE_URL: &str = "sqlite://training_bot.db";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub database_url: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let token = lookup(TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or(StartupError::MissingEnvVar(TOKEN_ENV))?;

        let database_url = lookup(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Self { token, database_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_fatal() {
        let err = BotConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, StartupError::MissingEnvVar("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let err = BotConfig::from_lookup(|key| (key == TOKEN_ENV).then(|| "  ".to_string()))
            .unwrap_err();
        assert!(matches!(err, StartupError::MissingEnvVar(_)));
    }

    #[test]
    fn database_url_defaults_to_local_file() {
        let config =
            BotConfig::from_lookup(|key| (key == TOKEN_ENV).then(|| "123:abc".to_string())).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn database_url_from_env() {
        let config = BotConfig::from_lookup(|key| match key {
            TOKEN_ENV => Some("t".to_string()),
            DATABASE_URL_ENV => Some("sqlite::memory:".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
    }
}
