//! Service configuration resolved from the process environment.

use crate::http::HttpConfig;
use crate::scheduler;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_ANSWER_TOKENS: u32 = 300;
pub const DEFAULT_MAX_RECORDS: usize = 100;
pub const DEFAULT_RETENTION_SCHEDULE: &str = "0 * * * *";

/// Completion provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key for the provider; empty means requests will be rejected upstream.
    pub api_key: String,
    /// Override for OpenAI-compatible endpoints.
    pub base_url: Option<String>,
    pub model: String,
    /// Upper bound on generated answer tokens.
    pub max_answer_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_answer_tokens: DEFAULT_MAX_ANSWER_TOKENS,
        }
    }
}

/// Conversation retention settings.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Record count the log is trimmed back down to.
    pub max_records: usize,
    /// Cron cadence for retention passes. Standard 5-field expressions are
    /// accepted and treated as second zero of the matching minute.
    pub schedule: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            schedule: DEFAULT_RETENTION_SCHEDULE.to_string(),
        }
    }
}

/// Everything the server process needs to start.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub database_path: String,
    /// Explicit vocabulary file. None falls back to ~/.confab/vocabulary.json,
    /// seeded with the built-in list on first run.
    pub vocabulary_path: Option<PathBuf>,
    /// System persona override. None uses the built-in persona.
    pub persona: Option<String>,
    pub provider: ProviderConfig,
    pub retention: RetentionConfig,
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let mut http = HttpConfig::default();
        if let Some(port) = env_var("CONFAB_HTTP_PORT") {
            http.port = port
                .parse()
                .with_context(|| format!("Invalid CONFAB_HTTP_PORT: {port}"))?;
        }
        if let Some(origins) = env_var("CONFAB_CORS_ORIGINS") {
            http.cors_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        let mut provider = ProviderConfig::default();
        if let Some(key) = env_var("OPENAI_API_KEY") {
            provider.api_key = key;
        }
        provider.base_url = env_var("CONFAB_OPENAI_BASE_URL");
        if let Some(model) = env_var("CONFAB_MODEL") {
            provider.model = model;
        }
        if let Some(max_tokens) = env_var("CONFAB_MAX_ANSWER_TOKENS") {
            provider.max_answer_tokens = max_tokens
                .parse()
                .with_context(|| format!("Invalid CONFAB_MAX_ANSWER_TOKENS: {max_tokens}"))?;
        }

        let mut retention = RetentionConfig::default();
        if let Some(max_records) = env_var("CONFAB_MAX_RECORDS") {
            retention.max_records = max_records
                .parse()
                .with_context(|| format!("Invalid CONFAB_MAX_RECORDS: {max_records}"))?;
        }
        if let Some(schedule) = env_var("CONFAB_RETENTION_SCHEDULE") {
            retention.schedule = schedule;
        }

        let config = Self {
            http,
            database_path: crate::paths::ensure_database_path_string()?,
            vocabulary_path: env_var("CONFAB_VOCABULARY").map(PathBuf::from),
            persona: env_var("CONFAB_PERSONA"),
            provider,
            retention,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, at request or trigger time.
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            bail!("CONFAB_MODEL must not be empty");
        }
        if self.provider.max_answer_tokens == 0 {
            bail!("CONFAB_MAX_ANSWER_TOKENS must be at least 1");
        }
        let normalized = scheduler::normalize_cron_expression(&self.retention.schedule);
        cron::Schedule::from_str(&normalized).with_context(|| {
            format!("Invalid retention schedule: {}", self.retention.schedule)
        })?;
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = ProviderConfig::default();
        assert!(provider.api_key.is_empty());
        assert!(provider.base_url.is_none());
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.max_answer_tokens, DEFAULT_MAX_ANSWER_TOKENS);

        let retention = RetentionConfig::default();
        assert_eq!(retention.max_records, DEFAULT_MAX_RECORDS);
        assert_eq!(retention.schedule, DEFAULT_RETENTION_SCHEDULE);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        ServiceConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_blank_model() {
        let mut config = ServiceConfig::default();
        config.provider.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_answer_tokens() {
        let mut config = ServiceConfig::default();
        config.provider.max_answer_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_schedule() {
        let mut config = ServiceConfig::default();
        config.retention.schedule = "not a cron".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_five_field_schedule() {
        let mut config = ServiceConfig::default();
        config.retention.schedule = "30 3 * * *".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_from_env_reads_overrides() {
        let _lock = crate::paths::env_lock();
        let temp = tempfile::tempdir().unwrap();
        unsafe {
            std::env::set_var(crate::paths::CONFAB_DIR_ENV, temp.path());
            std::env::set_var("CONFAB_HTTP_PORT", "8099");
            std::env::set_var("CONFAB_MAX_RECORDS", "25");
            std::env::set_var("CONFAB_MODEL", "gpt-4o-mini");
            std::env::set_var("CONFAB_RETENTION_SCHEDULE", "*/10 * * * *");
        }

        let config = ServiceConfig::from_env();

        unsafe {
            std::env::remove_var(crate::paths::CONFAB_DIR_ENV);
            std::env::remove_var("CONFAB_HTTP_PORT");
            std::env::remove_var("CONFAB_MAX_RECORDS");
            std::env::remove_var("CONFAB_MODEL");
            std::env::remove_var("CONFAB_RETENTION_SCHEDULE");
        }

        let config = config.unwrap();
        assert_eq!(config.http.port, 8099);
        assert_eq!(config.retention.max_records, 25);
        assert_eq!(config.retention.schedule, "*/10 * * * *");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert!(config.database_path.ends_with("confab.db"));
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        let _lock = crate::paths::env_lock();
        let temp = tempfile::tempdir().unwrap();
        unsafe {
            std::env::set_var(crate::paths::CONFAB_DIR_ENV, temp.path());
            std::env::set_var("CONFAB_HTTP_PORT", "not-a-port");
        }

        let result = ServiceConfig::from_env();

        unsafe {
            std::env::remove_var(crate::paths::CONFAB_DIR_ENV);
            std::env::remove_var("CONFAB_HTTP_PORT");
        }

        assert!(result.unwrap_err().to_string().contains("CONFAB_HTTP_PORT"));
    }
}
