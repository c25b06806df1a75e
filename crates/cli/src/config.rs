//! Startup configuration, read once from the environment.

use anyhow::{Context, Result, bail};

use banko_bank::LedgerConfig;
use banko_observability::LogFormat;

pub const ADMIN_USERNAME_VAR: &str = "BANKO_ADMIN_USERNAME";
pub const ADMIN_PASSWORD_VAR: &str = "BANKO_ADMIN_PASSWORD";
pub const MAX_LOANS_VAR: &str = "BANKO_MAX_LOANS";
pub const LOANS_ENABLED_VAR: &str = "BANKO_LOANS_ENABLED";
pub const LOG_FORMAT_VAR: &str = "BANKO_LOG_FORMAT";

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub ledger: LedgerConfig,
    pub log_format: LogFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            ledger: LedgerConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep their
    /// defaults, malformed ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(username) = lookup(ADMIN_USERNAME_VAR) {
            config.admin_username = username;
        }
        if let Some(password) = lookup(ADMIN_PASSWORD_VAR) {
            config.admin_password = password;
        }
        if let Some(raw) = lookup(MAX_LOANS_VAR) {
            config.ledger.max_loans_per_account = raw.trim().parse::<u32>().with_context(|| {
                format!("{MAX_LOANS_VAR} must be a non-negative integer, got {raw:?}")
            })?;
        }
        if let Some(raw) = lookup(LOANS_ENABLED_VAR) {
            config.ledger.loans_enabled = parse_flag(&raw)
                .with_context(|| format!("invalid {LOANS_ENABLED_VAR}"))?;
        }
        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            config.log_format = raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?;
        }

        Ok(config)
    }

    pub fn uses_default_credentials(&self) -> bool {
        self.admin_username == DEFAULT_ADMIN_USERNAME
            && self.admin_password == DEFAULT_ADMIN_PASSWORD
    }

    pub fn admin_credentials_match(&self, username: &str, password: &str) -> bool {
        self.admin_username == username && self.admin_password == password
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected true/false, got {raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ShellConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert!(config.uses_default_credentials());
        assert!(config.ledger.loans_enabled);
        assert_eq!(config.ledger.max_loans_per_account, 2);
    }

    #[test]
    fn variables_override_defaults() {
        let config = ShellConfig::from_lookup(lookup_from(&[
            (ADMIN_USERNAME_VAR, "root"),
            (ADMIN_PASSWORD_VAR, "s3cret"),
            (MAX_LOANS_VAR, "5"),
            (LOANS_ENABLED_VAR, "off"),
            (LOG_FORMAT_VAR, "json"),
        ]))
        .unwrap();

        assert!(!config.uses_default_credentials());
        assert!(config.admin_credentials_match("root", "s3cret"));
        assert!(!config.admin_credentials_match("admin", "admin"));
        assert_eq!(config.ledger.max_loans_per_account, 5);
        assert!(!config.ledger.loans_enabled);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = ShellConfig::from_lookup(lookup_from(&[(MAX_LOANS_VAR, "two")])).unwrap_err();
        assert!(err.to_string().contains(MAX_LOANS_VAR));

        assert!(ShellConfig::from_lookup(lookup_from(&[(LOANS_ENABLED_VAR, "maybe")])).is_err());
        assert!(ShellConfig::from_lookup(lookup_from(&[(LOG_FORMAT_VAR, "xml")])).is_err());
    }
}
