//! Configuration from environment variables.
//!
//! Lookups go through a closure so tests can feed a map instead of mutating
//! the process environment.

use crate::config::{
    current_year, AppConfig, ExchangeDetails, SmtpSettings, DEFAULT_BUDGET, DEFAULT_SMTP_HOST,
    DEFAULT_SMTP_PORT,
};
use crate::utils::error::{Result, SantaError};

pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const EMAIL_PWD: &str = "EMAIL_PWD";
pub const WISH_LIST: &str = "SECRET_SANTA_WISH_LIST";
pub const EXCHANGE_NAME: &str = "SECRET_SANTA_EXCHANGE_NAME";
pub const YEAR: &str = "SECRET_SANTA_YEAR";
pub const REPLY_TO: &str = "SECRET_SANTA_REPLY_TO";
pub const BUDGET: &str = "SECRET_SANTA_BUDGET";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USERNAME: &str = "SMTP_USERNAME";

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| SantaError::MissingConfigError {
        field: key.to_string(),
    })
}

impl ExchangeDetails {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let year = match lookup(YEAR) {
            Some(year) => year,
            None => {
                let year = current_year();
                tracing::warn!(
                    "{} is not set, defaulting to the current year ({})",
                    YEAR,
                    year
                );
                year
            }
        };

        Ok(Self {
            exchange_name: required(&lookup, EXCHANGE_NAME)?,
            year,
            wish_list: required(&lookup, WISH_LIST)?,
            sender: required(&lookup, EMAIL_SENDER)?,
            reply_to: lookup(REPLY_TO),
            budget: lookup(BUDGET).unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
        })
    }
}

impl SmtpSettings {
    pub fn from_env(sender: &str) -> Result<Self> {
        Self::from_lookup(process_env, sender)
    }

    /// `sender` is the login when `SMTP_USERNAME` is unset.
    pub fn from_lookup<F>(lookup: F, sender: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(SMTP_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| SantaError::InvalidConfigValueError {
                    field: SMTP_PORT.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            host: lookup(SMTP_HOST).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port,
            username: lookup(SMTP_USERNAME).unwrap_or_else(|| sender.to_string()),
            password: required(&lookup, EMAIL_PWD)?,
        })
    }
}

impl AppConfig {
    pub fn from_env(with_smtp: bool) -> Result<Self> {
        Self::from_lookup(process_env, with_smtp)
    }

    pub fn from_lookup<F>(lookup: F, with_smtp: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let exchange = ExchangeDetails::from_lookup(&lookup)?;
        let smtp = if with_smtp {
            Some(SmtpSettings::from_lookup(&lookup, &exchange.sender)?)
        } else {
            None
        };
        Ok(Self { exchange, smtp })
    }
}
