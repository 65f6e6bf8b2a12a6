#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_BUDGET: &str = "$20";

/// Everything the notification text needs besides the pairing itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDetails {
    pub exchange_name: String,
    pub year: String,
    pub wish_list: String,
    /// Address the notifications are sent from; questions go here too.
    pub sender: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default = "default_budget")]
    pub budget: String,
}

fn default_budget() -> String {
    DEFAULT_BUDGET.to_string()
}

pub fn current_year() -> String {
    chrono::Local::now().format("%Y").to_string()
}

impl Validate for ExchangeDetails {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("exchange_name", &self.exchange_name)?;
        validate_non_empty_string("year", &self.year)?;
        validate_url("wish_list", &self.wish_list)?;
        validate_email("sender", &self.sender)?;
        if let Some(reply_to) = &self.reply_to {
            validate_email("reply_to", reply_to)?;
        }
        validate_non_empty_string("budget", &self.budget)?;
        Ok(())
    }
}

/// STARTTLS relay settings. The password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for SmtpSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("smtp.host", &self.host)?;
        validate_range("smtp.port", self.port, 1, u16::MAX)?;
        validate_non_empty_string("smtp.username", &self.username)?;
        validate_non_empty_string("smtp.password", &self.password)?;
        Ok(())
    }
}

/// Resolved run configuration. SMTP settings are only present when real
/// mail is going to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub exchange: ExchangeDetails,
    pub smtp: Option<SmtpSettings>,
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.exchange.validate()?;
        if let Some(smtp) = &self.smtp {
            smtp.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_details() -> ExchangeDetails {
        ExchangeDetails {
            exchange_name: "Family Gift Exchange".to_string(),
            year: "2026".to_string(),
            wish_list: "https://example.com/wishes".to_string(),
            sender: "santa@example.com".to_string(),
            reply_to: None,
            budget: DEFAULT_BUDGET.to_string(),
        }
    }

    #[test]
    fn test_exchange_details_validation() {
        assert!(sample_details().validate().is_ok());

        let mut bad_link = sample_details();
        bad_link.wish_list = "not a link".to_string();
        assert!(bad_link.validate().is_err());

        let mut bad_reply = sample_details();
        bad_reply.reply_to = Some("nobody".to_string());
        assert!(bad_reply.validate().is_err());
    }

    #[test]
    fn test_smtp_password_is_redacted() {
        let smtp = SmtpSettings {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            username: "santa@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", smtp);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(smtp.validate().is_ok());
    }

    #[test]
    fn test_current_year_is_four_digits() {
        let year = current_year();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
    }
}
