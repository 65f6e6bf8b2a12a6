use crate::config::{
    current_year, env, AppConfig, ExchangeDetails, SmtpSettings, DEFAULT_BUDGET,
};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub exchange: ExchangeSection,
    pub smtp: Option<SmtpSection>,
    pub matching: Option<MatchingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSection {
    pub name: String,
    /// Defaults to the current year.
    pub year: Option<String>,
    pub wish_list: String,
    pub sender: String,
    pub reply_to: Option<String>,
    pub budget: Option<String>,
    /// Participant file, relative to the working directory.
    pub participants: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for SmtpSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSection {
    pub max_attempts: Option<usize>,
    pub preflight: Option<bool>,
}

impl TomlConfig {
    /// Reads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::TomlError {
            message: e.to_string(),
        })
    }

    /// Replaces `${VAR}` with the environment value, e.g. `${EMAIL_PWD}`. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::TomlError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(participants) = &self.exchange.participants {
            validate_path("exchange.participants", participants)?;
        }

        if let Some(max_attempts) = self.matching.as_ref().and_then(|m| m.max_attempts) {
            validate_positive_number("matching.max_attempts", max_attempts, 1)?;
        }

        if let Some(password) = self.smtp.as_ref().and_then(|s| s.password.as_deref()) {
            if password.starts_with("${") {
                return Err(SantaError::MissingConfigError {
                    field: format!("smtp.password ({})", password),
                });
            }
        }

        self.exchange_details().validate()
    }

    pub fn exchange_details(&self) -> ExchangeDetails {
        let section = &self.exchange;
        ExchangeDetails {
            exchange_name: section.name.clone(),
            year: section.year.clone().unwrap_or_else(current_year),
            wish_list: section.wish_list.clone(),
            sender: section.sender.clone(),
            reply_to: section.reply_to.clone(),
            budget: section
                .budget
                .clone()
                .unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
        }
    }

    /// Settings from the `[smtp]` table; anything left out falls back to the
    /// environment variables, then to the built-in defaults.
    pub fn smtp_settings(&self) -> Result<SmtpSettings> {
        let section = self.smtp.as_ref();
        let from_file = |key: &str| -> Option<String> {
            let section = section?;
            match key {
                env::SMTP_HOST => section.host.clone(),
                env::SMTP_PORT => section.port.map(|p| p.to_string()),
                env::SMTP_USERNAME => section.username.clone(),
                env::EMAIL_PWD => section
                    .password
                    .clone()
                    .filter(|p| !p.starts_with("${")),
                _ => None,
            }
        };

        SmtpSettings::from_lookup(
            |key: &str| from_file(key).or_else(|| env::process_env(key)),
            &self.exchange.sender,
        )
    }

    pub fn to_app_config(&self, with_smtp: bool) -> Result<AppConfig> {
        let smtp = if with_smtp {
            Some(self.smtp_settings()?)
        } else {
            None
        };
        Ok(AppConfig {
            exchange: self.exchange_details(),
            smtp,
        })
    }

    pub fn max_attempts(&self) -> Option<usize> {
        self.matching.as_ref().and_then(|m| m.max_attempts)
    }

    pub fn preflight(&self) -> bool {
        self.matching
            .as_ref()
            .and_then(|m| m.preflight)
            .unwrap_or(false)
    }

    pub fn participants_path(&self) -> Option<&str> {
        self.exchange.participants.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
