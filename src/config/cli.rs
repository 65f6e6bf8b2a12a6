use crate::core::matching::{MatchOptions, DEFAULT_MAX_ATTEMPTS};
use crate::core::notifier::DeliveryPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use clap::Parser;

pub const DEFAULT_PARTICIPANTS_FILE: &str = "participants.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw secret santa matches and email every participant their recipient")]
pub struct CliConfig {
    /// Participant list (.json, .yaml, .yml, .toml or .csv)
    #[arg(short, long)]
    pub participants: Option<String>,

    /// TOML configuration file; the environment is used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Matching attempts before giving up
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Report impossible exclusion sets without spending attempts
    #[arg(long)]
    pub preflight: bool,

    /// Compute matches but send nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Write messages into this directory instead of sending them
    #[arg(long)]
    pub outbox: Option<String>,

    /// Keep sending after a failed delivery instead of stopping
    #[arg(long)]
    pub continue_on_error: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Command line wins over the config file, which wins over defaults.
    pub fn participants_path<'a>(&'a self, from_file: Option<&'a str>) -> &'a str {
        self.participants
            .as_deref()
            .or(from_file)
            .unwrap_or(DEFAULT_PARTICIPANTS_FILE)
    }

    pub fn match_options(
        &self,
        from_file: Option<usize>,
        preflight_from_file: bool,
    ) -> MatchOptions {
        MatchOptions {
            max_attempts: self
                .max_attempts
                .or(from_file)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            preflight: self.preflight || preflight_from_file,
        }
    }

    pub fn delivery_policy(&self) -> DeliveryPolicy {
        if self.continue_on_error {
            DeliveryPolicy::ContinueOnFailure
        } else {
            DeliveryPolicy::AbortOnFailure
        }
    }

    /// Real SMTP is only needed when messages actually leave the machine.
    pub fn sends_mail(&self) -> bool {
        !self.dry_run && self.outbox.is_none()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(max_attempts) = self.max_attempts {
            validate_positive_number("--max-attempts", max_attempts, 1)?;
        }
        if let Some(path) = &self.participants {
            validate_path("--participants", path)?;
        }
        if let Some(path) = &self.config {
            validate_path("--config", path)?;
        }
        if let Some(path) = &self.outbox {
            validate_path("--outbox", path)?;
        }
        Ok(())
    }
}
