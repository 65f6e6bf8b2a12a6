pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "smtp")]
pub use adapters::SmtpMailer;

pub use adapters::{OutboxMailer, RosterFile};
pub use config::{AppConfig, ExchangeDetails, SmtpSettings};
pub use crate::core::exchange::{RunOutcome, SecretSanta};
pub use crate::core::matching::{calculate_matches, MatchOptions, MatchOutcome, MatchingEngine};
pub use crate::core::notifier::{DeliveryPolicy, DeliveryReport, Notifier};
pub use domain::model::{Assignment, OutgoingMessage, Pairing, Participant, Roster};
pub use domain::ports::{Mailer, ParticipantSource};
pub use utils::error::{Result, SantaError};
