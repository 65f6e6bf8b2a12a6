// Adapters layer: concrete implementations of the domain ports.

pub mod outbox;
pub mod roster_file;
#[cfg(feature = "smtp")]
pub mod smtp;

pub use outbox::OutboxMailer;
pub use roster_file::{RosterFile, RosterFormat};
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;
