pub mod exchange;
pub mod matching;
pub mod message;
pub mod notifier;

pub use crate::domain::model::{Assignment, OutgoingMessage, Pairing, Participant, Roster};
pub use crate::domain::ports::{Mailer, ParticipantSource};
pub use crate::utils::error::Result;
