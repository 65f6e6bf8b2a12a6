use crate::domain::model::{OutgoingMessage, Participant};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the participant list (a file on disk, a fixture in tests).
pub trait ParticipantSource: Send + Sync {
    fn load_participants(&self) -> Result<Vec<Participant>>;
}

/// Delivers one rendered message. Failures are per message; the caller
/// decides whether to keep going.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}
