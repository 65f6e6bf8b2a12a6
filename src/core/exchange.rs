use crate::core::matching::{MatchOutcome, MatchingEngine};
use crate::core::notifier::{DeliveryReport, Notifier};
use crate::domain::model::Roster;
use crate::domain::ports::Mailer;
use crate::utils::error::{Result, SantaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered(DeliveryReport),
    /// The attempt budget ran out. Nobody was contacted.
    NoMatch { attempts: usize },
}

/// Ties one roster to the matcher and the notifier: match first, notify
/// only on a complete assignment.
pub struct SecretSanta<M: Mailer> {
    roster: Roster,
    engine: MatchingEngine,
    notifier: Notifier<M>,
}

impl<M: Mailer> SecretSanta<M> {
    pub fn new(roster: Roster, engine: MatchingEngine, notifier: Notifier<M>) -> Self {
        Self {
            roster,
            engine,
            notifier,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }

    pub fn plan(&self) -> MatchOutcome {
        tracing::info!(
            "🎲 Drawing matches for {} participants (up to {} attempts)",
            self.roster.len(),
            self.engine.options().max_attempts
        );
        self.engine.run(self.roster.participants())
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let assignment = match self.plan() {
            MatchOutcome::Matched { assignment, .. } => assignment,
            MatchOutcome::Exhausted { attempts } => {
                tracing::warn!("No matches found, no notifications will be sent");
                return Ok(RunOutcome::NoMatch { attempts });
            }
        };

        assignment.verify(self.roster.participants())?;

        tracing::info!("📨 Sending {} notifications", assignment.len());
        let report = self.notifier.notify(&assignment).await?;

        if report.is_complete() {
            tracing::info!("✅ All {} participants notified", report.delivered.len());
            Ok(RunOutcome::Delivered(report))
        } else {
            for failure in &report.failed {
                tracing::error!("Not delivered to {}: {}", failure.recipient, failure.error);
            }
            Err(SantaError::DeliveryError {
                failed: report.failed.len(),
                delivered: report.delivered.len(),
            })
        }
    }
}
