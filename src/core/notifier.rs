use crate::config::ExchangeDetails;
use crate::core::message;
use crate::domain::model::Assignment;
use crate::domain::ports::Mailer;
use crate::utils::error::{Result, SantaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Stop at the first failed send.
    #[default]
    AbortOnFailure,
    /// Attempt every participant and report failures at the end.
    ContinueOnFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Notifier<M: Mailer> {
    mailer: M,
    details: ExchangeDetails,
    policy: DeliveryPolicy,
}

impl<M: Mailer> Notifier<M> {
    pub fn new(mailer: M, details: ExchangeDetails) -> Self {
        Self {
            mailer,
            details,
            policy: DeliveryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Sends one message per pairing, in roster order, one at a time.
    ///
    /// Under `AbortOnFailure` the first failure is returned as
    /// `TransportError` and nothing further is sent. Under
    /// `ContinueOnFailure` failures are collected in the report.
    pub async fn notify(&self, assignment: &Assignment) -> Result<DeliveryReport> {
        let mut report = DeliveryReport::default();

        for pairing in assignment.pairings() {
            let outgoing = message::render(&self.details, pairing);

            match self.mailer.send(&outgoing).await {
                Ok(()) => {
                    tracing::info!("✉️  Sent match notification to {}", pairing.giver.name);
                    tracing::debug!("{} gives to {}", pairing.giver.name, pairing.receiver.name);
                    report.delivered.push(pairing.giver.name.clone());
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Failed to send match notification to {}: {}",
                        pairing.giver.name,
                        e
                    );
                    match self.policy {
                        DeliveryPolicy::AbortOnFailure => {
                            tracing::warn!(
                                "Stopping after {} of {} notifications",
                                report.delivered.len(),
                                assignment.len()
                            );
                            return Err(SantaError::TransportError {
                                recipient: pairing.giver.name.clone(),
                                message: e.to_string(),
                            });
                        }
                        DeliveryPolicy::ContinueOnFailure => {
                            report.failed.push(DeliveryFailure {
                                recipient: pairing.giver.name.clone(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(report)
    }
}
