use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_email;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    /// Names this participant must never be assigned to give to.
    #[serde(default)]
    pub exclusions: BTreeSet<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            exclusions: BTreeSet::new(),
        }
    }

    pub fn with_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    /// Strips surrounding whitespace from the name, the email and every
    /// exclusion, dropping exclusions that end up empty.
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            exclusions: self
                .exclusions
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Whether `other` is an acceptable receiver for this participant.
    /// Identity is by name, so a participant never qualifies for itself.
    pub fn can_give_to(&self, other: &Participant) -> bool {
        self.name != other.name && !self.excludes(&other.name)
    }
}

/// Participant set loaded once per run.
///
/// Construction trims whitespace around names, emails and exclusions in
/// every input format, then enforces unique, non-empty names and plausible
/// email addresses. Exclusions naming someone who is not on the roster are kept;
/// they can never match anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Result<Self> {
        if participants.is_empty() {
            return Err(SantaError::RosterError {
                message: "participant list is empty".to_string(),
            });
        }

        let participants: Vec<Participant> =
            participants.into_iter().map(Participant::trimmed).collect();

        let mut seen = HashSet::new();
        for participant in &participants {
            if participant.name.is_empty() {
                return Err(SantaError::RosterError {
                    message: format!("participant with email '{}' has no name", participant.email),
                });
            }
            if !seen.insert(participant.name.as_str()) {
                return Err(SantaError::RosterError {
                    message: format!("duplicate participant name '{}'", participant.name),
                });
            }
            validate_email(&format!("email of {}", participant.name), &participant.email)?;
        }

        for participant in &participants {
            for excluded in &participant.exclusions {
                if !seen.contains(excluded.as_str()) {
                    tracing::warn!(
                        "{} excludes '{}', who is not on the participant list",
                        participant.name,
                        excluded
                    );
                }
            }
        }

        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub giver: Participant,
    pub receiver: Participant,
}

/// A complete giver -> receiver mapping, one pairing per participant in
/// roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    /// Builds an assignment from `receivers[giver_index] = receiver_index`.
    pub(crate) fn from_indices(participants: &[Participant], receivers: &[usize]) -> Self {
        let pairings = receivers
            .iter()
            .enumerate()
            .map(|(giver, &receiver)| Pairing {
                giver: participants[giver].clone(),
                receiver: participants[receiver].clone(),
            })
            .collect();
        Self { pairings }
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn receiver_for(&self, giver: &str) -> Option<&Participant> {
        self.pairings
            .iter()
            .find(|p| p.giver.name == giver)
            .map(|p| &p.receiver)
    }

    /// Checks the assignment against the participant set it was computed
    /// for: every participant gives exactly once and receives exactly once,
    /// nobody gives to themselves, and no exclusion is violated.
    pub fn verify(&self, participants: &[Participant]) -> Result<()> {
        let fail = |message: String| Err(SantaError::AssignmentError { message });

        if self.pairings.len() != participants.len() {
            return fail(format!(
                "{} pairings for {} participants",
                self.pairings.len(),
                participants.len()
            ));
        }

        let roster: HashSet<&str> = participants.iter().map(|p| p.name.as_str()).collect();
        let mut givers = HashSet::new();
        let mut receivers = HashSet::new();

        for pairing in &self.pairings {
            let (giver, receiver) = (&pairing.giver, &pairing.receiver);
            if !roster.contains(giver.name.as_str()) || !roster.contains(receiver.name.as_str()) {
                return fail(format!(
                    "pairing {} -> {} references someone outside the roster",
                    giver.name, receiver.name
                ));
            }
            if giver.name == receiver.name {
                return fail(format!("{} is matched with themselves", giver.name));
            }
            if giver.excludes(&receiver.name) {
                return fail(format!("{} must not give to {}", giver.name, receiver.name));
            }
            if !givers.insert(giver.name.as_str()) {
                return fail(format!("{} gives more than once", giver.name));
            }
            if !receivers.insert(receiver.name.as_str()) {
                return fail(format!("{} receives more than once", receiver.name));
            }
        }

        Ok(())
    }
}

/// A rendered notification ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Name of the participant being notified, for logs and reports.
    pub recipient_name: String,
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}
