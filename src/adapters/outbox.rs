use crate::core::{Mailer, OutgoingMessage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Separates the plain text and HTML parts. `=_` never occurs in
/// quoted-printable output and is unlikely in rendered bodies.
const BOUNDARY: &str = "=_secret_santa_alternative_=";

/// Writes each message to `<dir>/<recipient>.eml` instead of sending it.
///
/// File names are claimed per mailer, so two recipients whose names slug to
/// the same file (`Bob` and `bob`) get `bob.eml` and `bob_2.eml`.
#[derive(Debug)]
pub struct OutboxMailer {
    base_path: PathBuf,
    claimed: Mutex<HashSet<String>>,
}

impl OutboxMailer {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn file_name(recipient: &str) -> String {
        let slug: String = recipient
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let slug = slug.trim_matches('_');
        if slug.is_empty() {
            "participant.eml".to_string()
        } else {
            format!("{}.eml", slug)
        }
    }

    fn claim_file_name(&self, recipient: &str) -> String {
        let base = Self::file_name(recipient);
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let stem = base.trim_end_matches(".eml").to_string();
        let mut candidate = base;
        let mut n = 2;
        while !claimed.insert(candidate.clone()) {
            candidate = format!("{}_{}.eml", stem, n);
            n += 1;
        }
        candidate
    }

    /// `multipart/alternative` message: plain text part first, HTML last.
    pub fn to_eml(message: &OutgoingMessage) -> String {
        let mut out = String::new();
        out.push_str(&format!("From: {}\r\n", message.from));
        out.push_str(&format!("To: {}\r\n", message.to));
        if let Some(reply_to) = &message.reply_to {
            out.push_str(&format!("Reply-To: {}\r\n", reply_to));
        }
        out.push_str(&format!("Subject: {}\r\n", message.subject));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str(&format!(
            "Content-Type: multipart/alternative; boundary=\"{}\"\r\n\r\n",
            BOUNDARY
        ));

        for (content_type, body) in [
            ("text/plain", &message.text_body),
            ("text/html", &message.html_body),
        ] {
            out.push_str(&format!("--{}\r\n", BOUNDARY));
            out.push_str(&format!("Content-Type: {}; charset=utf-8\r\n", content_type));
            out.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
            out.push_str(&body.replace("\r\n", "\n").replace('\n', "\r\n"));
            out.push_str("\r\n");
        }
        out.push_str(&format!("--{}--\r\n", BOUNDARY));
        out
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        let path = self
            .base_path
            .join(self.claim_file_name(&message.recipient_name));
        tokio::fs::write(&path, Self::to_eml(message)).await?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
