use crate::config::SmtpSettings;
use crate::core::{Mailer, OutgoingMessage};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

fn parse_mailbox(recipient: &str, field: &str, address: &str) -> Result<Mailbox> {
    address.parse::<Mailbox>().map_err(|e| SantaError::RenderError {
        recipient: recipient.to_string(),
        message: format!("invalid {} address '{}': {}", field, address, e),
    })
}

/// Builds the `multipart/alternative` message: plain text first, HTML last
/// so clients that can render it prefer it.
pub fn build_message(message: &OutgoingMessage) -> Result<Message> {
    let recipient = message.recipient_name.as_str();

    let mut builder = Message::builder()
        .from(parse_mailbox(recipient, "from", &message.from)?)
        .to(parse_mailbox(recipient, "to", &message.to)?)
        .subject(message.subject.clone());

    if let Some(reply_to) = &message.reply_to {
        builder = builder.reply_to(parse_mailbox(recipient, "reply-to", reply_to)?);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|e| SantaError::RenderError {
            recipient: recipient.to_string(),
            message: e.to_string(),
        })
}

/// STARTTLS SMTP relay with username/password login.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| SantaError::TransportSetupError {
                message: format!("{}: {}", settings.host, e),
            })?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }

    /// Opens a connection and logs in once, so bad credentials surface
    /// before anything is sent.
    pub async fn connect(settings: &SmtpSettings) -> Result<Self> {
        let mailer = Self::new(settings)?;
        tracing::info!("🔌 Connecting to {}:{}", settings.host, settings.port);

        match mailer.transport.test_connection().await {
            Ok(true) => Ok(mailer),
            Ok(false) => Err(SantaError::TransportSetupError {
                message: format!("{}:{} refused the connection", settings.host, settings.port),
            }),
            Err(e) => Err(SantaError::TransportSetupError {
                message: format!("{}:{}: {}", settings.host, settings.port, e),
            }),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let email = build_message(message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| SantaError::TransportError {
                recipient: message.recipient_name.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutgoingMessage {
        OutgoingMessage {
            recipient_name: "Alice".to_string(),
            from: "santa@example.com".to_string(),
            to: "alice@example.com".to_string(),
            reply_to: Some("elf@example.com".to_string()),
            subject: "Family Gift Exchange 2026!".to_string(),
            text_body: "Hi Alice,".to_string(),
            html_body: "<p>Hi Alice,</p>".to_string(),
        }
    }

    #[test]
    fn test_build_multipart_message() {
        let email = build_message(&message()).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("To: alice@example.com"));
        assert!(raw.contains("Reply-To: elf@example.com"));
        assert!(raw.contains("Subject: Family Gift Exchange 2026!"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_bad_address_is_render_error() {
        let mut bad = message();
        bad.to = "not an address".to_string();
        assert!(matches!(
            build_message(&bad),
            Err(SantaError::RenderError { .. })
        ));
    }
}
