//! Outbound mail: the `Notifier` seam and its SMTP implementation via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::config::MailConfig;
use crate::error::MailError;

/// A single outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// The password-retrieval mail: the password travels in the subject line.
    pub fn password_reminder(to: &str, password: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("API password is {password}"),
            body: String::new(),
        }
    }
}

/// Sends a message to an address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), MailError>;
}

/// SMTP notifier.
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.expose_secret().to_string(),
        );

        let builder = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.server)
                .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.server)
        };

        Ok(builder.port(self.config.port).credentials(creds).build())
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, MailError> {
        build_message(&self.config.default_sender, notification)
    }
}

/// Build a plain-text message from `sender`.
fn build_message(sender: &str, notification: &Notification) -> Result<Message, MailError> {
    let from: Mailbox = sender.parse().map_err(|e| MailError::Address {
        address: sender.to_string(),
        reason: format!("{e}"),
    })?;
    let to: Mailbox = notification.to.parse().map_err(|e| MailError::Address {
        address: notification.to.clone(),
        reason: format!("{e}"),
    })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.as_str())
        .body(notification.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: Notification) -> Result<(), MailError> {
        let email = self.build_message(&notification)?;
        let transport = self.transport()?;

        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| MailError::Transport(format!("SMTP task failed: {e}")))?
            .map_err(|e| MailError::Transport(format!("SMTP send failed: {e}")))?;

        tracing::info!(to = %notification.to, "Email sent");
        Ok(())
    }
}
