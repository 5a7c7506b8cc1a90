//! Mail sender that records outgoing messages in the log.

use async_trait::async_trait;
use tracing::info;

use blog_core::result::AppResult;
use blog_core::traits::{MailSender, OutgoingMail};

/// Writes a line per message instead of talking to an SMTP relay.
///
/// The body is never logged since it carries verification codes.
#[derive(Debug, Clone)]
pub struct LogMailSender {
    sender: String,
}

impl LogMailSender {
    /// Create a sender that reports `sender` as the from-address.
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        info!(
            from = %self.sender,
            to = %mail.to,
            subject = %mail.subject,
            body_len = mail.body.len(),
            "Mail handed off"
        );
        Ok(())
    }
}
