//! Outbound mail boundary.

use async_trait::async_trait;

use crate::result::AppResult;

/// A plain-text mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Sends mail. Failures surface as the `FAIL_SEND_EMAIL` error code.
#[async_trait]
pub trait MailSender: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a message.
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()>;
}
