//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Verification mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// `From` address on outgoing mail.
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Subject line of the sign-up verification mail.
    #[serde(default = "default_subject")]
    pub verification_subject: String,
    /// How long a verification code stays valid, in seconds.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: u64,
    /// How long a verified email stays eligible for sign-up, in seconds.
    #[serde(default = "default_verified_ttl")]
    pub verified_ttl_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            verification_subject: default_subject(),
            code_ttl_seconds: default_code_ttl(),
            verified_ttl_seconds: default_verified_ttl(),
        }
    }
}

fn default_sender() -> String {
    "no-reply@blog.local".to_string()
}

fn default_subject() -> String {
    "Sign-up verification".to_string()
}

fn default_code_ttl() -> u64 {
    5 * 60
}

fn default_verified_ttl() -> u64 {
    30 * 60
}
