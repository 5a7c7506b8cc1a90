//! Email verification codes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use blog_auth::password::generate_verification_code;
use blog_cache::{CacheManager, keys};
use blog_core::config::MailConfig;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::traits::{CacheProvider, MailSender, OutgoingMail};
use blog_database::UserStore;

const VERIFIED: &str = "true";

/// Issues and checks the six-digit codes that gate sign-up.
#[derive(Debug, Clone)]
pub struct EmailVerificationService {
    users: Arc<dyn UserStore>,
    cache: CacheManager,
    mailer: Arc<dyn MailSender>,
    config: MailConfig,
}

impl EmailVerificationService {
    /// Creates a new verification service.
    pub fn new(
        users: Arc<dyn UserStore>,
        cache: CacheManager,
        mailer: Arc<dyn MailSender>,
        config: MailConfig,
    ) -> Self {
        Self {
            users,
            cache,
            mailer,
            config,
        }
    }

    /// Send a fresh code to an email that is not registered yet.
    pub async fn send_code(&self, email: &str) -> AppResult<()> {
        if self.users.exists_by_email(email).await? {
            return Err(AppError::coded_with(ErrorCode::DuplicateEmail, email));
        }

        let code = generate_verification_code();
        self.cache
            .set(
                &keys::email_code(email),
                &code,
                Duration::from_secs(self.config.code_ttl_seconds),
            )
            .await?;

        let mail = OutgoingMail {
            to: email.to_string(),
            subject: self.config.verification_subject.clone(),
            body: format!("Your verification code is {code}"),
        };
        self.mailer.send(&mail).await.map_err(|e| {
            warn!(email, error = %e, "Verification mail failed");
            if e.code.is_some() {
                e
            } else {
                AppError::coded(ErrorCode::FailSendEmail).caused_by(e)
            }
        })?;

        info!(email, "Verification code sent");
        Ok(())
    }

    /// Check a code. On success the email counts as verified until the
    /// verified marker expires or sign-up consumes it.
    pub async fn check_code(&self, email: &str, code: &str) -> AppResult<()> {
        let key = keys::email_code(email);
        match self.cache.get(&key).await? {
            Some(expected) if expected == code.trim() => {}
            _ => {
                debug!(email, "Verification code mismatch");
                return Err(AppError::coded(ErrorCode::FailAuthenticationEmail));
            }
        }

        self.cache
            .set(
                &keys::email_verified(email),
                VERIFIED,
                Duration::from_secs(self.config.verified_ttl_seconds),
            )
            .await?;
        self.cache.delete(&key).await?;

        info!(email, "Email verified");
        Ok(())
    }

    /// Whether the email passed verification.
    pub async fn is_verified(&self, email: &str) -> AppResult<bool> {
        Ok(self
            .cache
            .get(&keys::email_verified(email))
            .await?
            .is_some_and(|v| v == VERIFIED))
    }

    /// Drop the verified marker once sign-up used it.
    pub async fn consume(&self, email: &str) -> AppResult<()> {
        self.cache.delete(&keys::email_verified(email)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use blog_database::memory::MemoryUserStore;
    use blog_entity::user::CreateUser;

    #[derive(Debug, Default)]
    struct CapturingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl MailSender for CapturingMailer {
        async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenMailer;

    #[async_trait]
    impl MailSender for BrokenMailer {
        async fn send(&self, _mail: &OutgoingMail) -> AppResult<()> {
            Err(AppError::internal("relay refused"))
        }
    }

    fn service(mailer: Arc<dyn MailSender>) -> (EmailVerificationService, Arc<MemoryUserStore>) {
        let users = Arc::new(MemoryUserStore::new());
        let service = EmailVerificationService::new(
            users.clone(),
            CacheManager::in_memory(),
            mailer,
            MailConfig::default(),
        );
        (service, users)
    }

    fn sent_code(mailer: &CapturingMailer) -> String {
        let sent = mailer.sent.lock().unwrap();
        let body = &sent.last().unwrap().body;
        body.rsplit(' ').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_code_round_trip_marks_email_verified() {
        let mailer = Arc::new(CapturingMailer::default());
        let (service, _) = service(mailer.clone());

        service.send_code("new@example.com").await.unwrap();
        let code = sent_code(&mailer);
        assert_eq!(code.len(), 6);

        service.check_code("new@example.com", &code).await.unwrap();
        assert!(service.is_verified("new@example.com").await.unwrap());

        // The code is single-use.
        let err = service.check_code("new@example.com", &code).await.unwrap_err();
        assert!(err.is(ErrorCode::FailAuthenticationEmail));
    }

    #[tokio::test]
    async fn test_wrong_code_is_rejected() {
        let mailer = Arc::new(CapturingMailer::default());
        let (service, _) = service(mailer.clone());
        service.send_code("new@example.com").await.unwrap();

        let err = service.check_code("new@example.com", "not-it").await.unwrap_err();
        assert!(err.is(ErrorCode::FailAuthenticationEmail));
        assert!(!service.is_verified("new@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_registered_email_is_duplicate() {
        let mailer = Arc::new(CapturingMailer::default());
        let (service, users) = service(mailer.clone());
        users
            .register(&CreateUser {
                user_id: "alice".into(),
                password_hash: "hash".into(),
                email: "alice@example.com".into(),
                user_name: "Alice".into(),
                nickname: "alice".into(),
                phone_number: None,
                profile_image_url: "/default.png".into(),
            })
            .await
            .unwrap();

        let err = service.send_code("alice@example.com").await.unwrap_err();
        assert!(err.is(ErrorCode::DuplicateEmail));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_maps_to_send_error() {
        let (service, _) = service(Arc::new(BrokenMailer));
        let err = service.send_code("new@example.com").await.unwrap_err();
        assert!(err.is(ErrorCode::FailSendEmail));
    }
}
