//! Sign-up, sign-in, sign-out, withdrawal, and email verification.

pub mod mail;
pub mod service;
pub mod verification;

pub use mail::LogMailSender;
pub use service::{AccountService, SignUpRequest, SignedIn, UserProfile};
pub use verification::EmailVerificationService;
