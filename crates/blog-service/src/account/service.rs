//! Account use cases: sign-up, sign-in, sign-out, withdrawal, and profile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use blog_auth::{AuthenticationGate, Identity, PasswordHasher, TokenPair};
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::traits::UploadFile;
use blog_database::UserStore;
use blog_entity::user::{BlogUser, CreateUser};
use blog_storage::StorageManager;
use blog_storage::manager::PROFILE_DIRECTORY;

use crate::validation::validate_form;

use super::verification::EmailVerificationService;

/// Sign-up form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Login handle: 5 to 15 lowercase letters or digits.
    #[validate(custom(function = "crate::validation::user_id"))]
    pub user_id: String,
    /// Password: 8+ characters mixing letters, digits and symbols.
    #[validate(custom(function = "crate::validation::password"))]
    pub password: String,
    /// Password confirmation.
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub valid_password: String,
    /// Email address; must have passed verification.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Real name, in Hangul.
    #[validate(custom(function = "crate::validation::user_name"))]
    pub user_name: String,
    /// Display name.
    #[validate(custom(function = "crate::validation::nickname"))]
    pub nickname: String,
    /// Phone number, digits only.
    #[serde(default)]
    #[validate(custom(function = "crate::validation::phone_number"))]
    pub phone_number: Option<String>,
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub user_name: String,
    pub nickname: String,
    pub phone_number: Option<String>,
    pub profile_image_url: String,
}

impl From<&BlogUser> for UserProfile {
    fn from(user: &BlogUser) -> Self {
        Self {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            nickname: user.nickname.clone(),
            phone_number: user.phone_number.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// Who signed in.
    pub identity: Identity,
    /// Profile of the signed-in user.
    pub profile: UserProfile,
    /// Access and refresh tokens; the refresh token is already the session.
    pub tokens: TokenPair,
}

/// Handles the account lifecycle.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    gate: Arc<AuthenticationGate>,
    hasher: Arc<PasswordHasher>,
    storage: Arc<StorageManager>,
    verification: Arc<EmailVerificationService>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        gate: Arc<AuthenticationGate>,
        hasher: Arc<PasswordHasher>,
        storage: Arc<StorageManager>,
        verification: Arc<EmailVerificationService>,
    ) -> Self {
        Self {
            users,
            gate,
            hasher,
            storage,
            verification,
        }
    }

    /// Register a user and their blog.
    ///
    /// The profile image is uploaded before anything is persisted, so a
    /// failed upload leaves no user behind.
    pub async fn sign_up(
        &self,
        request: SignUpRequest,
        profile_image: Option<UploadFile>,
    ) -> AppResult<UserProfile> {
        validate_form(&request)?;
        if !self.verification.is_verified(&request.email).await? {
            return Err(AppError::coded_with(
                ErrorCode::FailAuthenticationEmail,
                &request.email,
            ));
        }

        if self.users.exists_by_user_id(&request.user_id).await? {
            return Err(AppError::coded_with(ErrorCode::DuplicateUserId, &request.user_id));
        }
        if self.users.exists_by_nickname(&request.nickname).await? {
            return Err(AppError::coded_with(
                ErrorCode::DuplicateNickname,
                &request.nickname,
            ));
        }
        if self.users.exists_by_email(&request.email).await? {
            return Err(AppError::coded_with(ErrorCode::DuplicateEmail, &request.email));
        }
        if request.password != request.valid_password {
            return Err(AppError::coded(ErrorCode::NotMatchPassword));
        }

        let profile_image_url = match profile_image.as_ref().filter(|f| !f.is_empty()) {
            Some(file) => self.storage.upload(file, PROFILE_DIRECTORY).await?,
            None => self.storage.default_profile_image_url().to_string(),
        };

        let password_hash = self.hasher.hash_password(&request.password)?;
        let (user, blog) = self
            .users
            .register(&CreateUser {
                user_id: request.user_id,
                password_hash,
                email: request.email,
                user_name: request.user_name,
                nickname: request.nickname,
                phone_number: request.phone_number.filter(|p| !p.trim().is_empty()),
                profile_image_url,
            })
            .await?;
        self.verification.consume(&user.email).await?;

        info!(user_id = %user.user_id, blog_id = blog.id, "User signed up");
        Ok(UserProfile::from(&user))
    }

    /// Check credentials and open a session.
    pub async fn sign_in(&self, user_id: &str, password: &str) -> AppResult<SignedIn> {
        let user = self.find_active(user_id).await?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::coded(ErrorCode::NotMatchPassword));
        }

        let (identity, tokens) = self.gate.issue(&user).await?;
        info!(user_id = %user.user_id, "User signed in");

        Ok(SignedIn {
            identity,
            profile: UserProfile::from(&user),
            tokens,
        })
    }

    /// End the caller's session.
    pub async fn sign_out(&self, identity: &Identity) -> AppResult<()> {
        self.gate.revoke(&identity.user_id).await?;
        info!(user_id = %identity.user_id, "User signed out");
        Ok(())
    }

    /// Soft-delete the caller and their blog, then end the session.
    pub async fn withdraw(&self, identity: &Identity) -> AppResult<()> {
        self.users.withdraw(&identity.user_id).await?;
        self.gate.revoke(&identity.user_id).await?;
        info!(user_id = %identity.user_id, "User withdrew");
        Ok(())
    }

    /// The caller's profile.
    pub async fn me(&self, identity: &Identity) -> AppResult<UserProfile> {
        let user = self.find_active(&identity.user_id).await?;
        Ok(UserProfile::from(&user))
    }

    async fn find_active(&self, user_id: &str) -> AppResult<BlogUser> {
        self.users
            .find_by_user_id(user_id)
            .await?
            .filter(|u| !u.is_withdrawn())
            .ok_or_else(|| AppError::coded_with(ErrorCode::NotFoundUser, user_id))
    }
}
