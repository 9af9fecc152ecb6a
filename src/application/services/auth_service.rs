//! User registration and password authentication.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{dummy_verify, hash_password, verify_password};

/// Field users log in with. Fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginIdentifier {
    #[default]
    Email,
    Username,
}

impl LoginIdentifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginIdentifier::Email => "email",
            LoginIdentifier::Username => "username",
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(LoginIdentifier::Email),
            "username" => Ok(LoginIdentifier::Username),
            other => Err(format!(
                "unknown login identifier '{other}' (expected 'email' or 'username')"
            )),
        }
    }
}

/// Service for registering users and checking their passwords.
///
/// Passwords are hashed with Argon2 on the blocking thread pool. Raw
/// passwords are never stored or logged.
pub struct AuthService<U: UserRepository + ?Sized> {
    user_repository: Arc<U>,
    login_identifier: LoginIdentifier,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    pub fn new(user_repository: Arc<U>, login_identifier: LoginIdentifier) -> Self {
        Self {
            user_repository,
            login_identifier,
        }
    }

    pub fn login_identifier(&self) -> LoginIdentifier {
        self.login_identifier
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is blank.
    /// Returns [`AppError::UsernameTaken`] if the username exists; the
    /// existing account is left untouched.
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::HashingFailure`] if the password cannot be hashed.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::bad_request(
                "Username must not be empty",
                json!({ "field": "username" }),
            ));
        }

        if self
            .user_repository
            .find_by_username(username)
            .await?
            .is_some()
        {
            return Err(AppError::username_taken(username));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                AppError::hashing_failure()
            })?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AppError::hashing_failure()
            })?;

        let user = self
            .user_repository
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Checks a password against the account found by `identifier`.
    ///
    /// `identifier` is an email or a username depending on the configured
    /// [`LoginIdentifier`]. An unknown identifier still runs a password
    /// verification against a dummy hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCredentials`] for an unknown identifier and
    /// for a wrong password alike.
    /// Returns [`AppError::StoreFailure`] on database errors.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User, AppError> {
        let identifier = identifier.trim();
        let user = match self.login_identifier {
            LoginIdentifier::Email => self.user_repository.find_by_email(identifier).await?,
            LoginIdentifier::Username => self.user_repository.find_by_username(identifier).await?,
        };

        let password = password.to_string();

        let Some(user) = user else {
            let _ = tokio::task::spawn_blocking(move || dummy_verify(&password)).await;
            return Err(AppError::invalid_credentials());
        };

        let password_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| {
                    error!(error = %e, "Password verification task failed");
                    AppError::invalid_credentials()
                })?;

        match verified {
            Ok(true) => Ok(user),
            Ok(false) => Err(AppError::invalid_credentials()),
            Err(e) => {
                error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                Err(AppError::invalid_credentials())
            }
        }
    }
}
