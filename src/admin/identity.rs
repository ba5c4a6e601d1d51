//! Admin sign-in.
//!
//! The site has a single admin account, configured in `[admin]` as an email
//! and an argon2id PHC string of its password. Post mutations from the CLI and
//! the browse session's sign-in form both go through [`IdentityProvider`].

use crate::config::SiteConfig;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Wrong email or password; does not say which.
    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("No admin account configured; set `[admin].email` and `[admin].password_hash`")]
    NotConfigured,

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

pub trait IdentityProvider: Send + Sync {
    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AdminSession, IdentityError>> + Send;

    fn sign_out(&self, session: AdminSession) -> impl Future<Output = ()> + Send;
}

/// Salted argon2id PHC string for `[admin].password_hash`.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| IdentityError::Hash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Whether `hash` parses as a PHC string.
pub fn is_password_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}

/// Identity checked against the `[admin]` config section.
#[derive(Debug, Clone)]
pub struct ConfigIdentity {
    email: String,
    /// PHC string; `None` when missing or malformed
    password_hash: Option<String>,
}

impl ConfigIdentity {
    pub fn new(email: &str, password_hash: &str) -> Self {
        Self {
            email: email.trim().to_owned(),
            password_hash: Some(password_hash.trim())
                .filter(|hash| is_password_hash(hash))
                .map(str::to_owned),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.admin.email, &config.admin.password_hash)
    }

    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && self.password_hash.is_some()
    }

    fn verify(&self, credentials: &Credentials) -> Result<(), IdentityError> {
        let Some(stored) = self.password_hash.as_deref().filter(|_| !self.email.is_empty())
        else {
            return Err(IdentityError::NotConfigured);
        };
        let expected = PasswordHash::new(stored).map_err(|_| IdentityError::NotConfigured)?;

        let password_ok = Argon2::default()
            .verify_password(credentials.password.as_bytes(), &expected)
            .is_ok();
        let email_ok = credentials.email.trim().eq_ignore_ascii_case(&self.email);

        if password_ok && email_ok {
            Ok(())
        } else {
            Err(IdentityError::InvalidCredential)
        }
    }
}

impl IdentityProvider for ConfigIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AdminSession, IdentityError> {
        self.verify(credentials)?;
        Ok(AdminSession {
            email: self.email.clone(),
            signed_in_at: Utc::now(),
        })
    }

    async fn sign_out(&self, _session: AdminSession) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "editor@crickethub.co.in";

    fn identity() -> ConfigIdentity {
        ConfigIdentity::new(EMAIL, &hash_password("hunter2").unwrap())
    }

    #[test]
    fn test_hash_password_is_salted_phc() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert!(is_password_hash(&first));
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_unconfigured() {
        let identity = ConfigIdentity::new(EMAIL, "9f86d081884c7d659a2feaa0c55ad015");
        assert!(!identity.is_configured());
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let session = identity()
            .sign_in(&Credentials::new("Editor@CricketHub.co.in", "hunter2"))
            .await
            .unwrap();
        assert_eq!(session.email, EMAIL);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let result = identity()
            .sign_in(&Credentials::new(EMAIL, "hunter3"))
            .await;
        assert_eq!(result, Err(IdentityError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_email() {
        let result = identity()
            .sign_in(&Credentials::new("someone@else.test", "hunter2"))
            .await;
        assert_eq!(result, Err(IdentityError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_sign_in_unconfigured() {
        let identity = ConfigIdentity::from_config(&SiteConfig::default());
        assert!(!identity.is_configured());

        let result = identity.sign_in(&Credentials::new(EMAIL, "hunter2")).await;
        assert_eq!(result, Err(IdentityError::NotConfigured));
    }

    #[tokio::test]
    async fn test_sign_out() {
        let identity = identity();
        let session = identity
            .sign_in(&Credentials::new(EMAIL, "hunter2"))
            .await
            .unwrap();
        identity.sign_out(session).await;
    }
}
