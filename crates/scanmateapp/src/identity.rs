//! Account identity.
//!
//! The document features never depend on who is signed in; identity only
//! feeds the profile surface. Credentials are validated locally before any
//! provider is asked, so every provider sees the same rejections for blank or
//! too-short input.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub email: String,
}

impl CurrentUser {
    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Please enter your email and password.")]
    MissingCredentials,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("Please enter your name.")]
    MissingDisplayName,
    #[error("An account already exists for {0}.")]
    EmailInUse(String),
    #[error("Incorrect email or password.")]
    InvalidCredentials,
    #[error("You are not signed in.")]
    NotSignedIn,
}

pub fn validate_sign_in(email: &str, password: &str) -> std::result::Result<(), IdentityError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(IdentityError::MissingCredentials);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_sign_up(
    email: &str,
    password: &str,
    display_name: &str,
) -> std::result::Result<(), IdentityError> {
    validate_sign_in(email, password)?;
    if display_name.trim().is_empty() {
        return Err(IdentityError::MissingDisplayName);
    }
    Ok(())
}

/// An authentication backend.
///
/// Implementations must run the `validate_*` checks before doing any work.
pub trait IdentityProvider: Send {
    fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> Result<CurrentUser>;
    fn sign_in(&mut self, email: &str, password: &str) -> Result<CurrentUser>;
    fn sign_out(&mut self) -> Result<()>;
    fn update_display_name(&mut self, display_name: &str) -> Result<CurrentUser>;
    fn current_user(&self) -> Option<CurrentUser>;
}

struct Account {
    user: CurrentUser,
    password: String,
}

/// In-process provider. Accounts live only as long as the value.
#[derive(Default)]
pub struct LocalIdentity {
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityProvider for LocalIdentity {
    fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> Result<CurrentUser> {
        validate_sign_up(email, password, display_name)?;
        let key = account_key(email);
        if self.accounts.contains_key(&key) {
            return Err(IdentityError::EmailInUse(email.trim().to_string()).into());
        }
        let user = CurrentUser {
            id: Uuid::new_v4().simple().to_string(),
            display_name: Some(display_name.trim().to_string()),
            email: email.trim().to_string(),
        };
        self.accounts.insert(
            key.clone(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        self.signed_in = Some(key);
        info!(user = %user.id, "account created");
        Ok(user)
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<CurrentUser> {
        validate_sign_in(email, password)?;
        let key = account_key(email);
        let account = self
            .accounts
            .get(&key)
            .filter(|account| account.password == password)
            .ok_or(IdentityError::InvalidCredentials)?;
        let user = account.user.clone();
        self.signed_in = Some(key);
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<()> {
        self.signed_in = None;
        Ok(())
    }

    fn update_display_name(&mut self, display_name: &str) -> Result<CurrentUser> {
        if display_name.trim().is_empty() {
            return Err(IdentityError::MissingDisplayName.into());
        }
        let account = self
            .signed_in
            .as_ref()
            .and_then(|key| self.accounts.get_mut(key))
            .ok_or(IdentityError::NotSignedIn)?;
        account.user.display_name = Some(display_name.trim().to_string());
        Ok(account.user.clone())
    }

    fn current_user(&self) -> Option<CurrentUser> {
        self.signed_in
            .as_ref()
            .and_then(|key| self.accounts.get(key))
            .map(|account| account.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanmateError;

    fn identity_err<T: std::fmt::Debug>(result: Result<T>) -> IdentityError {
        match result {
            Err(ScanmateError::Identity(e)) => e,
            other => panic!("expected identity error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(validate_sign_in("", "secret1"), Err(IdentityError::MissingCredentials));
        assert_eq!(validate_sign_in("a@b.c", ""), Err(IdentityError::MissingCredentials));
        assert_eq!(validate_sign_in("a@b.c", "12345"), Err(IdentityError::PasswordTooShort));
        assert_eq!(validate_sign_in("a@b.c", "123456"), Ok(()));
        assert_eq!(
            validate_sign_up("a@b.c", "123456", "  "),
            Err(IdentityError::MissingDisplayName)
        );
    }

    #[test]
    fn test_sign_up_signs_in() {
        let mut identity = LocalIdentity::new();
        let user = identity.sign_up("Ana@Example.com", "hunter22", "Ana").unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ana"));
        assert_eq!(identity.current_user(), Some(user));
    }

    #[test]
    fn test_sign_in_checks_password() {
        let mut identity = LocalIdentity::new();
        identity.sign_up("ana@example.com", "hunter22", "Ana").unwrap();
        identity.sign_out().unwrap();
        assert!(identity.current_user().is_none());

        assert_eq!(
            identity_err(identity.sign_in("ana@example.com", "wrong-pass")),
            IdentityError::InvalidCredentials
        );
        let user = identity.sign_in("ANA@example.com", "hunter22").unwrap();
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_duplicate_sign_up_rejected() {
        let mut identity = LocalIdentity::new();
        identity.sign_up("ana@example.com", "hunter22", "Ana").unwrap();
        assert!(matches!(
            identity_err(identity.sign_up("ana@example.com", "other-pass", "Ana 2")),
            IdentityError::EmailInUse(_)
        ));
    }

    #[test]
    fn test_update_display_name_requires_session() {
        let mut identity = LocalIdentity::new();
        assert_eq!(
            identity_err(identity.update_display_name("Bob")),
            IdentityError::NotSignedIn
        );
        identity.sign_up("bob@example.com", "hunter22", "Bob").unwrap();
        let user = identity.update_display_name("Robert").unwrap();
        assert_eq!(user.label(), "Robert");
    }
}
