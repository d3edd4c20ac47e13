use thiserror::Error;

use crate::storage::{SharedStore, StorageError};

pub const USER_EMAIL_KEY: &str = "userEmail";
pub const GUEST_EMAIL: &str = "guest@example.com";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Mock authentication: remembers who is signed in, checks nothing remotely.
#[derive(Clone)]
pub struct Session {
    store: SharedStore,
}

impl Session {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The signed-in email, or the guest account when nobody is.
    pub fn active_user(&self) -> String {
        self.store
            .get(USER_EMAIL_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| GUEST_EMAIL.to_string())
    }

    pub fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<String, AuthError> {
        let email = validate_email(email)?;
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        self.remember(email)
    }

    /// Any password is accepted.
    pub fn log_in(&self, email: &str, _password: &str) -> Result<String, AuthError> {
        let email = validate_email(email)?;
        self.remember(email)
    }

    /// Forget the signed-in user. The guest account becomes active.
    pub fn log_out(&self) -> Result<(), AuthError> {
        self.store.remove(USER_EMAIL_KEY)?;
        tracing::info!("signed out");
        Ok(())
    }

    fn remember(&self, email: &str) -> Result<String, AuthError> {
        self.store.set(USER_EMAIL_KEY, email.to_string())?;
        tracing::info!(email, "active user changed");
        Ok(email.to_string())
    }
}

fn validate_email(email: &str) -> Result<&str, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}
