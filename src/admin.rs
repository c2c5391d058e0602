use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid password")]
    Mismatch,
    #[error("Error verifying password")]
    Unavailable,
}

/// Shared-secret check in front of the analytics dashboard. Holds only the
/// stored hash; candidates are compared and dropped.
#[derive(Debug, Clone)]
pub struct AdminGate {
    hash: Option<String>,
}

impl AdminGate {
    pub fn new(hash: Option<String>) -> Self {
        if hash.is_none() {
            info!("no admin password hash configured, dashboard is locked");
        }
        Self { hash }
    }

    pub fn verify(&self, candidate: &str) -> Result<(), AuthError> {
        let Some(stored) = self.hash.as_deref() else {
            return Err(AuthError::Unavailable);
        };
        let parsed = PasswordHash::new(stored).map_err(|err| {
            error!("stored admin hash is malformed: {err}");
            AuthError::Unavailable
        })?;
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .map_err(|err| match err {
                argon2::password_hash::Error::Password => AuthError::Mismatch,
                other => {
                    error!("admin password verification failed: {other}");
                    AuthError::Unavailable
                }
            })
    }
}
