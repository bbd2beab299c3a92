//! Application-level errors.

use thiserror::Error;
use veil_core::VeilError;
use veil_core::ValidationError;
use veil_core::media::Failure;

/// Failure of a login, registration or logout.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected locally; no request was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Rejected by the service or the service was unreachable.
    #[error(transparent)]
    Rejected(#[from] Failure),

    /// The session token could not be written or cleared.
    #[error("Could not update the stored session: {0}")]
    Storage(#[from] VeilError),
}

impl AuthError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::media::FailureKind;

    #[test]
    fn test_messages_pass_through() {
        let rejected = AuthError::from(Failure::new(FailureKind::Auth, "Invalid credentials"));
        assert_eq!(rejected.user_message(), "Invalid credentials");

        let invalid = AuthError::from(ValidationError::EmptyField { field: "email" });
        assert_eq!(invalid.user_message(), "The email must not be empty.");
    }

    #[test]
    fn test_storage_message() {
        let err = AuthError::from(VeilError::storage("disk full"));
        assert!(err.user_message().starts_with("Could not update the stored session"));
    }
}
