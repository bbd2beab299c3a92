//! Local input validation errors.
//!
//! A `ValidationError` is resolved entirely on the client: it blocks the
//! submission and is shown immediately. It never reaches the gateway.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required input has not been provided at all.
    #[error("Please provide a {field}.")]
    MissingField { field: &'static str },

    /// A required input is present but empty (zero bytes, blank text).
    #[error("The {field} must not be empty.")]
    EmptyField { field: &'static str },

    /// The selected file does not match what the slot accepts.
    #[error("'{file_name}' is not a supported {field}.")]
    UnsupportedFile {
        field: &'static str,
        file_name: String,
    },

    /// The operation has no input of this kind.
    #[error("This operation does not take a {field}.")]
    SlotNotUsed { field: &'static str },
}

impl ValidationError {
    /// Name of the offending input.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::EmptyField { field }
            | Self::UnsupportedFile { field, .. }
            | Self::SlotNotUsed { field } => field,
        }
    }
}
