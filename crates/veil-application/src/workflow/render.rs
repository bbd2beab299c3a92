//! Presentation of workflow outcomes.
//!
//! Rendering matches exhaustively on [`OperationOutput`], so a new payload
//! kind cannot be added without deciding how it is shown.

use veil_core::ValidationError;
use veil_core::media::{MediaKind, OperationKind, OperationOutput, OperationResult};

/// A download link offered for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAffordance {
    pub url: String,
    pub label: String,
    /// Extracted payload kind; `None` for an encoded carrier image.
    pub kind: Option<MediaKind>,
}

/// What a successful operation shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Encoded { download: DownloadAffordance },
    Text { message: String },
    Media { kind: MediaKind, download: DownloadAffordance },
}

impl ResultView {
    pub fn from_output(output: &OperationOutput) -> Self {
        match output {
            OperationOutput::Encoded { download_url } => Self::Encoded {
                download: DownloadAffordance {
                    url: download_url.to_string(),
                    label: "Download Encoded Image".to_string(),
                    kind: None,
                },
            },
            OperationOutput::DecodedText { message } => Self::Text {
                message: message.clone(),
            },
            OperationOutput::DecodedMedia { kind, download_url } => Self::Media {
                kind: *kind,
                download: DownloadAffordance {
                    url: download_url.to_string(),
                    label: format!("Download {}", kind.label()),
                    kind: Some(*kind),
                },
            },
        }
    }

    pub fn heading(&self) -> String {
        match self {
            Self::Encoded { .. } => "Encoding Complete!".to_string(),
            Self::Text { .. } => "Hidden Message Found!".to_string(),
            Self::Media { kind, .. } => format!("Hidden {} Found!", kind.as_str()),
        }
    }

    pub fn download(&self) -> Option<&DownloadAffordance> {
        match self {
            Self::Encoded { download } | Self::Media { download, .. } => Some(download),
            Self::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient message about the outcome of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    /// Notification for a settled submission. Failure messages are shown
    /// verbatim.
    pub fn for_result(kind: OperationKind, result: &OperationResult) -> Self {
        match result {
            Ok(_) => {
                let (title, description) = match kind {
                    OperationKind::TextInImage => (
                        "Encoding successful!",
                        "Your message has been hidden in the image.",
                    ),
                    OperationKind::ImageInImage => {
                        ("Encoding successful!", "Your image has been hidden.")
                    }
                    OperationKind::AudioInImage => {
                        ("Encoding successful!", "Your audio has been hidden.")
                    }
                    OperationKind::Decode => {
                        ("Decoding successful!", "Hidden data has been extracted.")
                    }
                };
                Self::new(title, description, Severity::Success)
            }
            Err(failure) => Self::new(
                kind.fallback_failure_message(),
                failure.message.clone(),
                Severity::Error,
            ),
        }
    }

    /// Notification for a submission blocked before any request was sent.
    pub fn for_validation(kind: OperationKind, error: &ValidationError) -> Self {
        let title = match error {
            ValidationError::MissingField { .. } | ValidationError::EmptyField { .. } => {
                match kind {
                    OperationKind::TextInImage => "Missing fields",
                    OperationKind::ImageInImage | OperationKind::AudioInImage => "Missing files",
                    OperationKind::Decode => "No image selected",
                }
            }
            ValidationError::UnsupportedFile { .. } | ValidationError::SlotNotUsed { .. } => {
                "Unsupported file"
            }
        };
        Self::new(title, error.to_string(), Severity::Error)
    }

    pub fn login_succeeded() -> Self {
        Self::new(
            "Welcome back!",
            "You have successfully logged in.",
            Severity::Success,
        )
    }

    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::new("Login failed", message, Severity::Error)
    }

    pub fn registered() -> Self {
        Self::new(
            "Account created",
            "You can now log in with your email and password.",
            Severity::Success,
        )
    }

    pub fn registration_failed(message: impl Into<String>) -> Self {
        Self::new("Registration failed", message, Severity::Error)
    }

    pub fn missing_credentials() -> Self {
        Self::new(
            "Missing information",
            "Please enter both email and password.",
            Severity::Error,
        )
    }
}
