//! Normalized outcome of a remote operation.

pub use reqwest::Url;

/// Kind of extracted media payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Parses the service discriminator (`IMAGE`, `AUDIO`), ignoring case.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "IMAGE" => Some(Self::Image),
            "AUDIO" => Some(Self::Audio),
            _ => None,
        }
    }

    /// Wire discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
        }
    }

    /// Display label, e.g. for a download button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Audio => "Audio",
        }
    }
}

/// Successful result of an encode or decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutput {
    Encoded { download_url: Url },
    DecodedText { message: String },
    DecodedMedia { kind: MediaKind, download_url: Url },
}

impl OperationOutput {
    pub fn download_url(&self) -> Option<&Url> {
        match self {
            Self::Encoded { download_url } | Self::DecodedMedia { download_url, .. } => {
                Some(download_url)
            }
            Self::DecodedText { .. } => None,
        }
    }
}

/// Where a failure originated. Callers surface `message` only; the kind is
/// kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Login or registration rejected by the service.
    Auth,
    /// Service unreachable, or the response was malformed.
    Transport,
    /// Service reachable but declined the operation.
    Operation,
    /// The client could not persist its own state.
    Storage,
}

/// A remote failure normalized into a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}

/// Result of any gateway call.
pub type OperationResult = Result<OperationOutput, Failure>;
