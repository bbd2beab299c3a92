//! Upload requests for the four transformation kinds.
//!
//! Every request type can only be built with all required inputs present and
//! non-empty, so a value of [`UploadSpec`] is always submittable.

use super::blob::Blob;
use super::slot::SlotId;
use crate::validation::ValidationError;

/// The four transformations the service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    TextInImage,
    ImageInImage,
    AudioInImage,
    Decode,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        Self::TextInImage,
        Self::ImageInImage,
        Self::AudioInImage,
        Self::Decode,
    ];

    /// File inputs the operation needs, in submission order.
    pub fn slots(self) -> &'static [SlotId] {
        match self {
            Self::TextInImage => &[SlotId::CoverImage],
            Self::ImageInImage => &[SlotId::CoverImage, SlotId::HiddenImage],
            Self::AudioInImage => &[SlotId::CoverImage, SlotId::AudioFile],
            Self::Decode => &[SlotId::EncodedImage],
        }
    }

    pub fn uses_slot(self, slot: SlotId) -> bool {
        self.slots().contains(&slot)
    }

    /// Whether the operation also takes a secret text message.
    pub fn takes_message(self) -> bool {
        matches!(self, Self::TextInImage)
    }

    pub fn is_decode(self) -> bool {
        matches!(self, Self::Decode)
    }

    /// Message used when the service gives no reason for a failure.
    pub fn fallback_failure_message(self) -> &'static str {
        if self.is_decode() {
            "Decoding failed"
        } else {
            "Encoding failed"
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::TextInImage => "Text to Image",
            Self::ImageInImage => "Image to Image",
            Self::AudioInImage => "Audio to Image",
            Self::Decode => "Decode Hidden Data",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::TextInImage => "Hide secret text messages within an image",
            Self::ImageInImage => "Conceal an image inside another image",
            Self::AudioInImage => "Embed audio files within images",
            Self::Decode => "Extract hidden content from encoded images",
        }
    }
}

/// Text that is guaranteed to contain something other than whitespace.
///
/// The original text is kept as entered; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(text: impl Into<String>, field: &'static str) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyField { field });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn require(slot: SlotId, blob: Blob) -> Result<Blob, ValidationError> {
    if blob.is_empty() {
        return Err(ValidationError::EmptyField {
            field: slot.label(),
        });
    }
    Ok(blob)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEncodeRequest {
    pub cover_image: Blob,
    pub message: NonEmptyText,
}

impl TextEncodeRequest {
    pub fn new(cover_image: Blob, message: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            cover_image: require(SlotId::CoverImage, cover_image)?,
            message: NonEmptyText::new(message, "message")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEncodeRequest {
    pub cover_image: Blob,
    pub hidden_image: Blob,
}

impl ImageEncodeRequest {
    pub fn new(cover_image: Blob, hidden_image: Blob) -> Result<Self, ValidationError> {
        Ok(Self {
            cover_image: require(SlotId::CoverImage, cover_image)?,
            hidden_image: require(SlotId::HiddenImage, hidden_image)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEncodeRequest {
    pub cover_image: Blob,
    pub audio_file: Blob,
}

impl AudioEncodeRequest {
    pub fn new(cover_image: Blob, audio_file: Blob) -> Result<Self, ValidationError> {
        Ok(Self {
            cover_image: require(SlotId::CoverImage, cover_image)?,
            audio_file: require(SlotId::AudioFile, audio_file)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub encoded_image: Blob,
}

impl DecodeRequest {
    pub fn new(encoded_image: Blob) -> Result<Self, ValidationError> {
        Ok(Self {
            encoded_image: require(SlotId::EncodedImage, encoded_image)?,
        })
    }
}

/// A complete, validated upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSpec {
    Text(TextEncodeRequest),
    Image(ImageEncodeRequest),
    Audio(AudioEncodeRequest),
    Decode(DecodeRequest),
}

impl UploadSpec {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Text(_) => OperationKind::TextInImage,
            Self::Image(_) => OperationKind::ImageInImage,
            Self::Audio(_) => OperationKind::AudioInImage,
            Self::Decode(_) => OperationKind::Decode,
        }
    }

    /// File parts in multipart order.
    pub fn files(&self) -> Vec<(SlotId, &Blob)> {
        match self {
            Self::Text(req) => vec![(SlotId::CoverImage, &req.cover_image)],
            Self::Image(req) => vec![
                (SlotId::CoverImage, &req.cover_image),
                (SlotId::HiddenImage, &req.hidden_image),
            ],
            Self::Audio(req) => vec![
                (SlotId::CoverImage, &req.cover_image),
                (SlotId::AudioFile, &req.audio_file),
            ],
            Self::Decode(req) => vec![(SlotId::EncodedImage, &req.encoded_image)],
        }
    }

    /// Text parts in multipart order.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Text(req) => vec![("message", req.message.as_str())],
            _ => Vec::new(),
        }
    }
}
