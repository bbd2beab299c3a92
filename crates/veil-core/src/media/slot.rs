use super::blob::Blob;

/// Extensions accepted for the audio slot in addition to any `audio/*` type.
const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".mpeg", ".ogg"];

/// A named file input of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    CoverImage,
    HiddenImage,
    AudioFile,
    EncodedImage,
}

impl SlotId {
    /// Multipart field name expected by the service.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::CoverImage => "cover_image",
            Self::HiddenImage => "hidden_image",
            Self::AudioFile => "audio_file",
            Self::EncodedImage => "encoded_image",
        }
    }

    /// Human readable name used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::CoverImage => "cover image",
            Self::HiddenImage => "hidden image",
            Self::AudioFile => "audio file",
            Self::EncodedImage => "encoded image",
        }
    }

    /// Whether a selection in this slot gets a preview handle.
    pub fn is_previewable(self) -> bool {
        !matches!(self, Self::AudioFile)
    }

    /// Checks the file type against what the slot accepts.
    pub fn accepts(self, blob: &Blob) -> bool {
        match self {
            Self::CoverImage | Self::HiddenImage | Self::EncodedImage => {
                blob.content_type().starts_with("image/")
            }
            Self::AudioFile => {
                blob.content_type().starts_with("audio/")
                    || blob
                        .extension()
                        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
            }
        }
    }
}
