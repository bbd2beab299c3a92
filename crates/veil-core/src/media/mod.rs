//! Media inputs and outputs of the transformation service.

pub mod blob;
pub mod result;
pub mod slot;
pub mod upload;

pub use blob::Blob;
pub use result::{Failure, FailureKind, MediaKind, OperationOutput, OperationResult, Url};
pub use slot::SlotId;
pub use upload::{
    AudioEncodeRequest, DecodeRequest, ImageEncodeRequest, NonEmptyText, OperationKind,
    TextEncodeRequest, UploadSpec,
};
