//! Reads user-selected files from disk into [`Blob`]s.

use std::path::Path;

use bytes::Bytes;
use veil_core::media::Blob;
use veil_core::{Result, VeilError};

/// Loads a file, naming the blob after the file name and inferring its MIME
/// type from the extension.
pub async fn load_blob(path: &Path) -> Result<Blob> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| VeilError::io(format!("Not a file path: {}", path.display())))?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| VeilError::io(format!("Failed to read {}: {}", path.display(), e)))?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!(file = %path.display(), size = bytes.len(), %content_type, "file loaded");

    Ok(Blob::new(name, Bytes::from(bytes)).with_content_type(content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_blob_reads_name_and_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cover.png");
        std::fs::write(&path, [0x89u8, b'P', b'N', b'G']).unwrap();

        let blob = load_blob(&path).await.unwrap();
        assert_eq!(blob.name(), "cover.png");
        assert_eq!(blob.content_type(), "image/png");
        assert_eq!(blob.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_blob(&temp_dir.path().join("nope.png")).await.unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("nope.png"));
    }
}
