//! Preview handles for selected files.
//!
//! A [`PreviewHandle`] is a memory-backed reference (`blob:veil/<id>`) that a
//! presentation layer can resolve to show a file before upload. Handles live
//! in a [`PreviewRegistry`] until released; an unreleased handle keeps its
//! file bytes alive for as long as the registry exists.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::media::Blob;

const URL_PREFIX: &str = "blob:veil/";

/// Reference to a registered preview.
///
/// Cloning copies the reference, not the resource: every clone points at the
/// same registry entry and releasing any of them releases the entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Owns the memory behind every live preview handle.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: Mutex<HashMap<Uuid, Blob>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `blob` and returns a new handle. Pair with exactly one
    /// [`release`](Self::release).
    pub fn acquire(&self, blob: &Blob) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.entries.lock().insert(id, blob.clone());
        tracing::debug!(preview_id = %id, file = blob.name(), "preview acquired");
        PreviewHandle {
            id,
            url: format!("{URL_PREFIX}{id}"),
        }
    }

    /// Invalidates the handle. Returns `false` when it was already released.
    pub fn release(&self, handle: &PreviewHandle) -> bool {
        let released = self.entries.lock().remove(&handle.id).is_some();
        if released {
            tracing::debug!(preview_id = %handle.id, "preview released");
        }
        released
    }

    /// Looks up the file behind a handle or URL, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        let id = url.strip_prefix(URL_PREFIX)?.parse::<Uuid>().ok()?;
        self.entries.lock().get(&id).cloned()
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.entries.lock().contains_key(&handle.id)
    }

    /// Number of handles acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_resolve() {
        let registry = PreviewRegistry::new();
        let blob = Blob::new("cover.png", vec![1u8, 2, 3]);

        let handle = registry.acquire(&blob);
        assert!(handle.url().starts_with("blob:veil/"));
        assert_eq!(registry.resolve(handle.url()), Some(blob));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(&Blob::new("a.png", vec![1u8]));

        assert!(registry.release(&handle));
        assert!(!registry.release(&handle));
        assert!(!registry.is_live(&handle));
        assert!(registry.resolve(handle.url()).is_none());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_handles_are_distinct() {
        let registry = PreviewRegistry::new();
        let blob = Blob::new("a.png", vec![1u8]);
        let first = registry.acquire(&blob);
        let second = registry.acquire(&blob);
        assert_ne!(first, second);

        registry.release(&first);
        assert!(registry.is_live(&second));
    }

    #[test]
    fn test_resolve_rejects_foreign_urls() {
        let registry = PreviewRegistry::new();
        assert!(registry.resolve("https://example.com/a.png").is_none());
        assert!(registry.resolve("blob:veil/not-a-uuid").is_none());
    }
}
