//! Session token file storage (`session.toml`).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veil_core::Result;
use veil_core::session::{SessionToken, TokenStore};

use super::atomic_toml::AtomicTomlFile;
use crate::paths::VeilPaths;

/// On-disk shape of the session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: SessionToken,
    saved_at: DateTime<Utc>,
}

/// Persists the single session token to disk.
///
/// Responsibilities:
/// - Write the token atomically with user-only permissions
/// - Treat a missing, blank or token-less file as "no session"
///
/// Does NOT:
/// - Validate or refresh tokens
/// - Support more than one account
pub struct FileTokenStore {
    file: AtomicTomlFile<StoredSession>,
}

impl FileTokenStore {
    pub fn new(paths: &VeilPaths) -> Self {
        Self::with_path(paths.session_file())
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        let stored = self.file.load()?;
        Ok(stored
            .map(|session| session.token)
            .filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &SessionToken) -> Result<()> {
        self.file.save(&StoredSession {
            token: token.clone(),
            saved_at: Utc::now(),
        })?;
        tracing::debug!(path = %self.file.path().display(), "session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!(path = %self.file.path().display(), "session token cleared");
        Ok(())
    }
}
