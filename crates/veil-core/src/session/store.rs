//! Token storage trait.

use parking_lot::RwLock;

use super::model::SessionToken;
use crate::error::Result;

/// Durable storage for the single session token.
///
/// The session store writes through this trait on login/logout and the
/// gateway reads it before every authorized call. There is exactly one slot;
/// multiple accounts are not supported.
///
/// Methods are synchronous: the token is tiny and `initialize()` must finish
/// before anything dependent runs.
pub trait TokenStore: Send + Sync {
    /// Loads the stored token, if any.
    fn load(&self) -> Result<Option<SessionToken>>;

    /// Replaces the stored token.
    fn save(&self, token: &SessionToken) -> Result<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local token storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a token (a "previous run").
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &SessionToken) -> Result<()> {
        *self.token.write() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}
