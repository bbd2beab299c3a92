//! Session store: the single owner of the client's authentication state.
//!
//! State machine:
//!
//! ```text
//! Unknown --initialize--> Authenticated | Anonymous
//! Anonymous --login--> Authenticated
//! Authenticated --logout--> Anonymous
//! ```
//!
//! The token itself lives in the shared [`TokenStore`]; the gateway reads it
//! from there before every authorized call.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use veil_core::gateway::Gateway;
use veil_core::session::{AuthState, Credentials, Session, TokenStore};

use crate::error::AuthError;

pub struct SessionStore {
    tokens: Arc<dyn TokenStore>,
    gateway: Arc<dyn Gateway>,
    state: RwLock<AuthState>,
}

impl SessionStore {
    /// Creates a store in the `Unknown` state. Call [`SessionStore::initialize`]
    /// before anything reads the state.
    pub fn new(tokens: Arc<dyn TokenStore>, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            tokens,
            gateway,
            state: RwLock::new(AuthState::Unknown),
        }
    }

    /// Reads the stored token and settles the state.
    ///
    /// Only the first call has an effect; later calls return the current state.
    /// A token that cannot be read counts as absent.
    pub fn initialize(&self) -> AuthState {
        let mut state = self.state.write();
        if *state != AuthState::Unknown {
            return *state;
        }

        let has_token = match self.tokens.load() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "could not read stored session, starting anonymous");
                false
            }
        };

        *state = if has_token {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        info!(state = ?*state, "session initialized");
        *state
    }

    pub fn state(&self) -> AuthState {
        *self.state.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Logs in through the gateway, which persists the returned token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Invalid`] if a field is blank (no request is sent)
    /// - [`AuthError::Rejected`] with the service message if login fails, or
    ///   with a storage failure if the token could not be persisted
    ///
    /// The state is left unchanged on every error.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.initialize();
        credentials.validate()?;

        let token = self.gateway.login(credentials).await.map_err(|failure| {
            debug!(kind = ?failure.kind, "login rejected");
            failure
        })?;

        *self.state.write() = AuthState::Authenticated;
        info!("logged in");
        Ok(Session { token })
    }

    /// Clears the stored token. Calling it again is a no-op.
    ///
    /// The state flips to `Anonymous` even if clearing the file fails; the
    /// error is still returned so the caller can report it.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.initialize();
        let cleared = self.tokens.clear();

        let mut state = self.state.write();
        if *state == AuthState::Authenticated {
            info!("logged out");
        }
        *state = AuthState::Anonymous;

        cleared.map_err(AuthError::from)
    }

    /// Creates an account. Registration does not log in.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        credentials.validate()?;
        self.gateway.register(credentials).await?;
        info!("account registered");
        Ok(())
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }
}
