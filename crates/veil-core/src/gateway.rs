//! Gateway trait: the single point of contact with the remote service.

use async_trait::async_trait;

use crate::media::{Failure, OperationResult, UploadSpec};
use crate::session::{Credentials, SessionToken};

/// Normalizes every remote call into a typed result.
///
/// Implementations never panic or raise on network/HTTP problems: every
/// outcome comes back as a value. No retries are performed.
///
/// Workflows and the session store depend on this trait so tests can swap
/// in a scripted fake.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Registers a new account. Does not log in.
    async fn register(&self, credentials: &Credentials) -> Result<(), Failure>;

    /// Logs in and returns the issued token.
    ///
    /// On success the token is also written to the shared token storage.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, Failure>;

    /// Uploads a validated request to the matching encode/decode endpoint.
    async fn submit(&self, spec: &UploadSpec) -> OperationResult;

    /// Liveness probe. Any error reads as "not reachable".
    async fn health_check(&self) -> bool;
}
