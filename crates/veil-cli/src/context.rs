use std::sync::Arc;

use anyhow::{Result, bail};
use veil_application::{OperationWorkflow, SessionStore};
use veil_core::media::OperationKind;
use veil_core::session::TokenStore;
use veil_core::{ClientConfig, PreviewRegistry};
use veil_infrastructure::{FileTokenStore, VeilPaths};
use veil_interaction::HttpGateway;

/// Everything a command needs, wired once per process.
pub struct AppContext {
    pub paths: VeilPaths,
    pub config: ClientConfig,
    pub session: SessionStore,
    gateway: Arc<HttpGateway>,
    previews: Arc<PreviewRegistry>,
}

impl AppContext {
    pub fn new(paths: VeilPaths, config: ClientConfig) -> Self {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&paths));
        let gateway = Arc::new(HttpGateway::from_config(&config, tokens.clone()));
        let session = SessionStore::new(tokens, gateway.clone());
        session.initialize();

        Self {
            paths,
            config,
            session,
            gateway,
            previews: Arc::new(PreviewRegistry::new()),
        }
    }

    pub fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }

    pub fn workflow(&self, kind: OperationKind) -> OperationWorkflow {
        OperationWorkflow::new(kind, self.gateway.clone(), self.previews.clone())
    }

    /// Encode and decode are only offered to a logged-in user.
    pub fn require_login(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("You are not logged in. Run `veil login --email <email>` first.");
        }
        Ok(())
    }
}
