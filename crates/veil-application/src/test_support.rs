//! Scripted gateway for application tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use veil_core::gateway::Gateway;
use veil_core::media::{Blob, Failure, OperationResult, UploadSpec};
use veil_core::session::{Credentials, SessionToken, TokenStore};

/// Gateway double that returns canned results and records every call.
///
/// When `hold` is set, `submit` parks until `release()` is called so tests can
/// observe the workflow while a call is in flight.
pub struct FakeGateway {
    tokens: Arc<dyn TokenStore>,
    login_result: Mutex<Result<SessionToken, Failure>>,
    register_result: Mutex<Result<(), Failure>>,
    submit_result: Mutex<OperationResult>,
    hold: Mutex<Option<Arc<Notify>>>,
    started: Notify,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub submitted: Mutex<Vec<UploadSpec>>,
}

impl FakeGateway {
    pub fn new(tokens: Arc<dyn TokenStore>, submit_result: OperationResult) -> Self {
        Self {
            tokens,
            login_result: Mutex::new(Ok(SessionToken::new("tok-123"))),
            register_result: Mutex::new(Ok(())),
            submit_result: Mutex::new(submit_result),
            hold: Mutex::new(None),
            started: Notify::new(),
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_login(&self, failure: Failure) {
        *self.login_result.lock() = Err(failure);
    }

    pub fn fail_register(&self, failure: Failure) {
        *self.register_result.lock() = Err(failure);
    }

    pub fn set_submit_result(&self, result: OperationResult) {
        *self.submit_result.lock() = result;
    }

    /// Makes the next submissions wait for [`FakeGateway::release`].
    pub fn hold_submissions(&self) {
        *self.hold.lock() = Some(Arc::new(Notify::new()));
    }

    pub fn release(&self) {
        if let Some(gate) = self.hold.lock().take() {
            gate.notify_one();
        }
    }

    /// Waits until a submission has reached the gateway.
    pub async fn wait_for_submit(&self) {
        self.started.notified().await;
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn register(&self, _credentials: &Credentials) -> Result<(), Failure> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_result.lock().clone()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<SessionToken, Failure> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.login_result.lock().clone();
        if let Ok(token) = &result {
            self.tokens.save(token).map_err(|e| {
                Failure::new(veil_core::media::FailureKind::Storage, e.to_string())
            })?;
        }
        result
    }

    async fn submit(&self, spec: &UploadSpec) -> OperationResult {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().push(spec.clone());
        self.started.notify_one();

        let gate = self.hold.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.submit_result.lock().clone()
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn png(name: &str) -> Blob {
    Blob::new(name, vec![0x89u8, b'P', b'N', b'G'])
}
