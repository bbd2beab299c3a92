//! HttpGateway - reqwest implementation of the [`Gateway`] trait.
//!
//! Auth calls send JSON; upload calls send multipart forms and leave the
//! content type to reqwest so the boundary is set correctly. Every call except
//! register/login carries `Authorization: Bearer <token>` when a token is
//! stored. Nothing is retried and no local timeout is applied.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use veil_core::ClientConfig;
use veil_core::gateway::Gateway;
use veil_core::media::{
    Blob, Failure, FailureKind, MediaKind, OperationKind, OperationOutput, OperationResult,
    UploadSpec,
};
use veil_core::session::{Credentials, SessionToken, TokenStore};

use crate::dto::{AuthRequest, DecodeResponse, EncodeResponse, LoginResponse, error_detail};

const REGISTER_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";

/// Gateway that talks to the service over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpGateway {
    /// Creates a gateway for `base_url`, sharing token storage with the
    /// session store.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            tokens,
        }
    }

    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(config.base_url.clone(), tokens)
    }

    /// Replaces the underlying HTTP client (proxies, custom TLS).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the bearer token when one is stored.
    fn authorize(&self, request: RequestBuilder) -> (RequestBuilder, bool) {
        match self.tokens.load() {
            Ok(Some(token)) => (request.bearer_auth(token.expose()), true),
            Ok(None) => (request, false),
            Err(e) => {
                warn!(error = %e, "could not read session token, sending unauthenticated");
                (request, false)
            }
        }
    }

    /// Resolves a server-provided download path against the base address.
    ///
    /// Absolute http(s) URLs are kept as they are.
    pub fn resolve_download_url(&self, path: &str) -> Option<Url> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).ok();
        }
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined).ok()
    }

    /// Sends the request and maps transport errors and non-2xx statuses to
    /// a [`Failure`].
    async fn execute(
        &self,
        request: RequestBuilder,
        rejected_kind: FailureKind,
        fallback: &'static str,
    ) -> Result<Response, Failure> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request did not reach the service");
            Failure::new(FailureKind::Transport, fallback)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_detail(&body).unwrap_or_else(|| fallback.to_string());
        warn!(%status, %message, "service rejected request");
        Err(Failure::new(rejected_kind, message))
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        fallback: &'static str,
    ) -> Result<T, Failure> {
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "malformed response body");
            Failure::new(FailureKind::Transport, fallback)
        })
    }

    fn build_form(spec: &UploadSpec) -> Form {
        let mut form = Form::new();
        for (slot, blob) in spec.files() {
            form = form.part(slot.field_name(), file_part(blob));
        }
        for (name, value) in spec.text_fields() {
            form = form.text(name, value.to_string());
        }
        form
    }

    fn interpret_encode(&self, body: EncodeResponse, fallback: &'static str) -> OperationResult {
        let download_url = body
            .download_url
            .as_deref()
            .and_then(|path| self.resolve_download_url(path))
            .ok_or_else(|| {
                warn!("encode response has no usable download_url");
                Failure::new(FailureKind::Transport, fallback)
            })?;
        Ok(OperationOutput::Encoded { download_url })
    }

    /// Payload types other than TEXT, IMAGE and AUDIO have no renderable kind
    /// and are reported as a decode failure.
    fn interpret_decode(&self, body: DecodeResponse, fallback: &'static str) -> OperationResult {
        let malformed = |reason: &str| {
            warn!(reason, "unusable decode response");
            Failure::new(FailureKind::Transport, fallback)
        };

        let discriminator = body.kind.as_deref().ok_or_else(|| malformed("missing type"))?;

        if discriminator.eq_ignore_ascii_case("TEXT") {
            let message = body.message.ok_or_else(|| malformed("missing message"))?;
            return Ok(OperationOutput::DecodedText { message });
        }

        let kind = MediaKind::from_discriminator(discriminator)
            .ok_or_else(|| malformed("unknown payload type"))?;
        let download_url = body
            .download_url
            .as_deref()
            .and_then(|path| self.resolve_download_url(path))
            .ok_or_else(|| malformed("missing download_url"))?;

        Ok(OperationOutput::DecodedMedia { kind, download_url })
    }
}

fn endpoint_path(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::TextInImage => "/media/encode/text",
        OperationKind::ImageInImage => "/media/encode/image",
        OperationKind::AudioInImage => "/media/encode/audio",
        OperationKind::Decode => "/media/decode",
    }
}

fn file_part(blob: &Blob) -> Part {
    let part = Part::bytes(blob.bytes().to_vec()).file_name(blob.name().to_string());
    match part.mime_str(blob.content_type()) {
        Ok(part) => part,
        Err(e) => {
            warn!(file = blob.name(), error = %e, "invalid content type, sending without one");
            Part::bytes(blob.bytes().to_vec()).file_name(blob.name().to_string())
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn register(&self, credentials: &Credentials) -> Result<(), Failure> {
        debug!(path = "/auth/register", "sending request");
        let request = self
            .client
            .post(self.endpoint("/auth/register"))
            .json(&AuthRequest {
                email: &credentials.email,
                password: &credentials.password,
            });

        self.execute(request, FailureKind::Auth, REGISTER_FAILED)
            .await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, Failure> {
        debug!(path = "/auth/login", "sending request");
        let request = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&AuthRequest {
                email: &credentials.email,
                password: &credentials.password,
            });

        let response = self.execute(request, FailureKind::Auth, LOGIN_FAILED).await?;
        let body: LoginResponse = Self::parse(response, LOGIN_FAILED).await?;

        let token = body
            .access_token
            .map(SessionToken::new)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("login response has no access_token");
                Failure::new(FailureKind::Transport, LOGIN_FAILED)
            })?;

        self.tokens.save(&token).map_err(|e| {
            warn!(error = %e, "failed to persist session token");
            Failure::new(FailureKind::Storage, format!("Could not save session: {}", e))
        })?;

        Ok(token)
    }

    async fn submit(&self, spec: &UploadSpec) -> OperationResult {
        let kind = spec.kind();
        let path = endpoint_path(kind);
        let fallback = kind.fallback_failure_message();

        let (request, authorized) = self.authorize(
            self.client
                .post(self.endpoint(path))
                .multipart(Self::build_form(spec)),
        );
        debug!(path, authorized, "sending upload");

        let response = self
            .execute(request, FailureKind::Operation, fallback)
            .await?;

        if kind.is_decode() {
            let body: DecodeResponse = Self::parse(response, fallback).await?;
            self.interpret_decode(body, fallback)
        } else {
            let body: EncodeResponse = Self::parse(response, fallback).await?;
            self.interpret_encode(body, fallback)
        }
    }

    async fn health_check(&self) -> bool {
        let (request, _) = self.authorize(self.client.get(self.endpoint("/health")));
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }
}
