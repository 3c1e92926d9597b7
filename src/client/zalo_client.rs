//! Zalo HTTP Client
//!
//! Drives the request pipeline over reqwest: resolve the service host,
//! encrypt parameters, build the URL, send, and decode the reply.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use log::debug;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use tower::Service;

use crate::api::{Endpoint, RequestMethod};
use crate::crypto::{self, ParamCipher};
use crate::envelope::{self, Payload};
use crate::error::ZaloError;
use crate::service;
use crate::types::{Credentials, RawResponse, Session};
use crate::url;

pub(crate) const DEFAULT_ORIGIN: &str = "https://chat.zalo.me";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// Zalo API Client
///
/// Cheap to clone; the session, credentials and cipher are shared behind
/// `Arc` and never mutated, so one client can serve concurrent requests.
#[derive(Clone)]
pub struct ZaloClient {
    pub(crate) http: Client,
    pub(crate) session: Arc<Session>,
    pub(crate) credentials: Arc<Credentials>,
    pub(crate) cipher: Arc<dyn ParamCipher>,
    pub(crate) origin: String,
    pub(crate) middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for ZaloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaloClient")
            .field("uid", &self.session.uid())
            .field("cipher", &self.cipher.name())
            .field("origin", &self.origin)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl ZaloClient {
    /// Create a new client builder
    pub fn builder() -> super::ZaloClientBuilder {
        super::ZaloClientBuilder::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn cipher(&self) -> &dyn ParamCipher {
        self.cipher.as_ref()
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    /// Base URL serving `service_name`, see [`service::resolve`].
    pub fn resolve(&self, service_name: &str) -> Result<&str, ZaloError> {
        service::resolve(&self.session, service_name)
    }

    /// Encrypt `params` with this client's cipher and session key.
    pub fn encrypt_params(&self, params: &Map<String, Value>) -> Result<String, ZaloError> {
        crypto::encrypt_with(self.cipher.as_ref(), self.session.secret_key(), params)
    }

    /// Decode a raw reply with this client's cipher and session key.
    pub fn decode(&self, raw: &RawResponse) -> Result<Payload, ZaloError> {
        envelope::parse_with(raw, self.session.secret_key(), self.cipher.as_ref())
    }

    /// Call an endpoint, reporting a missing service as
    /// [`ZaloError::ServiceNotFound`].
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        params: &Map<String, Value>,
    ) -> Result<Payload, ZaloError> {
        let base = self.resolve(endpoint.service)?;
        self.call_at(base, endpoint, params).await
    }

    /// Call an endpoint whose service must be configured.
    ///
    /// # Panics
    /// Panics naming the service when the session's service map lacks it.
    pub async fn call_required(
        &self,
        endpoint: &Endpoint,
        params: &Map<String, Value>,
    ) -> Result<Payload, ZaloError> {
        let base = service::must_resolve(&self.session, endpoint.service);
        self.call_at(base, endpoint, params).await
    }

    async fn call_at(
        &self,
        base: &str,
        endpoint: &Endpoint,
        params: &Map<String, Value>,
    ) -> Result<Payload, ZaloError> {
        debug!(
            "[Zalo] {} {} {}",
            endpoint.method.as_str(),
            endpoint.service,
            endpoint.path
        );
        match endpoint.method {
            RequestMethod::Get => self.get(base, endpoint.path, params).await,
            RequestMethod::Post => self.post(base, endpoint.path, params).await,
        }
    }

    /// GET `{base}{path}` with the encrypted params in the query string.
    pub async fn get(
        &self,
        base: &str,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<Payload, ZaloError> {
        let encrypted = self.encrypt_params(params)?;
        let url = url::build_with_payload(&format!("{base}{path}"), &encrypted, &self.session)?;
        let request = self.prepare(self.http.get(url)).build()?;
        let raw = self.send(request).await?;
        self.decode(&raw)
    }

    /// POST `{base}{path}` with the encrypted params as a form field.
    pub async fn post(
        &self,
        base: &str,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<Payload, ZaloError> {
        let encrypted = self.encrypt_params(params)?;
        let url = url::build(&format!("{base}{path}"), &[], &self.session)?;
        let request = self
            .prepare(self.http.post(url))
            .form(&[(url::PARAM_PAYLOAD, encrypted.as_str())])
            .build()?;
        let raw = self.send(request).await?;
        self.decode(&raw)
    }

    /// Attach the identity headers carried by every request.
    pub fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let credentials = &self.credentials;
        let mut builder = builder
            .header(USER_AGENT, credentials.user_agent())
            .header(ACCEPT_LANGUAGE, credentials.language())
            .header(ORIGIN, self.origin.as_str())
            .header(REFERER, format!("{}/", self.origin));
        if let Some(cookie) = credentials.cookie_header() {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    /// Send a prepared request and collect the undecoded reply.
    pub async fn send(&self, request: reqwest::Request) -> Result<RawResponse, ZaloError> {
        let response = self.send_request(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!("[Zalo] <<< {} ({} bytes)", status.as_u16(), body.len());
        Ok(RawResponse::new(status, body).with_headers(headers))
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }
}

impl Service<reqwest::Request> for ZaloClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}
