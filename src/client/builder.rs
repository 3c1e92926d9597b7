use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::crypto::{AesCbcCipher, ParamCipher};
use crate::error::{InputErrorKind, ZaloError};
use crate::types::{Credentials, Session};

use super::zalo_client::{
    MiddlewareExecutor, ZaloClient, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ORIGIN,
    DEFAULT_TIMEOUT_SECS,
};

/// Builder for [`ZaloClient`]
///
/// # Example
///
/// ```rust,ignore
/// use zalo_web_sdk::{Credentials, Session, ZaloClient};
///
/// let client = ZaloClient::builder()
///     .session(session)
///     .credentials(Credentials::new(imei, user_agent)?)
///     .with_middleware(zalo_web_sdk::middleware::LoggingMiddleware::new())
///     .build()?;
/// ```
#[must_use]
pub struct ZaloClientBuilder<M = ()> {
    session: Option<Session>,
    credentials: Option<Credentials>,
    cipher: Option<Arc<dyn ParamCipher>>,
    origin: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    middleware: Option<M>,
}

impl Default for ZaloClientBuilder<()> {
    fn default() -> Self {
        Self {
            session: None,
            credentials: None,
            cipher: None,
            origin: None,
            timeout: None,
            connect_timeout: None,
            middleware: None,
        }
    }
}

impl<M> std::fmt::Debug for ZaloClientBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaloClientBuilder")
            .field("session", &self.session.as_ref().map(Session::uid))
            .field("cipher", &self.cipher.as_ref().map(|c| c.name()))
            .field("origin", &self.origin)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

impl<M> ZaloClientBuilder<M> {
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the default [`AesCbcCipher`].
    pub fn cipher(mut self, cipher: impl ParamCipher + 'static) -> Self {
        self.cipher = Some(Arc::new(cipher));
        self
    }

    /// Set the `Origin`/`Referer` sent with requests
    ///
    /// Default: `<https://chat.zalo.me>`
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> ZaloClientBuilder<M2>
    where
        M2: Layer<ZaloClient> + Clone + Send + Sync + 'static,
    {
        ZaloClientBuilder {
            session: self.session,
            credentials: self.credentials,
            cipher: self.cipher,
            origin: self.origin,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            middleware: Some(middleware),
        }
    }

    /// Build the ZaloClient
    ///
    /// # Errors
    /// Returns an `invalid_input` error if session or credentials is not set,
    /// or the origin is not an http(s) URL.
    pub fn build(self) -> Result<ZaloClient, ZaloError>
    where
        M: Layer<ZaloClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let session = self.session.ok_or_else(|| {
            ZaloError::invalid_input(InputErrorKind::Required, "session", "session is required")
        })?;
        let credentials = self.credentials.ok_or_else(|| {
            ZaloError::invalid_input(
                InputErrorKind::Required,
                "credentials",
                "credentials are required",
            )
        })?;

        let origin = self.origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ZaloError::invalid_input(
                InputErrorKind::InvalidValue,
                "origin",
                format!("origin must start with http:// or https://, got: {}", origin),
            ));
        }
        let origin = origin.trim_end_matches('/').to_string();

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let mut client = ZaloClient {
            http,
            session: Arc::new(session),
            credentials: Arc::new(credentials),
            cipher: self.cipher.unwrap_or_else(|| Arc::new(AesCbcCipher::new())),
            origin,
            middleware_executor: None,
        };

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        Ok(client)
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::{Context, Poll};

    use serde_json::{json, Map, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::crypto;
    use crate::types::{SecretKey, Uid};

    fn session(base: &str) -> Session {
        Session::new(
            Uid::new("1000").unwrap(),
            SecretKey::from_bytes(b"1234567890123456").unwrap(),
        )
        .with_service("profile", base)
    }

    fn credentials() -> Credentials {
        Credentials::new("device-1", "Mozilla/5.0").unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_builder_default_values() {
        let client = ZaloClient::builder()
            .session(session("https://profile.example"))
            .credentials(credentials())
            .build()
            .unwrap();

        assert_eq!(client.session().uid(), "1000");
        assert_eq!(client.origin, DEFAULT_ORIGIN);
        assert_eq!(client.cipher().name(), "aes-128-cbc-hmac-sha256");
    }

    #[test]
    fn test_builder_custom_values() {
        let client = ZaloClient::builder()
            .session(session("https://profile.example"))
            .credentials(credentials())
            .origin("https://id.example/")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.origin, "https://id.example");
    }

    #[test]
    fn test_builder_rejects_invalid_origin() {
        let result = ZaloClient::builder()
            .session(session("https://profile.example"))
            .credentials(credentials())
            .origin("chat.zalo.me")
            .build();

        assert_eq!(result.unwrap_err().code(), "invalid_value");
    }

    #[test]
    fn test_missing_session() {
        let result = ZaloClient::builder().credentials(credentials()).build();
        assert_eq!(result.unwrap_err().code(), "required");
    }

    #[test]
    fn test_missing_credentials() {
        let result = ZaloClient::builder()
            .session(session("https://profile.example"))
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_middleware_configured_and_executes() {
        #[derive(Clone)]
        struct FlagLayer {
            flag: Arc<AtomicBool>,
        }

        impl Layer<ZaloClient> for FlagLayer {
            type Service = FlagService;

            fn layer(&self, inner: ZaloClient) -> Self::Service {
                FlagService {
                    inner,
                    flag: Arc::clone(&self.flag),
                }
            }
        }

        #[derive(Clone)]
        struct FlagService {
            inner: ZaloClient,
            flag: Arc<AtomicBool>,
        }

        impl Service<ReqwestRequest> for FlagService {
            type Response = ReqwestResponse;
            type Error = reqwest::Error;
            type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: ReqwestRequest) -> Self::Future {
                self.flag.store(true, Ordering::SeqCst);
                let mut inner = self.inner.clone();
                Box::pin(async move { Service::call(&mut inner, req).await })
            }
        }

        let mock_server = MockServer::start().await;
        let key = SecretKey::from_bytes(b"1234567890123456").unwrap();
        let body = crypto::encrypt(&key, &object(json!({"error_code": 0, "data": {}}))).unwrap();
        Mock::given(method("GET"))
            .and(path("/api/social/profile/me-v2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let middleware_invoked = Arc::new(AtomicBool::new(false));
        let layer = FlagLayer {
            flag: Arc::clone(&middleware_invoked),
        };

        let client = ZaloClient::builder()
            .session(session(&mock_server.uri()))
            .credentials(credentials())
            .with_middleware(layer)
            .build()
            .unwrap();

        let base = client.resolve("profile").unwrap().to_string();
        client
            .get(&base, "/api/social/profile/me-v2", &Map::new())
            .await
            .unwrap();

        assert!(middleware_invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_builder_with_logging_middleware_builds() {
        let mock_server = MockServer::start().await;
        let key = SecretKey::from_bytes(b"1234567890123456").unwrap();
        let body = crypto::encrypt(&key, &object(json!({"error_code": 0}))).unwrap();
        Mock::given(method("GET"))
            .and(path("/api/social/profile/me-v2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = ZaloClient::builder()
            .session(session(&mock_server.uri()))
            .credentials(credentials())
            .with_middleware(crate::middleware::LoggingMiddleware::new())
            .build()
            .unwrap();

        let result = client
            .get(&mock_server.uri(), "/api/social/profile/me-v2", &Map::new())
            .await;
        assert!(result.is_ok());
    }
}
