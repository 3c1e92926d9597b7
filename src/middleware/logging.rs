use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use http::StatusCode;
use log::{log, warn, Level};
use reqwest::{Request, Response};
use tower::{Layer, Service};

/// Logs each request line and its outcome through the `log` facade.
///
/// Query values that carry the encrypted payload or identify the account
/// are replaced with `[REDACTED]` before anything is written. Non-2xx
/// replies and transport failures are always logged at `warn`.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    level: Level,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self { level: Level::Info }
    }

    /// Log at `debug`, with status reasons.
    pub fn verbose(self) -> Self {
        self.with_level(Level::Debug)
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingMiddleware {
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            level: self.level,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    level: Level,
}

// `params` carries the encrypted payload; the rest identify the account
const SENSITIVE_FIELDS: &[&str] = &[
    "params",
    "zpw_enk",
    "secret_key",
    "imei",
    "password",
    "token",
    "authorization",
];

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_FIELDS.iter().any(|s| key.eq_ignore_ascii_case(s))
}

fn redact_pair(pair: &str) -> String {
    match pair.split_once('=') {
        Some((key, _)) if is_sensitive(key) => format!("{key}=[REDACTED]"),
        _ => pair.to_string(),
    }
}

fn redact_url(url: &str) -> String {
    let Some((base, rest)) = url.split_once('?') else {
        return url.to_string();
    };
    let (query, fragment) = match rest.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (rest, None),
    };

    let query = query.split('&').map(redact_pair).collect::<Vec<_>>().join("&");
    match fragment {
        Some(fragment) => format!("{base}?{query}#{fragment}"),
        None => format!("{base}?{query}"),
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

fn log_outcome(level: Level, status: StatusCode, elapsed: Duration) {
    if !status.is_success() {
        warn!(
            "[Zalo] <<< {} {} ({:?})",
            status.as_u16(),
            status_text(status),
            elapsed
        );
    } else if level == Level::Debug {
        log!(
            level,
            "[Zalo] <<< {} {} ({:?})",
            status.as_u16(),
            status_text(status),
            elapsed
        );
    } else {
        log!(level, "[Zalo] <<< {} ({:?})", status.as_u16(), elapsed);
    }
}

type ResponseFuture<E> = Pin<Box<dyn Future<Output = Result<Response, E>> + Send>>;

impl<S> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Display + Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = ResponseFuture<S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let level = self.level;
        let line = format!("{} {}", req.method(), redact_url(req.url().as_str()));
        log!(level, "[Zalo] >>> {}", line);

        // take the service that was driven ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let start = Instant::now();
            match inner.call(req).await {
                Ok(response) => {
                    log_outcome(level, response.status(), start.elapsed());
                    Ok(response)
                }
                Err(e) => {
                    warn!("[Zalo] {} failed after {:?}: {}", line, start.elapsed(), e);
                    Err(e)
                }
            }
        })
    }
}
