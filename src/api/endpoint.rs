/// HTTP verb an endpoint is called with.
///
/// GET calls carry the encrypted payload in the query string, POST calls in
/// a form-encoded `params` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

/// Static description of one remote operation: which service hosts it,
/// its path below the service base URL, and its verb.
///
/// ```rust
/// use zalo_web_sdk::api::{Endpoint, RequestMethod};
///
/// const BLOCK_FEED: Endpoint = Endpoint::post("friend", "/api/friend/feed/block");
/// assert_eq!(BLOCK_FEED.method, RequestMethod::Post);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub service: &'static str,
    pub path: &'static str,
    pub method: RequestMethod,
}

impl Endpoint {
    pub const fn get(service: &'static str, path: &'static str) -> Self {
        Self {
            service,
            path,
            method: RequestMethod::Get,
        }
    }

    pub const fn post(service: &'static str, path: &'static str) -> Self {
        Self {
            service,
            path,
            method: RequestMethod::Post,
        }
    }
}
