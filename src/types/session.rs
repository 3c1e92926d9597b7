use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{SecretKey, Uid};

/// Protocol discriminator sent as `zpw_type` by the web client.
pub const DEFAULT_API_TYPE: u32 = 30;
/// Protocol version sent as `zpw_ver` by the web client.
pub const DEFAULT_API_VERSION: u32 = 645;

/// Candidate base URLs for one logical service.
///
/// The login response carries either a single URL or an ordered list;
/// both shapes deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceUrls {
    One(String),
    Many(Vec<String>),
}

impl ServiceUrls {
    /// Preferred (first) candidate, `None` for an empty list.
    pub fn first(&self) -> Option<&str> {
        match self {
            ServiceUrls::One(url) => Some(url.as_str()),
            ServiceUrls::Many(urls) => urls.first().map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ServiceUrls::One(_) => 1,
            ServiceUrls::Many(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for ServiceUrls {
    fn from(url: &str) -> Self {
        ServiceUrls::One(url.to_string())
    }
}

impl From<String> for ServiceUrls {
    fn from(url: String) -> Self {
        ServiceUrls::One(url)
    }
}

impl From<Vec<String>> for ServiceUrls {
    fn from(urls: Vec<String>) -> Self {
        ServiceUrls::Many(urls)
    }
}

impl From<Vec<&str>> for ServiceUrls {
    fn from(urls: Vec<&str>) -> Self {
        ServiceUrls::Many(urls.into_iter().map(str::to_string).collect())
    }
}

/// Logical service name to candidate host mapping (`zpw_service_map_v3`).
pub type ServiceMap = BTreeMap<String, ServiceUrls>;

/// Immutable per-login context needed to address and sign requests.
///
/// Built once after login or session restore and shared read-only between
/// concurrent requests. The `with_*` methods return an updated copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    uid: Uid,
    secret_key: SecretKey,
    #[serde(default)]
    zpw_service_map: ServiceMap,
    #[serde(default = "default_api_type")]
    api_type: u32,
    #[serde(default = "default_api_version")]
    api_version: u32,
}

fn default_api_type() -> u32 {
    DEFAULT_API_TYPE
}

fn default_api_version() -> u32 {
    DEFAULT_API_VERSION
}

impl Session {
    pub fn new(uid: Uid, secret_key: SecretKey) -> Self {
        Self {
            uid,
            secret_key,
            zpw_service_map: ServiceMap::new(),
            api_type: DEFAULT_API_TYPE,
            api_version: DEFAULT_API_VERSION,
        }
    }

    pub fn with_service_map(mut self, service_map: ServiceMap) -> Self {
        self.zpw_service_map = service_map;
        self
    }

    /// Add or replace the candidates for one service.
    pub fn with_service(mut self, name: impl Into<String>, urls: impl Into<ServiceUrls>) -> Self {
        self.zpw_service_map.insert(name.into(), urls.into());
        self
    }

    pub fn with_api_type(mut self, api_type: u32) -> Self {
        self.api_type = api_type;
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn uid(&self) -> &str {
        self.uid.as_str()
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn service_map(&self) -> &ServiceMap {
        &self.zpw_service_map
    }

    pub fn api_type(&self) -> u32 {
        self.api_type
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }
}
