//! Zalo API trait and context
//!
//! Provides the base trait and context for endpoint modules built on the
//! request pipeline.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::Endpoint;
use crate::client::ZaloClient;
use crate::envelope::Payload;
use crate::error::ZaloError;

/// Context holding shared resources for endpoint modules.
#[derive(Clone)]
pub struct ZaloContext {
    /// The Zalo HTTP client for making API requests
    pub(crate) client: Arc<ZaloClient>,
}

impl std::fmt::Debug for ZaloContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaloContext")
            .field("uid", &self.client.session().uid())
            .finish_non_exhaustive()
    }
}

impl ZaloContext {
    /// Create a new ZaloContext
    pub fn new(client: Arc<ZaloClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the Zalo HTTP client.
    pub fn client(&self) -> &ZaloClient {
        &self.client
    }
}

impl From<ZaloClient> for ZaloContext {
    fn from(client: ZaloClient) -> Self {
        Self::new(Arc::new(client))
    }
}

/// Trait for endpoint modules.
///
/// Implementors only supply the context; [`call`](ZaloApi::call) runs the
/// whole pipeline for one of their [`Endpoint`]s.
pub trait ZaloApi: Send + Sync {
    /// Get a reference to the Zalo context
    fn context(&self) -> &ZaloContext;

    /// Get the name of this API for logging and error context.
    ///
    /// Implementors should override this to return a descriptive name
    /// (e.g., "friend", "group", "sticker").
    fn api_name(&self) -> &'static str {
        "unknown"
    }

    /// Call `endpoint` with `params` through the shared client.
    fn call<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        params: &'a Map<String, Value>,
    ) -> impl std::future::Future<Output = Result<Payload, ZaloError>> + Send + 'a
    where
        Self: Sized,
    {
        async move {
            log::debug!("[Zalo] {} -> {}", self.api_name(), endpoint.path);
            self.context().client().call(endpoint, params).await
        }
    }
}
