//! Zalo web API SDK for Rust
//!
//! The request pipeline shared by every Zalo web endpoint: find the host
//! serving a capability, build the versioned URL, encrypt the parameters
//! under the session key, send, and decode the encrypted reply.
//!
//! ## Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | Service resolution | [`service`] |
//! | URL building | [`url`] |
//! | Parameter encryption | [`crypto`] |
//! | HTTP transport | [`client`] |
//! | Response decoding | [`envelope`] |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zalo_web_sdk::api::{Endpoint, Params};
//! use zalo_web_sdk::{service, Credentials, SecretKey, Session, Uid, ZaloClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(Uid::new("1234567890")?, SecretKey::from_base64(zpw_enk)?)
//!         .with_service(service::FRIEND, vec!["https://tt-friend-wpa.chat.zalo.me"]);
//!     let credentials = Credentials::new(imei, user_agent)?.with_cookie("zpw_sek", sek);
//!
//!     let client = ZaloClient::builder()
//!         .session(session)
//!         .credentials(credentials)
//!         .build()?;
//!
//!     const BLOCK_FEED: Endpoint = Endpoint::post(service::FRIEND, "/api/friend/feed/block");
//!     let params = Params::new().insert("fid", "123").insert("imei", imei);
//!     let payload = client.call(&BLOCK_FEED, params.as_map()).await?;
//!     println!("{:?}", payload.get("data"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`ZaloError`]; [`ZaloError::category`] and
//! [`ZaloError::code`] classify it:
//!
//! ```rust,ignore
//! use zalo_web_sdk::{ErrorCategory, ZaloError};
//!
//! match result {
//!     Ok(payload) => { /* handle success */ }
//!     Err(ZaloError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(e) if e.category() == ErrorCategory::Network => {
//!         eprintln!("Network error: {}", e);
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {}", e);
//!     }
//! }
//! ```
//!
//! A missing service URL is reported as [`ZaloError::ServiceNotFound`] by
//! [`service::resolve`], while [`service::must_resolve`] panics for callers
//! that treat it as a configuration defect.

pub mod api;
pub mod client;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod middleware;
pub mod service;
pub mod types;
pub mod url;

pub use client::{ZaloClient, ZaloClientBuilder};
pub use envelope::Payload;
pub use error::{ErrorCategory, InputErrorKind, ZaloError};
pub use types::{Cookie, Credentials, RawResponse, SecretKey, ServiceUrls, Session, Uid};
