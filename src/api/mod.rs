//! Support for endpoint modules
//!
//! Endpoint modules (change a group name, send a sticker, ...) live outside
//! this crate. They describe their operation with an [`Endpoint`], shape and
//! check their arguments with [`params`], run the pipeline through
//! [`ZaloApi::call`] and rename response fields with [`transform`].
//!
//! - [`endpoint`] - Service/path/verb descriptors
//! - [`params`] - Ordered parameter maps and `invalid_input` checks
//! - [`transform`] - External → internal field-name tables
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zalo_web_sdk::api::{params, Endpoint, Params, ZaloApi, ZaloContext};
//! use zalo_web_sdk::service;
//!
//! const CHANGE_NAME: Endpoint = Endpoint::post(service::GROUP, "/api/group/updateinfo");
//!
//! struct GroupApi { context: ZaloContext }
//!
//! impl ZaloApi for GroupApi {
//!     fn context(&self) -> &ZaloContext { &self.context }
//!     fn api_name(&self) -> &'static str { "group" }
//! }
//!
//! impl GroupApi {
//!     async fn change_name(&self, group_id: &str, name: &str) -> Result<Payload, ZaloError> {
//!         let params = Params::new()
//!             .insert("grid", params::require_non_empty("group_id", group_id)?)
//!             .insert("gname", params::require_non_empty("name", name)?);
//!         self.call(&CHANGE_NAME, params.as_map()).await
//!     }
//! }
//! ```

pub mod endpoint;
pub mod params;
pub mod transform;
pub mod r#trait;

pub use endpoint::{Endpoint, RequestMethod};
pub use params::Params;
pub use r#trait::{ZaloApi, ZaloContext};
pub use transform::FieldMap;
