//! Service resolution
//!
//! Maps a logical service name (`"friend"`, `"group"`, ...) to the base host
//! serving it, using the session's service map. Candidate lists are a static
//! preference order: the first entry always wins.
//!
//! Two entry points exist on purpose:
//!
//! - [`resolve`] returns [`ZaloError::ServiceNotFound`] so callers can branch
//!   on it like any other error.
//! - [`must_resolve`] treats a missing service as a configuration defect and
//!   panics, naming the service.

use log::error;

use crate::error::ZaloError;
use crate::types::Session;

pub const FRIEND: &str = "friend";
pub const GROUP: &str = "group";
pub const PROFILE: &str = "profile";
pub const FILE: &str = "file";
pub const STICKER: &str = "sticker";
pub const GROUP_BOARD: &str = "group_board";
pub const CONVERSATION: &str = "conversation";
pub const CATALOG: &str = "catalog";
pub const CHAT: &str = "chat";
pub const REACTION: &str = "reaction";
pub const ALIAS: &str = "alias";
pub const LABEL: &str = "label";
pub const BOARDS: &str = "boards";
pub const QUICK_MESSAGE: &str = "quick_message";

/// Resolve the base URL serving `service_name`.
///
/// # Errors
/// [`ZaloError::ServiceNotFound`] when the service is absent from the map or
/// mapped to an empty list.
pub fn resolve<'a>(session: &'a Session, service_name: &str) -> Result<&'a str, ZaloError> {
    session
        .service_map()
        .get(service_name)
        .and_then(|urls| urls.first())
        .ok_or_else(|| ZaloError::ServiceNotFound {
            service: service_name.to_string(),
        })
}

/// Resolve the base URL serving `service_name`, aborting the operation if
/// the session has none.
///
/// # Panics
/// Panics with `"<service_name> service URL not found"` when
/// [`resolve`] would fail.
pub fn must_resolve<'a>(session: &'a Session, service_name: &str) -> &'a str {
    match resolve(session, service_name) {
        Ok(url) => url,
        Err(e) => {
            error!("[Zalo] {}", e);
            panic!("{}", e);
        }
    }
}
