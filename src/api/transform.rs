//! Response field renaming
//!
//! The server is inconsistent about key casing (`groupName`, `GroupName`,
//! `group_name` may all name the same field). Endpoints declare a table of
//! external names per internal field; [`FieldMap::apply`] produces a payload
//! keyed by internal names only, which then deserializes into a typed result.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ZaloError;

/// External → internal field-name table.
///
/// Each entry lists the internal name and every external spelling accepted
/// for it, in priority order.
///
/// ```rust
/// use serde_json::json;
/// use zalo_web_sdk::api::transform::FieldMap;
///
/// const GROUP: FieldMap = FieldMap::new(&[
///     ("group_id", &["groupId", "group_id"]),
///     ("name", &["groupName", "name"]),
/// ]);
///
/// let payload = json!({"groupId": "1", "groupName": "team"});
/// let renamed = GROUP.apply(payload.as_object().unwrap());
/// assert_eq!(renamed["group_id"], "1");
/// assert_eq!(renamed["name"], "team");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    fields: &'static [(&'static str, &'static [&'static str])],
}

impl FieldMap {
    pub const fn new(fields: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self { fields }
    }

    /// First value present under any external name of `internal`.
    pub fn lookup<'p>(&self, payload: &'p Map<String, Value>, internal: &str) -> Option<&'p Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == internal)
            .and_then(|(_, external)| external.iter().find_map(|key| payload.get(*key)))
    }

    /// Build a payload keyed by internal names, in table order.
    ///
    /// Fields absent from the payload are omitted; unlisted keys are dropped.
    pub fn apply(&self, payload: &Map<String, Value>) -> Map<String, Value> {
        let mut out = Map::new();
        for (internal, external) in self.fields {
            if let Some(value) = external.iter().find_map(|key| payload.get(*key)) {
                out.insert((*internal).to_string(), value.clone());
            }
        }
        out
    }

    /// [`apply`](Self::apply), then deserialize into `T`.
    pub fn decode<T: DeserializeOwned>(&self, payload: &Map<String, Value>) -> Result<T, ZaloError> {
        serde_json::from_value(Value::Object(self.apply(payload)))
            .map_err(|e| ZaloError::InvalidResponse(format!("cannot decode payload: {}", e)))
    }
}
