//! Request parameter maps and argument checks
//!
//! Endpoint modules validate caller input before anything is encrypted.
//! Every check reports an `invalid_input` [`ZaloError`] naming the field, so
//! callers can branch on it instead of crashing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{InputErrorKind, ZaloError};

/// Ordered parameter map handed to the cipher.
///
/// Keys serialize in insertion order.
///
/// ```rust
/// use zalo_web_sdk::api::params::Params;
///
/// let params = Params::new()
///     .insert("fid", "123")
///     .insert("imei", "device-1")
///     .into_map();
/// assert_eq!(params.keys().collect::<Vec<_>>(), ["fid", "imei"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert only when `value` is `Some`.
    pub fn insert_opt(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.insert(key, value),
            None => self,
        }
    }

    /// Insert any serializable value (nested objects, typed structs).
    pub fn insert_serialized<T: Serialize>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, ZaloError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| {
            ZaloError::invalid_input(InputErrorKind::InvalidType, key.clone(), e.to_string())
        })?;
        self.0.insert(key, value);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Params> for Map<String, Value> {
    fn from(params: Params) -> Self {
        params.0
    }
}

/// Require a non-empty (after trimming) string.
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ZaloError> {
    if value.trim().is_empty() {
        return Err(ZaloError::invalid_input(
            InputErrorKind::Required,
            field,
            format!("{field} must be a non-empty string"),
        ));
    }
    Ok(value)
}

/// Require a strictly positive integer.
pub fn require_positive(field: &str, value: i64) -> Result<i64, ZaloError> {
    if value <= 0 {
        return Err(ZaloError::invalid_input(
            InputErrorKind::NotPositive,
            field,
            format!("{field} must be a positive integer, got {value}"),
        ));
    }
    Ok(value)
}

/// Require a JSON boolean.
pub fn require_bool(field: &str, value: &Value) -> Result<bool, ZaloError> {
    value.as_bool().ok_or_else(|| {
        ZaloError::invalid_input(
            InputErrorKind::InvalidType,
            field,
            format!("{field} must be a boolean"),
        )
    })
}

/// Require membership in a fixed set of values.
pub fn require_one_of<'a>(
    field: &str,
    value: &'a str,
    allowed: &[&str],
) -> Result<&'a str, ZaloError> {
    if !allowed.contains(&value) {
        return Err(ZaloError::invalid_input(
            InputErrorKind::NotInEnum,
            field,
            format!("{field} must be one of {}, got {value:?}", allowed.join(", ")),
        ));
    }
    Ok(value)
}

/// Require a non-empty list.
pub fn require_non_empty_list<'a, T>(field: &str, values: &'a [T]) -> Result<&'a [T], ZaloError> {
    if values.is_empty() {
        return Err(ZaloError::invalid_input(
            InputErrorKind::Required,
            field,
            format!("{field} must not be empty"),
        ));
    }
    Ok(values)
}
