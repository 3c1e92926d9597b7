//! Request URL construction
//!
//! Every call carries the protocol version (`zpw_ver`) and type (`zpw_type`)
//! of the session, and GET-style calls carry the encrypted payload under
//! `params`. The base URL is taken verbatim: only the pairs appended here are
//! percent-encoded, each exactly once.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{InputErrorKind, ZaloError};
use crate::types::Session;

pub const PARAM_API_VERSION: &str = "zpw_ver";
pub const PARAM_API_TYPE: &str = "zpw_type";
pub const PARAM_PAYLOAD: &str = "params";

const PROTOCOL_KEYS: [&str; 3] = [PARAM_API_VERSION, PARAM_API_TYPE, PARAM_PAYLOAD];

// RFC 3986 unreserved characters stay as-is
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build a request URL with caller-supplied query pairs.
///
/// Caller pairs named `zpw_ver`, `zpw_type` or `params` are dropped in favor
/// of the protocol values.
pub fn build(
    base_url_with_path: &str,
    extra_query: &[(&str, &str)],
    session: &Session,
) -> Result<String, ZaloError> {
    build_full(base_url_with_path, extra_query, None, session)
}

/// Build a request URL carrying an encrypted payload under `params`.
pub fn build_with_payload(
    base_url_with_path: &str,
    encrypted_payload: &str,
    session: &Session,
) -> Result<String, ZaloError> {
    build_full(base_url_with_path, &[], Some(encrypted_payload), session)
}

/// General form of [`build`] and [`build_with_payload`].
///
/// Appended order: caller pairs, `params`, `zpw_ver`, `zpw_type`. A query
/// already present on the base URL is kept verbatim in front of them, minus
/// any protocol keys, and a fragment stays at the end.
pub fn build_full(
    base_url_with_path: &str,
    extra_query: &[(&str, &str)],
    encrypted_payload: Option<&str>,
    session: &Session,
) -> Result<String, ZaloError> {
    let api_version = session.api_version().to_string();
    let api_type = session.api_type().to_string();

    let mut pairs: Vec<(&str, &str)> = extra_query
        .iter()
        .filter(|(key, _)| !PROTOCOL_KEYS.contains(key))
        .copied()
        .collect();
    if let Some(payload) = encrypted_payload {
        pairs.push((PARAM_PAYLOAD, payload));
    }
    pairs.push((PARAM_API_VERSION, &api_version));
    pairs.push((PARAM_API_TYPE, &api_type));

    let query = pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let (head, fragment) = match base_url_with_path.find('#') {
        Some(idx) => base_url_with_path.split_at(idx),
        None => (base_url_with_path, ""),
    };

    let url = match head.split_once('?') {
        None => format!("{head}?{query}{fragment}"),
        Some((path, existing)) => {
            let kept = existing
                .split('&')
                .filter(|pair| !pair.is_empty() && !is_protocol_pair(pair))
                .collect::<Vec<_>>();
            if kept.is_empty() {
                format!("{path}?{query}{fragment}")
            } else {
                format!("{path}?{}&{query}{fragment}", kept.join("&"))
            }
        }
    };

    reqwest::Url::parse(&url).map_err(|e| {
        ZaloError::invalid_input(
            InputErrorKind::InvalidValue,
            "base_url",
            format!("cannot build a valid URL from {:?}: {}", base_url_with_path, e),
        )
    })?;

    Ok(url)
}

// Matches keys in their decoded form, so `zpw%5Fver` is caught too
fn is_protocol_pair(pair: &str) -> bool {
    let key = pair.split_once('=').map_or(pair, |(key, _)| key);
    let key = percent_decode_str(key).decode_utf8_lossy();
    PROTOCOL_KEYS.contains(&key.as_ref())
}
