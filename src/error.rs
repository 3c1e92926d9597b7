use std::fmt;

use thiserror::Error;

/// Broad class of a [`ZaloError`], used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A caller-supplied argument failed a precondition.
    InvalidInput,
    /// The service map lacks a service, or the remote API reported a failure.
    Api,
    /// Parameter encryption or response decryption failed.
    Security,
    /// The transport failed or the server answered with a non-2xx status.
    Network,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::Api => "api",
            ErrorCategory::Security => "security",
            ErrorCategory::Network => "network",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which precondition an invalid argument violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputErrorKind {
    /// Missing or empty required value
    Required,
    /// Value has the wrong JSON type
    InvalidType,
    /// Integer that must be strictly positive
    NotPositive,
    /// Value outside its allowed set
    NotInEnum,
    /// Malformed value (bad base64, bad URL, wrong key length, ...)
    InvalidValue,
}

impl InputErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputErrorKind::Required => "required",
            InputErrorKind::InvalidType => "invalid_type",
            InputErrorKind::NotPositive => "not_positive",
            InputErrorKind::NotInEnum => "not_in_enum",
            InputErrorKind::InvalidValue => "invalid_value",
        }
    }
}

/// Zalo SDK error types
///
/// Every failure in the request pipeline surfaces as one of these variants.
/// [`category`](ZaloError::category) and [`code`](ZaloError::code) give a
/// stable, matchable classification on top of the variant itself.
#[derive(Debug, Error)]
pub enum ZaloError {
    #[error("invalid input `{field}`: {message}")]
    InvalidInput {
        kind: InputErrorKind,
        field: String,
        message: String,
    },

    #[error("{service} service URL not found")]
    ServiceNotFound { service: String },

    #[error("Zalo API error (code={code}): {message}")]
    Api { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("HTTP error: status {status}")]
    HttpStatus { status: u16 },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ZaloError {
    pub fn invalid_input(
        kind: InputErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ZaloError::InvalidInput {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ZaloError::InvalidInput { .. } => ErrorCategory::InvalidInput,
            ZaloError::ServiceNotFound { .. }
            | ZaloError::Api { .. }
            | ZaloError::InvalidResponse(_) => ErrorCategory::Api,
            ZaloError::Encryption(_) | ZaloError::Decryption(_) => ErrorCategory::Security,
            ZaloError::HttpStatus { .. } | ZaloError::Transport(_) => ErrorCategory::Network,
        }
    }

    /// Symbolic code within the category.
    pub fn code(&self) -> &'static str {
        match self {
            ZaloError::InvalidInput { kind, .. } => kind.as_str(),
            ZaloError::ServiceNotFound { .. } => "service_not_found",
            ZaloError::Api { .. } => "api_error",
            ZaloError::InvalidResponse(_) => "invalid_response",
            ZaloError::Encryption(_) => "encryption_failed",
            ZaloError::Decryption(_) => "decryption_failed",
            ZaloError::HttpStatus { .. } => "http_error",
            ZaloError::Transport(_) => "transport",
        }
    }

    /// Human-readable message, without the category prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            ZaloError::InvalidInput { message, .. } => message.clone(),
            ZaloError::Api { message, .. } => message.clone(),
            ZaloError::InvalidResponse(message)
            | ZaloError::Encryption(message)
            | ZaloError::Decryption(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Numeric code reported by the remote API, if this is an API error.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            ZaloError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `Ok(())` for `code == 0`, otherwise [`ZaloError::Api`].
    pub fn check_api(code: i64, message: &str) -> Result<(), ZaloError> {
        if code == 0 {
            Ok(())
        } else {
            Err(ZaloError::Api {
                code,
                message: message.to_string(),
            })
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// The pipeline never retries on its own; this only classifies.
    pub fn is_transient(&self) -> bool {
        match self {
            ZaloError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ZaloError::HttpStatus { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
