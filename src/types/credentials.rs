use serde::{Deserialize, Serialize};

use super::ids::Imei;
use crate::error::ZaloError;

/// Locale used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "vi";

/// A single cookie attached to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Device and client identity sent alongside every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    imei: Imei,
    user_agent: String,
    #[serde(default)]
    cookies: Vec<Cookie>,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Credentials {
    pub fn new(imei: impl Into<String>, user_agent: impl Into<String>) -> Result<Self, ZaloError> {
        Ok(Self {
            imei: Imei::new(imei)?,
            user_agent: user_agent.into(),
            cookies: Vec::new(),
            language: default_language(),
        })
    }

    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn imei(&self) -> &str {
        self.imei.as_str()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// `Cookie` header value, `None` when the jar is empty.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA: &str = "Mozilla/5.0 (X11; Linux x86_64)";

    #[test]
    fn test_credentials_defaults() {
        let creds = Credentials::new("device-1", UA).unwrap();
        assert_eq!(creds.imei(), "device-1");
        assert_eq!(creds.user_agent(), UA);
        assert_eq!(creds.language(), DEFAULT_LANGUAGE);
        assert!(creds.cookie_header().is_none());
    }

    #[test]
    fn test_credentials_empty_imei() {
        let err = Credentials::new("", UA).unwrap_err();
        assert_eq!(err.code(), "required");
    }

    #[test]
    fn test_cookie_header_keeps_order() {
        let creds = Credentials::new("device-1", UA)
            .unwrap()
            .with_cookie("zpsid", "abc")
            .with_cookie("zpw_sek", "def");
        assert_eq!(creds.cookie_header().unwrap(), "zpsid=abc; zpw_sek=def");
    }

    #[test]
    fn test_deserialize_without_language() {
        let json = r#"{"imei": "device-1", "user_agent": "UA", "cookies": [{"name": "a", "value": "b"}]}"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.language(), "vi");
        assert_eq!(creds.cookies().len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_empty_imei() {
        let json = r#"{"imei": "", "user_agent": "UA"}"#;
        assert!(serde_json::from_str::<Credentials>(json).is_err());
    }
}
